//! Project-level build settings
//!
//! The static declarative values of the Android build: application id, SDK
//! floors, NDK pin, and the compatibility switches (multidex, core-library
//! desugaring). Defaults match the shipped Hashtara configuration; a
//! `.hashtara-tools.toml` at the project root may override them.

use crate::error::{AndroidError, Result};
use hashtara_core::error::ConfigError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Google Sign-In requires at least this API level
pub const MIN_SDK_FLOOR: u32 = 21;

/// Override file name, looked up at the project root
pub const CONFIG_FILE: &str = ".hashtara-tools.toml";

static APPLICATION_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)+$").unwrap());

static NDK_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").unwrap());

/// Android application build settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Unique application id on the Play Store
    pub application_id: String,
    /// Kotlin/Java namespace
    pub namespace: String,
    /// Minimum supported API level
    pub min_sdk: u32,
    /// NDK version pin
    pub ndk_version: String,
    /// Java source/target compatibility
    pub java_version: u32,
    /// Whether multidex is enabled
    pub multidex_enabled: bool,
    /// Whether core-library desugaring is enabled
    pub core_library_desugaring: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            application_id: "com.hashtara.app".to_string(),
            namespace: "com.hashtara.app".to_string(),
            min_sdk: 23,
            ndk_version: "27.0.12077973".to_string(),
            java_version: 11,
            multidex_enabled: true,
            core_library_desugaring: true,
        }
    }
}

impl AppConfig {
    /// Load settings, applying overrides from `.hashtara-tools.toml` at the
    /// project root when present. Read once at startup; the returned value
    /// is immutable thereafter.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::UnreadableFile {
            path: path.clone(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Malformed {
            path,
            line: e.span().map(|s| line_of(&content, s.start)).unwrap_or(1),
            reason: e.message().to_string(),
        })?;

        Ok(config)
    }

    /// Validate settings against the floors the dependency list imposes
    pub fn validate(&self) -> Result<()> {
        if !APPLICATION_ID_RE.is_match(&self.application_id) {
            return Err(AndroidError::InvalidProject(format!(
                "'{}' is not a valid application id",
                self.application_id
            )));
        }
        if !APPLICATION_ID_RE.is_match(&self.namespace) {
            return Err(AndroidError::InvalidProject(format!(
                "'{}' is not a valid namespace",
                self.namespace
            )));
        }
        if self.min_sdk < MIN_SDK_FLOOR {
            return Err(AndroidError::InvalidProject(format!(
                "min_sdk {} is below {}, the floor for Google Sign-In",
                self.min_sdk, MIN_SDK_FLOOR
            )));
        }
        if !NDK_VERSION_RE.is_match(&self.ndk_version) {
            return Err(AndroidError::InvalidProject(format!(
                "'{}' is not a full NDK version pin",
                self.ndk_version
            )));
        }
        Ok(())
    }
}

fn line_of(content: &str, offset: usize) -> usize {
    content[..offset.min(content.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.application_id, "com.hashtara.app");
        assert_eq!(config.min_sdk, 23);
    }

    #[test]
    fn test_min_sdk_floor_enforced() {
        let config = AppConfig {
            min_sdk: 19,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_sdk 19"));
    }

    #[test]
    fn test_invalid_application_id_rejected() {
        let config = AppConfig {
            application_id: "Hashtara".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_ndk_pin_rejected() {
        let config = AppConfig {
            ndk_version: "27".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "application_id = \"com.hashtara.beta\"\nmin_sdk = 26\n",
        )
        .unwrap();

        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.application_id, "com.hashtara.beta");
        assert_eq!(config.min_sdk, 26);
        // untouched fields keep their defaults
        assert_eq!(config.ndk_version, "27.0.12077973");
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "target_skd = 34\n").unwrap();

        let err = AppConfig::load(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            AndroidError::Config(ConfigError::Malformed { .. })
        ));
    }
}
