//! Release signing resolution
//!
//! Release credentials live in `android/key.properties`, a file owned by
//! the deployment operator and never committed. Absence of the file is a
//! supported state so local iteration works without release keys; every
//! other defect in the file (missing field, unparseable content, keystore
//! path pointing nowhere) is a hard configuration error. A half-written
//! credentials file is operator error, not a cue to quietly ship a
//! debug-signed release.
//!
//! Resolution is explicit: callers get a [`SigningResolution`] and must
//! acknowledge whether credentials were found before a release build
//! proceeds.

use crate::error::{AndroidError, Result};
use hashtara_core::error::ConfigError;
use hashtara_core::properties;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// File name of the operator-supplied credentials file, relative to the
/// Android project root
pub const KEY_PROPERTIES_FILE: &str = "key.properties";

const KEY_ALIAS: &str = "keyAlias";
const KEY_PASSWORD: &str = "keyPassword";
const STORE_FILE: &str = "storeFile";
const STORE_PASSWORD: &str = "storePassword";

/// Build variant of an Android artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildVariant {
    /// Local development build, signed with the debug identity
    Debug,
    /// Store-distributable build
    Release,
}

impl BuildVariant {
    /// Gradle task name suffix (`assembleDebug`, `bundleRelease`, ...)
    pub fn task_suffix(&self) -> &'static str {
        match self {
            BuildVariant::Debug => "Debug",
            BuildVariant::Release => "Release",
        }
    }

    /// Lowercase name as used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildVariant::Debug => "debug",
            BuildVariant::Release => "release",
        }
    }
}

impl std::str::FromStr for BuildVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "debug" => Ok(BuildVariant::Debug),
            "release" => Ok(BuildVariant::Release),
            other => Err(format!("unknown build variant: {}", other)),
        }
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete release signing credentials.
///
/// Invariant: all four fields are present and the keystore exists on disk.
/// Constructed only through [`resolve_signing_profile`].
#[derive(Clone, PartialEq, Eq)]
pub struct SigningProfile {
    /// Alias of the signing key within the keystore
    pub key_alias: String,
    /// Keystore path, resolved against the Android project root
    pub store_file: PathBuf,
    key_password: String,
    store_password: String,
}

impl SigningProfile {
    /// Password for the signing key
    pub fn key_password(&self) -> &str {
        &self.key_password
    }

    /// Password for the keystore
    pub fn store_password(&self) -> &str {
        &self.store_password
    }

    fn from_properties(map: &BTreeMap<String, String>, android_dir: &Path) -> Result<Self> {
        let key_alias = require(map, KEY_ALIAS)?;
        let key_password = require(map, KEY_PASSWORD)?;
        let store_file = require(map, STORE_FILE)?;
        let store_password = require(map, STORE_PASSWORD)?;

        let store_file = PathBuf::from(store_file);
        let store_file = if store_file.is_absolute() {
            store_file
        } else {
            android_dir.join(store_file)
        };

        if !store_file.exists() {
            return Err(AndroidError::KeystoreNotFound(store_file));
        }

        Ok(Self {
            key_alias,
            store_file,
            key_password,
            store_password,
        })
    }
}

// Passwords stay out of logs and panics
impl fmt::Debug for SigningProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningProfile")
            .field("key_alias", &self.key_alias)
            .field("store_file", &self.store_file)
            .field("key_password", &"<redacted>")
            .field("store_password", &"<redacted>")
            .finish()
    }
}

fn require(map: &BTreeMap<String, String>, key: &str) -> Result<String> {
    match map.get(key) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => Err(ConfigError::MissingField(key.to_string()).into()),
    }
}

/// Outcome of signing resolution. Callers must acknowledge which branch
/// occurred; there is no implicit fallthrough to the debug identity.
#[derive(Debug, Clone)]
pub enum SigningResolution {
    /// key.properties was found and is complete
    Resolved(SigningProfile),
    /// key.properties is absent; release builds need an explicit policy
    /// decision to proceed
    Fallback {
        /// The path that was looked up and not found
        missing: PathBuf,
    },
}

impl SigningResolution {
    /// Whether release credentials resolved
    pub fn is_resolved(&self) -> bool {
        matches!(self, SigningResolution::Resolved(_))
    }

    /// The resolved profile, if any
    pub fn profile(&self) -> Option<&SigningProfile> {
        match self {
            SigningResolution::Resolved(profile) => Some(profile),
            SigningResolution::Fallback { .. } => None,
        }
    }

    /// Serializable summary. Never includes passwords.
    pub fn report(&self) -> SigningReport {
        match self {
            SigningResolution::Resolved(profile) => SigningReport {
                resolved: true,
                key_alias: Some(profile.key_alias.clone()),
                store_file: Some(profile.store_file.clone()),
                missing: None,
            },
            SigningResolution::Fallback { missing } => SigningReport {
                resolved: false,
                key_alias: None,
                store_file: None,
                missing: Some(missing.clone()),
            },
        }
    }
}

/// Serializable signing resolution summary
#[derive(Debug, Clone, Serialize)]
pub struct SigningReport {
    /// Whether release credentials resolved
    pub resolved: bool,
    /// Key alias, when resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,
    /// Keystore path, when resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_file: Option<PathBuf>,
    /// Path of the absent key.properties, when falling back
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<PathBuf>,
}

/// What to do when a release build has no resolved credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Refuse to build. The default: a debug-signed artifact must never
    /// reach a store track by accident.
    #[default]
    Forbid,
    /// Sign with the debug identity. The legacy Gradle behavior, kept
    /// behind an explicit opt-in.
    AllowDebugSigned,
}

/// Signing identity selected for a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningConfig {
    /// The toolchain-managed debug identity
    DebugIdentity,
    /// Operator-supplied release credentials
    Release(SigningProfile),
}

/// Read `<project_root>/android/key.properties` once and resolve it.
///
/// The keystore path inside the file is resolved relative to the
/// directory containing key.properties.
pub fn resolve_signing_profile(project_root: &Path) -> Result<SigningResolution> {
    let android_dir = project_root.join("android");
    let path = android_dir.join(KEY_PROPERTIES_FILE);

    let map = match properties::load(&path) {
        Ok(map) => map,
        Err(ConfigError::FileNotFound(missing)) => {
            return Ok(SigningResolution::Fallback { missing });
        }
        Err(err) => return Err(err.into()),
    };

    let profile = SigningProfile::from_properties(&map, &android_dir)?;
    Ok(SigningResolution::Resolved(profile))
}

/// Select the signing identity for a build variant.
///
/// Debug builds always use the debug identity and never consult the
/// resolution. Release builds use the resolved profile, or consult
/// `policy` when resolution fell back.
pub fn select_signing_config(
    variant: BuildVariant,
    resolution: &SigningResolution,
    policy: FallbackPolicy,
) -> Result<SigningConfig> {
    match variant {
        BuildVariant::Debug => Ok(SigningConfig::DebugIdentity),
        BuildVariant::Release => match resolution {
            SigningResolution::Resolved(profile) => Ok(SigningConfig::Release(profile.clone())),
            SigningResolution::Fallback { missing } => match policy {
                FallbackPolicy::AllowDebugSigned => Ok(SigningConfig::DebugIdentity),
                FallbackPolicy::Forbid => Err(AndroidError::ReleaseSigningUnavailable(format!(
                    "{} not found; pass --allow-debug-signing to build with the debug identity",
                    missing.display()
                ))),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn project_with_key_properties(content: &str, keystore: Option<&str>) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let android_dir = dir.path().join("android");
        fs::create_dir_all(&android_dir).unwrap();
        fs::write(android_dir.join(KEY_PROPERTIES_FILE), content).unwrap();
        if let Some(name) = keystore {
            fs::write(android_dir.join(name), b"keystore").unwrap();
        }
        dir
    }

    const COMPLETE: &str = "keyAlias=app\nkeyPassword=pw1\nstoreFile=app.keystore\nstorePassword=pw2\n";

    #[test]
    fn test_resolve_absent_file_is_fallback_not_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("android")).unwrap();

        let resolution = resolve_signing_profile(dir.path()).unwrap();
        match resolution {
            SigningResolution::Fallback { missing } => {
                assert!(missing.ends_with("android/key.properties"));
            }
            other => panic!("expected fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_complete_profile() {
        let dir = project_with_key_properties(COMPLETE, Some("app.keystore"));

        let resolution = resolve_signing_profile(dir.path()).unwrap();
        let profile = resolution.profile().expect("profile should resolve");
        assert_eq!(profile.key_alias, "app");
        assert_eq!(profile.key_password(), "pw1");
        assert_eq!(profile.store_password(), "pw2");
        assert_eq!(
            profile.store_file,
            dir.path().join("android").join("app.keystore")
        );
    }

    #[test]
    fn test_resolve_missing_field_is_hard_error() {
        let content = "keyAlias=app\nkeyPassword=pw1\nstoreFile=app.keystore\n";
        let dir = project_with_key_properties(content, Some("app.keystore"));

        let err = resolve_signing_profile(dir.path()).unwrap_err();
        match err {
            AndroidError::Config(ConfigError::MissingField(field)) => {
                assert_eq!(field, "storePassword");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_resolve_empty_field_is_hard_error() {
        let content = "keyAlias=\nkeyPassword=pw1\nstoreFile=app.keystore\nstorePassword=pw2\n";
        let dir = project_with_key_properties(content, Some("app.keystore"));

        let err = resolve_signing_profile(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            AndroidError::Config(ConfigError::MissingField(_))
        ));
    }

    #[test]
    fn test_resolve_missing_keystore_is_hard_error() {
        let dir = project_with_key_properties(COMPLETE, None);

        let err = resolve_signing_profile(dir.path()).unwrap_err();
        match err {
            AndroidError::KeystoreNotFound(path) => {
                assert!(path.ends_with("android/app.keystore"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_resolve_malformed_file_is_hard_error() {
        let dir = project_with_key_properties("not a property line\n", None);

        let err = resolve_signing_profile(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            AndroidError::Config(ConfigError::Malformed { .. })
        ));
    }

    #[test]
    fn test_resolve_absolute_store_file_kept_as_is() {
        let keystore = tempfile::NamedTempFile::new().unwrap();
        let content = format!(
            "keyAlias=app\nkeyPassword=pw1\nstoreFile={}\nstorePassword=pw2\n",
            keystore.path().display()
        );
        let dir = project_with_key_properties(&content, None);

        let resolution = resolve_signing_profile(dir.path()).unwrap();
        let profile = resolution.profile().unwrap();
        assert_eq!(profile.store_file, keystore.path());
    }

    #[test]
    fn test_select_debug_ignores_resolution() {
        let dir = project_with_key_properties(COMPLETE, Some("app.keystore"));
        let resolved = resolve_signing_profile(dir.path()).unwrap();
        let fallback = SigningResolution::Fallback {
            missing: PathBuf::from("android/key.properties"),
        };

        for resolution in [&resolved, &fallback] {
            let config =
                select_signing_config(BuildVariant::Debug, resolution, FallbackPolicy::Forbid)
                    .unwrap();
            assert_eq!(config, SigningConfig::DebugIdentity);
        }
    }

    #[test]
    fn test_select_release_with_resolved_profile() {
        let dir = project_with_key_properties(COMPLETE, Some("app.keystore"));
        let resolution = resolve_signing_profile(dir.path()).unwrap();

        let config =
            select_signing_config(BuildVariant::Release, &resolution, FallbackPolicy::Forbid)
                .unwrap();
        match config {
            SigningConfig::Release(profile) => assert_eq!(profile.key_alias, "app"),
            other => panic!("expected release config, got {:?}", other),
        }
    }

    #[test]
    fn test_select_release_fallback_forbidden_by_default() {
        let resolution = SigningResolution::Fallback {
            missing: PathBuf::from("android/key.properties"),
        };

        let err = select_signing_config(
            BuildVariant::Release,
            &resolution,
            FallbackPolicy::Forbid,
        )
        .unwrap_err();
        assert!(matches!(err, AndroidError::ReleaseSigningUnavailable(_)));
    }

    #[test]
    fn test_select_release_fallback_allowed_with_opt_in() {
        let resolution = SigningResolution::Fallback {
            missing: PathBuf::from("android/key.properties"),
        };

        let config = select_signing_config(
            BuildVariant::Release,
            &resolution,
            FallbackPolicy::AllowDebugSigned,
        )
        .unwrap();
        assert_eq!(config, SigningConfig::DebugIdentity);
    }

    #[test]
    fn test_debug_output_redacts_passwords() {
        let dir = project_with_key_properties(COMPLETE, Some("app.keystore"));
        let resolution = resolve_signing_profile(dir.path()).unwrap();
        let debug = format!("{:?}", resolution.profile().unwrap());

        assert!(debug.contains("app"));
        assert!(!debug.contains("pw1"));
        assert!(!debug.contains("pw2"));
    }

    #[test]
    fn test_report_never_contains_passwords() {
        let dir = project_with_key_properties(COMPLETE, Some("app.keystore"));
        let resolution = resolve_signing_profile(dir.path()).unwrap();
        let json = serde_json::to_string(&resolution.report()).unwrap();

        assert!(json.contains("\"resolved\":true"));
        assert!(!json.contains("pw1"));
        assert!(!json.contains("pw2"));
    }

    #[test]
    fn test_build_variant_parse() {
        assert_eq!("release".parse::<BuildVariant>(), Ok(BuildVariant::Release));
        assert_eq!("debug".parse::<BuildVariant>(), Ok(BuildVariant::Debug));
        assert!("staging".parse::<BuildVariant>().is_err());
    }
}
