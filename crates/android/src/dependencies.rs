//! Pinned third-party dependency coordinates
//!
//! The Android build consumes these as opaque contracts; nothing here is
//! downloaded or resolved. The list is fixed and version-pinned so that a
//! release build is reproducible, with one exception: Firebase modules
//! managed by the Firebase BoM deliberately carry no version of their own.

use crate::error::{AndroidError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

static GROUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_-]*)+$").unwrap());

static ARTIFACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_-]*$").unwrap());

// Maven versions are not semver; dotted numerics cover every pin we carry
static VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)*$").unwrap());

/// Gradle configuration a dependency is declared under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyScope {
    /// Ordinary `implementation` dependency
    Implementation,
    /// A `platform(...)` BoM import that pins versions for its group
    Platform,
    /// `coreLibraryDesugaring` runtime artifact
    CoreLibraryDesugaring,
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DependencyScope::Implementation => "implementation",
            DependencyScope::Platform => "platform",
            DependencyScope::CoreLibraryDesugaring => "coreLibraryDesugaring",
        };
        f.write_str(name)
    }
}

/// A Maven dependency coordinate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MavenCoordinate {
    /// Group id, e.g. `com.google.firebase`
    pub group: String,
    /// Artifact id, e.g. `firebase-auth-ktx`
    pub artifact: String,
    /// Pinned version; `None` only for BoM-managed modules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Declaration scope
    pub scope: DependencyScope,
}

impl MavenCoordinate {
    fn new(group: &str, artifact: &str, version: Option<&str>, scope: DependencyScope) -> Self {
        Self {
            group: group.to_string(),
            artifact: artifact.to_string(),
            version: version.map(String::from),
            scope,
        }
    }

    /// Validate coordinate syntax. BoM coverage is checked at list level
    /// by [`validate_all`].
    pub fn validate(&self) -> Result<()> {
        if !GROUP_RE.is_match(&self.group) {
            return Err(self.invalid("group id is not a dotted identifier"));
        }
        if !ARTIFACT_RE.is_match(&self.artifact) {
            return Err(self.invalid("artifact id has invalid characters"));
        }
        match (&self.version, self.scope) {
            (Some(version), _) if !VERSION_RE.is_match(version) => {
                Err(self.invalid("version is not a dotted numeric pin"))
            }
            (None, DependencyScope::Platform) => {
                Err(self.invalid("a BoM import must itself be pinned"))
            }
            (None, DependencyScope::CoreLibraryDesugaring) => {
                Err(self.invalid("desugaring runtime must be pinned"))
            }
            _ => Ok(()),
        }
    }

    fn invalid(&self, reason: &str) -> AndroidError {
        AndroidError::InvalidCoordinate {
            coordinate: self.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for MavenCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)?;
        if let Some(version) = &self.version {
            write!(f, ":{}", version)?;
        }
        Ok(())
    }
}

/// The fixed dependency list of the Hashtara Android app
pub fn pinned_dependencies() -> Vec<MavenCoordinate> {
    use DependencyScope::*;

    vec![
        MavenCoordinate::new(
            "com.google.firebase",
            "firebase-bom",
            Some("32.3.1"),
            Platform,
        ),
        MavenCoordinate::new("com.google.firebase", "firebase-analytics-ktx", None, Implementation),
        MavenCoordinate::new("com.google.firebase", "firebase-auth-ktx", None, Implementation),
        MavenCoordinate::new(
            "com.google.firebase",
            "firebase-messaging",
            Some("23.3.1"),
            Implementation,
        ),
        MavenCoordinate::new(
            "com.google.android.gms",
            "play-services-auth",
            Some("20.6.0"),
            Implementation,
        ),
        MavenCoordinate::new("androidx.multidex", "multidex", Some("2.0.1"), Implementation),
        MavenCoordinate::new(
            "com.android.tools",
            "desugar_jdk_libs",
            Some("2.1.5"),
            CoreLibraryDesugaring,
        ),
    ]
}

/// Validate a dependency list: every coordinate is well-formed, and every
/// unversioned module is covered by a BoM import for its group.
pub fn validate_all(dependencies: &[MavenCoordinate]) -> Result<()> {
    for dependency in dependencies {
        dependency.validate()?;
    }

    for dependency in dependencies {
        if dependency.version.is_none() {
            let covered = dependencies.iter().any(|candidate| {
                candidate.scope == DependencyScope::Platform && candidate.group == dependency.group
            });
            if !covered {
                return Err(AndroidError::InvalidCoordinate {
                    coordinate: dependency.to_string(),
                    reason: "unversioned module is not covered by a BoM import".to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_list_validates() {
        assert!(validate_all(&pinned_dependencies()).is_ok());
    }

    #[test]
    fn test_pinned_list_includes_firebase_bom() {
        let deps = pinned_dependencies();
        assert!(deps.iter().any(|d| {
            d.artifact == "firebase-bom"
                && d.scope == DependencyScope::Platform
                && d.version.as_deref() == Some("32.3.1")
        }));
    }

    #[test]
    fn test_display_with_and_without_version() {
        let deps = pinned_dependencies();
        let bom = deps.iter().find(|d| d.artifact == "firebase-bom").unwrap();
        let auth = deps
            .iter()
            .find(|d| d.artifact == "firebase-auth-ktx")
            .unwrap();
        assert_eq!(bom.to_string(), "com.google.firebase:firebase-bom:32.3.1");
        assert_eq!(auth.to_string(), "com.google.firebase:firebase-auth-ktx");
    }

    #[test]
    fn test_unversioned_without_bom_rejected() {
        let deps = vec![MavenCoordinate::new(
            "androidx.multidex",
            "multidex",
            None,
            DependencyScope::Implementation,
        )];
        let err = validate_all(&deps).unwrap_err();
        assert!(matches!(err, AndroidError::InvalidCoordinate { .. }));
    }

    #[test]
    fn test_unpinned_bom_rejected() {
        let bom = MavenCoordinate::new(
            "com.google.firebase",
            "firebase-bom",
            None,
            DependencyScope::Platform,
        );
        assert!(bom.validate().is_err());
    }

    #[test]
    fn test_non_numeric_version_rejected() {
        let dep = MavenCoordinate::new(
            "androidx.multidex",
            "multidex",
            Some("2.0.1-SNAPSHOT"),
            DependencyScope::Implementation,
        );
        assert!(dep.validate().is_err());
    }

    #[test]
    fn test_invalid_group_rejected() {
        let dep = MavenCoordinate::new(
            "multidex",
            "multidex",
            Some("2.0.1"),
            DependencyScope::Implementation,
        );
        assert!(dep.validate().is_err());
    }
}
