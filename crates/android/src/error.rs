//! Error type for Android build-configuration tooling

use hashtara_core::error::{ConfigError, ProcessError};
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for this crate
pub type Result<T> = std::result::Result<T, AndroidError>;

/// Errors raised by Android build-configuration operations
#[derive(Error, Debug)]
pub enum AndroidError {
    /// Configuration file problem (missing field, unreadable, malformed)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// key.properties names a keystore that does not exist on disk
    #[error("keystore not found: {0}")]
    KeystoreNotFound(PathBuf),

    /// A release build was requested without usable release credentials
    #[error("release signing unavailable: {0}")]
    ReleaseSigningUnavailable(String),

    /// A dependency coordinate failed validation
    #[error("invalid dependency coordinate '{coordinate}': {reason}")]
    InvalidCoordinate {
        /// The offending coordinate in `group:artifact[:version]` form
        coordinate: String,
        /// What failed
        reason: String,
    },

    /// A manifest placeholder failed validation
    #[error("invalid manifest placeholder '{key}': {reason}")]
    InvalidPlaceholder {
        /// Placeholder key
        key: String,
        /// What failed
        reason: String,
    },

    /// Project build settings failed validation
    #[error("invalid project configuration: {0}")]
    InvalidProject(String),

    /// Gradle wrapper missing from the project
    #[error("gradle wrapper not found in {0}")]
    WrapperNotFound(PathBuf),

    /// External command execution failed
    #[error(transparent)]
    Process(#[from] ProcessError),
}
