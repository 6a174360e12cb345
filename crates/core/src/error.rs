//! Error types shared across Hashtara tooling
//!
//! Configuration errors distinguish the one recoverable case — a missing
//! file — from everything else. Callers that treat absence as a supported
//! state must match on [`ConfigError::FileNotFound`] explicitly; all other
//! variants are hard failures.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating configuration files
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file does not exist. Recoverable: callers may substitute a
    /// documented default instead of failing.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// The file exists but could not be read. Always fatal.
    #[error("unreadable file {path}: {source}")]
    UnreadableFile {
        /// Path that failed to read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The file content could not be parsed
    #[error("malformed content in {path} at line {line}: {reason}")]
    Malformed {
        /// Path of the offending file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What went wrong
        reason: String,
    },

    /// A required field is missing or empty
    #[error("missing required field: {0}")]
    MissingField(String),
}

/// Errors raised while executing external commands
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The program is not installed or not on PATH
    #[error("command not found: {0}")]
    CommandNotFound(String),

    /// The program could not be spawned
    #[error("failed to execute {program}: {source}")]
    SpawnFailed {
        /// Program that failed to start
        program: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Command completed successfully
    pub const SUCCESS: i32 = 0;
    /// Generic failure
    pub const FAILURE: i32 = 1;
    /// Configuration missing or invalid
    pub const CONFIG_ERROR: i32 = 3;
    /// Required external command not found
    pub const COMMAND_NOT_FOUND: i32 = 127;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("android/key.properties"));
        assert!(err.to_string().contains("key.properties"));
    }

    #[test]
    fn test_malformed_display_includes_line() {
        let err = ConfigError::Malformed {
            path: PathBuf::from("key.properties"),
            line: 3,
            reason: "no separator".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("no separator"));
    }

    #[test]
    fn test_missing_field_display() {
        let err = ConfigError::MissingField("storePassword".to_string());
        assert_eq!(err.to_string(), "missing required field: storePassword");
    }
}
