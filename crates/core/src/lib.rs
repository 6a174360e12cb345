//! Core utilities for Hashtara development tools
//!
//! This crate provides shared functionality:
//! - Configuration error taxonomy and CLI exit codes
//! - Java-style `.properties` file parsing
//! - Process execution helpers

#![warn(missing_docs)]

pub mod error;
pub mod process;
pub mod properties;
