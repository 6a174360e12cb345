//! Android build-configuration tools for Hashtara
//!
//! This crate models the build configuration of the Hashtara Android app
//! and provides:
//! - Release signing resolution from `key.properties`
//! - Build variant and signing config selection
//! - Manifest placeholders for push notification channels
//! - The pinned third-party dependency list
//! - Project-level build settings (SDK levels, multidex, desugaring)
//! - Gradle wrapper invocation

#![warn(missing_docs)]

pub mod dependencies;
pub mod error;
pub mod gradle;
pub mod manifest;
pub mod project;
pub mod signing;
