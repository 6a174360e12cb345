//! Gradle build system integration
//!
//! Invokes build tasks through the project's Gradle wrapper. The wrapper
//! lives in the `android/` directory of a Flutter project.

use crate::error::{AndroidError, Result};
use crate::signing::BuildVariant;
use hashtara_core::process::{run_command_in_dir, CommandResult};
use std::path::{Path, PathBuf};

/// Platform-specific wrapper invocation
pub fn wrapper_command() -> &'static str {
    if cfg!(windows) {
        "gradlew.bat"
    } else {
        "./gradlew"
    }
}

/// The `android/` directory of a Flutter project
pub fn android_dir(project_root: &Path) -> PathBuf {
    project_root.join("android")
}

/// Whether the Gradle wrapper is present
pub fn has_wrapper(project_root: &Path) -> bool {
    let dir = android_dir(project_root);
    dir.join("gradlew").exists() || dir.join("gradlew.bat").exists()
}

/// Run a Gradle task through the wrapper
pub fn run_task(project_root: &Path, task: &str) -> Result<CommandResult> {
    let dir = android_dir(project_root);
    if !has_wrapper(project_root) {
        return Err(AndroidError::WrapperNotFound(dir));
    }

    Ok(run_command_in_dir(wrapper_command(), &[task], &dir)?)
}

/// Build an APK for a variant (`assembleDebug` / `assembleRelease`)
pub fn assemble(project_root: &Path, variant: BuildVariant) -> Result<CommandResult> {
    run_task(project_root, &format!("assemble{}", variant.task_suffix()))
}

/// Build an app bundle (AAB) for a variant
pub fn bundle(project_root: &Path, variant: BuildVariant) -> Result<CommandResult> {
    run_task(project_root, &format!("bundle{}", variant.task_suffix()))
}

/// Clean build artifacts
pub fn clean(project_root: &Path) -> Result<CommandResult> {
    run_task(project_root, "clean")
}
