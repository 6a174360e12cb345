//! Hashtara Android CLI
//!
//! Build-configuration tools for the Hashtara Android app: release signing
//! resolution, Gradle builds, and declarative config checks.

mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hashtara_android::dependencies;
use hashtara_android::error::AndroidError;
use hashtara_android::gradle;
use hashtara_android::manifest::ManifestPlaceholders;
use hashtara_android::project::AppConfig;
use hashtara_android::signing::{
    self, BuildVariant, FallbackPolicy, SigningConfig, SigningResolution,
};
use hashtara_core::error::exit_codes;
use output::Status;
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hashtara-android")]
#[command(about = "Build configuration tools for Hashtara Android")]
#[command(version)]
struct Cli {
    /// Flutter project root (contains the android/ directory)
    #[arg(long, default_value = ".", global = true)]
    project_root: PathBuf,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or verify release signing configuration
    Signing {
        #[command(subcommand)]
        action: SigningAction,
    },

    /// Build the app via the Gradle wrapper
    Build {
        /// Build configuration: debug, release
        #[arg(long, default_value = "debug")]
        configuration: String,
        /// Build bundle (AAB) instead of APK
        #[arg(long)]
        bundle: bool,
        /// Clean before building
        #[arg(long)]
        clean: bool,
        /// Allow a release build to be signed with the debug identity
        /// when key.properties is absent
        #[arg(long)]
        allow_debug_signing: bool,
    },

    /// Validate the pinned dependency list
    Deps {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print manifest placeholders for notification channels
    Placeholders {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose project and environment
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum SigningAction {
    /// Report how release signing would resolve
    Resolve {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fail unless a complete release profile resolves
    Verify,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let root = cli.project_root;

    let exit_code = match cli.command {
        Commands::Signing { action } => match action {
            SigningAction::Resolve { json } => run_signing_resolve(&root, json)?,
            SigningAction::Verify => run_signing_verify(&root),
        },
        Commands::Build {
            configuration,
            bundle,
            clean,
            allow_debug_signing,
        } => run_build(&root, &configuration, bundle, clean, allow_debug_signing),
        Commands::Deps { json } => run_deps(json)?,
        Commands::Placeholders { json } => run_placeholders(json)?,
        Commands::Doctor { json } => run_doctor(&root, json)?,
    };

    std::process::exit(exit_code);
}

fn run_signing_resolve(root: &Path, json: bool) -> Result<i32> {
    let resolution = match signing::resolve_signing_profile(root) {
        Ok(resolution) => resolution,
        Err(e) => {
            Status::error(&format!("Signing resolution failed: {}", e));
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution.report())?);
        return Ok(exit_codes::SUCCESS);
    }

    match &resolution {
        SigningResolution::Resolved(profile) => {
            Status::success("Release signing resolved");
            Status::field("key alias", &profile.key_alias);
            Status::field("keystore", &profile.store_file.display().to_string());
        }
        SigningResolution::Fallback { missing } => {
            Status::warning(&format!(
                "{} not found; release builds will be refused unless --allow-debug-signing is passed",
                missing.display()
            ));
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn run_signing_verify(root: &Path) -> i32 {
    match signing::resolve_signing_profile(root) {
        Ok(SigningResolution::Resolved(profile)) => {
            Status::success(&format!(
                "Release signing verified (alias '{}')",
                profile.key_alias
            ));
            exit_codes::SUCCESS
        }
        Ok(SigningResolution::Fallback { missing }) => {
            Status::error(&format!("No release credentials: {} not found", missing.display()));
            exit_codes::CONFIG_ERROR
        }
        Err(e) => {
            Status::error(&format!("Signing verification failed: {}", e));
            exit_codes::CONFIG_ERROR
        }
    }
}

fn run_build(
    root: &Path,
    configuration: &str,
    bundle: bool,
    clean: bool,
    allow_debug_signing: bool,
) -> i32 {
    let variant: BuildVariant = match configuration.parse() {
        Ok(variant) => variant,
        Err(e) => {
            Status::error(&e);
            return exit_codes::FAILURE;
        }
    };

    let config = match AppConfig::load(root).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            Status::error(&format!("Project configuration: {}", e));
            return exit_codes::CONFIG_ERROR;
        }
    };

    let policy = if allow_debug_signing {
        FallbackPolicy::AllowDebugSigned
    } else {
        FallbackPolicy::Forbid
    };

    let resolution = match signing::resolve_signing_profile(root) {
        Ok(resolution) => resolution,
        Err(e) => {
            Status::error(&format!("Signing resolution failed: {}", e));
            return exit_codes::CONFIG_ERROR;
        }
    };

    let signing_config = match signing::select_signing_config(variant, &resolution, policy) {
        Ok(config) => config,
        Err(e @ AndroidError::ReleaseSigningUnavailable(_)) => {
            Status::error(&e.to_string());
            return exit_codes::CONFIG_ERROR;
        }
        Err(e) => {
            Status::error(&format!("Signing selection failed: {}", e));
            return exit_codes::FAILURE;
        }
    };

    match &signing_config {
        SigningConfig::Release(profile) => {
            Status::info(&format!("Signing with release key '{}'", profile.key_alias));
        }
        SigningConfig::DebugIdentity => {
            if variant == BuildVariant::Release {
                Status::warning("Signing release artifact with the DEBUG identity");
            }
        }
    }

    if clean {
        Status::info("Cleaning...");
        if let Err(e) = gradle::clean(root) {
            Status::error(&format!("Clean failed: {}", e));
            return exit_codes::FAILURE;
        }
    }

    Status::info(&format!(
        "Building {} {} for {}...",
        variant,
        if bundle { "bundle" } else { "APK" },
        config.application_id
    ));

    let result = if bundle {
        gradle::bundle(root, variant)
    } else {
        gradle::assemble(root, variant)
    };

    match result {
        Ok(r) => {
            if r.success {
                Status::success("Build succeeded");
                exit_codes::SUCCESS
            } else {
                Status::error("Build failed");
                eprintln!("{}", r.stderr);
                exit_codes::FAILURE
            }
        }
        Err(e) => {
            Status::error(&format!("Build error: {}", e));
            exit_codes::FAILURE
        }
    }
}

fn run_deps(json: bool) -> Result<i32> {
    let dependencies_list = dependencies::pinned_dependencies();

    if let Err(e) = dependencies::validate_all(&dependencies_list) {
        Status::error(&format!("Dependency list invalid: {}", e));
        return Ok(exit_codes::FAILURE);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&dependencies_list)?);
        return Ok(exit_codes::SUCCESS);
    }

    Status::header("Pinned dependencies");
    for dependency in &dependencies_list {
        Status::field(&dependency.scope.to_string(), &dependency.to_string());
    }
    println!();
    Status::success("Dependency list valid");

    Ok(exit_codes::SUCCESS)
}

fn run_placeholders(json: bool) -> Result<i32> {
    let placeholders = ManifestPlaceholders::default();

    if let Err(e) = placeholders.validate() {
        Status::error(&format!("Placeholder invalid: {}", e));
        return Ok(exit_codes::CONFIG_ERROR);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&placeholders.to_map())?);
        return Ok(exit_codes::SUCCESS);
    }

    for (key, value) in placeholders.to_map() {
        Status::field(&key, &value);
    }

    Ok(exit_codes::SUCCESS)
}

fn run_doctor(root: &Path, json: bool) -> Result<i32> {
    let wrapper = gradle::has_wrapper(root);
    let java = hashtara_core::process::command_exists("java");
    let config = AppConfig::load(root).and_then(|c| c.validate().map(|_| c));
    let resolution = signing::resolve_signing_profile(root);

    if json {
        let signing_state = match &resolution {
            Ok(resolution) => serde_json::to_value(resolution.report())?,
            Err(e) => json!({ "error": e.to_string() }),
        };
        let report = json!({
            "gradle_wrapper": wrapper,
            "java": java,
            "project_config_valid": config.is_ok(),
            "signing": signing_state,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(exit_codes::SUCCESS);
    }

    Status::header("Environment Check");

    if wrapper {
        Status::success("gradle wrapper: found");
    } else {
        Status::error("gradle wrapper: not found in android/");
    }

    if java {
        Status::success("java: installed");
    } else {
        Status::warning("java: not found");
    }

    match &config {
        Ok(config) => Status::success(&format!("project config: {} (minSdk {})", config.application_id, config.min_sdk)),
        Err(e) => Status::error(&format!("project config: {}", e)),
    }

    match &resolution {
        Ok(SigningResolution::Resolved(profile)) => {
            Status::success(&format!("release signing: alias '{}'", profile.key_alias));
        }
        Ok(SigningResolution::Fallback { .. }) => {
            Status::warning("release signing: key.properties not found (debug builds only)");
        }
        Err(e) => Status::error(&format!("release signing: {}", e)),
    }

    Ok(exit_codes::SUCCESS)
}
