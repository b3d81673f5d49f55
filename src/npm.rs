//! Programmatic package-manager install, the middle acquisition tier.
//!
//! Installs exactly one platform package into a throwaway staging directory
//! and renames the result into place, so a failed or interrupted install
//! never leaves a partial destination. The staging directory is exclusively
//! owned by this call and removed on every exit path; a cleanup failure is
//! logged and never replaces the install outcome.

use crate::config::InstallConfig;
use crate::error::{BinstrapError, Result};
use crate::platform::PlatformDescriptor;
use crate::process;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Install `<owner>/<platformPkg>@<version>` into `dst` via the package
/// manager.
pub fn install_package(
    config: &InstallConfig,
    platform: &PlatformDescriptor,
    dst: &Path,
) -> Result<()> {
    install_package_in(config, platform, dst, std::env::temp_dir())
}

/// Same as [`install_package`] with an explicit parent for the staging
/// directory.
pub fn install_package_in(
    config: &InstallConfig,
    platform: &PlatformDescriptor,
    dst: &Path,
    staging_parent: impl AsRef<Path>,
) -> Result<()> {
    let staging = tempfile::Builder::new()
        .prefix("binstrap-")
        .tempdir_in(staging_parent)?;

    let result = run_install(config, platform, staging.path(), dst);

    if let Err(err) = staging.close() {
        tracing::warn!("failed to remove staging directory: {}", err);
    }
    result
}

fn run_install(
    config: &InstallConfig,
    platform: &PlatformDescriptor,
    staging: &Path,
    dst: &Path,
) -> Result<()> {
    let package = platform.package_name(&config.owner);
    let spec = config.package_spec(platform);

    // Minimal manifest so the install is scoped to the staging directory.
    fs::write(
        staging.join("package.json"),
        serde_json::to_string(&serde_json::json!({}))?,
    )?;

    let mut command = Command::new(&config.npm_program);
    command
        .args([
            "install",
            "--loglevel=error",
            "--prefer-offline",
            "--no-audit",
            "--progress=false",
            &spec,
        ])
        .current_dir(staging)
        // A user-level "install globally" override would escape the staging
        // directory entirely.
        .env_remove("npm_config_global");

    let output = process::run_command(&mut command)?;
    if !output.success() {
        return Err(BinstrapError::InstallFailed {
            package,
            detail: format!("exit code {}: {}", output.exit_code, output.detail()),
        });
    }

    let nested = staging
        .join("node_modules")
        .join(&config.owner)
        .join(&platform.bin);
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(&nested, dst)?;
    Ok(())
}
