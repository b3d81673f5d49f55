//! Locating and verifying an already-installed platform binary.
//!
//! Mirrors the package system's own module resolution: starting from the
//! install root, each ancestor directory's `node_modules` is checked for
//! `<owner>/<platformPkg>/<exe>`. A located binary only counts once it
//! passes a `--version` probe, so a half-extracted or wrong-libc binary
//! escalates to the next acquisition tier instead of being handed to the
//! caller.

use crate::config::InstallConfig;
use crate::error::{BinstrapError, Result};
use crate::platform::PlatformDescriptor;
use crate::process;
use std::path::PathBuf;

/// Find the platform package's executable the way `require.resolve` would.
pub fn locate(config: &InstallConfig, platform: &PlatformDescriptor) -> Option<PathBuf> {
    let mut dir = Some(config.root.as_path());
    while let Some(current) = dir {
        let package_root = current
            .join("node_modules")
            .join(&config.owner)
            .join(&platform.bin);
        let candidate = platform.exe_path(&package_root);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}

/// Locate the binary and confirm it runs.
pub fn resolve_verified(config: &InstallConfig, platform: &PlatformDescriptor) -> Result<PathBuf> {
    let Some(exe) = locate(config, platform) else {
        return Err(BinstrapError::BinaryNotFound {
            package: platform.package_name(&config.owner),
        });
    };

    let output = process::version_probe(&exe)?;
    if output.success() {
        Ok(exe)
    } else {
        Err(BinstrapError::BinaryUnverified {
            path: exe.display().to_string(),
            detail: output.detail().to_string(),
        })
    }
}
