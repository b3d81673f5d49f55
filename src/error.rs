//! Error taxonomy for the binary acquisition pipeline.
//!
//! Tier-local failures (`BinaryUnverified`, `InstallFailed`, `InvalidArchive`)
//! are caught and logged by the orchestrator, which escalates to the next tier
//! or candidate. Only `UnsupportedPlatform`, `AggregateInstallFailed` and
//! `OptimizeFailed` reach the caller.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BinstrapError {
    #[error("Unsupported platform: {os} {arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Binary at {path} failed its version probe: {detail}")]
    BinaryUnverified { path: String, detail: String },

    #[error("Binary for \"{package}\" not found")]
    BinaryNotFound { package: String },

    #[error("Package manager install of \"{package}\" failed: {detail}")]
    InstallFailed { package: String, detail: String },

    #[error("Invalid archive: {0}")]
    InvalidArchive(#[source] std::io::Error),

    #[error(
        "Your package manager doesn't seem to support this binary. To install it directly, run: {hint}"
    )]
    OptimizeFailed {
        hint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install package \"{package}\"")]
    AggregateInstallFailed { package: String },

    #[error("Download failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to serialize manifest: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BinstrapError>;
