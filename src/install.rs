//! Acquisition orchestrator: the three-tier fallback per platform candidate.
//!
//! For each candidate, in order of specificity: try resolving an
//! already-installed binary, then a package-manager install, then a direct
//! tarball download, re-resolving after whichever materialization step ran.
//! Every tier-local failure is logged and demoted to "try the next thing";
//! only the terminal outcomes escape. The candidate list intentionally keeps
//! trying: on Linux both the musl and glibc packages may be listed and only
//! one of them will actually run here.

use crate::config::InstallConfig;
use crate::error::{BinstrapError, Result};
use crate::platform::{self, PlatformDescriptor};
use crate::{fetch, npm, resolve};
use std::path::PathBuf;

/// The three acquisition tiers, split out so the fallback fold can be
/// exercised against mock tiers in tests.
#[allow(async_fn_in_trait)]
pub trait Tiers {
    /// Locate an already-materialized binary and verify it runs.
    fn resolve(&self, platform: &PlatformDescriptor) -> Result<PathBuf>;
    /// Install the platform package via the package manager.
    fn install(&self, platform: &PlatformDescriptor) -> Result<()>;
    /// Download and extract the platform package's tarball directly.
    async fn download(&self, platform: &PlatformDescriptor) -> Result<()>;
}

/// Production tiers backed by the real resolver, package manager and
/// registry.
pub struct NpmTiers<'a> {
    config: &'a InstallConfig,
}

impl<'a> NpmTiers<'a> {
    pub fn new(config: &'a InstallConfig) -> Self {
        Self { config }
    }
}

impl Tiers for NpmTiers<'_> {
    fn resolve(&self, platform: &PlatformDescriptor) -> Result<PathBuf> {
        resolve::resolve_verified(self.config, platform)
    }

    fn install(&self, platform: &PlatformDescriptor) -> Result<()> {
        npm::install_package(self.config, platform, &self.config.package_dir(platform))
    }

    async fn download(&self, platform: &PlatformDescriptor) -> Result<()> {
        fetch::download_package(self.config, platform, &self.config.package_dir(platform)).await
    }
}

/// Acquire a verified binary for the current system.
pub async fn install(config: &InstallConfig) -> Result<PathBuf> {
    let candidates = platform::supported_platforms(&config.module);
    acquire(&NpmTiers::new(config), &candidates, &config.owner).await
}

/// Fold the candidates through the tier chain, first success wins.
pub async fn acquire<T: Tiers>(
    tiers: &T,
    candidates: &[PlatformDescriptor],
    owner: &str,
) -> Result<PathBuf> {
    if candidates.is_empty() {
        return Err(BinstrapError::UnsupportedPlatform {
            os: platform::current_os().to_string(),
            arch: platform::current_arch().to_string(),
        });
    }

    for candidate in candidates {
        match acquire_candidate(tiers, candidate, owner).await {
            Ok(exe) => return Ok(exe),
            Err(err) => {
                tracing::debug!("candidate {} exhausted: {}", candidate.bin, err);
            }
        }
    }

    Err(BinstrapError::AggregateInstallFailed {
        package: candidates[0].package_name(owner),
    })
}

/// Run the tier chain for one candidate.
///
/// The final resolve runs regardless of which materialization tier (if any)
/// succeeded; its outcome is the candidate's outcome.
async fn acquire_candidate<T: Tiers>(
    tiers: &T,
    candidate: &PlatformDescriptor,
    owner: &str,
) -> Result<PathBuf> {
    let package = candidate.package_name(owner);

    match tiers.resolve(candidate) {
        Ok(exe) => return Ok(exe),
        Err(err) => {
            tracing::debug!("resolve failed for {}: {}", package, err);
            tracing::warn!(
                "Failed to find package \"{}\". You may have used the \"--no-optional\" flag when running \"npm install\".",
                package
            );
        }
    }

    if let Err(err) = tiers.install(candidate) {
        tracing::warn!("Failed to install package \"{}\": {}", package, err);

        if let Err(err) = tiers.download(candidate).await {
            tracing::warn!("Failed to download package \"{}\": {}", package, err);
        }
    }

    tiers.resolve(candidate)
}
