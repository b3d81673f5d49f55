//! Library interface for binstrap
//!
//! Bootstraps a precompiled platform-specific binary distributed as optional
//! packages in an npm-style registry. The pieces are exposed individually so
//! the acquisition chain can be tested tier by tier.

pub mod config;
pub mod error;
pub mod fetch;
pub mod install;
pub mod npm;
pub mod optimize;
pub mod platform;
pub mod process;
pub mod resolve;
pub mod tar;

// Re-export the types most callers need
pub use config::InstallConfig;
pub use error::{BinstrapError, Result};
pub use install::{NpmTiers, Tiers, acquire};
pub use platform::{PlatformDescriptor, supported_platforms};
