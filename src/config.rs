//! Install configuration, resolved once at startup.
//!
//! Every component takes this by reference; nothing reads ambient globals or
//! environment variables for configuration after construction.

use crate::platform::PlatformDescriptor;
use std::path::PathBuf;

/// Read-only configuration for one bootstrap run.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// Registry scope owning the platform packages, e.g. `@acme`
    pub owner: String,
    /// Metapackage / command name, e.g. `tool`
    pub module: String,
    /// Exact version of the platform packages to install
    pub version: String,
    /// Registry base URL, no trailing slash
    pub registry: String,
    /// Package manager program to invoke, normally `npm`
    pub npm_program: String,
    /// Directory whose `node_modules` tree packages are installed into
    pub root: PathBuf,
}

impl InstallConfig {
    /// Destination directory for a platform package's contents.
    pub fn package_dir(&self, platform: &PlatformDescriptor) -> PathBuf {
        self.root
            .join("node_modules")
            .join(&self.owner)
            .join(&platform.bin)
    }

    /// Exact `name@version` specifier the package manager installs.
    pub fn package_spec(&self, platform: &PlatformDescriptor) -> String {
        format!("{}@{}", platform.package_name(&self.owner), self.version)
    }

    /// Published tarball URL:
    /// `<registry>/<owner>/<bin>/-/<bin>-<version>.tgz`
    pub fn tarball_url(&self, platform: &PlatformDescriptor) -> String {
        format!(
            "{}/{}/{}/-/{}-{}.tgz",
            self.registry, self.owner, platform.bin, platform.bin, self.version
        )
    }

    /// Canonical shared `bin/` directory for the optimized layout.
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// One-line command a user can run to install the binary without a
    /// package manager, appropriate for the current OS.
    pub fn manual_install_hint(&self) -> String {
        if cfg!(windows) {
            format!("powershell -c \"irm {}.sh/install.ps1 | iex\"", self.module)
        } else {
            format!("curl -fsSL https://{}.sh/install | bash", self.module)
        }
    }
}
