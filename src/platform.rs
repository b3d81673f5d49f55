//! Platform candidate detection for selecting the correct prebuilt package.
//!
//! Each platform the registry publishes a prebuilt binary for is addressed by
//! a package name suffix like `linux-x64-musl` or `darwin-arm64`. This module
//! produces the ordered list of candidates for the current system, most
//! specific first: on a musl-based Linux the `-musl` variant is tried before
//! the plain glibc one, because the correct libc flavor is not always known
//! a priori and the orchestrator is built to fall through.

use std::path::{Path, PathBuf};

/// One (OS, architecture, optional ABI) combination together with the
/// platform package it maps to and the executable that package ships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDescriptor {
    /// npm-style OS tag: `darwin`, `linux`, `win32`
    pub os: &'static str,
    /// npm-style CPU tag: `x64`, `arm64`
    pub arch: &'static str,
    /// C-library ABI tag, currently only `musl`
    pub abi: Option<&'static str>,
    /// Platform package name, e.g. `tool-linux-x64-musl`
    pub bin: String,
    /// Executable path inside the package, `/`-separated, e.g. `bin/tool`
    pub exe: String,
}

impl PlatformDescriptor {
    fn new(module: &str, os: &'static str, arch: &'static str, abi: Option<&'static str>) -> Self {
        let bin = match abi {
            Some(abi) => format!("{module}-{os}-{arch}-{abi}"),
            None => format!("{module}-{os}-{arch}"),
        };
        let exe = if os == "win32" {
            format!("bin/{module}.exe")
        } else {
            format!("bin/{module}")
        };
        Self { os, arch, abi, bin, exe }
    }

    /// Fully scoped package name, e.g. `@owner/tool-linux-x64`.
    pub fn package_name(&self, owner: &str) -> String {
        format!("{owner}/{}", self.bin)
    }

    /// Resolve the executable's location under an installed package root.
    pub fn exe_path(&self, package_root: &Path) -> PathBuf {
        let mut path = package_root.to_path_buf();
        for part in self.exe.split('/') {
            path.push(part);
        }
        path
    }
}

/// npm-style OS tag for the current system.
pub fn current_os() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

/// npm-style CPU tag for the current system.
pub fn current_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        other => other,
    }
}

/// Detect whether this Linux system uses musl rather than glibc.
///
/// Checks for the musl dynamic loader on disk so a glibc-built bootstrap
/// running on Alpine still picks the right package.
#[cfg(target_os = "linux")]
fn is_musl() -> bool {
    cfg!(target_env = "musl")
        || Path::new("/lib/ld-musl-x86_64.so.1").exists()
        || Path::new("/lib/ld-musl-aarch64.so.1").exists()
}

/// Ordered platform candidates for the current system, most specific first.
///
/// Returns an empty list on platforms no prebuilt package exists for; the
/// orchestrator turns that into an unsupported-platform error.
pub fn supported_platforms(module: &str) -> Vec<PlatformDescriptor> {
    candidates_for(module, current_os(), current_arch(), {
        #[cfg(target_os = "linux")]
        {
            is_musl()
        }
        #[cfg(not(target_os = "linux"))]
        {
            false
        }
    })
}

fn candidates_for(
    module: &str,
    os: &'static str,
    arch: &'static str,
    musl: bool,
) -> Vec<PlatformDescriptor> {
    let published = matches!(
        (os, arch),
        ("darwin", "x64")
            | ("darwin", "arm64")
            | ("linux", "x64")
            | ("linux", "arm64")
            | ("win32", "x64")
    );
    if !published {
        return Vec::new();
    }

    let mut platforms = Vec::new();
    if os == "linux" && musl {
        platforms.push(PlatformDescriptor::new(module, os, arch, Some("musl")));
    }
    platforms.push(PlatformDescriptor::new(module, os, arch, None));
    platforms
}
