//! Post-install relocation into the shared `bin/` layout.
//!
//! Moves the verified binary into the canonical `bin/` directory and hard
//! links a secondary alias command to it, so both names share one file on
//! disk. This step is advisory: the install it follows is already complete,
//! and a failure here (cross-device rename, no hard-link support) leaves the
//! per-package binary in place and surfaces a manual install command the
//! user can run instead.

use crate::config::InstallConfig;
use crate::error::{BinstrapError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn command_file(module: &str) -> String {
    if cfg!(windows) {
        format!("{module}.exe")
    } else {
        module.to_string()
    }
}

/// Secondary command name: `tool` gains a `toolx` alias.
fn alias_file(module: &str) -> String {
    command_file(&format!("{module}x"))
}

/// Relocate `exe` into the canonical `bin/` directory and create the alias
/// link. Returns the canonical primary path.
pub fn optimize(config: &InstallConfig, exe: &Path) -> Result<PathBuf> {
    let bin_dir = config.bin_dir();
    let primary = bin_dir.join(command_file(&config.module));
    let alias = bin_dir.join(alias_file(&config.module));

    let relocate = |exe: &Path| -> io::Result<()> {
        fs::create_dir_all(&bin_dir)?;
        fs::rename(exe, &primary)?;
        fs::hard_link(&primary, &alias)?;
        Ok(())
    };

    match relocate(exe) {
        Ok(()) => Ok(primary),
        Err(source) => {
            tracing::debug!("optimize failed: {}", source);
            Err(BinstrapError::OptimizeFailed {
                hint: config.manual_install_hint(),
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(root: &Path) -> InstallConfig {
        InstallConfig {
            owner: "@acme".to_string(),
            module: "tool".to_string(),
            version: "1.0.0".to_string(),
            registry: "https://registry.npmjs.org".to_string(),
            npm_program: "npm".to_string(),
            root: root.to_path_buf(),
        }
    }

    #[test]
    fn test_relocates_and_links_alias() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("tool-package-bin");
        fs::write(&exe, b"binary contents").unwrap();

        let config = config(dir.path());
        let primary = optimize(&config, &exe).unwrap();

        let alias = dir.path().join("bin").join("toolx");
        assert_eq!(primary, dir.path().join("bin").join("tool"));
        assert!(!exe.exists());
        assert_eq!(fs::read(&primary).unwrap(), b"binary contents");
        assert_eq!(fs::read(&alias).unwrap(), b"binary contents");

        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            assert_eq!(fs::metadata(&primary).unwrap().ino(), fs::metadata(&alias).unwrap().ino());
        }

        // Independent directory entries: dropping one leaves the other.
        fs::remove_file(&primary).unwrap();
        assert_eq!(fs::read(&alias).unwrap(), b"binary contents");
    }

    #[test]
    fn test_missing_source_reports_manual_hint() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        match optimize(&config, &dir.path().join("does-not-exist")).unwrap_err() {
            BinstrapError::OptimizeFailed { hint, .. } => {
                assert!(hint.contains("tool"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
