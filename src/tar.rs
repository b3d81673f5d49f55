//! Minimal tar reader for registry-published package tarballs.
//!
//! Parses the fixed 512-byte-block layout directly instead of pulling in an
//! archive library: the producer emits a known USTAR subset (regular files
//! only, no long-name extensions, no sparse entries) and everything is wrapped
//! in a synthetic `package/` root folder. Parsing is a pure function over the
//! decompressed buffer; writing extracted files to disk is a separate step so
//! the parser can be tested against synthetic buffers alone.

use crate::error::{BinstrapError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const BLOCK: usize = 512;
const NAME_LEN: usize = 100;
const SIZE_OFFSET: usize = 124;
const SIZE_LEN: usize = 12;
const ROOT_PREFIX: &str = "package/";

/// One file recorded in the archive: its path relative to the package root
/// and the span of its content in the source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarEntry {
    pub path: String,
    pub offset: usize,
    pub size: usize,
}

/// NUL-terminated text field; everything from the first NUL is dropped.
fn field_str(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Parse a 12-byte octal size field. Returns `None` for anything that is not
/// a well-formed octal number, which covers padding blocks and the zero-filled
/// end-of-archive markers.
fn parse_octal(bytes: &[u8]) -> Option<usize> {
    let text = field_str(bytes);
    let text = text.trim_matches(|c| c == ' ' || c == '\0');
    if text.is_empty() {
        return None;
    }
    usize::from_str_radix(text, 8).ok()
}

/// Parse the buffer into its file entries.
///
/// Blocks whose size field does not parse are skipped without consuming a
/// body. An entry whose declared content runs past the end of the buffer
/// means the archive was truncated in transit and is rejected outright
/// rather than silently extracting a partial tree.
pub fn parse_entries(buffer: &[u8]) -> Result<Vec<TarEntry>> {
    let mut entries = Vec::new();
    let mut offset = 0;

    while offset + BLOCK <= buffer.len() {
        let name = field_str(&buffer[offset..offset + NAME_LEN]);
        let size = parse_octal(&buffer[offset + SIZE_OFFSET..offset + SIZE_OFFSET + SIZE_LEN]);
        offset += BLOCK;

        let Some(size) = size else {
            continue;
        };

        if offset + size > buffer.len() {
            return Err(BinstrapError::InvalidArchive(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("entry \"{name}\" declares {size} bytes past end of archive"),
            )));
        }

        let path = name.strip_prefix(ROOT_PREFIX).unwrap_or(&name).to_string();
        if !path.is_empty() && !path.ends_with('/') {
            entries.push(TarEntry { path, offset, size });
        }

        // Content is padded to the next block boundary.
        offset += (size + BLOCK - 1) & !(BLOCK - 1);
    }

    Ok(entries)
}

/// Join a `/`-separated archive path under `dst`, refusing traversal.
fn entry_dest(dst: &Path, entry_path: &str) -> Option<PathBuf> {
    let mut path = dst.to_path_buf();
    for part in entry_path.split('/') {
        if part.is_empty() || part == "." || part == ".." {
            return None;
        }
        path.push(part);
    }
    Some(path)
}

/// Write parsed entries out under `dst`, creating parent directories as
/// needed. The entry named `exe` gets mode 0755; a chmod failure is logged
/// and ignored because not every filesystem supports it.
pub fn write_entries(buffer: &[u8], entries: &[TarEntry], dst: &Path, exe: &str) -> Result<()> {
    for entry in entries {
        let Some(path) = entry_dest(dst, &entry.path) else {
            tracing::warn!("skipping archive entry with unsafe path: {}", entry.path);
            continue;
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &buffer[entry.offset..entry.offset + entry.size])?;

        if entry.path == exe {
            set_executable(&path);
        }
    }
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(err) = fs::set_permissions(path, fs::Permissions::from_mode(0o755)) {
        tracing::warn!("chmod failed for {}: {}", path.display(), err);
    }
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) {}
