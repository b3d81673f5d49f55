//! Direct tarball download, the last acquisition tier.
//!
//! Fetches the platform package's published tarball straight from the
//! registry, buffers the whole response, and extracts it with the minimal
//! tar reader. No streaming: these archives are a single small binary plus
//! a manifest.

use crate::config::InstallConfig;
use crate::error::{BinstrapError, Result};
use crate::platform::PlatformDescriptor;
use crate::tar;
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::Path;

/// Decompress a gzip payload fully into memory.
///
/// A corrupt or non-gzip payload is an invalid archive, not a generic IO
/// failure, so the orchestrator can report it as such.
pub fn decompress(tgz: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(tgz);
    let mut buffer = Vec::new();
    decoder
        .read_to_end(&mut buffer)
        .map_err(BinstrapError::InvalidArchive)?;
    Ok(buffer)
}

/// Decompress and extract a `.tgz` payload into `dst`, marking `exe`
/// executable.
pub fn extract_tarball(tgz: &[u8], dst: &Path, exe: &str) -> Result<()> {
    let buffer = decompress(tgz)?;
    let entries = tar::parse_entries(&buffer)?;
    tar::write_entries(&buffer, &entries, dst, exe)
}

/// Download the platform package's tarball and extract it into `dst`.
pub async fn download_package(
    config: &InstallConfig,
    platform: &PlatformDescriptor,
    dst: &Path,
) -> Result<()> {
    let url = config.tarball_url(platform);
    tracing::debug!("downloading {}", url);

    let client = reqwest::Client::new();
    let response = client.get(&url).send().await?.error_for_status()?;
    let tgz = response.bytes().await?;

    extract_tarball(&tgz, dst, &platform.exe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    #[test]
    fn test_non_gzip_payload_is_invalid_archive() {
        let err = decompress(b"definitely not gzip").unwrap_err();
        assert!(matches!(err, BinstrapError::InvalidArchive(_)));
    }

    #[test]
    fn test_gzip_round_trip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"payload").unwrap();
        let tgz = encoder.finish().unwrap();
        assert_eq!(decompress(&tgz).unwrap(), b"payload");
    }

    #[test]
    fn test_truncated_gzip_is_invalid_archive() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[7u8; 4096]).unwrap();
        let mut tgz = encoder.finish().unwrap();
        tgz.truncate(tgz.len() / 2);
        assert!(matches!(
            decompress(&tgz).unwrap_err(),
            BinstrapError::InvalidArchive(_)
        ));
    }
}
