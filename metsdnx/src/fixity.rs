//! Checksum calculation and filesystem stat for file entries.

use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use md5::Md5;
use sha2::{Digest, Sha256};

use crate::error::{BuildError, BuildResult};

/// Buffer size for reading files during checksum calculation (1MB).
const BUFFER_SIZE: usize = 1024 * 1024;

/// Timestamp format used for file creation and modification dates.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Supported fixity algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixityAlgorithm {
    #[default]
    Md5,
    Sha256,
}

impl FixityAlgorithm {
    /// All algorithms, in the order JSON keys are checked.
    pub const ALL: [FixityAlgorithm; 2] = [FixityAlgorithm::Md5, FixityAlgorithm::Sha256];

    /// `fixityType` tag, also the JSON key carrying a supplied checksum.
    pub fn tag(&self) -> &'static str {
        match self {
            FixityAlgorithm::Md5 => "MD5",
            FixityAlgorithm::Sha256 => "SHA256",
        }
    }

    /// Parse a tag case-insensitively (`md5`, `SHA-256`, ...).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_uppercase().replace('-', "").as_str() {
            "MD5" => Some(FixityAlgorithm::Md5),
            "SHA256" => Some(FixityAlgorithm::Sha256),
            _ => None,
        }
    }
}

impl fmt::Display for FixityAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Calculate the checksum of a file.
///
/// The file is streamed in fixed-size chunks and closed before returning,
/// including when a read fails.
///
/// # Returns
///
/// The lowercase hexadecimal digest of the file contents.
pub fn calculate_checksum(path: &Path, algorithm: FixityAlgorithm) -> BuildResult<String> {
    match algorithm {
        FixityAlgorithm::Md5 => digest_file::<Md5>(path),
        FixityAlgorithm::Sha256 => digest_file::<Sha256>(path),
    }
}

fn digest_file<D: Digest>(path: &Path) -> BuildResult<String> {
    let mut file = File::open(path).map_err(|e| BuildError::read_failed(path, e))?;

    let mut hasher = D::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| BuildError::read_failed(path, e))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect())
}

/// Verify that a file matches an expected checksum.
///
/// Hex digests are compared case-insensitively. Returns the recomputed
/// digest on success.
pub fn verify_checksum(
    path: &Path,
    algorithm: FixityAlgorithm,
    expected: &str,
) -> BuildResult<String> {
    let actual = calculate_checksum(path, algorithm)?;
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(BuildError::ChecksumMismatch {
            file: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(actual)
}

/// Size and timestamps of a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub size_bytes: u64,
    pub created: String,
    pub modified: String,
}

impl FileStat {
    /// Read metadata for `path`.
    ///
    /// Where the platform records no creation time the modification time is
    /// reported for both.
    pub fn from_path(path: &Path) -> BuildResult<Self> {
        let metadata = fs::metadata(path).map_err(|e| BuildError::read_failed(path, e))?;
        let modified = metadata
            .modified()
            .map_err(|e| BuildError::read_failed(path, e))?;
        let created = metadata.created().unwrap_or(modified);

        Ok(Self {
            size_bytes: metadata.len(),
            created: format_timestamp(created),
            modified: format_timestamp(modified),
        })
    }
}

/// Format a timestamp in local time as `YYYY-MM-DDTHH:MM:SS`.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn test_md5_checksum() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "test.txt", b"hello world");

        let checksum = calculate_checksum(&path, FixityAlgorithm::Md5).unwrap();

        // MD5 of "hello world"
        assert_eq!(checksum, "5eb63bbbe01eeed093cb22bb8f5acdc3");
    }

    #[test]
    fn test_sha256_checksum() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "test.txt", b"hello world");

        let checksum = calculate_checksum(&path, FixityAlgorithm::Sha256).unwrap();

        assert_eq!(
            checksum,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_empty_file_checksum() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "empty.txt", b"");

        let checksum = calculate_checksum(&path, FixityAlgorithm::Md5).unwrap();

        // MD5 of empty string
        assert_eq!(checksum, "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_large_file_spans_buffers() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "large.bin", &vec![0xABu8; BUFFER_SIZE * 2 + 17]);

        let first = calculate_checksum(&path, FixityAlgorithm::Md5).unwrap();
        let second = calculate_checksum(&path, FixityAlgorithm::Md5).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
    }

    #[test]
    fn test_missing_file() {
        let result = calculate_checksum(Path::new("/nonexistent/file.txt"), FixityAlgorithm::Md5);
        assert!(matches!(result, Err(BuildError::ReadFailed { .. })));
    }

    #[test]
    fn test_verify_checksum_match_ignores_case() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "test.txt", b"hello world");

        let result = verify_checksum(
            &path,
            FixityAlgorithm::Md5,
            "5EB63BBBE01EEED093CB22BB8F5ACDC3",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_verify_checksum_mismatch() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "test.txt", b"hello world");

        match verify_checksum(&path, FixityAlgorithm::Md5, "wrong_checksum") {
            Err(BuildError::ChecksumMismatch {
                file,
                expected,
                actual,
            }) => {
                assert_eq!(file, path);
                assert_eq!(expected, "wrong_checksum");
                assert_eq!(actual, "5eb63bbbe01eeed093cb22bb8f5acdc3");
            }
            other => panic!("Expected ChecksumMismatch error, got {:?}", other),
        }
    }

    #[test]
    fn test_algorithm_tags() {
        assert_eq!(FixityAlgorithm::default(), FixityAlgorithm::Md5);
        assert_eq!(FixityAlgorithm::from_tag("md5"), Some(FixityAlgorithm::Md5));
        assert_eq!(FixityAlgorithm::from_tag("SHA-256"), Some(FixityAlgorithm::Sha256));
        assert_eq!(FixityAlgorithm::from_tag("crc32"), None);
    }

    #[test]
    fn test_file_stat() {
        let temp = TempDir::new().unwrap();
        let path = write_file(&temp, "stat.txt", b"12345");
        let mtime = UNIX_EPOCH + Duration::from_secs(1_500_000_000);
        filetime::set_file_mtime(&path, filetime::FileTime::from_system_time(mtime)).unwrap();

        let stat = FileStat::from_path(&path).unwrap();
        assert_eq!(stat.size_bytes, 5);
        assert_eq!(stat.modified, format_timestamp(mtime));
        assert_eq!(stat.created.len(), "2017-07-14T02:40:00".len());
    }

    #[test]
    fn test_file_stat_missing() {
        assert!(FileStat::from_path(Path::new("/nonexistent/file.txt")).is_err());
    }
}
