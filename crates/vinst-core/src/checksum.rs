//! SHA-256 digests of files on disk.
//!
//! Digests are computed by streaming the file in fixed-size chunks, so release
//! binaries of any size hash in bounded memory.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Length of a SHA-256 digest in lowercase hex.
pub const SHA256_HEX_LEN: usize = 64;

/// Compute SHA-256 of a file and return the digest as lowercase hex.
///
/// Returns the raw I/O error so callers can attach it to a typed error.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut f = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = match f.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Like [`sha256_file`] but with path context, for CLI and glue code.
pub fn sha256_path(path: &Path) -> Result<String> {
    sha256_file(path).with_context(|| format!("hash {}", path.display()))
}

/// SHA-256 of an in-memory buffer as lowercase hex.
pub fn sha256_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Format a line the way `sha256sum` does: `<digest>  <name>`.
pub fn manifest_line(digest: &str, name: &str) -> String {
    format!("{}  {}", digest, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sha256_path_empty_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let digest = sha256_path(f.path()).unwrap();
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_path_known_content() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello\n").unwrap();
        f.flush().unwrap();
        let digest = sha256_path(f.path()).unwrap();
        assert_eq!(
            digest,
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
        assert_eq!(digest.len(), SHA256_HEX_LEN);
    }

    #[test]
    fn file_larger_than_buffer_matches_in_memory_digest() {
        let body: Vec<u8> = (0u8..=250).cycle().take(BUF_SIZE * 3 + 17).collect();
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&body).unwrap();
        f.flush().unwrap();
        assert_eq!(sha256_file(f.path()).unwrap(), sha256_bytes(&body));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = sha256_file(&dir.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        let err = sha256_path(&dir.path().join("nope")).unwrap_err();
        assert!(format!("{:#}", err).contains("nope"));
    }

    #[test]
    fn manifest_line_uses_two_spaces() {
        assert_eq!(manifest_line("abc123", "ctrld_amd64"), "abc123  ctrld_amd64");
    }
}
