//! Detached checksum manifests (`sha256sum` output).
//!
//! Lines look like `<hex-digest>  <name-or-path>`. A line is selected when it
//! *contains* the target filename anywhere, so `ctrld_amd64` also matches
//! `ctrld_amd64_old`. First match wins; later lines are not cross-checked.

use std::fs;
use std::io;
use std::path::Path;

/// Errors from manifest lookup.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// No line mentions the filename.
    #[error("no entry for {filename} in manifest")]
    NotFound { filename: String },
    /// The cached manifest could not be read as text.
    #[error("read manifest {path}: {source}")]
    Read { path: String, source: io::Error },
}

/// One manifest line that mentions the target filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// First whitespace-separated token of the line.
    pub digest: String,
    /// Remainder of the line after the digest, trimmed (name or path, maybe `*`-prefixed).
    pub name: String,
    /// 1-based line number in the manifest.
    pub line: usize,
}

fn entry_from_line(line_no: usize, line: &str) -> Option<ManifestEntry> {
    let trimmed = line.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let digest = parts.next().filter(|d| !d.is_empty())?;
    let name = parts.next().unwrap_or("").trim();
    Some(ManifestEntry {
        digest: digest.to_string(),
        name: name.to_string(),
        line: line_no,
    })
}

/// Every line containing `filename`, in manifest order.
pub fn matching_entries(manifest_text: &str, filename: &str) -> Vec<ManifestEntry> {
    manifest_text
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains(filename))
        .filter_map(|(i, line)| entry_from_line(i + 1, line))
        .collect()
}

/// Digest of the first line containing `filename`.
pub fn expected_digest(manifest_text: &str, filename: &str) -> Result<String, ManifestError> {
    manifest_text
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains(filename))
        .find_map(|(i, line)| entry_from_line(i + 1, line))
        .map(|e| e.digest)
        .ok_or_else(|| ManifestError::NotFound {
            filename: filename.to_string(),
        })
}

/// Read a manifest file into memory. Manifests are small text files.
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    let bytes = fs::read(path).map_err(|source| ManifestError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
