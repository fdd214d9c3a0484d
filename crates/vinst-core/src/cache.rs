//! Download cache: one directory per artifact under an injected root.
//!
//! The entry key hashes the source URL together with the destination path,
//! so two artifacts (or one artifact installed to two places) never share
//! cache files, and the per-entry lock file is effectively keyed by
//! destination.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::artifact::ArtifactSpec;
use crate::checksum;

/// Fixed name of the cached manifest inside an entry; one manifest per entry.
pub const MANIFEST_FILE: &str = "manifest.sha256";
/// Lock file held for the duration of an install.
pub const LOCK_FILE: &str = ".lock";

const KEY_LEN: usize = 16;

/// Cache root directory. Cheap to clone; does not touch disk until used.
#[derive(Debug, Clone)]
pub struct ArtifactCache {
    root: PathBuf,
}

/// Paths used for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub dir: PathBuf,
    /// Cached binary, named after the source URL's filename.
    pub binary_path: PathBuf,
    pub manifest_path: PathBuf,
    pub lock_path: PathBuf,
}

impl ArtifactCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache under `~/.cache/vinst`.
    pub fn default_root() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("vinst")?;
        Ok(xdg_dirs.get_cache_home())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths for `spec`. Does not create anything.
    pub fn entry(&self, spec: &ArtifactSpec) -> CacheEntry {
        let dir = self.root.join(entry_key(spec));
        CacheEntry {
            binary_path: dir.join(spec.filename()),
            manifest_path: dir.join(MANIFEST_FILE),
            lock_path: dir.join(LOCK_FILE),
            dir,
        }
    }
}

impl CacheEntry {
    /// Create the entry directory if missing.
    pub fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    pub fn has_binary(&self) -> bool {
        self.binary_path.is_file()
    }
}

/// First 16 hex chars of SHA-256(source_url NUL destination_path).
pub fn entry_key(spec: &ArtifactSpec) -> String {
    let mut material = Vec::with_capacity(spec.source_url().len() + spec.destination_path().len() + 1);
    material.extend_from_slice(spec.source_url().as_bytes());
    material.push(0);
    material.extend_from_slice(spec.destination_path().as_bytes());
    let mut key = checksum::sha256_bytes(&material);
    key.truncate(KEY_LEN);
    key
}
