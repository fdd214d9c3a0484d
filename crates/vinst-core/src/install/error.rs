//! Install error type and caller-facing failure kinds.

use serde::{Deserialize, Serialize};
use std::io;

use crate::artifact::SpecError;
use crate::fetch::FetchError;

/// Stable, serializable failure category so callers branch on kind, not message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidSpec,
    Fetch,
    ManifestEntryNotFound,
    ChecksumMismatch,
    Io,
    Install,
    Lock,
}

/// Any failure of [`crate::install::Installer::install`]. Nothing is committed
/// to the destination when one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("invalid artifact: {0}")]
    InvalidSpec(#[from] SpecError),
    /// Download of the binary or the manifest failed.
    #[error("fetch {what}: {source}")]
    Fetch {
        what: &'static str,
        #[source]
        source: FetchError,
    },
    #[error("read manifest {path}: {source}")]
    ManifestRead { path: String, source: io::Error },
    #[error("SHA256 for {filename} not found in manifest {manifest_url}")]
    ManifestEntryNotFound {
        filename: String,
        manifest_url: String,
    },
    /// Digest still wrong after the single re-fetch.
    #[error("checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
    },
    /// Reading a file to hash it (or preparing the cache) failed.
    #[error("{path}: {source}")]
    Digest { path: String, source: io::Error },
    /// Creating the destination directory, renaming, or setting permissions failed.
    #[error("install {path}: {source}")]
    Install { path: String, source: io::Error },
    #[error("lock {path}: {source}")]
    Lock { path: String, source: io::Error },
}

impl InstallError {
    pub fn kind(&self) -> FailureKind {
        match self {
            InstallError::InvalidSpec(_) => FailureKind::InvalidSpec,
            InstallError::Fetch { .. } => FailureKind::Fetch,
            InstallError::ManifestRead { .. } | InstallError::Digest { .. } => FailureKind::Io,
            InstallError::ManifestEntryNotFound { .. } => FailureKind::ManifestEntryNotFound,
            InstallError::ChecksumMismatch { .. } => FailureKind::ChecksumMismatch,
            InstallError::Install { .. } => FailureKind::Install,
            InstallError::Lock { .. } => FailureKind::Lock,
        }
    }

    /// True only for network failures that may go away on a later run.
    pub fn is_transient(&self) -> bool {
        match self {
            InstallError::Fetch { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}
