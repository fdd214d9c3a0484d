//! Installer: fetch, verify and atomically place one artifact.
//!
//! Sequence per run (all under the cache entry's advisory lock):
//!
//! 1. Fetch the binary into the cache unless a cached copy exists.
//! 2. Fetch the manifest, always.
//! 3. Look up the expected digest for the binary's filename.
//! 4. Hash the cached binary; on mismatch re-fetch exactly once, then give up.
//! 5. Compare with the destination; if it already matches, stop (`changed = false`).
//! 6. Create the parent directory and rename the verified file into place with mode 0755.
//!
//! The destination is only ever touched by the rename in step 6, so it always
//! holds either the previous content or the newly verified content.

mod error;
mod result;
mod verify;

pub use error::{FailureKind, InstallError};
pub use result::{FailureReport, InstallResult};
pub use verify::{verify_file, Verification};

use std::fs;
use std::io;
use std::path::Path;

use crate::artifact::ArtifactSpec;
use crate::cache::{ArtifactCache, CacheEntry};
use crate::checksum;
use crate::fetch::{CurlFetcher, Fetcher};
use crate::lock::InstallLock;
use crate::manifest;
use crate::storage::{self, EXECUTABLE_MODE};

/// Fetch-verify-install driver. Holds its collaborators; no global state.
#[derive(Debug, Clone)]
pub struct Installer<F = CurlFetcher> {
    fetcher: F,
    cache: ArtifactCache,
    lock: bool,
}

impl<F: Fetcher> Installer<F> {
    pub fn new(fetcher: F, cache: ArtifactCache) -> Self {
        Self {
            fetcher,
            cache,
            lock: true,
        }
    }

    /// Enable or disable the advisory lock (enabled by default).
    pub fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    /// Run the full sequence for `spec`.
    pub fn install(&self, spec: &ArtifactSpec) -> Result<InstallResult, InstallError> {
        let _span = tracing::info_span!("install", file = spec.filename()).entered();
        let entry = self.cache.entry(spec);
        entry.ensure_dir().map_err(|source| InstallError::Digest {
            path: entry.dir.display().to_string(),
            source,
        })?;

        let _guard = if self.lock {
            Some(
                InstallLock::acquire(&entry.lock_path).map_err(|source| InstallError::Lock {
                    path: entry.lock_path.display().to_string(),
                    source,
                })?,
            )
        } else {
            None
        };

        if entry.has_binary() {
            tracing::debug!(path = %entry.binary_path.display(), "using cached binary");
        } else {
            self.fetch_binary(spec, &entry)?;
        }

        let expected = self.expected_digest(spec, &entry)?;

        let mut actual = digest_of(&entry.binary_path)?;
        if actual != expected {
            tracing::warn!(
                expected = %expected,
                actual = %actual,
                "cached binary does not match manifest, fetching again"
            );
            self.fetch_binary(spec, &entry)?;
            actual = digest_of(&entry.binary_path)?;
            if actual != expected {
                tracing::error!(expected = %expected, actual = %actual, "checksum mismatch after re-fetch");
                return Err(InstallError::ChecksumMismatch {
                    url: spec.source_url().to_string(),
                    expected,
                    actual,
                });
            }
        }
        tracing::debug!(digest = %expected, "cached binary verified");

        let dest = Path::new(spec.destination_path());
        let current = match checksum::sha256_file(dest) {
            Ok(d) => Some(d),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(source) => {
                return Err(InstallError::Digest {
                    path: dest.display().to_string(),
                    source,
                })
            }
        };

        let changed = current.as_deref() != Some(expected.as_str());
        if changed {
            place(&entry.binary_path, dest)?;
            tracing::info!(dest = %dest.display(), digest = %expected, "installed");
        } else {
            tracing::info!(dest = %dest.display(), "destination already up to date");
        }

        Ok(InstallResult {
            changed,
            destination_path: spec.destination_path().to_string(),
            digest: expected,
        })
    }

    fn fetch_binary(&self, spec: &ArtifactSpec, entry: &CacheEntry) -> Result<(), InstallError> {
        tracing::info!(url = spec.source_url(), "fetching binary");
        self.fetcher
            .fetch(spec.source_url(), &entry.binary_path)
            .map(|_| ())
            .map_err(|source| InstallError::Fetch {
                what: "binary",
                source,
            })
    }

    fn expected_digest(&self, spec: &ArtifactSpec, entry: &CacheEntry) -> Result<String, InstallError> {
        self.fetcher
            .fetch(spec.manifest_url(), &entry.manifest_path)
            .map_err(|source| InstallError::Fetch {
                what: "manifest",
                source,
            })?;
        let text = fs::read(&entry.manifest_path)
            .map(|b| String::from_utf8_lossy(&b).into_owned())
            .map_err(|source| InstallError::ManifestRead {
                path: entry.manifest_path.display().to_string(),
                source,
            })?;

        let matches = manifest::matching_entries(&text, spec.filename());
        if matches.len() > 1 && matches.iter().any(|m| m.digest != matches[0].digest) {
            // Substring matching picked up more than one artifact; first line wins.
            tracing::warn!(
                filename = spec.filename(),
                lines = ?matches.iter().map(|m| m.line).collect::<Vec<_>>(),
                "manifest has several differing entries for this filename, using the first"
            );
        }

        manifest::expected_digest(&text, spec.filename()).map_err(|_| {
            InstallError::ManifestEntryNotFound {
                filename: spec.filename().to_string(),
                manifest_url: spec.manifest_url().to_string(),
            }
        })
    }
}

fn digest_of(path: &Path) -> Result<String, InstallError> {
    checksum::sha256_file(path).map_err(|source| InstallError::Digest {
        path: path.display().to_string(),
        source,
    })
}

/// Atomically move the verified cache file onto `dest` and make it 0755.
fn place(verified: &Path, dest: &Path) -> Result<(), InstallError> {
    let install_err = |source: io::Error| InstallError::Install {
        path: dest.display().to_string(),
        source,
    };
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(install_err)?;
    }
    let method = storage::replace_atomically(verified, dest, EXECUTABLE_MODE).map_err(install_err)?;
    tracing::debug!(?method, "destination replaced");
    storage::set_mode(dest, EXECUTABLE_MODE).map_err(install_err)?;
    Ok(())
}
