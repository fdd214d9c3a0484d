//! Input descriptor for one install: where the binary and its manifest live,
//! and where the binary goes.

use serde::Serialize;

use crate::url_model::filename_from_url_path;

/// Rejected [`ArtifactSpec`] input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("cannot derive a filename from source URL {0}")]
    NoFilename(String),
}

/// What to fetch, what to verify it against, and where to install it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSpec {
    source_url: String,
    manifest_url: String,
    destination_path: String,
    #[serde(skip)]
    filename: String,
}

impl ArtifactSpec {
    /// All three fields are required and non-empty; the source URL must end
    /// in a usable filename (that is what the manifest is searched for).
    pub fn new(
        source_url: impl Into<String>,
        manifest_url: impl Into<String>,
        destination_path: impl Into<String>,
    ) -> Result<Self, SpecError> {
        let source_url = source_url.into().trim().to_string();
        let manifest_url = manifest_url.into().trim().to_string();
        let destination_path = destination_path.into();
        if source_url.is_empty() {
            return Err(SpecError::Empty("source_url"));
        }
        if manifest_url.is_empty() {
            return Err(SpecError::Empty("manifest_url"));
        }
        if destination_path.trim().is_empty() {
            return Err(SpecError::Empty("destination_path"));
        }
        let filename = filename_from_url_path(&source_url)
            .ok_or_else(|| SpecError::NoFilename(source_url.clone()))?;
        Ok(Self {
            source_url,
            manifest_url,
            destination_path,
            filename,
        })
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn manifest_url(&self) -> &str {
        &self.manifest_url
    }

    pub fn destination_path(&self) -> &str {
        &self.destination_path
    }

    /// Basename of the source URL, e.g. `ctrld_amd64`.
    pub fn filename(&self) -> &str {
        &self.filename
    }
}
