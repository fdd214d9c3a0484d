//! Offline check of a local file against a local manifest.

use serde::Serialize;
use std::path::Path;

use super::error::InstallError;
use crate::{checksum, manifest};

/// Outcome of [`verify_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    pub path: String,
    pub expected: String,
    pub actual: String,
    pub ok: bool,
}

/// Hash `path` and compare it with the manifest entry for `filename`.
///
/// A digest mismatch is reported through [`Verification::ok`], not as an error.
pub fn verify_file(path: &Path, manifest_path: &Path, filename: &str) -> Result<Verification, InstallError> {
    let text = manifest::read_manifest(manifest_path).map_err(|e| match e {
        manifest::ManifestError::Read { path, source } => InstallError::ManifestRead { path, source },
        manifest::ManifestError::NotFound { filename } => InstallError::ManifestEntryNotFound {
            filename,
            manifest_url: manifest_path.display().to_string(),
        },
    })?;
    let expected = manifest::expected_digest(&text, filename).map_err(|_| {
        InstallError::ManifestEntryNotFound {
            filename: filename.to_string(),
            manifest_url: manifest_path.display().to_string(),
        }
    })?;
    let actual = checksum::sha256_file(path).map_err(|source| InstallError::Digest {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Verification {
        path: path.display().to_string(),
        ok: actual == expected,
        expected,
        actual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::FailureKind;
    use std::fs;

    #[test]
    fn matching_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("ctrld_amd64");
        fs::write(&bin, b"payload").unwrap();
        let manifest = dir.path().join("ctrld.sha256");
        fs::write(
            &manifest,
            format!("{}\n", checksum::manifest_line(&checksum::sha256_bytes(b"payload"), "ctrld_amd64")),
        )
        .unwrap();

        let v = verify_file(&bin, &manifest, "ctrld_amd64").unwrap();
        assert!(v.ok);
        assert_eq!(v.expected, v.actual);
    }

    #[test]
    fn differing_file_is_not_ok() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("ctrld_amd64");
        fs::write(&bin, b"tampered").unwrap();
        let manifest = dir.path().join("ctrld.sha256");
        fs::write(&manifest, "0000  ctrld_amd64\n").unwrap();

        let v = verify_file(&bin, &manifest, "ctrld_amd64").unwrap();
        assert!(!v.ok);
        assert_eq!(v.expected, "0000");
    }

    #[test]
    fn missing_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("ctrld_amd64");
        fs::write(&bin, b"x").unwrap();
        let manifest = dir.path().join("ctrld.sha256");
        fs::write(&manifest, "abc  ctrld_arm64\n").unwrap();

        let err = verify_file(&bin, &manifest, "ctrld_amd64").unwrap_err();
        assert_eq!(err.kind(), FailureKind::ManifestEntryNotFound);
    }
}
