//! Structured outcome records, serialized as the CLI's JSON output.

use serde::{Deserialize, Serialize};

use super::error::{FailureKind, InstallError};

/// Successful install (or no-op).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallResult {
    /// False when the destination already had the verified content.
    pub changed: bool,
    pub destination_path: String,
    /// Verified SHA-256 now held by the destination.
    pub digest: String,
}

/// Failed install, as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    pub failed: bool,
    pub kind: FailureKind,
    pub transient: bool,
    pub msg: String,
}

impl From<&InstallError> for FailureReport {
    fn from(e: &InstallError) -> Self {
        Self {
            failed: true,
            kind: e.kind(),
            transient: e.is_transient(),
            msg: e.to_string(),
        }
    }
}
