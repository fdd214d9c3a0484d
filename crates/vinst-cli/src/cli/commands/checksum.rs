//! `vinst checksum <path>` – print SHA-256 in sha256sum format.

use anyhow::Result;
use std::path::Path;
use vinst_core::checksum;

/// Compute and print SHA-256 of the given file.
pub async fn run_checksum(path: &Path) -> Result<()> {
    let digest = checksum::sha256_path(path)?;
    println!("{}", checksum::manifest_line(&digest, &path.display().to_string()));
    Ok(())
}
