//! `vinst verify <path> --manifest <file>` – offline check against a manifest.

use anyhow::{Context, Result};
use std::path::Path;
use vinst_core::install::verify_file;

pub async fn run_verify(path: &Path, manifest: &Path, name: Option<&str>) -> Result<()> {
    let name = match name {
        Some(n) => n.to_string(),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no file name; pass --name", path.display()))?,
    };
    let v = verify_file(path, manifest, &name)?;
    println!("{}", super::install::render(&v, false)?);
    if !v.ok {
        anyhow::bail!(
            "checksum mismatch for {}: expected {}, got {}",
            path.display(),
            v.expected,
            v.actual
        );
    }
    tracing::info!(path = %path.display(), "verified");
    Ok(())
}
