//! `vinst install` – fetch, verify and install one binary.
//!
//! Prints the structured result (or failure report) as JSON on stdout.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use vinst_core::config::VinstConfig;
use vinst_core::fetch::FetchOptions;
use vinst_core::{
    ArtifactCache, ArtifactSpec, CurlFetcher, FailureReport, InstallError, InstallResult, Installer,
};

/// Arguments of the `install` subcommand.
#[derive(Debug, Clone)]
pub struct InstallArgs {
    pub url: String,
    pub checksum_url: String,
    pub dest: String,
    pub cache_dir: Option<PathBuf>,
    pub no_lock: bool,
    pub pretty: bool,
}

/// Cache root: `--cache-dir`, then `cache_dir` from config, then the XDG cache dir.
pub(crate) fn cache_root(cfg: &VinstConfig, args: &InstallArgs) -> Result<PathBuf> {
    match args.cache_dir.clone().or_else(|| cfg.cache_dir.clone()) {
        Some(dir) => Ok(dir),
        None => ArtifactCache::default_root(),
    }
}

pub async fn run_install(cfg: &VinstConfig, args: InstallArgs) -> Result<()> {
    let root = cache_root(cfg, &args)?;
    let lock = cfg.lock && !args.no_lock;
    let fetch = cfg.fetch_options();
    let pretty = args.pretty;
    tracing::debug!(cache = %root.display(), lock, "starting install");

    // curl and file I/O block; keep them off the async workers.
    let outcome = tokio::task::spawn_blocking(move || install_blocking(args, root, fetch, lock))
        .await
        .context("install task failed")?;

    match outcome {
        Ok(result) => {
            println!("{}", render(&result, pretty)?);
            Ok(())
        }
        Err(err) => {
            println!("{}", render(&FailureReport::from(&err), pretty)?);
            Err(anyhow::Error::new(err))
        }
    }
}

fn install_blocking(
    args: InstallArgs,
    cache_root: PathBuf,
    fetch: FetchOptions,
    lock: bool,
) -> Result<InstallResult, InstallError> {
    let spec = ArtifactSpec::new(args.url, args.checksum_url, args.dest)?;
    Installer::new(CurlFetcher::new(fetch), ArtifactCache::new(cache_root))
        .with_lock(lock)
        .install(&spec)
}

pub(crate) fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}
