//! CLI for the vinst verified artifact installer.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vinst_core::config;

use commands::{run_checksum, run_completions, run_install, run_man, run_verify, InstallArgs};

/// Top-level CLI for vinst.
#[derive(Debug, Parser)]
#[command(name = "vinst")]
#[command(about = "vinst: fetch, checksum-verify and atomically install release binaries", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a binary, verify it against a checksum manifest and install it.
    Install {
        /// URL of the binary (http, https or file).
        #[arg(long)]
        url: String,

        /// URL of the sha256sum-style manifest listing the binary's digest.
        #[arg(long, value_name = "URL")]
        checksum_url: String,

        /// Where to install the binary (e.g. /usr/local/bin/ctrld).
        #[arg(long)]
        dest: String,

        /// Cache root; overrides `cache_dir` from config.toml.
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,

        /// Do not take the advisory install lock.
        #[arg(long)]
        no_lock: bool,

        /// Pretty-print the JSON result.
        #[arg(long)]
        pretty: bool,
    },

    /// Check a local file against a local checksum manifest.
    Verify {
        /// File to check.
        path: PathBuf,

        /// Manifest file (sha256sum format).
        #[arg(long)]
        manifest: PathBuf,

        /// Name to look up in the manifest; defaults to the file's basename.
        #[arg(long)]
        name: Option<String>,
    },

    /// Compute SHA-256 of a file (sha256sum output format).
    Checksum {
        /// Path to the file.
        path: String,
    },

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Install {
                url,
                checksum_url,
                dest,
                cache_dir,
                no_lock,
                pretty,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                let args = InstallArgs {
                    url,
                    checksum_url,
                    dest,
                    cache_dir,
                    no_lock,
                    pretty,
                };
                run_install(&cfg, args).await?;
            }
            CliCommand::Verify {
                path,
                manifest,
                name,
            } => run_verify(&path, &manifest, name.as_deref()).await?,
            CliCommand::Checksum { path } => run_checksum(std::path::Path::new(&path)).await?,
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
