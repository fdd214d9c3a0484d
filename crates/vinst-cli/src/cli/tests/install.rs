//! Tests for the install subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_install() {
    match parse(&[
        "vinst",
        "install",
        "--url",
        "https://example/ctrld_amd64",
        "--checksum-url",
        "https://example/ctrld.sha256",
        "--dest",
        "/opt/bin/ctrld",
    ]) {
        CliCommand::Install {
            url,
            checksum_url,
            dest,
            cache_dir,
            no_lock,
            pretty,
        } => {
            assert_eq!(url, "https://example/ctrld_amd64");
            assert_eq!(checksum_url, "https://example/ctrld.sha256");
            assert_eq!(dest, "/opt/bin/ctrld");
            assert!(cache_dir.is_none());
            assert!(!no_lock);
            assert!(!pretty);
        }
        _ => panic!("expected Install"),
    }
}

#[test]
fn cli_parse_install_all_flags() {
    match parse(&[
        "vinst",
        "install",
        "--url",
        "file:///srv/mirror/ctrld_arm64",
        "--checksum-url",
        "file:///srv/mirror/ctrld.sha256",
        "--dest",
        "/usr/local/bin/ctrld",
        "--cache-dir",
        "/var/cache/vinst",
        "--no-lock",
        "--pretty",
    ]) {
        CliCommand::Install {
            cache_dir,
            no_lock,
            pretty,
            ..
        } => {
            assert_eq!(
                cache_dir.as_deref(),
                Some(std::path::Path::new("/var/cache/vinst"))
            );
            assert!(no_lock);
            assert!(pretty);
        }
        _ => panic!("expected Install with flags"),
    }
}

#[test]
fn cli_install_requires_checksum_url() {
    let r = Cli::try_parse_from([
        "vinst",
        "install",
        "--url",
        "https://example/ctrld_amd64",
        "--dest",
        "/opt/bin/ctrld",
    ]);
    assert!(r.is_err());
}
