//! vinst core: fetch a release binary, verify it against a detached
//! `sha256sum` manifest, and install it atomically.

pub mod config;
pub mod logging;

pub mod artifact;
pub mod cache;
pub mod checksum;
pub mod fetch;
pub mod install;
pub mod lock;
pub mod manifest;
pub mod storage;
pub mod url_model;

pub use artifact::ArtifactSpec;
pub use cache::ArtifactCache;
pub use fetch::{CurlFetcher, Fetcher};
pub use install::{FailureKind, FailureReport, InstallError, InstallResult, Installer};
