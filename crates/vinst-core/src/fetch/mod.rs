//! Fetcher: download one URL to a local file.
//!
//! Uses the curl crate (libcurl). The body is streamed into `<dest>.part`,
//! synced and renamed over `dest`, so an interrupted or failed transfer
//! never leaves a truncated file under the destination name. No retries and
//! no range-resume: callers decide what to do with a [`FetchError`].

mod error;

pub use error::{classify_curl_error, classify_http_status, FetchError, TransportKind};

use crate::storage::StagedFile;
use crate::url_model;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Transfer limits applied to every fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    /// Bytes/sec below which a transfer counts as stalled.
    pub low_speed_limit: u32,
    /// How long a transfer may stay stalled before it is aborted.
    pub low_speed_time: Duration,
    pub max_redirections: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(600),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
            max_redirections: 10,
        }
    }
}

/// Anything that can put the resource at `url` into the file at `dest`.
///
/// The installer only depends on this trait; tests substitute their own.
pub trait Fetcher {
    /// Download `url` to `dest`, replacing any existing file. Returns bytes written.
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}

/// libcurl-backed fetcher. Supports `http`, `https` and `file` URLs.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    pub options: FetchOptions,
}

impl CurlFetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        fetch(url, dest, &self.options)
    }
}

/// Downloads `url` to `dest` with a single GET. Runs in the current thread.
pub fn fetch(url: &str, dest: &Path, opts: &FetchOptions) -> Result<u64, FetchError> {
    let curl_err = |source: curl::Error| FetchError::Curl {
        url: url.to_string(),
        source,
    };
    let write_err = |source: io::Error| FetchError::Write {
        path: dest.display().to_string(),
        source,
    };

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(curl_err)?;
    easy.follow_location(true).map_err(curl_err)?;
    easy.max_redirections(opts.max_redirections).map_err(curl_err)?;
    easy.connect_timeout(opts.connect_timeout).map_err(curl_err)?;
    easy.timeout(opts.timeout).map_err(curl_err)?;
    easy.low_speed_limit(opts.low_speed_limit).map_err(curl_err)?;
    easy.low_speed_time(opts.low_speed_time).map_err(curl_err)?;
    easy.useragent(concat!("vinst/", env!("CARGO_PKG_VERSION")))
        .map_err(curl_err)?;

    let mut staged = StagedFile::create(dest).map_err(write_err)?;
    let mut written = 0u64;
    let mut storage_failure: Option<io::Error> = None;

    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match staged.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    storage_failure = Some(e);
                    Ok(0) // abort transfer
                }
            })
            .map_err(curl_err)?;
        let performed = transfer.perform();
        drop(transfer);
        if let Err(e) = performed {
            return Err(match storage_failure.take() {
                Some(io_err) => write_err(io_err),
                None => curl_err(e),
            });
        }
    }

    if url_model::is_http(url) {
        let code = easy.response_code().map_err(curl_err)?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http {
                url: url.to_string(),
                code,
            });
        }
    }

    staged.commit().map_err(write_err)?;
    tracing::debug!(url, dest = %dest.display(), bytes = written, "fetched");
    Ok(written)
}
