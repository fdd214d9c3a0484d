//! Fetch error type and transport classification.

use std::io;

/// High-level classification of a fetch failure.
///
/// Lets callers tell a flaky network apart from a server that will keep
/// answering the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Operation timed out (connect/read/low-speed abort).
    Timeout,
    /// Server asked us to slow down (429, 503).
    Throttled,
    /// Network-level failure (connection refused/reset, DNS).
    Connection,
    /// Server-side error (5xx other than 503).
    Http5xx(u16),
    /// Anything else: 4xx, bad URL, local write failure.
    Other,
}

impl TransportKind {
    pub fn is_transient(self) -> bool {
        !matches!(self, TransportKind::Other)
    }
}

/// Error from downloading one URL to disk.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// libcurl reported an error (timeout, connection, bad URL...).
    #[error("GET {url}: {source}")]
    Curl { url: String, source: curl::Error },
    /// HTTP response had a non-2xx status.
    #[error("GET {url} returned HTTP {code}")]
    Http { url: String, code: u32 },
    /// Writing the body to the local file failed (disk full, permission denied).
    #[error("write {path}: {source}")]
    Write { path: String, source: io::Error },
}

impl FetchError {
    pub fn kind(&self) -> TransportKind {
        match self {
            FetchError::Curl { source, .. } => classify_curl_error(source),
            FetchError::Http { code, .. } => classify_http_status(*code),
            FetchError::Write { .. } => TransportKind::Other,
        }
    }

    /// True when retrying later might succeed.
    pub fn is_transient(&self) -> bool {
        self.kind().is_transient()
    }
}

/// Classify an HTTP status code.
pub fn classify_http_status(code: u32) -> TransportKind {
    match code {
        429 | 503 => TransportKind::Throttled,
        500..=599 => TransportKind::Http5xx(code as u16),
        _ => TransportKind::Other,
    }
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> TransportKind {
    if e.is_operation_timedout() {
        return TransportKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return TransportKind::Connection;
    }
    TransportKind::Other
}
