//! Filename derivation from artifact URLs.
//!
//! The filename is what the manifest is searched for and what the cached copy
//! is stored as, so it must be a single safe path component.

/// Extracts the last path segment from a URL for use as a filename.
///
/// Query string and fragment are not part of the result. Returns `None` if the
/// URL cannot be parsed or the path is empty/root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let path = parsed.path();
    let segment = path.split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." || segment.contains('\0') {
        return None;
    }
    Some(segment.to_string())
}

/// True when the URL scheme carries an HTTP status code worth checking.
pub fn is_http(url: &str) -> bool {
    url::Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal() {
        assert_eq!(
            filename_from_url_path("https://example.com/releases/v1.3.5/ctrld_amd64").as_deref(),
            Some("ctrld_amd64")
        );
        assert_eq!(
            filename_from_url_path("https://example.com/single").as_deref(),
            Some("single")
        );
    }

    #[test]
    fn root_or_empty() {
        assert_eq!(filename_from_url_path("https://example.com/"), None);
        assert_eq!(filename_from_url_path("https://example.com"), None);
        assert_eq!(filename_from_url_path("not a url"), None);
    }

    #[test]
    fn with_query_and_trailing_slash() {
        assert_eq!(
            filename_from_url_path("https://example.com/ctrld_arm64?token=abc#frag").as_deref(),
            Some("ctrld_arm64")
        );
        assert_eq!(
            filename_from_url_path("https://example.com/dist/ctrld/").as_deref(),
            Some("ctrld")
        );
    }

    #[test]
    fn file_urls() {
        assert_eq!(
            filename_from_url_path("file:///srv/mirror/ctrld_amd64").as_deref(),
            Some("ctrld_amd64")
        );
        assert!(!is_http("file:///srv/mirror/ctrld_amd64"));
        assert!(is_http("https://example.com/x"));
        assert!(is_http("http://127.0.0.1:8080/x"));
    }
}
