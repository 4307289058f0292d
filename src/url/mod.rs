//! Target URL handling
//!
//! Turns user-entered targets into probe-ready URLs and derives the
//! robots.txt location. A target that fails here is a fatal error surfaced
//! before any request is issued.

use crate::UrlError;
use url::Url;

/// Normalizes a user-entered target into a probe-ready URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty input
/// 2. Default a missing scheme to `https://` (so "example.com" works)
/// 3. Parse; reject if malformed
/// 4. Reject schemes other than HTTP and HTTPS
/// 5. Require a host
///
/// # Arguments
///
/// * `input` - The target as the user typed it
///
/// # Returns
///
/// * `Ok(Url)` - Normalized target URL
/// * `Err(UrlError)` - Input cannot be probed
///
/// # Examples
///
/// ```
/// use botgauge::url::normalize_target;
///
/// let url = normalize_target("Example.com/page").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_target(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Malformed("empty target URL".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Derives the robots.txt URL for a normalized target
///
/// Always `{scheme}://{host[:port]}/robots.txt`, regardless of the target's
/// path or query.
pub fn robots_url(target: &Url) -> Url {
    let mut url = target.clone();
    url.set_path("/robots.txt");
    url.set_query(None);
    url.set_fragment(None);
    url
}
