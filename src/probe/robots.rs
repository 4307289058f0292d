//! Informational robots.txt snapshots
//!
//! Fetches the target's robots.txt for display only. Nothing here is
//! parsed or enforced; the verdicts come from server responses, not from
//! what robots.txt claims.

use crate::probe::fetcher::truncate_chars;
use crate::url::robots_url;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use url::Url;

/// Longest robots.txt body we keep for display
const ROBOTS_BODY_LIMIT: usize = 10_000;

/// The robots.txt fetch is informational, so it uses a plain browser
/// User-Agent instead of a crawler identity
const ROBOTS_FETCH_UA: &str = "Mozilla/5.0";

/// What came back from the robots.txt fetch
#[derive(Debug, Clone)]
pub struct RobotsSnapshot {
    /// The robots.txt URL that was fetched
    pub url: String,

    /// HTTP status, when a response arrived
    pub status: Option<u16>,

    /// Verbatim body, truncated, when the fetch succeeded
    pub body: Option<String>,

    /// Set when the fetch failed
    pub error: Option<String>,
}

/// Fetches the target's robots.txt for display
///
/// Never fails the run: fetch errors are recorded in the snapshot.
pub async fn fetch_robots_txt(client: &Client, target: &Url) -> RobotsSnapshot {
    let url = robots_url(target);
    tracing::debug!("fetching {}", url);

    match client
        .get(url.clone())
        .header(USER_AGENT, ROBOTS_FETCH_UA)
        .send()
        .await
    {
        Ok(response) => {
            let status = response.status().as_u16();
            match response.text().await {
                Ok(text) => RobotsSnapshot {
                    url: url.to_string(),
                    status: Some(status),
                    body: Some(truncate_chars(&text, ROBOTS_BODY_LIMIT)),
                    error: None,
                },
                Err(e) => RobotsSnapshot {
                    url: url.to_string(),
                    status: Some(status),
                    body: None,
                    error: Some(e.to_string()),
                },
            }
        }
        Err(e) => RobotsSnapshot {
            url: url.to_string(),
            status: None,
            body: None,
            error: Some(e.to_string()),
        },
    }
}
