//! HTTP fetcher implementation
//!
//! This module issues the actual probe requests:
//! - Building the shared HTTP client
//! - HEAD requests with a single GET fallback
//! - Manual redirect handling, recording the full status chain
//! - Folding every failure into the result rather than propagating it
//!
//! A probe never fails as such: network errors, redirect loops, and
//! malformed responses all come back as a [`FetchResult`] with `error` set,
//! so one crawler's failure cannot abort the others.

use crate::config::{CrawlerProfile, ProbeConfig};
use crate::BotgaugeError;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, LOCATION, USER_AGENT};
use reqwest::{redirect::Policy, Client, Method, StatusCode};
use std::collections::{BTreeMap, HashSet};
use std::time::{Duration, Instant};
use url::Url;

/// Per-fetch knobs, derived from [`ProbeConfig`]
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Maximum redirect hops before the probe is abandoned
    pub max_redirects: u32,

    /// Maximum number of body characters retained for classification
    pub body_excerpt_limit: usize,
}

impl From<&ProbeConfig> for FetchOptions {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            max_redirects: config.max_redirects,
            body_excerpt_limit: config.body_excerpt_limit,
        }
    }
}

/// Outcome of probing one target with one crawler's User-Agent
///
/// Immutable after creation. `status_chain` holds every status observed
/// across redirect hops for the attempt that produced the final response;
/// it is empty only when `error` is set before any response arrived.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The crawler identity this probe impersonated
    pub crawler: CrawlerProfile,

    /// The normalized target URL the probe started from
    pub target_url: String,

    /// The last URL reached after following redirects
    pub final_url: String,

    /// Every status code observed, in redirect order
    pub status_chain: Vec<u16>,

    /// Wall-clock time for the whole probe, fallback included
    pub elapsed: Duration,

    /// Headers of the final response, sorted by name
    pub response_headers: BTreeMap<String, String>,

    /// Truncated body of the final response (GET only; empty for HEAD)
    pub body_excerpt: String,

    /// Set when the probe failed before reaching a final response
    pub error: Option<String>,
}

impl FetchResult {
    /// The status of the final response, if one was reached
    pub fn final_status(&self) -> Option<u16> {
        self.status_chain.last().copied()
    }
}

/// Builds the HTTP client shared by all probes in a run
///
/// Redirects are handled manually so the status chain can be recorded;
/// HTTP/2 is negotiated opportunistically via ALPN.
///
/// # Arguments
///
/// * `timeout` - Per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::none()) // Handle redirects manually
        .gzip(true)
        .brotli(true)
        .build()
}

/// Probes a target with one crawler's User-Agent
///
/// # Request Flow
///
/// 1. Send a HEAD request with the crawler's User-Agent
/// 2. Follow redirects manually up to `max_redirects`, recording every
///    status in the chain and detecting loops
/// 3. If the HEAD attempt fails at the transport level or ends on a status
///    >= 400 (which covers 405/501 "HEAD unsupported" and other
///    uninformative errors), retry once with GET; the chain restarts with
///    the GET attempt
/// 4. Fold any remaining failure into `FetchResult.error`
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `target` - The normalized target URL
/// * `profile` - The crawler identity to impersonate
/// * `options` - Redirect and excerpt limits
pub async fn fetch(
    client: &Client,
    target: &Url,
    profile: &CrawlerProfile,
    options: &FetchOptions,
) -> FetchResult {
    let started = Instant::now();

    let head = attempt(client, target, profile, Method::HEAD, options).await;
    let outcome = match head {
        Ok(outcome) if outcome.final_status() < 400 => Ok(outcome),
        Ok(_) | Err(AttemptError::Transport { .. }) => {
            tracing::debug!(
                "HEAD probe of {} as {} was uninformative, retrying with GET",
                target,
                profile.name
            );
            attempt(client, target, profile, Method::GET, options).await
        }
        // A redirect failure would only repeat under GET
        Err(e) => Err(e),
    };

    let elapsed = started.elapsed();
    match outcome {
        Ok(outcome) => FetchResult {
            crawler: profile.clone(),
            target_url: target.to_string(),
            final_url: outcome.final_url,
            status_chain: outcome.status_chain,
            elapsed,
            response_headers: outcome.response_headers,
            body_excerpt: outcome.body_excerpt,
            error: None,
        },
        Err(err) => {
            let (message, chain) = err.into_parts();
            tracing::debug!("probe of {} as {} failed: {}", target, profile.name, message);
            FetchResult {
                crawler: profile.clone(),
                target_url: target.to_string(),
                final_url: target.to_string(),
                status_chain: chain,
                elapsed,
                response_headers: BTreeMap::new(),
                body_excerpt: String::new(),
                error: Some(message),
            }
        }
    }
}

/// A completed HEAD or GET attempt with its redirect chain
struct AttemptOutcome {
    final_url: String,
    status_chain: Vec<u16>,
    response_headers: BTreeMap<String, String>,
    body_excerpt: String,
}

impl AttemptOutcome {
    /// Final status of the attempt; the chain is never empty on success
    fn final_status(&self) -> u16 {
        self.status_chain.last().copied().unwrap_or(0)
    }
}

/// Why an attempt produced no final response
enum AttemptError {
    /// Transport-level failure (DNS, connect, timeout, TLS)
    Transport { message: String, chain: Vec<u16> },

    /// Redirect walking failed (loop, limit, malformed Location)
    Redirect { message: String, chain: Vec<u16> },
}

impl AttemptError {
    fn into_parts(self) -> (String, Vec<u16>) {
        match self {
            AttemptError::Transport { message, chain } => (message, chain),
            AttemptError::Redirect { message, chain } => (message, chain),
        }
    }
}

/// Runs a single HEAD or GET attempt, following redirects manually
async fn attempt(
    client: &Client,
    start: &Url,
    profile: &CrawlerProfile,
    method: Method,
    options: &FetchOptions,
) -> Result<AttemptOutcome, AttemptError> {
    let mut chain: Vec<u16> = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut current = start.clone();

    loop {
        if !visited.insert(current.to_string()) {
            return Err(AttemptError::Redirect {
                message: BotgaugeError::RedirectLoop {
                    url: current.to_string(),
                }
                .to_string(),
                chain,
            });
        }

        let response = match client
            .request(method.clone(), current.clone())
            .header(USER_AGENT, profile.user_agent.as_str())
            .header(ACCEPT, "*/*")
            .header(ACCEPT_LANGUAGE, "en")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return Err(AttemptError::Transport {
                    message: transport_message(&current, e),
                    chain,
                })
            }
        };

        let status = response.status();
        chain.push(status.as_u16());

        if is_redirect(status) {
            if let Some(location) = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
            {
                if chain.len() as u32 > options.max_redirects {
                    return Err(AttemptError::Redirect {
                        message: BotgaugeError::RedirectLimit {
                            url: current.to_string(),
                        }
                        .to_string(),
                        chain,
                    });
                }

                let next = match resolve_location(&current, location) {
                    Ok(next) => next,
                    Err(message) => return Err(AttemptError::Redirect { message, chain }),
                };
                tracing::trace!("{} {} -> {}", status.as_u16(), current, next);
                current = next;
                continue;
            }
            // Redirect status with no Location header: treat as terminal
            tracing::warn!(
                "redirect status {} from {} carried no Location header",
                status.as_u16(),
                current
            );
        }

        let final_url = response.url().to_string();
        let response_headers = flatten_headers(response.headers());
        let body_excerpt = if method == Method::GET {
            match response.text().await {
                Ok(text) => truncate_chars(&text, options.body_excerpt_limit),
                Err(e) => {
                    return Err(AttemptError::Transport {
                        message: transport_message(&current, e),
                        chain,
                    })
                }
            }
        } else {
            String::new()
        };

        return Ok(AttemptOutcome {
            final_url,
            status_chain: chain,
            response_headers,
            body_excerpt,
        });
    }
}

/// Statuses whose Location header we follow
fn is_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

/// Resolves a Location header against the current URL
///
/// Absolute Locations are taken as-is; relative ones are joined against
/// the redirecting URL.
fn resolve_location(current: &Url, location: &str) -> Result<Url, String> {
    Url::parse(location)
        .or_else(|_| current.join(location))
        .map_err(|e| {
            BotgaugeError::Protocol {
                url: current.to_string(),
                message: format!("malformed redirect Location '{}': {}", location, e),
            }
            .to_string()
        })
}

/// Describes a transport-level reqwest failure
fn transport_message(url: &Url, e: reqwest::Error) -> String {
    if e.is_timeout() {
        BotgaugeError::Timeout {
            url: url.to_string(),
        }
        .to_string()
    } else {
        BotgaugeError::Http {
            url: url.to_string(),
            source: e,
        }
        .to_string()
    }
}

/// Flattens response headers into a sorted name -> value map
///
/// Repeated headers are joined with ", "; values that are not valid UTF-8
/// are recorded as a placeholder.
fn flatten_headers(headers: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let text = value.to_str().unwrap_or("<binary>").to_string();
        map.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&text);
            })
            .or_insert(text);
    }
    map
}

/// Truncates text to at most `limit` characters on a char boundary
pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        text.chars().take(limit).collect()
    }
}
