use serde::Deserialize;

use crate::config::defaults;

/// Main configuration structure for botgauge
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub heuristics: HeuristicsConfig,

    /// Crawler registry; a config file without any [[crawlers]] entries
    /// keeps the built-in registry
    #[serde(default = "defaults::builtin_crawlers")]
    pub crawlers: Vec<CrawlerProfile>,
}

/// Probe behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Maximum redirect hops to follow per request
    #[serde(rename = "max-redirects")]
    pub max_redirects: u32,

    /// Maximum number of probes in flight at once
    pub concurrency: u32,

    /// Maximum number of body characters kept for the content heuristic
    #[serde(rename = "body-excerpt-limit")]
    pub body_excerpt_limit: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::DEFAULT_TIMEOUT_SECS,
            max_redirects: defaults::DEFAULT_MAX_REDIRECTS,
            concurrency: defaults::DEFAULT_CONCURRENCY,
            body_excerpt_limit: defaults::DEFAULT_BODY_EXCERPT_LIMIT,
        }
    }
}

/// Classifier heuristics configuration
///
/// The status sets and the phrase list are deliberately configuration, not
/// constants: which responses count as a "block" is a product judgement
/// that sites keep shifting under us.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    /// A response body containing any of these phrases marks a block page.
    /// Matching is case-insensitive.
    #[serde(rename = "block-phrases")]
    pub block_phrases: Vec<String>,

    /// Statuses that mark a block when seen anywhere in the redirect chain
    #[serde(rename = "chain-block-statuses")]
    pub chain_block_statuses: Vec<u16>,

    /// Statuses that mark a block only as the final response
    #[serde(rename = "final-block-statuses")]
    pub final_block_statuses: Vec<u16>,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            block_phrases: defaults::default_block_phrases(),
            chain_block_statuses: defaults::default_chain_block_statuses(),
            final_block_statuses: defaults::default_final_block_statuses(),
        }
    }
}

/// A named crawler identity: the User-Agent string a bot identifies
/// itself with
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrawlerProfile {
    /// Display name of the crawler (e.g. "GPTBot")
    pub name: String,

    /// The full User-Agent header value the crawler sends
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}
