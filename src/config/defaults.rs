//! Built-in crawler registry and heuristic defaults
//!
//! These are the values botgauge runs with when no config file is given.
//! Everything here can be overridden from TOML; nothing is mutable at
//! runtime.

use crate::config::types::{Config, CrawlerProfile, HeuristicsConfig, ProbeConfig};

pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub(crate) const DEFAULT_MAX_REDIRECTS: u32 = 10;
pub(crate) const DEFAULT_CONCURRENCY: u32 = 4;
pub(crate) const DEFAULT_BODY_EXCERPT_LIMIT: usize = 2000;

/// Known AI crawler User-Agent strings, probed in this order by default
const BUILTIN_CRAWLERS: &[(&str, &str)] = &[
    (
        "GPTBot",
        "Mozilla/5.0 AppleWebKit/537.36 (KHTML, like Gecko; compatible; GPTBot/1.0; +https://openai.com/gptbot)",
    ),
    (
        "ChatGPT-User",
        "Mozilla/5.0 (compatible; ChatGPT-User; +https://openai.com/bot)",
    ),
    (
        "OAI-SearchBot",
        "Mozilla/5.0 (compatible; OAI-SearchBot/1.0; +https://openai.com/searchbot)",
    ),
    (
        "PerplexityBot",
        "Mozilla/5.0 (compatible; PerplexityBot/1.0; +https://www.perplexity.ai/bot)",
    ),
    (
        "ClaudeBot",
        "ClaudeBot/1.0 (+https://www.anthropic.com/claudebot)",
    ),
    ("Grok", "GrokBot/1.0 (+https://x.ai/grok)"),
    ("GoogleOther", "GoogleOther"),
    ("Google-Extended", "Google-Extended"),
    ("CCBot", "CCBot/2.0 (+https://commoncrawl.org/faq/)"),
];

/// Phrases that indicate a challenge or mitigation page even when the
/// response status looks fine
const DEFAULT_BLOCK_PHRASES: &[&str] = &[
    "access denied",
    "forbidden",
    "not authorized",
    "verify you are human",
    "captcha",
    "cloudflare",
    "akamai",
    "perimeterx",
    "attention required",
];

/// Builds the built-in crawler registry
pub(crate) fn builtin_crawlers() -> Vec<CrawlerProfile> {
    BUILTIN_CRAWLERS
        .iter()
        .map(|(name, user_agent)| CrawlerProfile {
            name: (*name).to_string(),
            user_agent: (*user_agent).to_string(),
        })
        .collect()
}

pub(crate) fn default_block_phrases() -> Vec<String> {
    DEFAULT_BLOCK_PHRASES.iter().map(|s| s.to_string()).collect()
}

/// Statuses that mark a block anywhere in the redirect chain
pub(crate) fn default_chain_block_statuses() -> Vec<u16> {
    vec![403, 429]
}

/// Statuses that mark a block only as the final response
pub(crate) fn default_final_block_statuses() -> Vec<u16> {
    vec![401, 451]
}

/// Assembles the complete built-in configuration
///
/// This is what botgauge runs with when no `--config` file is given.
pub fn builtin_config() -> Config {
    Config {
        probe: ProbeConfig::default(),
        heuristics: HeuristicsConfig::default(),
        crawlers: builtin_crawlers(),
    }
}
