use crate::config::types::{Config, CrawlerProfile, HeuristicsConfig, ProbeConfig};
use crate::ConfigError;
use std::collections::HashSet;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_probe_config(&config.probe)?;
    validate_heuristics_config(&config.heuristics)?;
    validate_crawlers(&config.crawlers)?;
    Ok(())
}

/// Validates probe configuration
fn validate_probe_config(config: &ProbeConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.max_redirects > 30 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= 30, got {}",
            config.max_redirects
        )));
    }

    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.body_excerpt_limit < 1 || config.body_excerpt_limit > 65536 {
        return Err(ConfigError::Validation(format!(
            "body_excerpt_limit must be between 1 and 65536, got {}",
            config.body_excerpt_limit
        )));
    }

    Ok(())
}

/// Validates heuristics configuration
fn validate_heuristics_config(config: &HeuristicsConfig) -> Result<(), ConfigError> {
    for status in config
        .chain_block_statuses
        .iter()
        .chain(config.final_block_statuses.iter())
    {
        if !(100..=599).contains(status) {
            return Err(ConfigError::Validation(format!(
                "block statuses must be valid HTTP status codes, got {}",
                status
            )));
        }
    }

    for phrase in &config.block_phrases {
        if phrase.trim().is_empty() {
            return Err(ConfigError::Validation(
                "block phrases cannot be blank".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates the crawler registry
fn validate_crawlers(crawlers: &[CrawlerProfile]) -> Result<(), ConfigError> {
    if crawlers.is_empty() {
        return Err(ConfigError::Validation(
            "at least one crawler profile is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for profile in crawlers {
        if profile.name.is_empty() {
            return Err(ConfigError::Validation(
                "crawler name cannot be empty".to_string(),
            ));
        }

        // Names are used in comma-separated CLI selection
        if profile.name.contains(',') || profile.name.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "crawler name must not contain commas or whitespace, got '{}'",
                profile.name
            )));
        }

        if !seen.insert(profile.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate crawler name '{}'",
                profile.name
            )));
        }

        if profile.user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "crawler '{}' has an empty user-agent",
                profile.name
            )));
        }
    }

    Ok(())
}
