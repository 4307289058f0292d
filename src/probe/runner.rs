//! Concurrent probe dispatch
//!
//! Runs one fetch-and-classify task per selected crawler. Tasks share
//! nothing but the HTTP client; a semaphore bounds how many are in flight,
//! and aggregation preserves the crawler-selection order regardless of
//! completion order.

use crate::config::{Config, CrawlerProfile};
use crate::probe::classifier::{classify, Verdict};
use crate::probe::fetcher::{build_http_client, fetch, FetchOptions, FetchResult};
use crate::probe::robots::{fetch_robots_txt, RobotsSnapshot};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

/// One table row: a fetch result paired with its verdict
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub fetch: FetchResult,
    pub verdict: Verdict,
}

/// Everything one probe run produced
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// The normalized target URL
    pub target_url: String,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// One row per selected crawler, in selection order
    pub rows: Vec<ResultRow>,

    /// Informational robots.txt snapshot, when requested
    pub robots: Option<RobotsSnapshot>,
}

/// Probes a target with every selected crawler profile
///
/// # Arguments
///
/// * `config` - Probe settings and classifier heuristics
/// * `target` - The normalized target URL
/// * `selection` - Crawler profiles to probe with, in display order
/// * `include_robots` - Also snapshot the target's robots.txt
///
/// # Returns
///
/// * `Ok(ProbeReport)` - One row per crawler; individual failures are
///   recorded in their rows, never propagated
/// * `Err(BotgaugeError)` - The HTTP client could not be built
pub async fn run_probes(
    config: &Config,
    target: &Url,
    selection: &[CrawlerProfile],
    include_robots: bool,
) -> crate::Result<ProbeReport> {
    let started_at = Utc::now();
    let client = build_http_client(Duration::from_secs(config.probe.timeout_secs))?;
    let options = FetchOptions::from(&config.probe);
    let semaphore = Arc::new(Semaphore::new(config.probe.concurrency.max(1) as usize));

    let mut handles = Vec::with_capacity(selection.len());
    for profile in selection {
        let client = client.clone();
        let options = options.clone();
        let heuristics = config.heuristics.clone();
        let target = target.clone();
        let profile = profile.clone();
        let semaphore = Arc::clone(&semaphore);

        handles.push(tokio::spawn(async move {
            // The semaphore is never closed, so acquire cannot fail; the
            // permit is held for the duration of the probe
            let _permit = semaphore.acquire_owned().await.ok();
            tracing::debug!("probing {} as {}", target, profile.name);
            let fetch_result = fetch(&client, &target, &profile, &options).await;
            let verdict = classify(&fetch_result, &heuristics);
            tracing::info!(
                "{}: {} ({})",
                profile.name,
                verdict.label,
                verdict.reason
            );
            ResultRow {
                fetch: fetch_result,
                verdict,
            }
        }));
    }

    // Awaiting in spawn order keeps rows in crawler-selection order
    let mut rows = Vec::with_capacity(selection.len());
    for (profile, handle) in selection.iter().zip(handles) {
        match handle.await {
            Ok(row) => rows.push(row),
            Err(e) => {
                // A panicked task loses only its own row
                tracing::error!("probe task for {} failed: {}", profile.name, e);
                let fetch_result = FetchResult {
                    crawler: profile.clone(),
                    target_url: target.to_string(),
                    final_url: target.to_string(),
                    status_chain: Vec::new(),
                    elapsed: Duration::ZERO,
                    response_headers: BTreeMap::new(),
                    body_excerpt: String::new(),
                    error: Some(format!("probe task failed: {}", e)),
                };
                let verdict = classify(&fetch_result, &config.heuristics);
                rows.push(ResultRow {
                    fetch: fetch_result,
                    verdict,
                });
            }
        }
    }

    let robots = if include_robots {
        Some(fetch_robots_txt(&client, target).await)
    } else {
        None
    };

    Ok(ProbeReport {
        target_url: target.to_string(),
        started_at,
        rows,
        robots,
    })
}
