//! Probe module: per-crawler fetching and classification
//!
//! This module contains the core probing logic, including:
//! - HTTP fetching with HEAD-to-GET fallback and manual redirect handling
//! - Verdict classification over completed fetch results
//! - Concurrent per-crawler dispatch
//! - Informational robots.txt snapshots

mod classifier;
mod fetcher;
mod robots;
mod runner;

pub use classifier::{classify, Verdict, VerdictLabel};
pub use fetcher::{build_http_client, fetch, FetchOptions, FetchResult};
pub use robots::{fetch_robots_txt, RobotsSnapshot};
pub use runner::{run_probes, ProbeReport, ResultRow};
