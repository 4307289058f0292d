//! Botgauge main entry point
//!
//! This is the command-line interface for the botgauge crawler access
//! prober.

use anyhow::Context;
use botgauge::config::{builtin_config, load_config_with_hash, Config, CrawlerProfile};
use botgauge::output::{print_report, write_csv, write_json};
use botgauge::probe::run_probes;
use botgauge::url::normalize_target;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Botgauge: an AI crawler access prober
///
/// Botgauge sends requests to a target site with the User-Agent strings of
/// known AI crawlers and reports, per crawler, whether the site appears to
/// allow or block it. It inspects server responses; it does not enforce
/// robots.txt.
#[derive(Parser, Debug)]
#[command(name = "botgauge")]
#[command(version = "0.1.0")]
#[command(about = "Probe how a site responds to AI crawler user agents", long_about = None)]
struct Cli {
    /// Target URL to probe (scheme defaults to https://)
    #[arg(value_name = "URL", required_unless_present = "list_crawlers")]
    target: Option<String>,

    /// Crawler names to probe with, comma-separated (default: all configured)
    #[arg(short, long, value_delimiter = ',', value_name = "NAMES")]
    crawlers: Vec<String>,

    /// Path to a TOML configuration file overriding the built-in defaults
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Maximum redirect hops to follow per request
    #[arg(long, value_name = "N")]
    max_redirects: Option<u32>,

    /// Maximum probes in flight at once
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Also fetch and display the target's robots.txt (informational only)
    #[arg(long)]
    robots: bool,

    /// Write results as CSV to the given path
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Write results as JSON to the given path
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// List the configured crawler profiles and exit
    #[arg(long, conflicts_with_all = ["robots", "csv", "json"])]
    list_crawlers: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load configuration: built-in defaults, optionally overridden from TOML
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => builtin_config(),
    };

    apply_cli_overrides(&mut config, &cli);
    botgauge::config::validate(&config).context("invalid configuration")?;

    if cli.list_crawlers {
        handle_list_crawlers(&config);
        return Ok(());
    }

    // An unusable target is fatal before any request is issued
    let target = normalize_target(cli.target.as_deref().unwrap_or_default())
        .context("invalid target URL")?;

    let selection = select_crawlers(&config, &cli.crawlers)?;
    tracing::info!(
        "Probing {} with {} crawler profiles",
        target,
        selection.len()
    );

    let report = run_probes(&config, &target, &selection, cli.robots).await?;

    if !cli.quiet {
        print_report(&report);
    }

    if let Some(path) = &cli.csv {
        write_csv(&report.rows, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("CSV written to {}", path.display());
    }

    if let Some(path) = &cli.json {
        write_json(&report.rows, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("JSON written to {}", path.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("botgauge=warn"),
            1 => EnvFilter::new("botgauge=info,warn"),
            2 => EnvFilter::new("botgauge=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies CLI flag overrides on top of the loaded configuration
fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(timeout) = cli.timeout {
        config.probe.timeout_secs = timeout;
    }
    if let Some(max_redirects) = cli.max_redirects {
        config.probe.max_redirects = max_redirects;
    }
    if let Some(concurrency) = cli.concurrency {
        config.probe.concurrency = concurrency;
    }
}

/// Handles the --list-crawlers mode: prints the registry and exits
fn handle_list_crawlers(config: &Config) {
    println!("Configured crawler profiles ({}):", config.crawlers.len());
    for profile in &config.crawlers {
        println!("  {:<16} {}", profile.name, profile.user_agent);
    }
}

/// Resolves the requested crawler names against the registry
///
/// An empty request selects every configured crawler. Names are matched
/// case-insensitively and the request order is preserved in the report.
fn select_crawlers(config: &Config, requested: &[String]) -> anyhow::Result<Vec<CrawlerProfile>> {
    if requested.is_empty() {
        return Ok(config.crawlers.clone());
    }

    let mut selection = Vec::with_capacity(requested.len());
    for name in requested {
        let wanted = name.trim();
        match config
            .crawlers
            .iter()
            .find(|profile| profile.name.eq_ignore_ascii_case(wanted))
        {
            Some(profile) => selection.push(profile.clone()),
            None => {
                let available = config
                    .crawlers
                    .iter()
                    .map(|profile| profile.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                anyhow::bail!("unknown crawler '{}' (available: {})", wanted, available);
            }
        }
    }

    Ok(selection)
}
