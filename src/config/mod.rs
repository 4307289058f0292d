//! Configuration module
//!
//! Botgauge runs out of the box with a built-in crawler registry and
//! heuristic defaults. A TOML file can override any of it: probe settings,
//! heuristics lists, or the crawler registry itself.

mod defaults;
mod parser;
mod types;
mod validation;

pub use defaults::builtin_config;
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, CrawlerProfile, HeuristicsConfig, ProbeConfig};
pub use validation::validate;
