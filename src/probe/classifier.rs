//! Verdict classification
//!
//! Applies an ordered set of heuristics to a completed [`FetchResult`] and
//! labels it allowed, blocked, or uncertain. Pure and stateless: the same
//! result and heuristics always produce the same verdict.

use crate::config::HeuristicsConfig;
use crate::probe::fetcher::FetchResult;
use std::fmt;

/// Classifier output label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictLabel {
    Allowed,
    Blocked,
    Uncertain,
}

impl VerdictLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictLabel::Allowed => "ALLOWED",
            VerdictLabel::Blocked => "BLOCKED",
            VerdictLabel::Uncertain => "UNCERTAIN",
        }
    }
}

impl fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A label plus the human-readable reason it was chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub label: VerdictLabel,
    pub reason: String,
}

impl Verdict {
    fn new(label: VerdictLabel, reason: &str) -> Self {
        Self {
            label,
            reason: reason.to_string(),
        }
    }
}

/// Classifies a completed fetch result
///
/// Heuristics are evaluated in order; the first match wins:
///
/// 1. `error` set -> UNCERTAIN ("network error")
/// 2. A chain-block status anywhere in the chain, or a final-block status
///    as the final response -> BLOCKED ("status code indicates block")
/// 3. Final 2xx with no block phrase in the body excerpt -> ALLOWED
/// 4. Final 2xx with a block phrase in the body excerpt -> BLOCKED
///    ("body content indicates block page")
/// 5. Anything else -> UNCERTAIN ("inconclusive status/content")
pub fn classify(result: &FetchResult, heuristics: &HeuristicsConfig) -> Verdict {
    if result.error.is_some() {
        return Verdict::new(VerdictLabel::Uncertain, "network error");
    }

    let final_status = result.final_status();

    let chain_block = result
        .status_chain
        .iter()
        .any(|status| heuristics.chain_block_statuses.contains(status));
    let final_block =
        final_status.map_or(false, |status| heuristics.final_block_statuses.contains(&status));
    if chain_block || final_block {
        return Verdict::new(VerdictLabel::Blocked, "status code indicates block");
    }

    if final_status.map_or(false, |status| (200..300).contains(&status)) {
        return match find_block_phrase(&result.body_excerpt, &heuristics.block_phrases) {
            None => Verdict::new(VerdictLabel::Allowed, "no block indicators detected"),
            Some(_) => Verdict::new(VerdictLabel::Blocked, "body content indicates block page"),
        };
    }

    Verdict::new(VerdictLabel::Uncertain, "inconclusive status/content")
}

/// Finds the first configured block phrase present in the excerpt
fn find_block_phrase<'a>(excerpt: &str, phrases: &'a [String]) -> Option<&'a str> {
    if excerpt.is_empty() {
        return None;
    }
    let lower = excerpt.to_lowercase();
    phrases
        .iter()
        .map(String::as_str)
        .find(|phrase| !phrase.is_empty() && lower.contains(&phrase.to_lowercase()))
}
