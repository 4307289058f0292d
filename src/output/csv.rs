//! CSV export
//!
//! Flat columns matching the JSON export: crawler, status_chain,
//! final_url, verdict, reason, elapsed_ms.

use crate::output::{ExportRow, OutputResult};
use crate::probe::ResultRow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const CSV_HEADER: &str = "crawler,status_chain,final_url,verdict,reason,elapsed_ms";

/// Formats result rows as CSV, header line included
pub fn format_csv(rows: &[ResultRow]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for row in rows {
        let export = ExportRow::from_row(row);
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            escape_field(&export.crawler),
            escape_field(&export.status_chain),
            escape_field(&export.final_url),
            escape_field(&export.verdict),
            escape_field(&export.reason),
            export.elapsed_ms
        ));
    }

    out
}

/// Writes result rows as CSV to the given path
pub fn write_csv(rows: &[ResultRow], path: &Path) -> OutputResult<()> {
    let mut file = File::create(path)?;
    file.write_all(format_csv(rows).as_bytes())?;
    Ok(())
}

/// Quotes a field when it contains a delimiter, quote, or newline
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlerProfile;
    use crate::probe::{FetchResult, Verdict, VerdictLabel};
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn sample_row(name: &str, chain: Vec<u16>, label: VerdictLabel, reason: &str) -> ResultRow {
        ResultRow {
            fetch: FetchResult {
                crawler: CrawlerProfile {
                    name: name.to_string(),
                    user_agent: format!("{}/1.0", name),
                },
                target_url: "https://example.com/".to_string(),
                final_url: "https://example.com/".to_string(),
                status_chain: chain,
                elapsed: Duration::from_millis(42),
                response_headers: BTreeMap::new(),
                body_excerpt: String::new(),
                error: None,
            },
            verdict: Verdict {
                label,
                reason: reason.to_string(),
            },
        }
    }

    #[test]
    fn test_two_rows_produce_three_lines() {
        let rows = vec![
            sample_row("GPTBot", vec![200], VerdictLabel::Allowed, "no block indicators detected"),
            sample_row("CCBot", vec![403], VerdictLabel::Blocked, "status code indicates block"),
        ];

        let csv = format_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].starts_with("GPTBot,200,"));
        assert!(lines[2].starts_with("CCBot,403,"));
    }

    #[test]
    fn test_empty_rows_produce_header_only() {
        let csv = format_csv(&[]);
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_field_values_round_trip() {
        let rows = vec![sample_row(
            "GPTBot",
            vec![301, 200],
            VerdictLabel::Allowed,
            "no block indicators detected",
        )];

        let csv = format_csv(&rows);
        assert!(csv.contains("301->200"));
        assert!(csv.contains("ALLOWED"));
        assert!(csv.contains(",42"));
    }

    #[test]
    fn test_comma_in_reason_is_quoted() {
        let rows = vec![sample_row(
            "GPTBot",
            vec![200],
            VerdictLabel::Uncertain,
            "odd, but fine",
        )];

        let csv = format_csv(&rows);
        assert!(csv.contains("\"odd, but fine\""));
        // Still one data line despite the embedded comma
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn test_quote_in_field_is_doubled() {
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_plain_field_is_untouched() {
        assert_eq!(escape_field("GPTBot"), "GPTBot");
    }
}
