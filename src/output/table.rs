//! Stdout table rendering
//!
//! Builds the results table, per-crawler detail sections, and the optional
//! robots.txt section as one string.

use crate::output::{format_status_chain, ExportRow};
use crate::probe::{ProbeReport, ResultRow, RobotsSnapshot};

/// Longest body excerpt shown in a detail section; exports keep the full
/// excerpt
const DETAIL_BODY_LIMIT: usize = 500;

/// Formats a complete probe report for stdout
pub fn format_report(report: &ProbeReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Probe of {} at {}\n\n",
        report.target_url,
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    out.push_str(&format_table(&report.rows));
    out.push_str(&format_details(&report.rows));

    if let Some(robots) = &report.robots {
        out.push_str(&format_robots(robots));
    }

    out
}

/// Prints a probe report to stdout
pub fn print_report(report: &ProbeReport) {
    print!("{}", format_report(report));
}

/// Formats the aligned results table
fn format_table(rows: &[ResultRow]) -> String {
    let export: Vec<ExportRow> = rows.iter().map(ExportRow::from_row).collect();

    let headers = ["CRAWLER", "STATUS CHAIN", "VERDICT", "ELAPSED", "REASON"];
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &export {
        widths[0] = widths[0].max(row.crawler.len());
        widths[1] = widths[1].max(row.status_chain.len());
        widths[2] = widths[2].max(row.verdict.len());
        widths[3] = widths[3].max(format!("{} ms", row.elapsed_ms).len());
        widths[4] = widths[4].max(row.reason.len());
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<w0$}  {:<w1$}  {:<w2$}  {:<w3$}  {:<w4$}  FINAL URL\n",
        headers[0],
        headers[1],
        headers[2],
        headers[3],
        headers[4],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
        w4 = widths[4],
    ));

    for row in &export {
        out.push_str(&format!(
            "{:<w0$}  {:<w1$}  {:<w2$}  {:<w3$}  {:<w4$}  {}\n",
            row.crawler,
            row.status_chain,
            row.verdict,
            format!("{} ms", row.elapsed_ms),
            row.reason,
            row.final_url,
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
            w4 = widths[4],
        ));
    }

    out
}

/// Formats the per-crawler detail sections
fn format_details(rows: &[ResultRow]) -> String {
    let mut out = String::from("\nDetails\n");

    for row in rows {
        out.push_str(&format!("\n--- {} ---\n", row.fetch.crawler.name));
        out.push_str(&format!("user-agent: {}\n", row.fetch.crawler.user_agent));
        out.push_str(&format!(
            "status chain: {}\n",
            format_status_chain(&row.fetch.status_chain)
        ));

        if let Some(error) = &row.fetch.error {
            out.push_str(&format!("error: {}\n", error));
        }

        if !row.fetch.response_headers.is_empty() {
            out.push_str("response headers:\n");
            for (name, value) in &row.fetch.response_headers {
                out.push_str(&format!("  {}: {}\n", name, value));
            }
        }

        if row.fetch.body_excerpt.is_empty() {
            out.push_str("body excerpt: (no body)\n");
        } else {
            let shown: String = row.fetch.body_excerpt.chars().take(DETAIL_BODY_LIMIT).collect();
            out.push_str(&format!("body excerpt: {}\n", shown));
        }
    }

    out
}

/// Formats the robots.txt section
///
/// Shown for context only; verdicts never consult robots.txt.
fn format_robots(snapshot: &RobotsSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nrobots.txt ({})\n", snapshot.url));

    if let Some(error) = &snapshot.error {
        out.push_str(&format!("(error: {})\n", error));
        return out;
    }

    match snapshot.status {
        Some(status) if status < 400 => match &snapshot.body {
            Some(body) if !body.is_empty() => {
                out.push_str(body);
                if !body.ends_with('\n') {
                    out.push('\n');
                }
            }
            _ => out.push_str("(empty)\n"),
        },
        Some(status) => out.push_str(&format!("(HTTP {})\n", status)),
        None => out.push_str("(no response)\n"),
    }

    out
}
