//! Integration tests for the prober
//!
//! These tests use wiremock to stand up mock HTTP servers and exercise the
//! full fetch-classify cycle end-to-end.

use botgauge::config::{builtin_config, Config, CrawlerProfile};
use botgauge::probe::{run_probes, VerdictLabel};
use botgauge::url::normalize_target;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a probe configuration tuned for fast tests
fn test_config() -> Config {
    let mut config = builtin_config();
    config.probe.timeout_secs = 5;
    config.probe.concurrency = 4;
    config
}

fn profile(name: &str) -> CrawlerProfile {
    CrawlerProfile {
        name: name.to_string(),
        user_agent: format!("{}/1.0 (+https://example.com/bot)", name),
    }
}

#[tokio::test]
async fn test_head_unsupported_falls_back_to_get() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Welcome"))
        .mount(&mock_server)
        .await;

    let target = normalize_target(&mock_server.uri()).unwrap();
    let report = run_probes(&test_config(), &target, &[profile("GPTBot")], false)
        .await
        .unwrap();

    let row = &report.rows[0];
    assert!(row.fetch.error.is_none());
    // The GET fallback restarts the chain, so the abandoned HEAD 405 is gone
    assert_eq!(row.fetch.status_chain, vec![200]);
    assert_eq!(row.fetch.body_excerpt, "Welcome");
    assert_eq!(row.verdict.label, VerdictLabel::Allowed);
}

#[tokio::test]
async fn test_forbidden_status_is_blocked() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&mock_server)
        .await;

    let target = normalize_target(&mock_server.uri()).unwrap();
    let report = run_probes(&test_config(), &target, &[profile("ClaudeBot")], false)
        .await
        .unwrap();

    let row = &report.rows[0];
    assert_eq!(row.fetch.status_chain, vec![403]);
    assert_eq!(row.verdict.label, VerdictLabel::Blocked);
    assert_eq!(row.verdict.reason, "status code indicates block");
}

#[tokio::test]
async fn test_redirect_chain_is_recorded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let target = normalize_target(&format!("{}/old", mock_server.uri())).unwrap();
    let report = run_probes(&test_config(), &target, &[profile("GPTBot")], false)
        .await
        .unwrap();

    let row = &report.rows[0];
    assert!(row.fetch.error.is_none());
    assert_eq!(row.fetch.status_chain, vec![301, 200]);
    assert!(row.fetch.final_url.ends_with("/new"));
    assert_eq!(row.verdict.label, VerdictLabel::Allowed);
}

#[tokio::test]
async fn test_block_phrase_in_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body>Please complete the CAPTCHA to continue</body></html>",
        ))
        .mount(&mock_server)
        .await;

    let target = normalize_target(&mock_server.uri()).unwrap();
    let report = run_probes(&test_config(), &target, &[profile("PerplexityBot")], false)
        .await
        .unwrap();

    let row = &report.rows[0];
    assert_eq!(row.fetch.final_status(), Some(200));
    assert_eq!(row.verdict.label, VerdictLabel::Blocked);
    assert_eq!(row.verdict.reason, "body content indicates block page");
}

#[tokio::test]
async fn test_unreachable_server_is_uncertain() {
    // Grab a live address, then shut the server down
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let target = normalize_target(&uri).unwrap();
    let report = run_probes(&test_config(), &target, &[profile("CCBot")], false)
        .await
        .unwrap();

    let row = &report.rows[0];
    assert!(row.fetch.error.is_some());
    assert!(row.fetch.status_chain.is_empty());
    assert_eq!(row.verdict.label, VerdictLabel::Uncertain);
    assert_eq!(row.verdict.reason, "network error");
}

#[tokio::test]
async fn test_redirect_limit_is_an_error() {
    let mock_server = MockServer::start().await;

    for hop in 0..6 {
        Mock::given(method("HEAD"))
            .and(path(format!("/r{}", hop)))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", format!("/r{}", hop + 1).as_str()),
            )
            .mount(&mock_server)
            .await;
    }

    let mut config = test_config();
    config.probe.max_redirects = 3;

    let target = normalize_target(&format!("{}/r0", mock_server.uri())).unwrap();
    let report = run_probes(&config, &target, &[profile("GPTBot")], false)
        .await
        .unwrap();

    let row = &report.rows[0];
    assert!(row.fetch.error.is_some());
    // The partial chain up to the limit is kept
    assert_eq!(row.fetch.status_chain, vec![302, 302, 302, 302]);
    assert_eq!(row.verdict.label, VerdictLabel::Uncertain);
}

#[tokio::test]
async fn test_redirect_loop_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/b"))
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/a"))
        .mount(&mock_server)
        .await;

    let target = normalize_target(&format!("{}/a", mock_server.uri())).unwrap();
    let report = run_probes(&test_config(), &target, &[profile("GPTBot")], false)
        .await
        .unwrap();

    let row = &report.rows[0];
    assert!(row.fetch.error.is_some());
    assert_eq!(row.verdict.label, VerdictLabel::Uncertain);
}

#[tokio::test]
async fn test_crawler_user_agent_is_sent() {
    let mock_server = MockServer::start().await;

    // Only the exact User-Agent gets a 200; anything else falls through to
    // wiremock's default 404
    Mock::given(method("HEAD"))
        .and(path("/"))
        .and(header("user-agent", "CustomBot/1.0 (+https://example.com/bot)"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let target = normalize_target(&mock_server.uri()).unwrap();
    let report = run_probes(&test_config(), &target, &[profile("CustomBot")], false)
        .await
        .unwrap();

    assert_eq!(report.rows[0].fetch.status_chain, vec![200]);
}

#[tokio::test]
async fn test_results_preserve_selection_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let mut config = test_config();
    config.probe.concurrency = 2;

    let selection = vec![profile("CCBot"), profile("GPTBot"), profile("ClaudeBot")];
    let target = normalize_target(&mock_server.uri()).unwrap();
    let report = run_probes(&config, &target, &selection, false).await.unwrap();

    let names: Vec<&str> = report
        .rows
        .iter()
        .map(|row| row.fetch.crawler.name.as_str())
        .collect();
    assert_eq!(names, vec!["CCBot", "GPTBot", "ClaudeBot"]);
}

#[tokio::test]
async fn test_one_failure_does_not_abort_others() {
    let mock_server = MockServer::start().await;

    // GoodBot gets a 200; everything else falls through to wiremock's
    // default 404, on the GET fallback too
    Mock::given(method("HEAD"))
        .and(header("user-agent", "GoodBot/1.0 (+https://example.com/bot)"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let selection = vec![profile("BadBot"), profile("GoodBot")];
    let target = normalize_target(&mock_server.uri()).unwrap();
    let report = run_probes(&test_config(), &target, &selection, false)
        .await
        .unwrap();

    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].verdict.label, VerdictLabel::Uncertain);
    assert_eq!(report.rows[1].verdict.label, VerdictLabel::Allowed);
}

#[tokio::test]
async fn test_body_excerpt_is_truncated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(5000)))
        .mount(&mock_server)
        .await;

    let mut config = test_config();
    config.probe.body_excerpt_limit = 100;

    let target = normalize_target(&mock_server.uri()).unwrap();
    let report = run_probes(&config, &target, &[profile("GPTBot")], false)
        .await
        .unwrap();

    assert_eq!(report.rows[0].fetch.body_excerpt.chars().count(), 100);
}

#[tokio::test]
async fn test_robots_txt_snapshot() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"),
        )
        .mount(&mock_server)
        .await;

    let target = normalize_target(&mock_server.uri()).unwrap();
    let report = run_probes(&test_config(), &target, &[profile("GPTBot")], true)
        .await
        .unwrap();

    let robots = report.robots.expect("robots snapshot requested");
    assert_eq!(robots.status, Some(200));
    assert!(robots.body.unwrap().contains("Disallow: /private"));
    assert!(robots.error.is_none());
}

#[tokio::test]
async fn test_robots_snapshot_not_fetched_by_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let target = normalize_target(&mock_server.uri()).unwrap();
    let report = run_probes(&test_config(), &target, &[profile("GPTBot")], false)
        .await
        .unwrap();

    assert!(report.robots.is_none());
}
