use std::sync::Arc;

use hobd::content::{
    ContentFetcher, ContentLayout, FetchError, HttpContentSource, ResourceProbe, build_http_client,
};
use hobd::core::position::{LessonId, Position};
use hobd::core::resolver::{LessonResolver, NavigationOutcome};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn source() -> HttpContentSource {
    HttpContentSource::new(build_http_client().expect("client builds"))
}

fn resolver(server: &MockServer) -> LessonResolver {
    let source = Arc::new(source());
    LessonResolver::new(source.clone(), source, ContentLayout::new(server.uri()))
}

async fn mount_json(server: &MockServer, at: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serves UI strings and a Friday record for `lesson`'s day 7.
async fn mount_last_day(server: &MockServer, lesson: &str) {
    mount_json(server, "/ui/en.json", json!({ "nextLesson": "Next Lesson" })).await;
    mount_json(
        server,
        &format!("/content/en/{lesson}/day-7.json"),
        json!({ "day": "Friday", "title": "Review" }),
    )
    .await;
}

fn last_day(lesson: u32) -> Position {
    Position::new("en", LessonId::from_number(lesson), 7).unwrap()
}

// ============================================================================
// Fetch guard
// ============================================================================

#[tokio::test]
async fn test_fetch_valid_json_with_no_cache_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ui/en.json"))
        .and(header("cache-control", "no-cache"))
        .and(header("pragma", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"  {"prev":"Prev"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let value = assert_ok!(source().fetch_json(&format!("{}/ui/en.json", server.uri())).await);
    assert_eq!(value, json!({ "prev": "Prev" }));
}

#[tokio::test]
async fn test_fetch_html_is_not_json() {
    let server = MockServer::start().await;
    let html = format!("<!DOCTYPE html><html>{}</html>", "x".repeat(300));
    Mock::given(method("GET"))
        .and(path("/content/en/lesson-01/day-1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html.clone()))
        .mount(&server)
        .await;

    let url = format!("{}/content/en/lesson-01/day-1.json", server.uri());
    let err = assert_err!(source().fetch_json(&url).await);
    assert_eq!(err, FetchError::NotJson(html.chars().take(120).collect()));
}

#[tokio::test]
async fn test_fetch_missing_is_http_error() {
    let server = MockServer::start().await;
    let url = format!("{}/content/en/lesson-99/day-1.json", server.uri());
    let err = assert_err!(source().fetch_json(&url).await);
    assert_eq!(err, FetchError::HttpError(404));
}

#[tokio::test]
async fn test_fetch_malformed_json_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ui/en.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"prev": "#))
        .mount(&server)
        .await;

    let err = assert_err!(source().fetch_json(&format!("{}/ui/en.json", server.uri())).await);
    assert!(matches!(err, FetchError::ParseError(_)), "got {err:?}");
}

#[tokio::test]
async fn test_fetch_unreachable_is_network_error() {
    let err = assert_err!(source().fetch_json("http://127.0.0.1:1/ui/en.json").await);
    assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
}

// ============================================================================
// Probe
// ============================================================================

#[tokio::test]
async fn test_probe_status_codes() {
    let server = MockServer::start().await;
    mount_json(&server, "/content/en/intro-q2/index.json", json!({})).await;
    Mock::given(method("GET"))
        .and(path("/content/en/intro-q3/index.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let probe = source();
    assert!(probe.exists(&format!("{}/content/en/intro-q2/index.json", server.uri())).await);
    assert!(!probe.exists(&format!("{}/content/en/intro-q3/index.json", server.uri())).await);
    assert!(!probe.exists(&format!("{}/content/en/intro-q4/index.json", server.uri())).await);
}

#[tokio::test]
async fn test_probe_unreachable_host_is_absent() {
    assert!(!source().exists("http://127.0.0.1:1/content/en/lesson-02/day-1.json").await);
}

// ============================================================================
// Resolver over HTTP
// ============================================================================

#[tokio::test]
async fn test_resolve_last_day_with_next_lesson() {
    let server = MockServer::start().await;
    mount_last_day(&server, "lesson-01").await;
    mount_json(&server, "/content/en/lesson-02/day-1.json", json!({ "day": "Sabbath Afternoon" })).await;
    // Must not be consulted once the next lesson is found
    Mock::given(method("GET"))
        .and(path("/content/en/intro-q1/index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let day = assert_ok!(resolver(&server).resolve(&last_day(1)).await);
    assert_eq!(day.record.title.as_deref(), Some("Review"));
    assert_eq!(
        day.forward,
        Some(NavigationOutcome::AdvancedToNextLesson(LessonId::from_number(2)))
    );
    assert_eq!(day.ui.localize("nextLesson", "?"), "Next Lesson");
}

#[tokio::test]
async fn test_resolve_last_lesson_of_quarter() {
    let server = MockServer::start().await;
    mount_last_day(&server, "lesson-13").await;
    mount_json(&server, "/content/en/intro-q2/index.json", json!({ "title": "Q2" })).await;

    let day = assert_ok!(resolver(&server).resolve(&last_day(13)).await);
    assert_eq!(day.forward, Some(NavigationOutcome::AdvancedToNextQuarter(2)));

    let intro = assert_ok!(resolver(&server).quarter_intro("en", 2).await);
    assert_eq!(intro.title.as_deref(), Some("Q2"));
}

#[tokio::test]
async fn test_resolve_end_of_content() {
    let server = MockServer::start().await;
    mount_last_day(&server, "lesson-01").await;

    let day = assert_ok!(resolver(&server).resolve(&last_day(1)).await);
    assert_eq!(day.forward, Some(NavigationOutcome::EndOfContent));
}

#[tokio::test]
async fn test_resolve_survives_missing_ui_strings() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/content/en/lesson-01/day-2.json",
        json!({ "day": "Monday", "entries": [] }),
    )
    .await;

    let position = Position::new("en", LessonId::from_number(1), 2).unwrap();
    let day = assert_ok!(resolver(&server).resolve(&position).await);
    assert!(day.ui.is_empty());
    assert_eq!(day.ui.localize("prev", "Prev"), "Prev");
    assert_eq!(day.forward, None);
}

#[tokio::test]
async fn test_resolve_missing_day_fails() {
    let server = MockServer::start().await;
    mount_json(&server, "/ui/en.json", json!({})).await;

    let position = Position::new("en", LessonId::from_number(1), 3).unwrap();
    let err = assert_err!(resolver(&server).resolve(&position).await);
    assert_eq!(err, FetchError::HttpError(404));
}
