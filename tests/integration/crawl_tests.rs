//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for both the Graph API and the
//! public profile pages, and run full crawls over the real HTTP transport.

use serde_json::json;
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;
use threads_crawler::config::{validate, Config};
use threads_crawler::crawler::{run_crawl, POST_FIELDS};
use threads_crawler::CrawlerError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, seeds: &[&str], out: &Path) -> Config {
    let mut config = Config {
        seeds: seeds.iter().map(|s| s.to_string()).collect(),
        manual_ids: HashMap::from([("alice".to_string(), "100".to_string())]),
        ..Config::default()
    };
    config.api.base_url = format!("{}/v1.0", server.uri());
    config.api.profile_base_url = server.uri();
    config.api.access_token = Some(TOKEN.to_string());
    config.limits.pace_ms = 0;
    config.output.directory = out.display().to_string();
    config
}

fn json_response(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

fn api_error(status: u16, code: i64, subcode: Option<i64>) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": {"message": "mock error", "code": code, "error_subcode": subcode}
    }))
}

/// Mounts profile, probe and post responses for a readable user
async fn mount_user(server: &MockServer, id: &str, username: &str, posts: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v1.0/{}", id)))
        .respond_with(json_response(json!({"id": id, "username": username})))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v1.0/{}/threads", id)))
        .and(query_param("fields", "id"))
        .and(query_param("limit", "1"))
        .respond_with(json_response(json!({"data": [{"id": "probe"}]})))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v1.0/{}/threads", id)))
        .and(query_param("fields", POST_FIELDS))
        .and(query_param("access_token", TOKEN))
        .respond_with(json_response(posts))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_leaf(server: &MockServer, post_id: &str, resource: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/v1.0/{}/{}", post_id, resource)))
        .respond_with(response)
        .mount(server)
        .await;
}

fn read_rows(dir: &Path, file: &str) -> Vec<String> {
    std::fs::read_to_string(dir.join(file))
        .expect("Failed to read output file")
        .lines()
        .skip(1)
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_end_to_end_seed_crawl() {
    let mock_server = MockServer::start().await;
    let next_page = format!("{}/v1.0/cursor/never", mock_server.uri());

    // alice comes from the override table: her profile page must never be fetched
    Mock::given(method("GET"))
        .and(path("/@alice"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    // One post per user is requested, so the continuation cursor is never followed
    Mock::given(method("GET"))
        .and(path("/v1.0/cursor/never"))
        .respond_with(json_response(json!({"data": []})))
        .expect(0)
        .mount(&mock_server)
        .await;

    mount_user(
        &mock_server,
        "100",
        "alice",
        json!({
            "data": [
                {"id": "p100", "text": "hello\nworld", "author": {"id": "100"}, "like_count": 2},
                {"id": "p100b", "author": {"id": "100"}}
            ],
            "paging": {"next": next_page}
        }),
    )
    .await;
    mount_user(
        &mock_server,
        "42",
        "bob",
        json!({
            "data": [{"id": "p42", "caption": "caption only", "author": {"id": "42"}}],
            "paging": {"next": next_page}
        }),
    )
    .await;

    mount_leaf(
        &mock_server,
        "p100",
        "replies",
        json_response(json!({"data": [{"id": "r1", "text": "nice", "author": {"id": "7"}}]})),
    )
    .await;
    mount_leaf(
        &mock_server,
        "p100",
        "likes",
        json_response(json!({"data": [{"id": "8", "username": "fan"}]})),
    )
    .await;
    // bob's replies fail; his likes must still be collected
    mount_leaf(&mock_server, "p42", "replies", api_error(500, 2, None)).await;
    mount_leaf(
        &mock_server,
        "p42",
        "likes",
        json_response(json!({"data": [{"id": "9", "username": "other"}]})),
    )
    .await;

    let out = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(&mock_server, &["alice", "42"], out.path());
    config.limits.max_threads_per_user = 1;
    validate(&config).expect("Config should be valid");

    let stats = run_crawl(config).await.expect("Crawl failed");
    let run_dir = stats.output_dir.clone().expect("Output dir missing");
    assert!(run_dir.starts_with(out.path()));

    assert_eq!(stats.users, 2);
    assert_eq!(stats.posts, 2);
    assert_eq!(stats.replies, 1);
    assert_eq!(stats.likes, 2);
    assert_eq!(stats.leaf_failures, 1);

    assert_eq!(read_rows(&run_dir, "users.csv"), vec!["100,alice,", "42,bob,"]);
    assert_eq!(
        read_rows(&run_dir, "posts.csv"),
        vec!["p100,100,,,,2,,hello world", "p42,42,,,,,,caption only"]
    );
    assert_eq!(read_rows(&run_dir, "replies.csv"), vec!["p100,r1,7,,,,,nice"]);
    assert_eq!(read_rows(&run_dir, "likes.csv"), vec!["p100,8,fan", "p42,9,other"]);
}

#[tokio::test]
async fn test_profile_resolution_and_permission_fallback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/@carol"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><div data-opaque-userid="999"></div><script>{"user_id":"300"}</script></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/300"))
        .respond_with(json_response(json!({"id": "300", "username": "carol", "verified": true})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/300/threads"))
        .respond_with(api_error(400, 100, Some(33)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/me/threads"))
        .respond_with(json_response(json!({
            "data": [{"id": "m1", "text": "mine", "author": {"id": "1"}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_leaf(&mock_server, "m1", "replies", json_response(json!({"data": []}))).await;
    mount_leaf(&mock_server, "m1", "likes", json_response(json!({"data": []}))).await;

    // Unknown handle: profile page is a 404, seed is skipped
    Mock::given(method("GET"))
        .and(path("/@ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let out = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server, &["ghost", "carol"], out.path());

    let stats = run_crawl(config).await.expect("Crawl failed");
    let run_dir = stats.output_dir.clone().expect("Output dir missing");

    assert_eq!(stats.seeds_skipped, 1);
    assert_eq!(stats.fallback_targets, 1);
    assert_eq!(read_rows(&run_dir, "users.csv"), vec!["300,carol,true"]);
    assert_eq!(read_rows(&run_dir, "posts.csv"), vec!["m1,1,,,,,,mine"]);
}

#[tokio::test]
async fn test_unexpected_probe_error_aborts_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/42"))
        .respond_with(json_response(json!({"id": "42", "username": "bob"})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/42/threads"))
        .respond_with(api_error(400, 190, None))
        .mount(&mock_server)
        .await;

    // The seed after the failing one is never reached
    Mock::given(method("GET"))
        .and(path("/v1.0/43"))
        .respond_with(json_response(json!({"id": "43"})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server, &["42", "43"], out.path());

    let result = run_crawl(config).await;
    assert!(matches!(
        result,
        Err(CrawlerError::Api {
            status: 400,
            code: Some(190),
            ..
        })
    ));

    // Rows written before the failure are on disk
    let run_dir = std::fs::read_dir(out.path())
        .expect("Failed to list output")
        .next()
        .expect("No run directory")
        .expect("Bad dir entry")
        .path();
    assert_eq!(read_rows(&run_dir, "users.csv"), vec!["42,bob,"]);
}
