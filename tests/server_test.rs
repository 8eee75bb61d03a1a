//! Integration tests for the HTTP surface.
//!
//! Starts an in-process router on a random port in front of a mocked
//! extraction service and exercises it with a plain HTTP client.

#![cfg(feature = "server")]

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use huginn::Huginn;
use huginn::cache::MemoryStoreConfig;
use huginn::server::{ErrorBody, create_router};

/// Start the router against `upstream` and return its base URL.
async fn start_test_server(upstream: &MockServer) -> String {
    let gateway = Huginn::builder()
        .upstream(upstream.uri())
        .memory_cache(MemoryStoreConfig::default())
        .build()
        .expect("failed to build test gateway");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(Arc::new(gateway));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

async fn get(url: String) -> (u16, String) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status().as_u16();
    (status, response.text().await.unwrap())
}

async fn error_message(url: String) -> (u16, String) {
    let (status, body) = get(url).await;
    let body: ErrorBody = serde_json::from_str(&body).expect("error body should be JSON");
    (status, body.message)
}

#[tokio::test]
async fn test_healthcheck() {
    let upstream = MockServer::start().await;
    let base = start_test_server(&upstream).await;

    let (status, body) = get(format!("{base}/healthcheck")).await;
    assert_eq!(status, 200);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_intro_lists_routes() {
    let upstream = MockServer::start().await;
    let base = start_test_server(&upstream).await;

    let (status, body) = get(format!("{base}/meta/anilist")).await;
    assert_eq!(status, 200);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert!(
        body["routes"]
            .as_array()
            .unwrap()
            .contains(&json!("/trending"))
    );
}

#[tokio::test]
async fn test_trending_forwards_payload() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/anilist/trending"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "currentPage": 3 })))
        .expect(1)
        .mount(&upstream)
        .await;
    let base = start_test_server(&upstream).await;

    for _ in 0..2 {
        let (status, body) = get(format!("{base}/meta/anilist/trending?page=3")).await;
        assert_eq!(status, 200);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["currentPage"], 3);
    }
}

#[tokio::test]
async fn test_search_catch_all() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/anilist/frieren"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": ["frieren"] })))
        .mount(&upstream)
        .await;
    let base = start_test_server(&upstream).await;

    let (status, body) = get(format!("{base}/meta/anilist/frieren")).await;
    assert_eq!(status, 200);
    assert!(body.contains("frieren"));
}

#[tokio::test]
async fn test_invalid_genre_is_400() {
    let upstream = MockServer::start().await;
    let base = start_test_server(&upstream).await;

    let (status, message) = error_message(format!(
        "{base}/meta/anilist/genre?genres=%5B%22Action%22%2C%22Cooking%22%5D"
    ))
    .await;
    assert_eq!(status, 400);
    assert_eq!(message, "Cooking is not a valid genre");
}

#[tokio::test]
async fn test_missing_genres_is_400() {
    let upstream = MockServer::start().await;
    let base = start_test_server(&upstream).await;

    let (status, message) = error_message(format!("{base}/meta/anilist/genre")).await;
    assert_eq!(status, 400);
    assert_eq!(message, "genres is required");
}

#[tokio::test]
async fn test_unparsable_query_is_json_400() {
    let upstream = MockServer::start().await;
    let base = start_test_server(&upstream).await;

    let (status, message) =
        error_message(format!("{base}/meta/anilist/trending?page=abc")).await;
    assert_eq!(status, 400);
    assert!(
        message.starts_with("malformed query string"),
        "unexpected message: {message}"
    );
}

#[tokio::test]
async fn test_unknown_provider_is_400() {
    let upstream = MockServer::start().await;
    let base = start_test_server(&upstream).await;

    let (status, message) =
        error_message(format!("{base}/meta/anilist/watch/ep-1?provider=nyaa")).await;
    assert_eq!(status, 400);
    assert_eq!(message, "nyaa is not a valid provider");
}

#[tokio::test]
async fn test_upstream_not_found_is_404() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/anilist/watch/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&upstream)
        .await;
    let base = start_test_server(&upstream).await;

    let (status, message) = error_message(format!("{base}/meta/anilist/watch/missing")).await;
    assert_eq!(status, 404);
    assert_eq!(message, "watch not found");
}

#[tokio::test]
async fn test_upstream_failure_is_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/anilist/info/21"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&upstream)
        .await;
    let base = start_test_server(&upstream).await;

    let (status, message) = error_message(format!("{base}/meta/anilist/info/21")).await;
    assert_eq!(status, 500);
    assert_eq!(message, "info request failed");
}

#[tokio::test]
async fn test_episode_flags_reach_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/anilist/episodes/21"))
        .and(query_param("dub", "true"))
        .and(query_param("fetchFiller", "true"))
        .and(query_param("provider", "zoro"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&upstream)
        .await;
    let base = start_test_server(&upstream).await;

    let (status, _) = get(format!(
        "{base}/meta/anilist/episodes/21?dub=1&fetchFiller=true&provider=Zoro"
    ))
    .await;
    assert_eq!(status, 200);
}
