//! Failure injection tests for the list route.

use axum::http::{Method, StatusCode};
use serde_json::json;
use std::time::{Duration, Instant};

use song_catalog::config::FaultInjectionConfig;
use song_catalog::http::HttpServer;
use song_catalog_client::SongInput;

mod common;

#[tokio::test]
async fn test_list_always_fails_at_probability_one() {
    let app = HttpServer::new(common::faulty_config(1.0)).router();

    for _ in 0..10 {
        let (status, body) = common::send(&app, Method::GET, "/songs", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "INJECTED_FAILURE");
        assert_eq!(body["message"], "Randomly triggered error for tracing");
    }
}

#[tokio::test]
async fn test_list_never_fails_at_probability_zero() {
    let app = HttpServer::new(common::faulty_config(0.0)).router();

    for _ in 0..10 {
        let (status, _) = common::send(&app, Method::GET, "/songs", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_other_routes_are_never_faulted() {
    let app = HttpServer::new(common::faulty_config(1.0)).router();

    let (status, created) = common::send(&app, Method::POST, "/songs", Some(json!({"title": "Safe"}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/songs/{}", created["id"].as_str().unwrap());
    let (status, _) = common::send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = common::send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_delay_does_not_block_other_requests() {
    let mut config = common::test_config();
    config.fault_injection = FaultInjectionConfig {
        enabled: true,
        error_probability: 0.0,
        min_delay_ms: 400,
        max_delay_ms: 400,
    };
    let server = common::start_server(config).await;
    let client = server.client();

    let slow_client = server.client();
    let started = Instant::now();
    let slow = tokio::spawn(async move { slow_client.list_songs().await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    let song = client.create_song(&SongInput::default()).await.expect("create failed");
    assert!(started.elapsed() < Duration::from_millis(400), "create waited for the delayed list");

    let listed = slow.await.unwrap().expect("list failed");
    assert!(started.elapsed() >= Duration::from_millis(400));
    assert!(listed.iter().any(|s| s.id == song.id));
}

#[tokio::test]
async fn test_hot_reload_toggles_injection() {
    let server = common::start_server(common::test_config()).await;
    let client = server.client();

    assert!(client.list_songs().await.is_ok());

    let mut faulty = common::test_config();
    faulty.fault_injection = FaultInjectionConfig {
        enabled: true,
        error_probability: 1.0,
        min_delay_ms: 0,
        max_delay_ms: 0,
    };
    server.config_updates.send(faulty).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let err = client.list_songs().await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));

    server.config_updates.send(common::test_config()).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(client.list_songs().await.is_ok());
}

#[tokio::test]
async fn test_delay_past_request_timeout_is_408() {
    let mut config = common::test_config();
    config.timeouts.request_secs = 1;
    config.fault_injection = FaultInjectionConfig {
        enabled: true,
        error_probability: 0.0,
        min_delay_ms: 1500,
        max_delay_ms: 1500,
    };
    let app = HttpServer::new(config).router();

    let (status, _) = common::send(&app, Method::GET, "/songs", None).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
}
