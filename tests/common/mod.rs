//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::ServiceExt;

use song_catalog::config::{CatalogConfig, FaultInjectionConfig};
use song_catalog::http::HttpServer;
use song_catalog::lifecycle::Shutdown;
use song_catalog_client::CatalogClient;

/// Defaults with fault injection off.
pub fn test_config() -> CatalogConfig {
    let mut config = CatalogConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.fault_injection.enabled = false;
    config
}

/// Fault injection on every list request, with no delay.
pub fn faulty_config(error_probability: f64) -> CatalogConfig {
    let mut config = test_config();
    config.fault_injection = FaultInjectionConfig {
        enabled: true,
        error_probability,
        min_delay_ms: 0,
        max_delay_ms: 0,
    };
    config
}

/// Send one request through the router and decode the JSON body (Null if empty).
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    match body {
        Some(json) => send_raw(router, method, uri, &json.to_string()).await,
        None => dispatch(router, Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()).await,
    }
}

/// Send a body exactly as given, labelled as JSON.
pub async fn send_raw(router: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    dispatch(router, request).await
}

async fn dispatch(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

/// A server running on an ephemeral port.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<CatalogConfig>,
}

impl RunningServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// SDK client talking to this server directly, bypassing any HTTP proxy.
    pub fn client(&self) -> CatalogClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        CatalogClient::with_client(http, &self.url())
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server in the background and wait until it accepts connections.
pub async fn start_server(config: CatalogConfig) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config);

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningServer {
        addr,
        shutdown,
        config_updates,
    }
}
