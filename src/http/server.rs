//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the song routes, `/metrics` and Swagger UI
//! - Wire up middleware (request ID, tracing, timeout, body limit, CORS, metrics)
//! - Apply fault injection to the list route only, inside its `get_songs` span
//! - Apply live configuration updates
//! - Serve until the shutdown signal fires

use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    http::{header, StatusCode},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::catalog::{InMemorySongStore, SongRepository};
use crate::config::CatalogConfig;
use crate::http::docs;
use crate::http::handlers;
use crate::http::middleware::{inject_faults, track_http_metrics, FaultInjector};
use crate::http::request::make_request_span;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub songs: Arc<dyn SongRepository>,
    pub fault_injector: FaultInjector,
}

/// HTTP server for the song catalog.
pub struct HttpServer {
    router: Router,
    config: CatalogConfig,
    fault_injector: FaultInjector,
}

impl HttpServer {
    /// Create a server backed by a fresh in-memory store.
    pub fn new(config: CatalogConfig) -> Self {
        Self::with_repository(config, Arc::new(InMemorySongStore::new()))
    }

    /// Create a server backed by the given repository.
    pub fn with_repository(config: CatalogConfig, songs: Arc<dyn SongRepository>) -> Self {
        let fault_injector = FaultInjector::new(config.fault_injection.clone());

        let state = AppState {
            songs,
            fault_injector: fault_injector.clone(),
        };

        let router = build_router(&config, state);
        Self {
            router,
            config,
            fault_injector,
        }
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn fault_injector(&self) -> &FaultInjector {
        &self.fault_injector
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configuration updates received on `config_updates` are applied while
    /// serving; the server drains and returns once `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<CatalogConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let injector = self.fault_injector.clone();
        let mut current = self.config.clone();
        let reload_task = tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                apply_config_update(&injector, &current, &new_config);
                current = new_config;
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reload_task.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(config: &CatalogConfig, state: AppState) -> Router {
    let faults = middleware::from_fn_with_state(state.fault_injector.clone(), inject_faults);
    let list_span = middleware::from_fn(handlers::get_songs_span);

    let mut router = Router::new()
        .route(
            "/songs",
            get(handlers::list_songs.layer(faults).layer(list_span)).post(handlers::create_song),
        )
        .route(
            "/songs/{id}",
            get(handlers::get_song)
                .put(handlers::update_song)
                .delete(handlers::delete_song),
        )
        .with_state(state);

    if config.observability.metrics_enabled {
        let handle = metrics::init_metrics();
        router = router.route(
            "/metrics",
            get(move || {
                let handle = handle.clone();
                async move {
                    (
                        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
                        handle.render(),
                    )
                }
            }),
        );
    }

    router = router.route_layer(middleware::from_fn(track_http_metrics));

    if config.docs.enabled {
        router = router.merge(docs::swagger_ui(&config.docs));
    }

    if config.security.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    router
        .layer(DefaultBodyLimit::max(config.security.max_body_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.timeouts.request_secs),
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Apply a reloaded configuration to the running server.
fn apply_config_update(injector: &FaultInjector, current: &CatalogConfig, new: &CatalogConfig) {
    if new.fault_injection != current.fault_injection {
        injector.update(new.fault_injection.clone());
    }

    let restart_needed = new.listener != current.listener
        || new.timeouts != current.timeouts
        || new.security != current.security
        || new.observability != current.observability
        || new.docs != current.docs;
    if restart_needed {
        tracing::warn!("Configuration changes outside [fault_injection] take effect after a restart");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FaultInjectionConfig;

    #[test]
    fn test_config_update_swaps_fault_injection() {
        let current = CatalogConfig::default();
        let injector = FaultInjector::new(current.fault_injection.clone());

        let mut new = current.clone();
        new.fault_injection = FaultInjectionConfig {
            enabled: true,
            error_probability: 1.0,
            min_delay_ms: 0,
            max_delay_ms: 0,
        };
        apply_config_update(&injector, &current, &new);

        assert_eq!(*injector.settings(), new.fault_injection);
    }
}
