//! Fault injection middleware.
//!
//! Delays requests by a random amount and fails a share of them, so that
//! latency and error paths show up in traces and dashboards. Settings can be
//! swapped at runtime without rebuilding the router.

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::Span;

use crate::catalog::CatalogError;
use crate::config::FaultInjectionConfig;
use crate::http::error::ApiError;
use crate::observability::metrics;

/// What to do to a single request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fault {
    pub delay: Duration,
    pub fail: bool,
}

/// Shared, hot-swappable fault injection settings.
#[derive(Clone)]
pub struct FaultInjector {
    settings: Arc<ArcSwap<FaultInjectionConfig>>,
}

impl FaultInjector {
    pub fn new(config: FaultInjectionConfig) -> Self {
        Self {
            settings: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// Replace the settings for all subsequent requests.
    pub fn update(&self, config: FaultInjectionConfig) {
        tracing::info!(
            enabled = config.enabled,
            error_probability = config.error_probability,
            min_delay_ms = config.min_delay_ms,
            max_delay_ms = config.max_delay_ms,
            "Fault injection settings updated"
        );
        self.settings.store(Arc::new(config));
    }

    pub fn settings(&self) -> Arc<FaultInjectionConfig> {
        self.settings.load_full()
    }

    /// Draw the fault for one request, or `None` when injection is disabled.
    pub fn plan(&self) -> Option<Fault> {
        let settings = self.settings.load();
        if !settings.enabled {
            return None;
        }

        let mut rng = rand::thread_rng();
        let min = settings.min_delay_ms;
        let max = settings.max_delay_ms.max(min);
        let delay = Duration::from_millis(rng.gen_range(min..=max));
        let fail = rng.gen_bool(settings.error_probability.clamp(0.0, 1.0));

        Some(Fault { delay, fail })
    }
}

/// Middleware applying [`FaultInjector::plan`] before the wrapped handler.
///
/// The delay and an injected failure are recorded on the enclosing span
/// (`delay_ms`, `otel.status_code`, `otel.status_description`), which for
/// the list route is the handler's own span.
pub async fn inject_faults(
    State(injector): State<FaultInjector>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(fault) = injector.plan() else {
        return next.run(request).await;
    };

    let span = Span::current();
    span.record("delay_ms", fault.delay.as_millis() as u64);

    // Async sleep: other requests keep running while this one waits
    tokio::time::sleep(fault.delay).await;

    if fault.fail {
        let err = CatalogError::InjectedFailure;
        let endpoint = request.uri().path().to_string();
        span.record("otel.status_code", "ERROR");
        span.record("otel.status_description", err.to_string().as_str());
        tracing::warn!(endpoint = %endpoint, "Injected failure");
        metrics::record_injected_failure(&endpoint);
        return ApiError::from(err).into_response();
    }

    next.run(request).await
}
