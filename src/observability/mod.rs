//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handlers produce:
//!     → logging.rs (log lines to stdout and the log file)
//!     → metrics.rs (counters, gauges, histograms)
//!     → otel.rs (handler spans exported over OTLP)
//!
//! Consumers:
//!     → Log file (app.log)
//!     → Metrics endpoint (Prometheus scrape of /metrics)
//!     → Trace collector (optional, e.g. Tempo)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the HTTP trace span
//! - Metrics are cheap (atomic increments)
//! - Span export is off by default; local spans still drive log context

pub mod logging;
pub mod metrics;
pub mod otel;

use opentelemetry_sdk::trace::SdkTracerProvider;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;

/// Errors raised while initializing observability.
#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("failed to prepare log directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("failed to open log file: {0}")]
    LogFile(#[from] tracing_appender::rolling::InitError),

    #[error("failed to build OTLP exporter: {0}")]
    OtlpExporter(#[from] opentelemetry_otlp::ExporterBuildError),

    #[error("failed to initialize tracing subscriber: {0}")]
    TracingSubscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Keeps the log writer and span exporter alive.
pub struct ObservabilityGuard {
    _log_guard: WorkerGuard,
    tracer_provider: Option<SdkTracerProvider>,
}

impl ObservabilityGuard {
    /// Flush exported spans. Buffered log lines are flushed when the guard drops.
    pub fn shutdown(self) {
        if let Some(provider) = self.tracer_provider {
            otel::shutdown_tracer_provider(provider);
        }
    }
}

/// Install the global subscriber: stdout, log file and optional OTLP export.
pub fn init(config: &ObservabilityConfig) -> Result<ObservabilityGuard, ObservabilityError> {
    let filter = logging::env_filter(config)?;
    let (file_writer, log_guard) = logging::file_writer(config)?;
    let tracer_provider = otel::init_tracer_provider(config)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(
            tracer_provider
                .as_ref()
                .map(|provider| tracing_opentelemetry::layer().with_tracer(otel::tracer(provider, config))),
        )
        .try_init()?;

    tracing::info!(
        log_file = %std::path::Path::new(&config.log_dir).join(&config.log_file).display(),
        otlp_enabled = config.otlp_enabled,
        "Observability initialized"
    );

    Ok(ObservabilityGuard {
        _log_guard: log_guard,
        tracer_provider,
    })
}
