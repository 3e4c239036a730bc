//! Distributed tracing export.
//!
//! Handler spans are created with the `tracing` crate; when OTLP export is
//! enabled they are bridged to OpenTelemetry and shipped to the collector in
//! batches.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};
use opentelemetry_sdk::Resource;
use std::time::Duration;

use crate::config::ObservabilityConfig;
use crate::observability::ObservabilityError;

/// Build a tracer provider exporting to the configured OTLP endpoint.
///
/// Returns `Ok(None)` when export is disabled.
pub fn init_tracer_provider(
    config: &ObservabilityConfig,
) -> Result<Option<SdkTracerProvider>, ObservabilityError> {
    if !config.otlp_enabled {
        return Ok(None);
    }

    let exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.clone())
        .with_timeout(Duration::from_secs(5))
        .build()?;

    let resource = Resource::builder()
        .with_service_name(config.service_name.clone())
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build();

    opentelemetry::global::set_tracer_provider(provider.clone());
    Ok(Some(provider))
}

/// Tracer used by the `tracing-opentelemetry` layer.
pub fn tracer(provider: &SdkTracerProvider, config: &ObservabilityConfig) -> SdkTracer {
    provider.tracer(config.service_name.clone())
}

/// Flush pending spans and stop the exporter.
pub fn shutdown_tracer_provider(provider: SdkTracerProvider) {
    if let Err(e) = provider.shutdown() {
        tracing::warn!(error = %e, "Failed to flush trace exporter");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_export_builds_nothing() {
        let config = ObservabilityConfig::default();
        assert!(init_tracer_provider(&config).unwrap().is_none());
    }
}
