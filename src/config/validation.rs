//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and formats.
//! All problems are collected, not just the first one.

use thiserror::Error;
use url::Url;

use crate::config::schema::CatalogConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("listener.bind_address must not be empty")]
    EmptyBindAddress,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("fault_injection.error_probability must be within 0.0..=1.0, got {0}")]
    ProbabilityOutOfRange(f64),

    #[error("fault_injection.min_delay_ms ({min}) exceeds max_delay_ms ({max})")]
    InvertedDelayRange { min: u64, max: u64 },

    #[error("observability.otlp_endpoint is not a valid URL: {0}")]
    InvalidOtlpEndpoint(String),

    #[error("observability.log_file must not be empty")]
    EmptyLogFile,

    #[error("docs.path must start with '/', got {0:?}")]
    InvalidDocsPath(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &CatalogConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let faults = &config.fault_injection;
    if !(0.0..=1.0).contains(&faults.error_probability) {
        errors.push(ValidationError::ProbabilityOutOfRange(faults.error_probability));
    }
    if faults.min_delay_ms > faults.max_delay_ms {
        errors.push(ValidationError::InvertedDelayRange {
            min: faults.min_delay_ms,
            max: faults.max_delay_ms,
        });
    }

    let observability = &config.observability;
    if observability.otlp_enabled {
        if let Err(e) = Url::parse(&observability.otlp_endpoint) {
            errors.push(ValidationError::InvalidOtlpEndpoint(e.to_string()));
        }
    }
    if observability.log_file.trim().is_empty() {
        errors.push(ValidationError::EmptyLogFile);
    }

    if config.docs.enabled && !config.docs.path.starts_with('/') {
        errors.push(ValidationError::InvalidDocsPath(config.docs.path.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&CatalogConfig::default()), Ok(()));
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = CatalogConfig::default();
        config.fault_injection.error_probability = 1.5;
        config.fault_injection.min_delay_ms = 900;
        config.fault_injection.max_delay_ms = 100;
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
        assert!(errors.contains(&ValidationError::ProbabilityOutOfRange(1.5)));
        assert!(errors.contains(&ValidationError::InvertedDelayRange { min: 900, max: 100 }));
    }

    #[test]
    fn test_otlp_endpoint_checked_only_when_enabled() {
        let mut config = CatalogConfig::default();
        config.observability.otlp_endpoint = "not a url".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.otlp_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidOtlpEndpoint(_)));
    }

    #[test]
    fn test_docs_path_must_be_absolute() {
        let mut config = CatalogConfig::default();
        config.docs.path = "swaggerui".to_string();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidDocsPath("swaggerui".to_string())])
        );
    }
}
