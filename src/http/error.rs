//! API error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::CatalogError;

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// An error ready to be sent to the client.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code: code.to_string(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.body.details = Some(details);
        self
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
            CatalogError::Validation { missing } => {
                Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
                    .with_details(serde_json::json!({ "missing_fields": missing }))
            }
            CatalogError::InvalidBody(_) => Self::new(StatusCode::BAD_REQUEST, "INVALID_BODY", message),
            CatalogError::InjectedFailure => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INJECTED_FAILURE", message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError::from(CatalogError::NotFound("abc".into()));
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.body.message, "Song not found: abc");

        let injected = ApiError::from(CatalogError::InjectedFailure);
        assert_eq!(injected.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(injected.body.code, "INJECTED_FAILURE");
    }

    #[test]
    fn test_validation_lists_missing_fields() {
        let err = ApiError::from(CatalogError::Validation {
            missing: vec!["genre", "year"],
        });
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let json = serde_json::to_value(&err.body).unwrap();
        assert_eq!(json["details"]["missing_fields"], serde_json::json!(["genre", "year"]));
    }
}
