//! # API Error Types
//!
//! Errors that abort a request instead of becoming a rendered failure page.
//! A provider call that fails is *not* one of these: it is shown to the
//! user on the operation's own page. `AppError` covers the rest (template
//! failures, malformed form bodies, provider replies the gateway cannot
//! act on) and renders a JSON error body that never carries internal
//! details.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Form or query string could not be decoded (422).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),

    /// The provider answered 2xx with a body the gateway cannot use (502).
    #[error("malformed provider response: {0}")]
    MalformedProviderResponse(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::MalformedProviderResponse(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        }
    }

    /// Construct a malformed-provider-response error (502 Bad Gateway).
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedProviderResponse(msg.into())
    }

    /// Construct an internal error (500).
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal/upstream error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::MalformedProviderResponse(_) => {
                "An upstream service error occurred".to_string()
            }
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::MalformedProviderResponse(_) => {
                tracing::error!(error = %self, "unusable provider response")
            }
            _ => {}
        }

        // Form and query rejections carry axum's reason for the 422.
        let details = match &self {
            Self::Validation(reason) | Self::BadRequest(reason) => {
                Some(serde_json::json!({ "reason": reason }))
            }
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<tera::Error> for AppError {
    fn from(err: tera::Error) -> Self {
        Self::Internal(format!("template rendering failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_status_code() {
        let err = AppError::NotFound("/nope".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn validation_status_code() {
        let err = AppError::Validation("bad field".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn bad_request_status_code() {
        let err = AppError::BadRequest("unsupported content type".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "BAD_REQUEST");
    }

    #[test]
    fn internal_status_code() {
        let err = AppError::Internal("template missing".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
    }

    #[test]
    fn malformed_provider_response_status_code() {
        let err = AppError::malformed("agreement has no links");
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "UPSTREAM_ERROR");
    }

    #[test]
    fn tera_error_converts_to_internal() {
        let err = AppError::from(tera::Error::msg("boom"));
        assert!(matches!(err, AppError::Internal(_)));
    }

    // ── into_response tests ──────────────────────────────────────

    use http_body_util::BodyExt;

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_bad_request_keeps_message() {
        let (status, body) = response_parts(AppError::BadRequest("missing body".into())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error.code, "BAD_REQUEST");
        assert!(body.error.message.contains("missing body"));
        assert_eq!(body.error.details.unwrap()["reason"], "missing body");
    }

    #[tokio::test]
    async fn into_response_validation_carries_reason() {
        let (status, body) =
            response_parts(AppError::Validation("invalid digit found in string".into())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body.error.details,
            Some(serde_json::json!({"reason": "invalid digit found in string"}))
        );
    }

    #[tokio::test]
    async fn into_response_not_found_has_no_details() {
        let (_, body) = response_parts(AppError::NotFound("/nope".into())).await;
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let (status, body) =
            response_parts(AppError::Internal("failed to render plan.html".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.message, "An internal error occurred");
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn into_response_malformed_hides_details() {
        let (status, body) =
            response_parts(AppError::malformed("links[0].href missing in I-123")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.error.code, "UPSTREAM_ERROR");
        assert!(!body.error.message.contains("I-123"));
    }
}
