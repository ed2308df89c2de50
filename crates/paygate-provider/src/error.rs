//! Provider client error types.

use serde_json::{json, Value};

/// Errors from payment provider calls.
///
/// The gateway does not classify these: whatever the variant, the handler
/// shows [`ProviderError::payload`] to the user as the failed call's result.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP transport error (connect, timeout, TLS).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Provider returned a non-2xx status.
    #[error("provider {endpoint} returned {status}")]
    Api {
        endpoint: String,
        status: u16,
        /// Parsed JSON error body, or the raw text as a JSON string.
        body: Value,
    },
    /// The OAuth2 token endpoint refused the client credentials.
    #[error("access token request returned {status}")]
    Auth { status: u16, body: Value },
    /// A 2xx response body was not valid JSON.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: serde_json::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl ProviderError {
    /// The opaque error object rendered back to the user.
    ///
    /// HTTP-level failures carry the provider's status and body untouched:
    /// `{"httpStatusCode": 400, "response": {...}}`. Everything else is a
    /// `{"name", "message"}` pair.
    pub fn payload(&self) -> Value {
        match self {
            Self::Api { status, body, .. } | Self::Auth { status, body } => json!({
                "httpStatusCode": status,
                "response": body,
            }),
            Self::Http { .. } => named("HTTP_ERROR", self),
            Self::Deserialization { .. } => named("DESERIALIZATION_ERROR", self),
            Self::Config(_) => named("CONFIGURATION_ERROR", self),
        }
    }

    /// HTTP status returned by the provider, if the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Auth { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn named(name: &str, err: &ProviderError) -> Value {
    json!({ "name": name, "message": err.to_string() })
}

/// Parse an error body as JSON, falling back to the raw text.
pub(crate) fn body_value(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
