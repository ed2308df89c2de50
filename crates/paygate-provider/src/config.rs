//! Provider client configuration.
//!
//! Read once at startup and never mutated. Defaults target the PayPal
//! sandbox with empty credentials, so a fresh checkout starts without any
//! environment and fails only when a call is actually dispatched.

use std::str::FromStr;

use url::Url;
use zeroize::Zeroizing;

/// Sandbox REST endpoint.
pub const SANDBOX_BASE_URL: &str = "https://api.sandbox.paypal.com";

/// Live REST endpoint.
pub const LIVE_BASE_URL: &str = "https://api.paypal.com";

/// Which PayPal environment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderMode {
    #[default]
    Sandbox,
    Live,
}

impl ProviderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Live => "live",
        }
    }

    /// Default REST base URL for this mode.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_BASE_URL,
            Self::Live => LIVE_BASE_URL,
        }
    }
}

impl std::fmt::Display for ProviderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "live" => Ok(Self::Live),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

/// Configuration for connecting to the payment provider.
///
/// Custom `Debug` implementation redacts `client_secret`.
#[derive(Clone)]
pub struct ProviderConfig {
    pub mode: ProviderMode,
    /// OAuth2 client id.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: Zeroizing<String>,
    /// REST base URL. Normally derived from `mode`.
    pub base_url: Url,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("mode", &self.mode)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Build a configuration for `mode` using that mode's default base URL.
    pub fn new(
        mode: ProviderMode,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            mode,
            client_id: client_id.into(),
            client_secret: Zeroizing::new(client_secret.into()),
            base_url: parse_url("base_url", mode.base_url())?,
            timeout_secs: 30,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PAYPAL_MODE` (default: `sandbox`; `sandbox` or `live`)
    /// - `PAYPAL_CLIENT_ID` (default: empty)
    /// - `PAYPAL_CLIENT_SECRET` (default: empty)
    /// - `PAYPAL_API_BASE_URL` (default: derived from the mode)
    /// - `PAYPAL_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mode = match std::env::var("PAYPAL_MODE") {
            Ok(raw) if !raw.is_empty() => raw.parse()?,
            _ => ProviderMode::default(),
        };
        let mut config = Self::new(
            mode,
            std::env::var("PAYPAL_CLIENT_ID").unwrap_or_default(),
            std::env::var("PAYPAL_CLIENT_SECRET").unwrap_or_default(),
        )?;

        if let Ok(raw) = std::env::var("PAYPAL_API_BASE_URL") {
            if !raw.is_empty() {
                config.base_url = parse_url("PAYPAL_API_BASE_URL", &raw)?;
            }
        }
        config.timeout_secs = std::env::var("PAYPAL_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(config)
    }

    /// Point the client at a different REST root (mock servers, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_url("base_url", base_url)?;
        Ok(self)
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Whether both OAuth2 credentials are present.
    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    let url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(
            var.to_string(),
            "URL cannot be used as a base".to_string(),
        ));
    }
    Ok(url)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PAYPAL_MODE must be `sandbox` or `live`, got `{0}`")]
    InvalidMode(String),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
