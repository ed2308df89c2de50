//! Authenticated HTTP transport shared by the resource clients.
//!
//! Owns the `reqwest::Client`, the REST base URL, the OAuth2 credentials
//! and the token cache. Resource clients build a URL and a body; this
//! module turns that into exactly one request and one `Result`.
//!
//! No retries: a transport failure or non-2xx response is returned to the
//! caller as-is.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;
use zeroize::Zeroizing;

use crate::auth::{TokenCache, TokenResponse, TOKEN_PATH};
use crate::config::{ConfigError, ProviderConfig};
use crate::error::{body_value, ProviderError};

#[derive(Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: Url,
    client_id: Arc<str>,
    client_secret: Arc<Zeroizing<String>>,
    tokens: Arc<TokenCache>,
}

impl Transport {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            client_id: Arc::from(config.client_id.as_str()),
            client_secret: Arc::new(config.client_secret.clone()),
            tokens: Arc::new(TokenCache::default()),
        })
    }

    /// Append percent-encoded path segments to the base URL.
    ///
    /// Identifiers typed into a form are passed as single segments, so a
    /// `/` or `?` inside an id cannot change which resource is addressed.
    pub fn url(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ConfigError::InvalidUrl(
                    "base_url".to_string(),
                    "URL cannot be used as a base".to_string(),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Mint a fresh access token and cache it.
    pub async fn fetch_token(&self) -> Result<TokenResponse, ProviderError> {
        let endpoint = "POST /v1/oauth2/token";
        let url = self.url(&TOKEN_PATH)?;
        tracing::debug!(endpoint, "requesting access token");

        let resp = self
            .http
            .post(url)
            .basic_auth(self.client_id.as_ref(), Some(self.client_secret.as_str()))
            .header(ACCEPT, "application/json")
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| http_error(endpoint, e))?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|e| http_error(endpoint, e))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "access token request rejected");
            return Err(ProviderError::Auth {
                status: status.as_u16(),
                body: body_value(&bytes),
            });
        }

        let token: TokenResponse =
            serde_json::from_slice(&bytes).map_err(|e| ProviderError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })?;
        self.tokens.store(&token);
        Ok(token)
    }

    async fn bearer(&self) -> Result<Zeroizing<String>, ProviderError> {
        if let Some(token) = self.tokens.get() {
            return Ok(token);
        }
        Ok(self.fetch_token().await?.access_token)
    }

    /// Send one authenticated request and decode the JSON response.
    ///
    /// An empty 2xx body (the provider answers several state changes with
    /// `204 No Content`) decodes to `{}`.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Value, ProviderError> {
        let token = self.bearer().await?;
        tracing::debug!(endpoint, "dispatching provider call");

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(token.as_str())
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await.map_err(|e| http_error(endpoint, e))?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|e| http_error(endpoint, e))?;

        if status == StatusCode::UNAUTHORIZED {
            // Revoked or rotated credentials: the next call mints a new token.
            self.tokens.clear();
        }

        if !status.is_success() {
            tracing::warn!(endpoint, status = status.as_u16(), "provider call failed");
            return Err(ProviderError::Api {
                endpoint: endpoint.into(),
                status: status.as_u16(),
                body: body_value(&bytes),
            });
        }

        if bytes.is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        serde_json::from_slice(&bytes).map_err(|e| ProviderError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })
    }

    pub async fn get(&self, url: Url, endpoint: &str) -> Result<Value, ProviderError> {
        self.send::<()>(Method::GET, url, endpoint, None).await
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("tokens", &self.tokens)
            .finish()
    }
}

fn http_error(endpoint: &str, source: reqwest::Error) -> ProviderError {
    ProviderError::Http {
        endpoint: endpoint.into(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderMode;

    fn transport(base: &str) -> Transport {
        let config = ProviderConfig::new(ProviderMode::Sandbox, "id", "secret")
            .unwrap()
            .with_base_url(base)
            .unwrap();
        Transport::new(&config).unwrap()
    }

    #[test]
    fn url_appends_segments() {
        let t = transport("https://api.sandbox.paypal.com");
        let url = t.url(&["v1", "payments", "billing-plans"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.sandbox.paypal.com/v1/payments/billing-plans"
        );
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let t = transport("http://127.0.0.1:8080/paypal/");
        let url = t.url(&["v1", "oauth2", "token"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/paypal/v1/oauth2/token");
    }

    #[test]
    fn url_encodes_identifier_segments() {
        let t = transport("https://api.sandbox.paypal.com");
        let url = t
            .url(&["v1", "payments", "billing-plans", "P-1/../x?y"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.sandbox.paypal.com/v1/payments/billing-plans/P-1%2F..%2Fx%3Fy"
        );
    }
}
