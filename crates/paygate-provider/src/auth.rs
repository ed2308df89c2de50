//! OAuth2 client-credentials token handling.
//!
//! Every REST call carries a bearer token minted from the client id and
//! secret. Tokens are cached until shortly before their advertised expiry;
//! the lock is only held for the read or the write, never across a request.

use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::Deserialize;
use zeroize::Zeroizing;

/// Refresh this long before the provider's stated expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Token endpoint path, relative to the REST base URL.
pub(crate) const TOKEN_PATH: [&str; 3] = ["v1", "oauth2", "token"];

/// Token endpoint response. Extra fields (`scope`, `app_id`, `nonce`) are ignored.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: Zeroizing<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenResponse {
    /// `Authorization` header value, e.g. `Bearer A21AA...`.
    pub fn header_value(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("{} {}", self.token_type, self.access_token.as_str()))
    }
}

struct CachedToken {
    access_token: Zeroizing<String>,
    refresh_at: Instant,
}

/// Process-wide access token cache.
#[derive(Default)]
pub(crate) struct TokenCache {
    slot: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    /// Return the cached access token if it is still fresh.
    pub fn get(&self) -> Option<Zeroizing<String>> {
        let slot = self.slot.read();
        slot.as_ref()
            .filter(|cached| Instant::now() < cached.refresh_at)
            .map(|cached| cached.access_token.clone())
    }

    /// Cache `token` until its refresh instant. A lifetime too large to
    /// represent as an `Instant` leaves the cache empty.
    pub fn store(&self, token: &TokenResponse) {
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        let Some(refresh_at) = Instant::now().checked_add(lifetime) else {
            tracing::debug!(expires_in = token.expires_in, "token lifetime out of range; not cached");
            self.clear();
            return;
        };
        *self.slot.write() = Some(CachedToken {
            access_token: token.access_token.clone(),
            refresh_at,
        });
    }

    pub fn clear(&self) {
        *self.slot.write() = None;
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("cached", &self.slot.read().is_some())
            .finish()
    }
}
