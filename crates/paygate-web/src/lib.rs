//! # paygate-web: Form-to-API Gateway
//!
//! Serves HTML pages whose forms are translated one-to-one into PayPal
//! REST calls. The provider's reply (or error) is rendered back on the
//! same page, pretty-printed.
//!
//! ## API Surface
//!
//! | Prefix                       | Module                 |
//! |------------------------------|------------------------|
//! | `/invoices/*`                | [`routes::invoices`]   |
//! | `/subscriptions/plan*`       | [`routes::plans`]      |
//! | `/subscriptions/agreement*`  | [`routes::agreements`] |
//! | `/`, `/subscriptions/`, `/subscriptions/callback/*` | [`routes::pages`] |
//! | `/health/*`                  | probes                 |
//!
//! Send `Accept: application/json` to receive the page's view-model as
//! JSON instead of HTML.

pub mod error;
pub mod extractors;
pub mod render;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::Uri;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let pages = Router::new()
        .merge(routes::pages::router())
        .merge(routes::invoices::router())
        .merge(routes::plans::router())
        .merge(routes::agreements::router())
        .layer(DefaultBodyLimit::max(64 * 1024));

    Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(pages)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe: always `ok` while the process serves requests.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: reports the provider implementation and environment.
async fn readiness(State(state): State<AppState>) -> String {
    format!(
        "ready ({} {})",
        state.provider.provider_name(),
        state.mode
    )
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
