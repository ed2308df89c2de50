//! # Index, Credential Check & Approval Callbacks
//!
//! | Method | Path                              | Provider call |
//! |--------|-----------------------------------|---------------|
//! | GET    | `/`                               | none |
//! | GET    | `/subscriptions/`                 | `generate_token` |
//! | GET    | `/subscriptions/callback/success` | none (echo `token`) |
//! | GET    | `/subscriptions/callback/cancel`  | none (echo `token`) |

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::render::{Page, View};
use crate::state::AppState;

/// Query the provider appends when redirecting the payer back.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub token: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/subscriptions", get(token_check))
        .route("/subscriptions/", get(token_check))
        .route("/subscriptions/callback/success", get(callback_success))
        .route("/subscriptions/callback/cancel", get(callback_cancel))
}

/// GET /
async fn index(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    state.renderer.respond(&headers, View::awaiting(Page::Index))
}

/// GET /subscriptions/: mint a token to prove the credentials work.
async fn token_check(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let result = state.provider.generate_token().await;
    let view = View::from_result(Page::TokenCheck, result)?;
    state.renderer.respond(&headers, view)
}

/// GET /subscriptions/callback/success?token=
async fn callback_success(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Response, AppError> {
    callback(&state, &headers, Page::CallbackSuccess, params)
}

/// GET /subscriptions/callback/cancel?token=
async fn callback_cancel(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Response, AppError> {
    callback(&state, &headers, Page::CallbackCancel, params)
}

fn callback(
    state: &AppState,
    headers: &HeaderMap,
    page: Page,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let token = extract_query(params)?.token.unwrap_or_default();
    let view = View::awaiting(page).with_extra("token", token);
    state.renderer.respond(headers, view)
}
