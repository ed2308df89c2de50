//! # Billing Agreement Endpoints
//!
//! | Method   | Path                                     | Provider call |
//! |----------|------------------------------------------|---------------|
//! | GET      | `/subscriptions/agreement`               | none (input form) |
//! | POST     | `/subscriptions/agreement`               | `create_agreement` |
//! | GET      | `/subscriptions/agreement/detail`        | `get_agreement` when `id` is present |
//! | GET      | `/subscriptions/agreement/transactions`  | `search_agreement_transactions` when `id`, `startDate`, `endDate` are present |
//! | GET/POST | `/subscriptions/agreement_execution`     | `execute_agreement` (POST) |
//! | GET/POST | `/subscriptions/agreement_cancellation`  | `cancel_agreement` (POST) |
//! | GET/POST | `/subscriptions/agreement_suspend`       | `suspend_agreement` (POST) |
//!
//! A created agreement must come back with an approval link in
//! `links[0].href`; the payer is sent there and returns through
//! `/subscriptions/callback/*`.

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use paygate_core::{default_agreement_start, default_search_range, empty_as_none};
use paygate_provider::agreements::{Payer, PlanReference};
use paygate_provider::{approval_href, AgreementStateNote, BillingAgreementRequest, TransactionSearch};
use serde::Deserialize;

use crate::error::AppError;
use crate::extractors::{extract_form, extract_query};
use crate::render::{Page, View};
use crate::state::AppState;

/// Note sent when the cancellation form leaves it blank.
pub const DEFAULT_CANCEL_NOTE: &str = "Manually canceled.";

/// Note sent when the suspension form leaves it blank.
pub const DEFAULT_SUSPEND_NOTE: &str = "Manually suspended.";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub plan_id: Option<String>,
}

impl AgreementForm {
    /// Build the request, using `start_date` for the start instant.
    pub fn to_request(&self, start_date: &str) -> BillingAgreementRequest {
        BillingAgreementRequest {
            name: self.name.clone(),
            description: self.description.clone(),
            start_date: Some(start_date.to_string()),
            payer: Payer {
                payment_method: self.payment_method.clone(),
            },
            plan: PlanReference {
                id: self.plan_id.clone(),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AgreementLookup {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExecutionForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub token: Option<String>,
}

/// Cancellation and suspension form.
#[derive(Debug, Default, Deserialize)]
pub struct StateChangeForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub note: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/subscriptions/agreement",
            get(create_form).post(create_agreement),
        )
        .route("/subscriptions/agreement/detail", get(agreement_detail))
        .route(
            "/subscriptions/agreement/transactions",
            get(agreement_transactions),
        )
        .route(
            "/subscriptions/agreement_execution",
            get(execution_form).post(execute_agreement),
        )
        .route(
            "/subscriptions/agreement_cancellation",
            get(cancellation_form).post(cancel_agreement),
        )
        .route(
            "/subscriptions/agreement_suspend",
            get(suspend_form).post(suspend_agreement),
        )
}

/// GET /subscriptions/agreement: start date pre-filled one minute ahead.
async fn create_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let start = default_agreement_start(Utc::now());
    let view = View::awaiting(Page::AgreementCreate).with_input("startDate", Some(&start));
    state.renderer.respond(&headers, view)
}

/// POST /subscriptions/agreement
async fn create_agreement(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Form<AgreementForm>, FormRejection>,
) -> Result<Response, AppError> {
    let form = extract_form(body)?;
    let start = form
        .start_date
        .clone()
        .unwrap_or_else(|| default_agreement_start(Utc::now()));
    let req = form.to_request(&start);

    let result = state.provider.create_agreement(&req).await;
    let mut view = View::from_result(Page::AgreementCreate, result)?
        .with_input("startDate", Some(&start))
        .with_input("name", form.name.as_deref())
        .with_input("description", form.description.as_deref())
        .with_input("paymentMethod", form.payment_method.as_deref())
        .with_input("planId", form.plan_id.as_deref());

    let redirect_url = match &view.result {
        Some(created) => Some(
            approval_href(created)
                .ok_or_else(|| AppError::malformed("created agreement has no links[0].href"))?
                .to_string(),
        ),
        None => None,
    };
    if let Some(redirect_url) = redirect_url {
        view = view.with_extra("redirect_url", redirect_url);
    }
    state.renderer.respond(&headers, view)
}

/// GET /subscriptions/agreement/detail?id=
async fn agreement_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<AgreementLookup>, QueryRejection>,
) -> Result<Response, AppError> {
    let Some(agreement_id) = extract_query(params)?.id else {
        return state
            .renderer
            .respond(&headers, View::awaiting(Page::AgreementDetail));
    };

    let result = state.provider.get_agreement(&agreement_id).await;
    let view =
        View::from_result(Page::AgreementDetail, result)?.with_input("id", Some(&agreement_id));
    state.renderer.respond(&headers, view)
}

/// GET /subscriptions/agreement/transactions?id=&startDate=&endDate=
///
/// The inputs are echoed with date defaults filled in, but the search only
/// runs when all three parameters were supplied.
async fn agreement_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<TransactionParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let params = extract_query(params)?;
    tracing::debug!(
        agreement_id = ?params.id,
        start_date = ?params.start_date,
        end_date = ?params.end_date,
        "agreement transaction search"
    );

    let defaults = default_search_range(Utc::now());
    let echo = |view: View| {
        view.with_input("agreementId", params.id.as_deref())
            .with_input(
                "startDate",
                Some(params.start_date.as_deref().unwrap_or(&defaults.start)),
            )
            .with_input(
                "endDate",
                Some(params.end_date.as_deref().unwrap_or(&defaults.end)),
            )
    };

    let (Some(agreement_id), Some(start_date), Some(end_date)) =
        (&params.id, &params.start_date, &params.end_date)
    else {
        let view = echo(View::awaiting(Page::AgreementTransactions));
        return state.renderer.respond(&headers, view);
    };

    let search = TransactionSearch {
        start_date: start_date.clone(),
        end_date: end_date.clone(),
    };
    let result = state
        .provider
        .search_agreement_transactions(agreement_id, &search)
        .await;
    let view = echo(View::from_result(Page::AgreementTransactions, result)?);
    state.renderer.respond(&headers, view)
}

/// GET /subscriptions/agreement_execution
async fn execution_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    state
        .renderer
        .respond(&headers, View::awaiting(Page::AgreementExecute))
}

/// POST /subscriptions/agreement_execution
async fn execute_agreement(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Form<ExecutionForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Some(token) = extract_form(body)?.token else {
        return state
            .renderer
            .respond(&headers, View::awaiting(Page::AgreementExecute));
    };

    let result = state.provider.execute_agreement(&token).await;
    let view = View::from_result(Page::AgreementExecute, result)?.with_input("token", Some(&token));
    state.renderer.respond(&headers, view)
}

/// GET /subscriptions/agreement_cancellation
async fn cancellation_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    state
        .renderer
        .respond(&headers, View::awaiting(Page::AgreementCancel))
}

/// POST /subscriptions/agreement_cancellation
async fn cancel_agreement(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Form<StateChangeForm>, FormRejection>,
) -> Result<Response, AppError> {
    let form = extract_form(body)?;
    let Some(agreement_id) = form.id else {
        return state
            .renderer
            .respond(&headers, View::awaiting(Page::AgreementCancel));
    };

    let note = AgreementStateNote::new(form.note.as_deref().unwrap_or(DEFAULT_CANCEL_NOTE));
    let result = state.provider.cancel_agreement(&agreement_id, &note).await;
    let view =
        View::from_result(Page::AgreementCancel, result)?.with_input("id", Some(&agreement_id));
    state.renderer.respond(&headers, view)
}

/// GET /subscriptions/agreement_suspend
async fn suspend_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    state
        .renderer
        .respond(&headers, View::awaiting(Page::AgreementSuspend))
}

/// POST /subscriptions/agreement_suspend
async fn suspend_agreement(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Form<StateChangeForm>, FormRejection>,
) -> Result<Response, AppError> {
    let form = extract_form(body)?;
    let Some(agreement_id) = form.id else {
        return state
            .renderer
            .respond(&headers, View::awaiting(Page::AgreementSuspend));
    };

    let note = AgreementStateNote::new(form.note.as_deref().unwrap_or(DEFAULT_SUSPEND_NOTE));
    let result = state.provider.suspend_agreement(&agreement_id, &note).await;
    let view =
        View::from_result(Page::AgreementSuspend, result)?.with_input("id", Some(&agreement_id));
    state.renderer.respond(&headers, view)
}
