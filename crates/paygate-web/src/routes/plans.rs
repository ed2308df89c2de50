//! # Billing Plan Endpoints
//!
//! | Method   | Path                             | Provider call |
//! |----------|----------------------------------|---------------|
//! | GET      | `/subscriptions/plans`           | `list_plans` |
//! | GET      | `/subscriptions/plan`            | none (input form) |
//! | POST     | `/subscriptions/plan`            | `create_plan` |
//! | GET      | `/subscriptions/plan_activation` | none (input form) |
//! | POST     | `/subscriptions/plan_activation` | `activate_plan` |
//! | GET      | `/subscriptions/plan/detail`     | `get_plan` when `id` is present |

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use paygate_core::empty_as_none;
use paygate_provider::plans::{MerchantPreferences, PaymentDefinition};
use paygate_provider::types::Money;
use paygate_provider::{BillingPlanRequest, PlanListQuery};
use serde::Deserialize;

use crate::error::AppError;
use crate::extractors::{extract_form, extract_query};
use crate::render::{Page, View};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PlanListParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page_size: Option<String>,
}

/// Plan form as posted by `subscriptions/plan.html`. `pd_*` fields fill
/// the single payment definition, `mp_*` the merchant preferences.
#[derive(Debug, Default, Deserialize)]
pub struct PlanForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "empty_as_none")]
    pub plan_type: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub pd_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub pd_type: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub pd_frequency_interval: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub pd_frequency: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub pd_cycles: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub pd_currency: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub pd_amount: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub mp_setup_currency: Option<String>,
    // Setup fee amount keeps the `pd_` prefix the form has always used.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub pd_setup_amount: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub mp_cancel_url: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub mp_return_url: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub mp_auto_bill_amount: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub mp_initial_fail_amount_action: Option<String>,
}

impl PlanForm {
    pub fn into_request(self) -> BillingPlanRequest {
        BillingPlanRequest {
            name: self.name,
            description: self.description,
            plan_type: self.plan_type,
            payment_definitions: vec![PaymentDefinition {
                name: self.pd_name,
                definition_type: self.pd_type,
                frequency_interval: self.pd_frequency_interval,
                frequency: self.pd_frequency,
                cycles: self.pd_cycles,
                amount: Money::new(self.pd_currency, self.pd_amount),
            }],
            merchant_preferences: MerchantPreferences {
                setup_fee: Money::new(self.mp_setup_currency, self.pd_setup_amount),
                cancel_url: self.mp_cancel_url,
                return_url: self.mp_return_url,
                auto_bill_amount: self.mp_auto_bill_amount,
                initial_fail_amount_action: self.mp_initial_fail_amount_action,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanActivationForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub plan_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanLookup {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub id: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subscriptions/plans", get(list_plans))
        .route("/subscriptions/plan", get(create_form).post(create_plan))
        .route(
            "/subscriptions/plan_activation",
            get(activation_form).post(activate_plan),
        )
        .route("/subscriptions/plan/detail", get(plan_detail))
}

/// GET /subscriptions/plans: always calls the provider; missing
/// parameters take their defaults.
async fn list_plans(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<PlanListParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let params = extract_query(params)?;
    let query = PlanListQuery::with_defaults(params.status, params.page, params.page_size);

    let result = state.provider.list_plans(&query).await;
    let mut view = View::from_result(Page::PlanList, result)?
        .with_input("status", Some(&query.status))
        .with_input("page", Some(&query.page))
        .with_input("page_size", Some(&query.page_size));
    let plan_count = view.result.as_ref().map(|result| {
        result
            .get("plans")
            .and_then(|plans| plans.as_array())
            .map_or(0, Vec::len)
    });
    if let Some(count) = plan_count {
        view = view.with_extra("plan_count", count);
    }
    state.renderer.respond(&headers, view)
}

/// GET /subscriptions/plan
async fn create_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    state
        .renderer
        .respond(&headers, View::awaiting(Page::PlanCreate))
}

/// POST /subscriptions/plan
async fn create_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Form<PlanForm>, FormRejection>,
) -> Result<Response, AppError> {
    let req = extract_form(body)?.into_request();
    let result = state.provider.create_plan(&req).await;
    let view = View::from_result(Page::PlanCreate, result)?;
    state.renderer.respond(&headers, view)
}

/// GET /subscriptions/plan_activation
async fn activation_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    state
        .renderer
        .respond(&headers, View::awaiting(Page::PlanActivate))
}

/// POST /subscriptions/plan_activation
async fn activate_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Form<PlanActivationForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Some(plan_id) = extract_form(body)?.plan_id else {
        return state
            .renderer
            .respond(&headers, View::awaiting(Page::PlanActivate));
    };

    let result = state.provider.activate_plan(&plan_id).await;
    let view =
        View::from_result(Page::PlanActivate, result)?.with_input("plan_id", Some(&plan_id));
    state.renderer.respond(&headers, view)
}

/// GET /subscriptions/plan/detail?id=
async fn plan_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<PlanLookup>, QueryRejection>,
) -> Result<Response, AppError> {
    let Some(plan_id) = extract_query(params)?.id else {
        return state
            .renderer
            .respond(&headers, View::awaiting(Page::PlanDetail));
    };

    let result = state.provider.get_plan(&plan_id).await;
    let view = View::from_result(Page::PlanDetail, result)?.with_input("id", Some(&plan_id));
    state.renderer.respond(&headers, view)
}
