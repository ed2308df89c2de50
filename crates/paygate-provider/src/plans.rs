//! Typed client for the billing-plans API.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/v1/payments/billing-plans` | List plans (status, page, page_size) |
//! | POST   | `/v1/payments/billing-plans` | Create a plan |
//! | PATCH  | `/v1/payments/billing-plans/{id}` | Activate (replace state) |
//! | GET    | `/v1/payments/billing-plans/{id}` | Plan detail |

use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ProviderError;
use crate::transport::Transport;
use crate::types::Money;

const PLANS: [&str; 3] = ["v1", "payments", "billing-plans"];

// -- Request types ------------------------------------------------------------

/// Query for listing plans. Values are passed through as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanListQuery {
    pub status: String,
    pub page: String,
    pub page_size: String,
}

impl Default for PlanListQuery {
    fn default() -> Self {
        Self {
            status: "active".to_string(),
            page: "0".to_string(),
            page_size: "3".to_string(),
        }
    }
}

impl PlanListQuery {
    /// Fill any missing parameter with its default
    /// (`status=active`, `page=0`, `page_size=3`).
    pub fn with_defaults(
        status: Option<String>,
        page: Option<String>,
        page_size: Option<String>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            status: status.unwrap_or(defaults.status),
            page: page.unwrap_or(defaults.page),
            page_size: page_size.unwrap_or(defaults.page_size),
        }
    }
}

/// New billing plan with one payment definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BillingPlanRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub plan_type: Option<String>,
    pub payment_definitions: Vec<PaymentDefinition>,
    pub merchant_preferences: MerchantPreferences,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub definition_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycles: Option<String>,
    pub amount: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MerchantPreferences {
    pub setup_fee: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_bill_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_fail_amount_action: Option<String>,
}

/// JSON Patch body that moves a plan to `ACTIVE`.
pub fn activation_patch() -> Value {
    json!([{
        "op": "replace",
        "path": "/",
        "value": { "state": "ACTIVE" }
    }])
}

// -- Client -------------------------------------------------------------------

/// Client for the billing-plans API.
#[derive(Debug, Clone)]
pub struct PlanClient {
    transport: Transport,
}

impl PlanClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// List plans.
    ///
    /// Calls `GET {base_url}/v1/payments/billing-plans?status=&page=&page_size=`.
    pub async fn list(&self, query: &PlanListQuery) -> Result<Value, ProviderError> {
        let mut url = self.transport.url(&PLANS)?;
        url.query_pairs_mut()
            .append_pair("status", &query.status)
            .append_pair("page", &query.page)
            .append_pair("page_size", &query.page_size);
        self.transport
            .get(url, "GET /v1/payments/billing-plans")
            .await
    }

    /// Create a plan (state `CREATED`).
    ///
    /// Calls `POST {base_url}/v1/payments/billing-plans`.
    pub async fn create(&self, req: &BillingPlanRequest) -> Result<Value, ProviderError> {
        let url = self.transport.url(&PLANS)?;
        self.transport
            .send(Method::POST, url, "POST /v1/payments/billing-plans", Some(req))
            .await
    }

    /// Activate a plan.
    ///
    /// Calls `PATCH {base_url}/v1/payments/billing-plans/{id}`.
    pub async fn activate(&self, plan_id: &str) -> Result<Value, ProviderError> {
        let endpoint = format!("PATCH /v1/payments/billing-plans/{plan_id}");
        let url = self.transport.url(&[PLANS[0], PLANS[1], PLANS[2], plan_id])?;
        self.transport
            .send(Method::PATCH, url, &endpoint, Some(&activation_patch()))
            .await
    }

    /// Fetch a plan.
    ///
    /// Calls `GET {base_url}/v1/payments/billing-plans/{id}`.
    pub async fn get(&self, plan_id: &str) -> Result<Value, ProviderError> {
        let endpoint = format!("GET /v1/payments/billing-plans/{plan_id}");
        let url = self.transport.url(&[PLANS[0], PLANS[1], PLANS[2], plan_id])?;
        self.transport.get(url, &endpoint).await
    }
}
