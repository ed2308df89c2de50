//! Typed client for the billing-agreements API.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/v1/payments/billing-agreements` | Create (returns approval links) |
//! | GET    | `/v1/payments/billing-agreements/{id}` | Agreement detail |
//! | GET    | `/v1/payments/billing-agreements/{id}/transactions` | Transaction search |
//! | POST   | `/v1/payments/billing-agreements/{token}/agreement-execute` | Execute after payer approval |
//! | POST   | `/v1/payments/billing-agreements/{id}/cancel` | Cancel with note |
//! | POST   | `/v1/payments/billing-agreements/{id}/suspend` | Suspend with note |

use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ProviderError;
use crate::transport::Transport;

const AGREEMENTS: [&str; 3] = ["v1", "payments", "billing-agreements"];

// -- Request types ------------------------------------------------------------

/// New billing agreement against an existing plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BillingAgreementRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO-8601 UTC instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    pub payer: Payer,
    pub plan: PlanReference,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Payer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Body for cancel and suspend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgreementStateNote {
    pub note: String,
}

impl AgreementStateNote {
    pub fn new(note: impl Into<String>) -> Self {
        Self { note: note.into() }
    }
}

/// Date bounds for a transaction search, `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionSearch {
    pub start_date: String,
    pub end_date: String,
}

/// The payer-approval URL from a create response: `links[0].href`.
///
/// Returns `None` if `links` is missing, empty, or its first entry has no
/// string `href`.
pub fn approval_href(agreement: &Value) -> Option<&str> {
    agreement
        .get("links")?
        .as_array()?
        .first()?
        .get("href")?
        .as_str()
}

// -- Client -------------------------------------------------------------------

/// Client for the billing-agreements API.
#[derive(Debug, Clone)]
pub struct AgreementClient {
    transport: Transport,
}

impl AgreementClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    fn agreement_url(&self, id: &str, action: Option<&str>) -> Result<url::Url, ProviderError> {
        let mut segments = vec![AGREEMENTS[0], AGREEMENTS[1], AGREEMENTS[2], id];
        segments.extend(action);
        self.transport.url(&segments)
    }

    /// Create an agreement.
    ///
    /// Calls `POST {base_url}/v1/payments/billing-agreements`.
    pub async fn create(&self, req: &BillingAgreementRequest) -> Result<Value, ProviderError> {
        let url = self.transport.url(&AGREEMENTS)?;
        self.transport
            .send(
                Method::POST,
                url,
                "POST /v1/payments/billing-agreements",
                Some(req),
            )
            .await
    }

    /// Fetch an agreement.
    ///
    /// Calls `GET {base_url}/v1/payments/billing-agreements/{id}`.
    pub async fn get(&self, agreement_id: &str) -> Result<Value, ProviderError> {
        let endpoint = format!("GET /v1/payments/billing-agreements/{agreement_id}");
        let url = self.agreement_url(agreement_id, None)?;
        self.transport.get(url, &endpoint).await
    }

    /// List transactions for an agreement between two dates.
    ///
    /// Calls `GET {base_url}/v1/payments/billing-agreements/{id}/transactions?start_date=&end_date=`.
    pub async fn search_transactions(
        &self,
        agreement_id: &str,
        search: &TransactionSearch,
    ) -> Result<Value, ProviderError> {
        let endpoint = format!("GET /v1/payments/billing-agreements/{agreement_id}/transactions");
        let mut url = self.agreement_url(agreement_id, Some("transactions"))?;
        url.query_pairs_mut()
            .append_pair("start_date", &search.start_date)
            .append_pair("end_date", &search.end_date);
        self.transport.get(url, &endpoint).await
    }

    /// Execute an agreement the payer has approved.
    ///
    /// Calls `POST {base_url}/v1/payments/billing-agreements/{token}/agreement-execute`.
    pub async fn execute(&self, token: &str) -> Result<Value, ProviderError> {
        let endpoint = format!("POST /v1/payments/billing-agreements/{token}/agreement-execute");
        let url = self.agreement_url(token, Some("agreement-execute"))?;
        self.transport
            .send(Method::POST, url, &endpoint, Some(&Value::Object(Map::new())))
            .await
    }

    /// Cancel an agreement.
    ///
    /// Calls `POST {base_url}/v1/payments/billing-agreements/{id}/cancel`.
    pub async fn cancel(
        &self,
        agreement_id: &str,
        note: &AgreementStateNote,
    ) -> Result<Value, ProviderError> {
        self.change_state(agreement_id, "cancel", note).await
    }

    /// Suspend an agreement.
    ///
    /// Calls `POST {base_url}/v1/payments/billing-agreements/{id}/suspend`.
    pub async fn suspend(
        &self,
        agreement_id: &str,
        note: &AgreementStateNote,
    ) -> Result<Value, ProviderError> {
        self.change_state(agreement_id, "suspend", note).await
    }

    async fn change_state(
        &self,
        agreement_id: &str,
        action: &str,
        note: &AgreementStateNote,
    ) -> Result<Value, ProviderError> {
        let endpoint = format!("POST /v1/payments/billing-agreements/{agreement_id}/{action}");
        let url = self.agreement_url(agreement_id, Some(action))?;
        self.transport
            .send(Method::POST, url, &endpoint, Some(note))
            .await
    }
}
