//! # paygate-provider -- Typed Rust client for the PayPal REST v1 APIs
//!
//! Covers the three resources the gateway exposes:
//! - **Invoices** via `/v1/invoicing/invoices`
//! - **Billing plans** via `/v1/payments/billing-plans`
//! - **Billing agreements** via `/v1/payments/billing-agreements`
//!
//! ## Architecture
//!
//! Handlers depend on the object-safe [`PaymentProvider`] trait, never on
//! `reqwest` directly. [`PaypalClient`] is the live implementation;
//! [`mock::MockProvider`] returns canned responses and records calls.
//!
//! Requests are typed structs. Responses are returned untouched as
//! `serde_json::Value` so the caller can display exactly what the provider
//! sent back.

pub mod agreements;
pub(crate) mod auth;
pub mod config;
pub mod error;
pub mod invoices;
pub mod mock;
pub mod plans;
pub(crate) mod transport;
pub mod types;

pub use agreements::{approval_href, AgreementStateNote, BillingAgreementRequest, TransactionSearch};
pub use config::{ConfigError, ProviderConfig, ProviderMode};
pub use error::ProviderError;
pub use invoices::InvoiceRequest;
pub use mock::MockProvider;
pub use plans::{BillingPlanRequest, PlanListQuery};

use async_trait::async_trait;
use serde_json::Value;

use transport::Transport;

/// Outcome of one provider call: the provider's JSON reply or the reason
/// it could not be obtained.
pub type ProviderResult = Result<Value, ProviderError>;

/// The payment-provider operations the gateway dispatches.
///
/// Each method performs exactly one remote call (plus, for the live
/// client, a token request when no cached token is usable).
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Mint an access token. The result is the `Authorization` header
    /// value as a JSON string, e.g. `"Bearer A21AA..."`.
    async fn generate_token(&self) -> ProviderResult;

    async fn create_invoice(&self, req: &InvoiceRequest) -> ProviderResult;

    async fn send_invoice(&self, invoice_id: &str) -> ProviderResult;

    async fn list_plans(&self, query: &PlanListQuery) -> ProviderResult;

    async fn create_plan(&self, req: &BillingPlanRequest) -> ProviderResult;

    async fn activate_plan(&self, plan_id: &str) -> ProviderResult;

    async fn get_plan(&self, plan_id: &str) -> ProviderResult;

    async fn create_agreement(&self, req: &BillingAgreementRequest) -> ProviderResult;

    async fn get_agreement(&self, agreement_id: &str) -> ProviderResult;

    async fn search_agreement_transactions(
        &self,
        agreement_id: &str,
        search: &TransactionSearch,
    ) -> ProviderResult;

    async fn execute_agreement(&self, token: &str) -> ProviderResult;

    async fn cancel_agreement(&self, agreement_id: &str, note: &AgreementStateNote)
        -> ProviderResult;

    async fn suspend_agreement(
        &self,
        agreement_id: &str,
        note: &AgreementStateNote,
    ) -> ProviderResult;

    /// Human-readable name of this implementation
    /// (e.g. "PaypalClient", "MockProvider").
    fn provider_name(&self) -> &str;
}

/// Live PayPal REST client. Holds sub-clients for each resource; all of
/// them share one HTTP connection pool and one token cache.
#[derive(Debug, Clone)]
pub struct PaypalClient {
    transport: Transport,
    invoices: invoices::InvoiceClient,
    plans: plans::PlanClient,
    agreements: agreements::AgreementClient,
}

impl PaypalClient {
    /// Create a client from configuration. No network traffic happens
    /// until the first call.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let transport = Transport::new(config)?;
        Ok(Self {
            invoices: invoices::InvoiceClient::new(transport.clone()),
            plans: plans::PlanClient::new(transport.clone()),
            agreements: agreements::AgreementClient::new(transport.clone()),
            transport,
        })
    }

    /// Access the invoicing client.
    pub fn invoices(&self) -> &invoices::InvoiceClient {
        &self.invoices
    }

    /// Access the billing-plans client.
    pub fn plans(&self) -> &plans::PlanClient {
        &self.plans
    }

    /// Access the billing-agreements client.
    pub fn agreements(&self) -> &agreements::AgreementClient {
        &self.agreements
    }
}

#[async_trait]
impl PaymentProvider for PaypalClient {
    async fn generate_token(&self) -> ProviderResult {
        let token = self.transport.fetch_token().await?;
        Ok(Value::String(token.header_value().as_str().to_owned()))
    }

    async fn create_invoice(&self, req: &InvoiceRequest) -> ProviderResult {
        self.invoices.create(req).await
    }

    async fn send_invoice(&self, invoice_id: &str) -> ProviderResult {
        self.invoices.send(invoice_id).await
    }

    async fn list_plans(&self, query: &PlanListQuery) -> ProviderResult {
        self.plans.list(query).await
    }

    async fn create_plan(&self, req: &BillingPlanRequest) -> ProviderResult {
        self.plans.create(req).await
    }

    async fn activate_plan(&self, plan_id: &str) -> ProviderResult {
        self.plans.activate(plan_id).await
    }

    async fn get_plan(&self, plan_id: &str) -> ProviderResult {
        self.plans.get(plan_id).await
    }

    async fn create_agreement(&self, req: &BillingAgreementRequest) -> ProviderResult {
        self.agreements.create(req).await
    }

    async fn get_agreement(&self, agreement_id: &str) -> ProviderResult {
        self.agreements.get(agreement_id).await
    }

    async fn search_agreement_transactions(
        &self,
        agreement_id: &str,
        search: &TransactionSearch,
    ) -> ProviderResult {
        self.agreements
            .search_transactions(agreement_id, search)
            .await
    }

    async fn execute_agreement(&self, token: &str) -> ProviderResult {
        self.agreements.execute(token).await
    }

    async fn cancel_agreement(
        &self,
        agreement_id: &str,
        note: &AgreementStateNote,
    ) -> ProviderResult {
        self.agreements.cancel(agreement_id, note).await
    }

    async fn suspend_agreement(
        &self,
        agreement_id: &str,
        note: &AgreementStateNote,
    ) -> ProviderResult {
        self.agreements.suspend(agreement_id, note).await
    }

    fn provider_name(&self) -> &str {
        "PaypalClient"
    }
}
