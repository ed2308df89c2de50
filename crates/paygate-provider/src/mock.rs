//! In-process provider for tests and offline development.
//!
//! `MockProvider` answers every operation from a per-operation canned
//! response and records each dispatched call together with the request it
//! carried. It never touches the network.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{json, Value};

use crate::agreements::{AgreementStateNote, BillingAgreementRequest, TransactionSearch};
use crate::error::ProviderError;
use crate::invoices::InvoiceRequest;
use crate::plans::{BillingPlanRequest, PlanListQuery};
use crate::{PaymentProvider, ProviderResult};

/// Provider operations, one per [`PaymentProvider`] method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    GenerateToken,
    CreateInvoice,
    SendInvoice,
    ListPlans,
    CreatePlan,
    ActivatePlan,
    GetPlan,
    CreateAgreement,
    GetAgreement,
    SearchAgreementTransactions,
    ExecuteAgreement,
    CancelAgreement,
    SuspendAgreement,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GenerateToken => "generate_token",
            Self::CreateInvoice => "create_invoice",
            Self::SendInvoice => "send_invoice",
            Self::ListPlans => "list_plans",
            Self::CreatePlan => "create_plan",
            Self::ActivatePlan => "activate_plan",
            Self::GetPlan => "get_plan",
            Self::CreateAgreement => "create_agreement",
            Self::GetAgreement => "get_agreement",
            Self::SearchAgreementTransactions => "search_agreement_transactions",
            Self::ExecuteAgreement => "execute_agreement",
            Self::CancelAgreement => "cancel_agreement",
            Self::SuspendAgreement => "suspend_agreement",
        }
    }

    /// Default success body for this operation.
    fn canned_ok(&self) -> Value {
        match self {
            Self::GenerateToken => json!("Bearer A21AAmock-access-token"),
            Self::CreateInvoice => json!({
                "id": "INV2-MOCK-0000-0001",
                "status": "DRAFT",
                "links": [{
                    "rel": "send",
                    "href": "https://api.sandbox.paypal.com/v1/invoicing/invoices/INV2-MOCK-0000-0001/send",
                    "method": "POST"
                }]
            }),
            Self::ListPlans => json!({
                "plans": [{"id": "P-MOCK0001", "state": "ACTIVE", "name": "Mock plan"}],
                "total_items": "1",
                "total_pages": "1"
            }),
            Self::CreatePlan => json!({"id": "P-MOCK0001", "state": "CREATED"}),
            Self::GetPlan => json!({"id": "P-MOCK0001", "state": "ACTIVE"}),
            Self::CreateAgreement => json!({
                "name": "Mock agreement",
                "links": [
                    {
                        "href": "https://www.sandbox.paypal.com/cgi-bin/webscr?cmd=_express-checkout&token=EC-MOCK0001",
                        "rel": "approval_url",
                        "method": "REDIRECT"
                    },
                    {
                        "href": "https://api.sandbox.paypal.com/v1/payments/billing-agreements/EC-MOCK0001/agreement-execute",
                        "rel": "execute",
                        "method": "POST"
                    }
                ]
            }),
            Self::GetAgreement | Self::ExecuteAgreement => {
                json!({"id": "I-MOCK0001", "state": "Active"})
            }
            Self::SearchAgreementTransactions => json!({"agreement_transaction_list": []}),
            Self::SendInvoice
            | Self::ActivatePlan
            | Self::CancelAgreement
            | Self::SuspendAgreement => json!({}),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call received by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: Operation,
    /// The request as it would have been serialized, or the identifying
    /// arguments for operations without a body.
    pub request: Value,
}

#[derive(Debug, Clone)]
enum Canned {
    Ok(Value),
    Err { status: u16, body: Value },
}

/// Canned-response provider. Cheap to share behind an `Arc`.
#[derive(Default)]
pub struct MockProvider {
    responses: Mutex<HashMap<Operation, Canned>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `operation` with a 2xx carrying `body`.
    pub fn respond_ok(&self, operation: Operation, body: Value) -> &Self {
        self.responses.lock().insert(operation, Canned::Ok(body));
        self
    }

    /// Answer `operation` with a non-2xx `status` carrying `body`.
    pub fn respond_err(&self, operation: Operation, status: u16, body: Value) -> &Self {
        self.responses
            .lock()
            .insert(operation, Canned::Err { status, body });
        self
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// The most recent call, if any.
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }

    fn dispatch<R: Serialize + ?Sized>(&self, operation: Operation, request: &R) -> ProviderResult {
        let request = serde_json::to_value(request).unwrap_or(Value::Null);
        tracing::debug!(operation = operation.as_str(), "mock provider call");
        self.calls.lock().push(RecordedCall { operation, request });

        let canned = self.responses.lock().get(&operation).cloned();
        match canned.unwrap_or_else(|| Canned::Ok(operation.canned_ok())) {
            Canned::Ok(body) => Ok(body),
            Canned::Err { status, body } => Err(ProviderError::Api {
                endpoint: operation.as_str().to_string(),
                status,
                body,
            }),
        }
    }
}

impl fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockProvider")
            .field("canned", &self.responses.lock().len())
            .field("calls", &self.calls.lock().len())
            .finish()
    }
}

#[async_trait]
impl PaymentProvider for MockProvider {
    async fn generate_token(&self) -> ProviderResult {
        self.dispatch(Operation::GenerateToken, &Value::Null)
    }

    async fn create_invoice(&self, req: &InvoiceRequest) -> ProviderResult {
        self.dispatch(Operation::CreateInvoice, req)
    }

    async fn send_invoice(&self, invoice_id: &str) -> ProviderResult {
        self.dispatch(Operation::SendInvoice, &json!({ "id": invoice_id }))
    }

    async fn list_plans(&self, query: &PlanListQuery) -> ProviderResult {
        self.dispatch(Operation::ListPlans, query)
    }

    async fn create_plan(&self, req: &BillingPlanRequest) -> ProviderResult {
        self.dispatch(Operation::CreatePlan, req)
    }

    async fn activate_plan(&self, plan_id: &str) -> ProviderResult {
        self.dispatch(Operation::ActivatePlan, &json!({ "id": plan_id }))
    }

    async fn get_plan(&self, plan_id: &str) -> ProviderResult {
        self.dispatch(Operation::GetPlan, &json!({ "id": plan_id }))
    }

    async fn create_agreement(&self, req: &BillingAgreementRequest) -> ProviderResult {
        self.dispatch(Operation::CreateAgreement, req)
    }

    async fn get_agreement(&self, agreement_id: &str) -> ProviderResult {
        self.dispatch(Operation::GetAgreement, &json!({ "id": agreement_id }))
    }

    async fn search_agreement_transactions(
        &self,
        agreement_id: &str,
        search: &TransactionSearch,
    ) -> ProviderResult {
        self.dispatch(
            Operation::SearchAgreementTransactions,
            &json!({
                "id": agreement_id,
                "start_date": search.start_date,
                "end_date": search.end_date,
            }),
        )
    }

    async fn execute_agreement(&self, token: &str) -> ProviderResult {
        self.dispatch(Operation::ExecuteAgreement, &json!({ "token": token }))
    }

    async fn cancel_agreement(
        &self,
        agreement_id: &str,
        note: &AgreementStateNote,
    ) -> ProviderResult {
        self.dispatch(
            Operation::CancelAgreement,
            &json!({ "id": agreement_id, "note": note.note }),
        )
    }

    async fn suspend_agreement(
        &self,
        agreement_id: &str,
        note: &AgreementStateNote,
    ) -> ProviderResult {
        self.dispatch(
            Operation::SuspendAgreement,
            &json!({ "id": agreement_id, "note": note.note }),
        )
    }

    fn provider_name(&self) -> &str {
        "MockProvider"
    }
}
