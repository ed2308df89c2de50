//! # Page Rendering
//!
//! Every handler ends by building a [`View`] and handing it to
//! [`Renderer::respond`]. The view carries the page title, the outcome of
//! the provider call, the raw and pretty-printed provider reply, and the
//! form values to echo back into the inputs.
//!
//! Templates are compiled into the binary with `include_str!` and parsed
//! once at startup. Their names end in `.html`, so Tera autoescapes every
//! interpolated value.
//!
//! A request whose `Accept` header names `application/json` receives the
//! `View` itself as JSON.

use axum::http::header::ACCEPT;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use paygate_core::PrettyJson;
use paygate_provider::ProviderResult;
use serde::Serialize;
use serde_json::{Map, Value};
use tera::{Context, Tera};

use crate::error::AppError;

/// What happened to the provider call behind a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// No call was made; the page shows its input form.
    Awaiting,
    Success,
    Failure,
}

/// The pages the gateway serves. Each maps to one template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Index,
    InvoiceCreate,
    InvoiceSend,
    TokenCheck,
    PlanList,
    PlanCreate,
    PlanActivate,
    PlanDetail,
    AgreementCreate,
    AgreementDetail,
    AgreementTransactions,
    AgreementExecute,
    AgreementCancel,
    AgreementSuspend,
    CallbackSuccess,
    CallbackCancel,
}

impl Page {
    pub fn template(&self) -> &'static str {
        match self {
            Self::Index => "index.html",
            Self::InvoiceCreate => "invoices/create.html",
            Self::InvoiceSend => "invoices/send.html",
            Self::TokenCheck => "subscriptions/index.html",
            Self::PlanList => "subscriptions/plans.html",
            Self::PlanCreate => "subscriptions/plan.html",
            Self::PlanActivate => "subscriptions/plan_activation.html",
            Self::PlanDetail => "subscriptions/plan_detail.html",
            Self::AgreementCreate => "subscriptions/agreement.html",
            Self::AgreementDetail => "subscriptions/agreement_detail.html",
            Self::AgreementTransactions => "subscriptions/agreement_transactions.html",
            Self::AgreementExecute => "subscriptions/agreement_execution.html",
            Self::AgreementCancel => "subscriptions/agreement_cancellation.html",
            Self::AgreementSuspend => "subscriptions/agreement_suspend.html",
            Self::CallbackSuccess => "subscriptions/callback/success.html",
            Self::CallbackCancel => "subscriptions/callback/cancel.html",
        }
    }

    /// Page title for an outcome: `(awaiting, success, failure)`.
    pub fn title(&self, outcome: Outcome) -> &'static str {
        let (awaiting, success, failure) = match self {
            Self::Index => ("PayPal REST Gateway", "PayPal REST Gateway", "PayPal REST Gateway"),
            Self::InvoiceCreate => ("Invoice Create", "Invoice Created", "Invoice Create Failed"),
            Self::InvoiceSend => ("Invoice Send", "Invoice Sent", "Invoice Send Failed"),
            Self::TokenCheck => (
                "PayPal Initialization Check",
                "PayPal Initialization Check",
                "PayPal Initialization Check",
            ),
            Self::PlanList => (
                "Subscription Plans",
                "Subscription Plans",
                "Subscription Plans",
            ),
            Self::PlanCreate => (
                "Subscription Plan Creation",
                "Subscription Plan Created",
                "Subscription Plan Creation Failed",
            ),
            Self::PlanActivate => (
                "Subscription Plan Activation",
                "Subscription Plan Activated",
                "Subscription Plan Activation Failed",
            ),
            Self::PlanDetail => (
                "Subscription Plan Detail",
                "Subscription Plan Detail",
                "Subscription Plan Detail Failed",
            ),
            Self::AgreementCreate => (
                "Subscription Agreement Creation",
                "Subscription Agreement Created",
                "Subscription Agreement Creation Failed",
            ),
            Self::AgreementDetail => (
                "Subscription Agreement Detail",
                "Subscription Agreement Detail",
                "Subscription Agreement Detail Failed",
            ),
            Self::AgreementTransactions => (
                "Subscription Agreement Transactions",
                "Subscription Agreement Transactions",
                "Subscription Agreement Transactions Failed",
            ),
            Self::AgreementExecute => (
                "Subscription Agreement Execution",
                "Subscription Agreement Executed",
                "Subscription Agreement Execution Failed",
            ),
            Self::AgreementCancel => (
                "Subscription Agreement Cancellation",
                "Subscription Agreement Canceled",
                "Subscription Agreement Cancellation Failed",
            ),
            Self::AgreementSuspend => (
                "Subscription Agreement Suspend",
                "Subscription Agreement Suspend",
                "Subscription Agreement Suspend Failed",
            ),
            Self::CallbackSuccess => (
                "Subscription Success Callback",
                "Subscription Success Callback",
                "Subscription Success Callback",
            ),
            Self::CallbackCancel => (
                "Subscription Cancel Callback",
                "Subscription Cancel Callback",
                "Subscription Cancel Callback",
            ),
        };
        match outcome {
            Outcome::Awaiting => awaiting,
            Outcome::Success => success,
            Outcome::Failure => failure,
        }
    }
}

/// Per-request view-model.
#[derive(Debug, Clone, Serialize)]
pub struct View {
    pub page: Page,
    pub title: &'static str,
    pub outcome: Outcome,
    pub result: Option<Value>,
    pub result_str: Option<PrettyJson>,
    pub error: Option<Value>,
    pub error_str: Option<PrettyJson>,
    /// Values echoed back into the page's inputs.
    pub form: Map<String, Value>,
    /// Page-specific values (plan count, redirect URL, callback token).
    pub extras: Map<String, Value>,
}

impl View {
    /// The page before any provider call.
    pub fn awaiting(page: Page) -> Self {
        Self {
            page,
            title: page.title(Outcome::Awaiting),
            outcome: Outcome::Awaiting,
            result: None,
            result_str: None,
            error: None,
            error_str: None,
            form: Map::new(),
            extras: Map::new(),
        }
    }

    /// The page after one provider call.
    pub fn from_result(page: Page, result: ProviderResult) -> Result<Self, AppError> {
        let mut view = Self::awaiting(page);
        match result {
            Ok(value) => {
                view.outcome = Outcome::Success;
                view.result_str = Some(pretty(&value)?);
                view.result = Some(value);
            }
            Err(err) => {
                tracing::debug!(page = ?page, error = %err, "provider call failed");
                let payload = err.payload();
                view.outcome = Outcome::Failure;
                view.error_str = Some(pretty(&payload)?);
                view.error = Some(payload);
            }
        }
        view.title = page.title(view.outcome);
        Ok(view)
    }

    /// Echo a form value. Absent values are echoed as empty strings.
    pub fn with_input(mut self, name: &str, value: Option<&str>) -> Self {
        self.form
            .insert(name.to_string(), Value::String(value.unwrap_or_default().to_string()));
        self
    }

    pub fn with_extra(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.extras.insert(name.to_string(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

fn pretty(value: &Value) -> Result<PrettyJson, AppError> {
    PrettyJson::from_value(value).map_err(|e| AppError::internal(format!("pretty-print failed: {e}")))
}

/// Whether the client asked for the view-model instead of HTML.
pub fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains("application/json"))
}

/// Tera instance holding every page template.
#[derive(Debug)]
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Parse the embedded templates.
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("layout.html", include_str!("../templates/layout.html")),
            ("index.html", include_str!("../templates/index.html")),
            ("invoices/create.html", include_str!("../templates/invoices/create.html")),
            ("invoices/send.html", include_str!("../templates/invoices/send.html")),
            ("subscriptions/index.html", include_str!("../templates/subscriptions/index.html")),
            ("subscriptions/plans.html", include_str!("../templates/subscriptions/plans.html")),
            ("subscriptions/plan.html", include_str!("../templates/subscriptions/plan.html")),
            (
                "subscriptions/plan_activation.html",
                include_str!("../templates/subscriptions/plan_activation.html"),
            ),
            (
                "subscriptions/plan_detail.html",
                include_str!("../templates/subscriptions/plan_detail.html"),
            ),
            (
                "subscriptions/agreement.html",
                include_str!("../templates/subscriptions/agreement.html"),
            ),
            (
                "subscriptions/agreement_detail.html",
                include_str!("../templates/subscriptions/agreement_detail.html"),
            ),
            (
                "subscriptions/agreement_transactions.html",
                include_str!("../templates/subscriptions/agreement_transactions.html"),
            ),
            (
                "subscriptions/agreement_execution.html",
                include_str!("../templates/subscriptions/agreement_execution.html"),
            ),
            (
                "subscriptions/agreement_cancellation.html",
                include_str!("../templates/subscriptions/agreement_cancellation.html"),
            ),
            (
                "subscriptions/agreement_suspend.html",
                include_str!("../templates/subscriptions/agreement_suspend.html"),
            ),
            (
                "subscriptions/callback/success.html",
                include_str!("../templates/subscriptions/callback/success.html"),
            ),
            (
                "subscriptions/callback/cancel.html",
                include_str!("../templates/subscriptions/callback/cancel.html"),
            ),
        ])?;
        Ok(Self { tera })
    }

    /// Render a view to HTML.
    pub fn render(&self, view: &View) -> Result<String, AppError> {
        let context = Context::from_serialize(view)?;
        Ok(self.tera.render(view.page.template(), &context)?)
    }

    /// Render as HTML, or as the JSON view-model when the client asked for it.
    pub fn respond(&self, headers: &HeaderMap, view: View) -> Result<Response, AppError> {
        if wants_json(headers) {
            return Ok(Json(view).into_response());
        }
        Ok(Html(self.render(&view)?).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use paygate_provider::ProviderError;
    use serde_json::json;

    #[test]
    fn awaiting_view_has_no_payload() {
        let view = View::awaiting(Page::PlanDetail);
        assert_eq!(view.title, "Subscription Plan Detail");
        assert_eq!(view.outcome, Outcome::Awaiting);
        assert!(view.result.is_none());
        assert!(view.error.is_none());
    }

    #[test]
    fn success_view_pretty_prints_result() {
        let result = json!({"id": "P-1", "state": "CREATED"});
        let view = View::from_result(Page::PlanCreate, Ok(result.clone())).unwrap();
        assert_eq!(view.title, "Subscription Plan Created");
        assert!(view.is_success());
        let reparsed: Value =
            serde_json::from_str(view.result_str.as_ref().unwrap().as_str()).unwrap();
        assert_eq!(reparsed, result);
        assert!(view.result_str.unwrap().as_str().contains("\n  \"id\""));
    }

    #[test]
    fn failure_view_carries_payload() {
        let err = ProviderError::Api {
            endpoint: "POST /v1/invoicing/invoices".into(),
            status: 400,
            body: json!({"name": "VALIDATION_ERROR"}),
        };
        let view = View::from_result(Page::InvoiceCreate, Err(err)).unwrap();
        assert_eq!(view.title, "Invoice Create Failed");
        assert_eq!(view.outcome, Outcome::Failure);
        let error = view.error.clone().unwrap();
        assert_eq!(error["response"]["name"], "VALIDATION_ERROR");
        let reparsed: Value =
            serde_json::from_str(view.error_str.as_ref().unwrap().as_str()).unwrap();
        assert_eq!(reparsed, error);
    }

    #[test]
    fn titles_differ_by_outcome() {
        assert_eq!(Page::AgreementCancel.title(Outcome::Awaiting), "Subscription Agreement Cancellation");
        assert_eq!(Page::AgreementCancel.title(Outcome::Success), "Subscription Agreement Canceled");
        assert_eq!(
            Page::AgreementCancel.title(Outcome::Failure),
            "Subscription Agreement Cancellation Failed"
        );
        assert_eq!(Page::InvoiceSend.title(Outcome::Success), "Invoice Sent");
    }

    #[test]
    fn every_page_renders_in_every_outcome() {
        let renderer = Renderer::new().unwrap();
        let pages = [
            Page::Index,
            Page::InvoiceCreate,
            Page::InvoiceSend,
            Page::TokenCheck,
            Page::PlanList,
            Page::PlanCreate,
            Page::PlanActivate,
            Page::PlanDetail,
            Page::AgreementCreate,
            Page::AgreementDetail,
            Page::AgreementTransactions,
            Page::AgreementExecute,
            Page::AgreementCancel,
            Page::AgreementSuspend,
            Page::CallbackSuccess,
            Page::CallbackCancel,
        ];
        for page in pages {
            let awaiting = renderer.render(&View::awaiting(page)).unwrap();
            assert!(awaiting.contains(page.title(Outcome::Awaiting)), "{page:?}");

            let ok = View::from_result(page, Ok(json!({"id": "X-1"}))).unwrap();
            assert!(renderer.render(&ok).unwrap().contains("X-1"), "{page:?}");

            let failed = View::from_result(
                page,
                Err(ProviderError::Api {
                    endpoint: "GET /".into(),
                    status: 500,
                    body: json!({"name": "INTERNAL_SERVICE_ERROR"}),
                }),
            )
            .unwrap();
            assert!(renderer.render(&failed).unwrap().contains("INTERNAL_SERVICE_ERROR"), "{page:?}");
        }
    }

    #[test]
    fn html_is_autoescaped() {
        let renderer = Renderer::new().unwrap();
        let view = View::awaiting(Page::CallbackSuccess).with_extra("token", "<script>x</script>");
        let html = renderer.render(&view).unwrap();
        assert!(!html.contains("<script>x</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn accept_header_negotiation() {
        let mut headers = HeaderMap::new();
        assert!(!wants_json(&headers));
        headers.insert(ACCEPT, HeaderValue::from_static("text/html"));
        assert!(!wants_json(&headers));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain"));
        assert!(wants_json(&headers));
    }
}
