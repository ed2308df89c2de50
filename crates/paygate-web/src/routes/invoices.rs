//! # Invoice Endpoints
//!
//! | Method   | Path               | Provider call |
//! |----------|--------------------|---------------|
//! | GET      | `/invoices/create` | none (input form) |
//! | POST     | `/invoices/create` | `create_invoice` |
//! | GET      | `/invoices/send`   | none (input form) |
//! | POST     | `/invoices/send`   | `send_invoice` |

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use paygate_core::empty_as_none;
use paygate_provider::invoices::{InvoiceItem, MerchantInfo};
use paygate_provider::types::{EmailContact, Money};
use paygate_provider::InvoiceRequest;
use serde::Deserialize;

use crate::error::AppError;
use crate::extractors::extract_form;
use crate::render::{Page, View};
use crate::state::AppState;

/// Invoice form as posted by `invoices/create.html`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub merchant_email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub business_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub payer_email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub unit_price: Option<String>,
}

impl InvoiceForm {
    /// One line item; the merchant is copied on the invoice.
    pub fn into_request(self) -> InvoiceRequest {
        InvoiceRequest {
            merchant_info: MerchantInfo {
                email: self.merchant_email.clone(),
                business_name: self.business_name,
            },
            billing_info: vec![EmailContact {
                email: self.payer_email,
            }],
            cc_info: vec![EmailContact {
                email: self.merchant_email,
            }],
            items: vec![InvoiceItem {
                name: self.name,
                description: self.description,
                quantity: self.quantity,
                unit_price: Money::new(self.currency, self.unit_price),
            }],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceIdForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub id: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/invoices/create", get(create_form).post(create_invoice))
        .route("/invoices/send", get(send_form).post(send_invoice))
}

/// GET /invoices/create
async fn create_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    state
        .renderer
        .respond(&headers, View::awaiting(Page::InvoiceCreate))
}

/// POST /invoices/create
async fn create_invoice(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Form<InvoiceForm>, FormRejection>,
) -> Result<Response, AppError> {
    let req = extract_form(body)?.into_request();
    let result = state.provider.create_invoice(&req).await;
    let view = View::from_result(Page::InvoiceCreate, result)?;
    state.renderer.respond(&headers, view)
}

/// GET /invoices/send
async fn send_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    state
        .renderer
        .respond(&headers, View::awaiting(Page::InvoiceSend))
}

/// POST /invoices/send
async fn send_invoice(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Form<InvoiceIdForm>, FormRejection>,
) -> Result<Response, AppError> {
    let form = extract_form(body)?;
    let Some(invoice_id) = form.id else {
        return state
            .renderer
            .respond(&headers, View::awaiting(Page::InvoiceSend));
    };

    let result = state.provider.send_invoice(&invoice_id).await;
    let view = View::from_result(Page::InvoiceSend, result)?.with_input("id", Some(&invoice_id));
    state.renderer.respond(&headers, view)
}
