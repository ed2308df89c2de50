//! Typed client for the invoicing API.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/v1/invoicing/invoices` | Create a draft invoice |
//! | POST   | `/v1/invoicing/invoices/{id}/send` | Send an invoice to the payer |

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::ProviderError;
use crate::transport::Transport;
use crate::types::{EmailContact, Money};

// -- Request types ------------------------------------------------------------

/// Draft invoice with a single line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceRequest {
    pub merchant_info: MerchantInfo,
    pub billing_info: Vec<EmailContact>,
    pub cc_info: Vec<EmailContact>,
    pub items: Vec<InvoiceItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MerchantInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvoiceItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    pub unit_price: Money,
}

// -- Client -------------------------------------------------------------------

/// Client for the invoicing API.
#[derive(Debug, Clone)]
pub struct InvoiceClient {
    transport: Transport,
}

impl InvoiceClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Create a draft invoice.
    ///
    /// Calls `POST {base_url}/v1/invoicing/invoices`.
    pub async fn create(&self, req: &InvoiceRequest) -> Result<Value, ProviderError> {
        let url = self.transport.url(&["v1", "invoicing", "invoices"])?;
        self.transport
            .send(Method::POST, url, "POST /v1/invoicing/invoices", Some(req))
            .await
    }

    /// Send a draft invoice to its billing contacts.
    ///
    /// Calls `POST {base_url}/v1/invoicing/invoices/{id}/send`.
    pub async fn send(&self, invoice_id: &str) -> Result<Value, ProviderError> {
        let endpoint = format!("POST /v1/invoicing/invoices/{invoice_id}/send");
        let url = self
            .transport
            .url(&["v1", "invoicing", "invoices", invoice_id, "send"])?;
        self.transport
            .send::<()>(Method::POST, url, &endpoint, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn invoice_serializes_provider_schema() {
        let req = InvoiceRequest {
            merchant_info: MerchantInfo {
                email: Some("merchant@example.com".into()),
                business_name: Some("Acme".into()),
            },
            billing_info: vec![EmailContact {
                email: Some("payer@example.com".into()),
            }],
            cc_info: vec![EmailContact {
                email: Some("merchant@example.com".into()),
            }],
            items: vec![InvoiceItem {
                name: Some("Widget".into()),
                description: None,
                quantity: Some("2".into()),
                unit_price: Money::new(Some("USD".into()), Some("9.99".into())),
            }],
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "merchant_info": {"email": "merchant@example.com", "business_name": "Acme"},
                "billing_info": [{"email": "payer@example.com"}],
                "cc_info": [{"email": "merchant@example.com"}],
                "items": [{
                    "name": "Widget",
                    "quantity": "2",
                    "unit_price": {"currency": "USD", "value": "9.99"}
                }]
            })
        );
    }
}
