//! Shared request fragments used by more than one operation schema.

use serde::Serialize;

/// A currency amount as the provider expects it: `{"currency", "value"}`.
///
/// Both halves are copied verbatim from form input; the provider does the
/// validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Money {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Money {
    pub fn new(currency: Option<String>, value: Option<String>) -> Self {
        Self { currency, value }
    }
}

/// An email-only party reference (invoice billing and cc lists).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmailContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
