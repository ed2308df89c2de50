//! # Pretty-Printed JSON: Fixed-Indent Display Strings
//!
//! Defines `PrettyJson`, the sole construction path for JSON text that is
//! rendered back to a user (provider results and provider errors).
//!
//! ## Invariant
//!
//! The inner `String` is private. The only constructors serialize through
//! `serde_json`'s pretty formatter with a two-space indent, so every
//! displayed payload has the same shape regardless of which handler built it.
//!
//! Key order follows the source value. With the workspace's
//! `preserve_order` feature, a provider response is shown in the order the
//! provider sent it.
//!
//! Re-printing is idempotent: parsing a `PrettyJson` string and pretty
//! printing the result yields the identical string.

use serde::Serialize;
use serde_json::Value;

/// JSON text indented with two spaces per level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PrettyJson(String);

impl PrettyJson {
    /// Serialize any value as two-space indented JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json::Error` if `value`'s `Serialize`
    /// implementation fails (e.g. a map with non-string keys).
    pub fn new<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_string_pretty(value).map(Self)
    }

    /// Pretty-print an already-parsed JSON tree.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::new(value)
    }

    /// Re-indent raw JSON text.
    pub fn reformat(raw: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(&value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PrettyJson {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PrettyJson {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
