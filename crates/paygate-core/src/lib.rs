//! # paygate-core: Request-Scoped Primitives
//!
//! Small, I/O-free building blocks shared by the provider client and the
//! web front-end. Everything here lives for a single request/response cycle.
//!
//! ## Key Design Principles
//!
//! 1. **`PrettyJson` newtype.** Every JSON string shown to a user flows
//!    through `PrettyJson::new()`, which fixes the indent width at two
//!    spaces. No ad-hoc `to_string_pretty` calls in handlers.
//!
//! 2. **UTC-only defaults.** Date defaults are computed from an explicit
//!    `DateTime<Utc>` argument so callers (and tests) control "now".
//!
//! 3. **Blank means absent.** HTML forms submit empty strings for untouched
//!    inputs; [`form::empty_as_none`] collapses them to `None` so that a
//!    blank field and a missing field take the same code path.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `paygate-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod form;
pub mod pretty;
pub mod temporal;

pub use form::empty_as_none;
pub use pretty::PrettyJson;
pub use temporal::{default_agreement_start, default_search_range, DateRange};
