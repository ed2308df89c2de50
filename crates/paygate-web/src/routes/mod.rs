//! # Route Modules
//!
//! - `invoices`: draft invoice creation and sending.
//! - `plans`: billing plan list, creation, activation and detail.
//! - `agreements`: billing agreement creation, detail, transaction search,
//!   execution, cancellation and suspension.
//! - `pages`: index, credential check and the approval callbacks the
//!   provider redirects the payer to.
//!
//! Every handler makes at most one provider call and renders exactly one
//! page. A failed provider call is a rendered page, not an `AppError`.

pub mod agreements;
pub mod invoices;
pub mod pages;
pub mod plans;
