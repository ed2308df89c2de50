//! # Form & Query Extraction
//!
//! Handlers take `Result<Form<T>, FormRejection>` / `Result<Query<T>,
//! QueryRejection>` and unwrap them here so a malformed submission becomes
//! an [`AppError`] with the JSON error body instead of axum's plain-text
//! rejection.

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query};

use crate::error::AppError;

/// Extract a form body.
///
/// A body that decodes but does not fit `T` is a `Validation` error; a
/// wrong content type or unreadable body is a `BadRequest`.
pub fn extract_form<T>(result: Result<Form<T>, FormRejection>) -> Result<T, AppError> {
    result.map(|Form(v)| v).map_err(|err| match err {
        FormRejection::FailedToDeserializeForm(_)
        | FormRejection::FailedToDeserializeFormBody(_) => AppError::Validation(err.body_text()),
        other => AppError::BadRequest(other.body_text()),
    })
}

/// Extract query parameters, mapping decode failures to `Validation`.
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result
        .map(|Query(v)| v)
        .map_err(|err| AppError::Validation(err.body_text()))
}
