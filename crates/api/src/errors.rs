//! Mapping from domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use simplebank_core::DomainError;

/// Map a domain error to its HTTP response.
///
/// Every business failure maps to exactly one status. `InsufficientFunds` is
/// special-cased to a plain-text body because its message text is part of
/// the contract; everything else uses the JSON error envelope.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::InvalidAmount => {
            json_error(StatusCode::BAD_REQUEST, "invalid_amount", err.to_string())
        }
        DomainError::InsufficientFunds { .. } => {
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        DomainError::CurrencyMismatch => {
            json_error(StatusCode::BAD_REQUEST, "currency_mismatch", err.to_string())
        }
        DomainError::AccountNotFound => {
            json_error(StatusCode::NOT_FOUND, "account_not_found", err.to_string())
        }
        DomainError::UserNotFound => {
            json_error(StatusCode::NOT_FOUND, "user_not_found", err.to_string())
        }
        DomainError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string()),
        DomainError::Unauthorized => {
            json_error(StatusCode::UNAUTHORIZED, "unauthorized", err.to_string())
        }
        DomainError::Conflict(_) => {
            json_error(StatusCode::BAD_REQUEST, "username_taken", err.to_string())
        }
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::Storage(msg) => {
            tracing::error!(error = %msg, "storage failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "service failure",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
