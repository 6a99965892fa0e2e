use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use fairshare_core::LedgerError;

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        LedgerError::InvalidAmount | LedgerError::EmptyBeneficiaries => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", message)
        }
        LedgerError::AlreadyRegistered(_) => json_error(StatusCode::CONFLICT, "conflict", message),
        LedgerError::NotRegistered(_) | LedgerError::TransactionNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", message)
        }
        LedgerError::InsufficientDebt { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "insufficient_debt", message)
        }
    }
}

pub fn group_not_found() -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "group not found")
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
