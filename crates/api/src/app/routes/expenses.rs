use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use fairshare_core::{GroupId, ParticipantId};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(record_expense))
        .route("/on-behalf", post(record_expense_for))
}

pub async fn record_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Path(group_id): Path<GroupId>,
    Json(body): Json<dto::RecordExpenseRequest>,
) -> axum::response::Response {
    let ledger = match services.group(group_id) {
        Some(ledger) => ledger,
        None => return errors::group_not_found(),
    };

    let beneficiaries = dto::to_beneficiaries(body.beneficiaries);
    match ledger.record_expense(ParticipantId::from(body.payer), body.amount, beneficiaries) {
        Ok(txn) => (StatusCode::CREATED, Json(txn)).into_response(),
        Err(err) => errors::ledger_error_to_response(err),
    }
}

pub async fn record_expense_for(
    Extension(services): Extension<Arc<AppServices>>,
    Path(group_id): Path<GroupId>,
    Json(body): Json<dto::RecordExpenseForRequest>,
) -> axum::response::Response {
    let ledger = match services.group(group_id) {
        Some(ledger) => ledger,
        None => return errors::group_not_found(),
    };

    match ledger.record_expense_for(ParticipantId::from(body.beneficiary), body.amount) {
        Ok(txn) => (StatusCode::CREATED, Json(txn)).into_response(),
        Err(err) => errors::ledger_error_to_response(err),
    }
}
