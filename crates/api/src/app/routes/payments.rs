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
    Router::new().route("/", post(record_payment))
}

pub async fn record_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(group_id): Path<GroupId>,
    Json(body): Json<dto::RecordPaymentRequest>,
) -> axum::response::Response {
    let ledger = match services.group(group_id) {
        Some(ledger) => ledger,
        None => return errors::group_not_found(),
    };

    match ledger.pay(
        ParticipantId::from(body.payer),
        ParticipantId::from(body.payee),
        body.amount,
    ) {
        Ok(txn) => (StatusCode::CREATED, Json(txn)).into_response(),
        Err(err) => errors::ledger_error_to_response(err),
    }
}
