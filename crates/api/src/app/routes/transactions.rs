use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};

use fairshare_core::{GroupId, ParticipantId, TransactionId};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_transactions))
        .route("/:id", delete(revert_transaction))
}

pub async fn list_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Path(group_id): Path<GroupId>,
    Query(query): Query<dto::TransactionsQuery>,
) -> axum::response::Response {
    let ledger = match services.group(group_id) {
        Some(ledger) => ledger,
        None => return errors::group_not_found(),
    };

    let items = match query.payer {
        Some(payer) => ledger.transactions_by_payer(&ParticipantId::from(payer)),
        None => ledger.all_transactions(),
    };

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn revert_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Path((group_id, id)): Path<(GroupId, u64)>,
) -> axum::response::Response {
    let ledger = match services.group(group_id) {
        Some(ledger) => ledger,
        None => return errors::group_not_found(),
    };

    match ledger.revert(TransactionId::new(id)) {
        Ok(txn) => (StatusCode::OK, Json(txn)).into_response(),
        Err(err) => errors::ledger_error_to_response(err),
    }
}
