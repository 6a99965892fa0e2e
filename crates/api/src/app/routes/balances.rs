use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use fairshare_core::{GroupId, ParticipantId};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/:id", get(get_balance))
}

pub async fn get_balance(
    Extension(services): Extension<Arc<AppServices>>,
    Path((group_id, id)): Path<(GroupId, String)>,
) -> axum::response::Response {
    let ledger = match services.group(group_id) {
        Some(ledger) => ledger,
        None => return errors::group_not_found(),
    };

    match ledger.balance_of(&ParticipantId::from(id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => errors::ledger_error_to_response(err),
    }
}
