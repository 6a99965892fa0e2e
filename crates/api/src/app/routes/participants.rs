use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
    Json, Router,
};

use fairshare_core::{GroupId, ParticipantId};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_participant).get(list_participants))
        .route("/:id", delete(remove_participant))
}

pub async fn register_participant(
    Extension(services): Extension<Arc<AppServices>>,
    Path(group_id): Path<GroupId>,
    Json(body): Json<dto::RegisterParticipantRequest>,
) -> axum::response::Response {
    let ledger = match services.group(group_id) {
        Some(ledger) => ledger,
        None => return errors::group_not_found(),
    };

    if body.id.trim().is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "participant id cannot be empty",
        );
    }

    match ledger.register(ParticipantId::from(body.id)) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(err) => errors::ledger_error_to_response(err),
    }
}

pub async fn list_participants(
    Extension(services): Extension<Arc<AppServices>>,
    Path(group_id): Path<GroupId>,
) -> axum::response::Response {
    let ledger = match services.group(group_id) {
        Some(ledger) => ledger,
        None => return errors::group_not_found(),
    };

    let items = ledger
        .participants()
        .into_iter()
        .map(|id| id.as_str().to_string())
        .collect::<Vec<_>>();

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn remove_participant(
    Extension(services): Extension<Arc<AppServices>>,
    Path((group_id, id)): Path<(GroupId, String)>,
) -> axum::response::Response {
    let ledger = match services.group(group_id) {
        Some(ledger) => ledger,
        None => return errors::group_not_found(),
    };

    match ledger.remove(&ParticipantId::from(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::ledger_error_to_response(err),
    }
}
