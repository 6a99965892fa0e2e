use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::services::AppServices;

pub async fn create_group(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let id = services.create_group();
    tracing::info!(group = %id, "group created");

    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "group_id": id.to_string() })),
    )
        .into_response()
}

pub async fn list_groups(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let items = services
        .list_groups()
        .into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>();

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}
