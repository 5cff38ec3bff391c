use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use super::actor_from_headers;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::Notification;
use crate::state::AppState;

// GET /api/notifications
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Notification>>, AppError> {
    let actor = actor_from_headers(&headers)?;

    let conn = state.db.lock().unwrap();
    let notes =
        queries::list_notifications(&conn, &actor.id, actor.business_id.as_deref(), 20)?;
    Ok(Json(notes))
}

// POST /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    actor_from_headers(&headers)?;

    let updated = {
        let conn = state.db.lock().unwrap();
        queries::mark_notification_read(&conn, &id)?
    };

    if updated {
        Ok(Json(serde_json::json!({ "ok": true })))
    } else {
        Err(AppError::NotFound("notification".to_string()))
    }
}
