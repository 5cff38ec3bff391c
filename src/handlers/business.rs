use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use super::{actor_from_headers, require_role};
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{DayHours, Role};
use crate::state::AppState;

// GET /api/business/hours
pub async fn get_hours(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<DayHours>>, AppError> {
    let actor = actor_from_headers(&headers)?;
    require_role(&actor, &[Role::BusinessAdmin, Role::Staff])?;

    let business_id = actor
        .business_id
        .as_deref()
        .ok_or_else(|| AppError::Validation("No business associated with this account".to_string()))?;

    let conn = state.db.lock().unwrap();
    let hours = queries::get_business_hours(&conn, business_id)?;
    Ok(Json(hours))
}
