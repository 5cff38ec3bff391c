use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::NaiveDateTime;
use serde::Deserialize;

use super::{actor_from_headers, require_role};
use crate::errors::AppError;
use crate::models::{BookingDetail, BookingStatus, Role};
use crate::services::bookings::{self, ListFilter};
use crate::state::AppState;

// POST /api/bookings
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub service_id: String,
    pub start_time: NaiveDateTime,
    /// Accepted for wire compatibility; the stored end time is always
    /// re-derived from the service duration.
    #[allow(dead_code)]
    pub end_time: Option<NaiveDateTime>,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingDetail>), AppError> {
    let actor = actor_from_headers(&headers)?;
    require_role(&actor, &[Role::Customer])?;

    let mut conn = state.db.lock().unwrap();
    let detail = bookings::create_booking(&mut conn, &actor, &body.service_id, body.start_time)?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/bookings/mine
pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<BookingDetail>>, AppError> {
    let actor = actor_from_headers(&headers)?;
    require_role(&actor, &[Role::Customer])?;

    let conn = state.db.lock().unwrap();
    let rows = bookings::list_my_bookings(&conn, &actor)?;
    Ok(Json(rows))
}

// PATCH /api/bookings/:id/status
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
    pub staff_id: Option<String>,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<BookingDetail>, AppError> {
    let actor = actor_from_headers(&headers)?;
    require_role(&actor, &[Role::BusinessAdmin, Role::Staff])?;

    let detail =
        bookings::update_booking_status(&state, &actor, &id, body.status, body.staff_id.as_deref())
            .await?;
    Ok(Json(detail))
}

// GET /api/business/bookings
#[derive(Deserialize)]
pub struct ListQuery {
    pub tab: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn business_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<BookingDetail>>, AppError> {
    let actor = actor_from_headers(&headers)?;
    require_role(&actor, &[Role::BusinessAdmin, Role::Staff])?;

    let filter = ListFilter {
        tab: query.tab,
        from: query.from.as_deref().map(parse_query_datetime).transpose()?,
        to: query.to.as_deref().map(parse_query_datetime).transpose()?,
    };

    let conn = state.db.lock().unwrap();
    let rows = bookings::list_business_bookings(&conn, &actor, &filter)?;
    Ok(Json(rows))
}

// GET /api/business/bookings/pending-count
pub async fn pending_count(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let actor = actor_from_headers(&headers)?;
    require_role(&actor, &[Role::BusinessAdmin, Role::Staff])?;

    let conn = state.db.lock().unwrap();
    let count = bookings::pending_count(&conn, &actor)?;
    Ok(Json(serde_json::json!({ "count": count })))
}

/// Range bounds arrive either as a full timestamp or a bare date, which is
/// taken as midnight.
fn parse_query_datetime(s: &str) -> Result<NaiveDateTime, AppError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(AppError::Validation(format!("invalid date: {s}")))
}
