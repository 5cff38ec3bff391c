use chrono::{Duration, NaiveDateTime, Utc};
use rusqlite::Connection;

use crate::db::queries;
use crate::db::queries::BookingListSpec;
use crate::errors::AppError;
use crate::models::{
    hours, Actor, Booking, BookingDetail, BookingStatus, NewNotification, Role,
};
use crate::state::AppState;

const LIST_CAP: i64 = 100;

/// Create a booking as the acting customer. The service lookup, hours
/// validation, and insert run in one transaction so a failed hours check can
/// never leave a partial booking behind.
pub fn create_booking(
    conn: &mut Connection,
    actor: &Actor,
    service_id: &str,
    start_time: NaiveDateTime,
) -> Result<BookingDetail, AppError> {
    let tx = conn.transaction().map_err(AppError::Database)?;

    let service = queries::get_service(&tx, service_id)?
        .ok_or_else(|| AppError::NotFound("service".to_string()))?;
    if !service.is_active {
        return Err(AppError::Validation(
            "Service is not currently bookable".to_string(),
        ));
    }

    let day = hours::weekday_of(&start_time);
    // A missing hours row means no restriction for that weekday.
    if let Some(day_hours) = queries::get_day_hours(&tx, &service.business_id, day)? {
        if !day_hours.is_open {
            return Err(AppError::BusinessClosed(
                "The business is closed on that day".to_string(),
            ));
        }
        if !day_hours.contains(&start_time)? {
            return Err(AppError::BusinessClosed(format!(
                "That time is outside business hours ({})",
                day_hours.window()
            )));
        }
    }

    let now = Utc::now().naive_utc();
    let booking = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: actor.id.clone(),
        service_id: service.id.clone(),
        start_time,
        end_time: start_time + Duration::minutes(service.duration_minutes as i64),
        status: BookingStatus::Pending,
        accepted_by_id: None,
        created_at: now,
        updated_at: now,
    };
    queries::insert_booking(&tx, &booking)?;

    let detail = queries::get_booking_detail(&tx, &booking.id)?
        .ok_or_else(|| AppError::NotFound("booking".to_string()))?;

    tx.commit().map_err(AppError::Database)?;

    tracing::info!(booking_id = %detail.booking.id, service = %detail.service_name, "booking created");
    Ok(detail)
}

/// Drive a booking through one status transition, gated by the actor's role
/// and (for assignment) the configured policy. A transition landing on
/// ASSIGNED emits a best-effort notification after the commit.
pub async fn update_booking_status(
    state: &AppState,
    actor: &Actor,
    booking_id: &str,
    requested: BookingStatus,
    staff_id: Option<&str>,
) -> Result<BookingDetail, AppError> {
    let (updated, note) = {
        let conn = state.db.lock().unwrap();

        if !matches!(actor.role, Role::BusinessAdmin | Role::Staff) {
            return Err(AppError::Forbidden(
                "Role not permitted to update booking status".to_string(),
            ));
        }

        let detail = queries::get_booking_detail(&conn, booking_id)?
            .ok_or_else(|| AppError::NotFound("booking".to_string()))?;

        // Bookings of other tenants are indistinguishable from missing ones.
        if actor.business_id.as_deref() != Some(detail.business_id.as_str()) {
            return Err(AppError::NotFound("booking".to_string()));
        }

        let accepted_by = match (actor.role, requested) {
            (Role::BusinessAdmin | Role::Staff, BookingStatus::Assigned) => Some(
                state
                    .assignment
                    .resolve_assignee(&conn, &detail, actor, staff_id)?,
            ),
            (Role::BusinessAdmin, _) => None,
            (Role::Staff, BookingStatus::Completed) => None,
            (Role::Staff, _) => {
                return Err(AppError::Forbidden(
                    "Staff can only update status to COMPLETED".to_string(),
                ));
            }
            _ => {
                return Err(AppError::Forbidden(
                    "Role not permitted to update booking status".to_string(),
                ));
            }
        };

        queries::set_booking_status(&conn, booking_id, requested, accepted_by.as_deref())?;

        let updated = queries::get_booking_detail(&conn, booking_id)?
            .ok_or_else(|| AppError::NotFound("booking".to_string()))?;

        let note = (requested == BookingStatus::Assigned).then(|| NewNotification {
            title: "Booking assigned".to_string(),
            message: format!(
                "{} was assigned to {}'s {} booking",
                updated.assignee_name.as_deref().unwrap_or("A staff member"),
                updated.customer_name,
                updated.service_name
            ),
            kind: "BOOKING_ASSIGNED".to_string(),
            business_id: Some(updated.business_id.clone()),
            user_id: None,
        });

        (updated, note)
    };

    if let Some(note) = note {
        // Best-effort: the status change is already committed and stands
        // regardless of whether the notification lands.
        if let Err(e) = state.notifier.deliver(note).await {
            tracing::warn!(booking_id = %booking_id, "failed to deliver assignment notification: {e}");
        }
    }

    tracing::info!(booking_id = %booking_id, status = requested.as_str(), "booking status updated");
    Ok(updated)
}

#[derive(Debug, Default)]
pub struct ListFilter {
    pub tab: Option<String>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

/// Bookings for the actor's business, newest start first, capped at 100.
/// An explicit date range wins over the tab; staff only ever see bookings
/// assigned to them.
pub fn list_business_bookings(
    conn: &Connection,
    actor: &Actor,
    filter: &ListFilter,
) -> Result<Vec<BookingDetail>, AppError> {
    let business_id = actor_business(actor)?;

    let upcoming = vec![
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Assigned,
    ];
    let start_of_today = Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap_or_else(|| Utc::now().naive_utc());

    let explicit_range = filter.from.is_some() || filter.to.is_some();
    let (statuses, from, to) = if explicit_range {
        (None, filter.from, filter.to)
    } else {
        match filter.tab.as_deref() {
            Some("past") => (None, None, Some(start_of_today)),
            Some("cancelled") => (
                Some(vec![BookingStatus::Cancelled, BookingStatus::Rejected]),
                None,
                None,
            ),
            Some("all") => (None, None, None),
            Some("upcoming") => (Some(upcoming.clone()), Some(start_of_today), None),
            // No tab at all: upcoming statuses over a trailing 30-day window.
            _ => (
                Some(upcoming.clone()),
                Some(Utc::now().naive_utc() - Duration::days(30)),
                None,
            ),
        }
    };

    let mut spec = BookingListSpec {
        statuses,
        start_from: from,
        start_to: to,
        accepted_by: None,
        limit: LIST_CAP,
    };

    if actor.role == Role::Staff {
        spec.accepted_by = Some(actor.id.clone());
        // On the upcoming view, unassigned pending/confirmed bookings are
        // invisible to staff.
        let upcoming_view =
            !explicit_range && matches!(filter.tab.as_deref(), Some("upcoming") | None);
        if upcoming_view {
            spec.statuses = Some(vec![BookingStatus::Assigned]);
        }
    }

    Ok(queries::list_business_bookings(conn, business_id, &spec)?)
}

pub fn pending_count(conn: &Connection, actor: &Actor) -> Result<i64, AppError> {
    let business_id = actor_business(actor)?;
    Ok(queries::count_pending_bookings(conn, business_id)?)
}

/// The acting customer's own bookings, newest start first.
pub fn list_my_bookings(conn: &Connection, actor: &Actor) -> Result<Vec<BookingDetail>, AppError> {
    Ok(queries::list_customer_bookings(conn, &actor.id)?)
}

fn actor_business(actor: &Actor) -> Result<&str, AppError> {
    actor
        .business_id
        .as_deref()
        .ok_or_else(|| AppError::Validation("No business associated with this account".to_string()))
}
