use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{
    Booking, BookingDetail, BookingStatus, DayHours, NewNotification, Notification, Service, User,
};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

fn fmt_dt(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

fn parse_dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT).unwrap_or_else(|_| Utc::now().naive_utc())
}

// ── Services ──

pub fn get_service(conn: &Connection, id: &str) -> anyhow::Result<Option<Service>> {
    let result = conn.query_row(
        "SELECT id, business_id, name, duration_minutes, price, is_active
         FROM services WHERE id = ?1 AND deleted_at IS NULL",
        params![id],
        |row| {
            Ok(Service {
                id: row.get(0)?,
                business_id: row.get(1)?,
                name: row.get(2)?,
                duration_minutes: row.get(3)?,
                price: row.get(4)?,
                is_active: row.get::<_, i32>(5)? != 0,
            })
        },
    );

    match result {
        Ok(service) => Ok(Some(service)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Business hours ──

pub fn get_business_hours(conn: &Connection, business_id: &str) -> anyhow::Result<Vec<DayHours>> {
    let mut stmt = conn.prepare(
        "SELECT day_of_week, is_open, start_time, end_time
         FROM business_hours WHERE business_id = ?1 ORDER BY day_of_week ASC",
    )?;

    let rows = stmt.query_map(params![business_id], |row| {
        Ok(DayHours {
            day_of_week: row.get::<_, i32>(0)? as u8,
            is_open: row.get::<_, i32>(1)? != 0,
            start_time: row.get(2)?,
            end_time: row.get(3)?,
        })
    })?;

    let mut hours = vec![];
    for row in rows {
        hours.push(row?);
    }
    Ok(hours)
}

pub fn get_day_hours(
    conn: &Connection,
    business_id: &str,
    day_of_week: u8,
) -> anyhow::Result<Option<DayHours>> {
    let result = conn.query_row(
        "SELECT day_of_week, is_open, start_time, end_time
         FROM business_hours WHERE business_id = ?1 AND day_of_week = ?2",
        params![business_id, day_of_week as i32],
        |row| {
            Ok(DayHours {
                day_of_week: row.get::<_, i32>(0)? as u8,
                is_open: row.get::<_, i32>(1)? != 0,
                start_time: row.get(2)?,
                end_time: row.get(3)?,
            })
        },
    );

    match result {
        Ok(hours) => Ok(Some(hours)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Users ──

pub fn get_user(conn: &Connection, id: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, name, email, role, business_id
         FROM users WHERE id = ?1 AND deleted_at IS NULL",
        params![id],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        },
    );

    match result {
        Ok((id, name, email, role_str, business_id)) => {
            let role = crate::models::Role::parse(&role_str)
                .ok_or_else(|| anyhow::anyhow!("unknown role in users table: {role_str}"))?;
            Ok(Some(User {
                id,
                name,
                email,
                role,
                business_id,
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Bookings ──

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, user_id, service_id, start_time, end_time, status, accepted_by_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            booking.id,
            booking.user_id,
            booking.service_id,
            fmt_dt(&booking.start_time),
            fmt_dt(&booking.end_time),
            booking.status.as_str(),
            booking.accepted_by_id,
            fmt_dt(&booking.created_at),
            fmt_dt(&booking.updated_at),
        ],
    )?;
    Ok(())
}

const DETAIL_SELECT: &str = "SELECT b.id, b.user_id, b.service_id, b.start_time, b.end_time, b.status, b.accepted_by_id,
        b.created_at, b.updated_at, s.business_id, s.name, c.name, a.name
 FROM bookings b
 JOIN services s ON s.id = b.service_id
 JOIN users c ON c.id = b.user_id
 LEFT JOIN users a ON a.id = b.accepted_by_id";

fn parse_detail_row(row: &rusqlite::Row) -> anyhow::Result<BookingDetail> {
    let status_str: String = row.get(5)?;
    let status = BookingStatus::parse(&status_str)
        .ok_or_else(|| anyhow::anyhow!("unknown booking status: {status_str}"))?;

    Ok(BookingDetail {
        booking: Booking {
            id: row.get(0)?,
            user_id: row.get(1)?,
            service_id: row.get(2)?,
            start_time: parse_dt(&row.get::<_, String>(3)?),
            end_time: parse_dt(&row.get::<_, String>(4)?),
            status,
            accepted_by_id: row.get(6)?,
            created_at: parse_dt(&row.get::<_, String>(7)?),
            updated_at: parse_dt(&row.get::<_, String>(8)?),
        },
        business_id: row.get(9)?,
        service_name: row.get(10)?,
        customer_name: row.get(11)?,
        assignee_name: row.get(12)?,
    })
}

pub fn get_booking_detail(conn: &Connection, id: &str) -> anyhow::Result<Option<BookingDetail>> {
    let sql = format!("{DETAIL_SELECT} WHERE b.id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_detail_row(row)));

    match result {
        Ok(detail) => Ok(Some(detail?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Persist a transition in a single UPDATE. `accepted_by` is only written
/// when provided; it is never reset to NULL by later transitions.
pub fn set_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
    accepted_by: Option<&str>,
) -> anyhow::Result<bool> {
    let now = fmt_dt(&Utc::now().naive_utc());
    let count = match accepted_by {
        Some(staff_id) => conn.execute(
            "UPDATE bookings SET status = ?1, accepted_by_id = ?2, updated_at = ?3 WHERE id = ?4",
            params![status.as_str(), staff_id, now, id],
        )?,
        None => conn.execute(
            "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), now, id],
        )?,
    };
    Ok(count > 0)
}

/// Structured filter for the business listing. Interpretation of tabs and
/// default windows happens in the service layer; this just builds SQL.
#[derive(Debug, Default)]
pub struct BookingListSpec {
    pub statuses: Option<Vec<BookingStatus>>,
    pub start_from: Option<NaiveDateTime>,
    pub start_to: Option<NaiveDateTime>,
    pub accepted_by: Option<String>,
    pub limit: i64,
}

pub fn list_business_bookings(
    conn: &Connection,
    business_id: &str,
    spec: &BookingListSpec,
) -> anyhow::Result<Vec<BookingDetail>> {
    let mut sql = format!("{DETAIL_SELECT} WHERE s.business_id = ?1");
    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> =
        vec![Box::new(business_id.to_string())];

    if let Some(statuses) = &spec.statuses {
        let placeholders: Vec<String> = statuses
            .iter()
            .map(|s| {
                params_vec.push(Box::new(s.as_str().to_string()));
                format!("?{}", params_vec.len())
            })
            .collect();
        sql.push_str(&format!(" AND b.status IN ({})", placeholders.join(", ")));
    }

    if let Some(from) = &spec.start_from {
        params_vec.push(Box::new(fmt_dt(from)));
        sql.push_str(&format!(" AND b.start_time >= ?{}", params_vec.len()));
    }

    if let Some(to) = &spec.start_to {
        params_vec.push(Box::new(fmt_dt(to)));
        sql.push_str(&format!(" AND b.start_time <= ?{}", params_vec.len()));
    }

    if let Some(staff_id) = &spec.accepted_by {
        params_vec.push(Box::new(staff_id.clone()));
        sql.push_str(&format!(" AND b.accepted_by_id = ?{}", params_vec.len()));
    }

    params_vec.push(Box::new(spec.limit));
    sql.push_str(&format!(
        " ORDER BY b.start_time DESC LIMIT ?{}",
        params_vec.len()
    ));

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_detail_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn list_customer_bookings(conn: &Connection, user_id: &str) -> anyhow::Result<Vec<BookingDetail>> {
    let sql = format!("{DETAIL_SELECT} WHERE b.user_id = ?1 ORDER BY b.start_time DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], |row| Ok(parse_detail_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn count_pending_bookings(conn: &Connection, business_id: &str) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings b
         JOIN services s ON s.id = b.service_id
         WHERE s.business_id = ?1 AND b.status = 'PENDING'",
        params![business_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Half-open interval overlap against the staff member's other ASSIGNED
/// bookings: existing.start < candidate.end AND existing.end > candidate.start.
pub fn staff_has_overlapping_assignment(
    conn: &Connection,
    staff_id: &str,
    start: &NaiveDateTime,
    end: &NaiveDateTime,
    exclude_booking_id: &str,
) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings
         WHERE accepted_by_id = ?1 AND status = 'ASSIGNED' AND id != ?2
           AND start_time < ?3 AND end_time > ?4",
        params![staff_id, exclude_booking_id, fmt_dt(end), fmt_dt(start)],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

// ── Notifications ──

pub fn insert_notification(conn: &Connection, note: &NewNotification) -> anyhow::Result<String> {
    let id = uuid::Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO notifications (id, title, message, kind, business_id, user_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            note.title,
            note.message,
            note.kind,
            note.business_id,
            note.user_id,
        ],
    )?;
    Ok(id)
}

pub fn list_notifications(
    conn: &Connection,
    user_id: &str,
    business_id: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Notification>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, message, kind, business_id, user_id, is_read, created_at
         FROM notifications
         WHERE user_id = ?1 OR (business_id IS NOT NULL AND business_id = ?2)
         ORDER BY created_at DESC LIMIT ?3",
    )?;

    let rows = stmt.query_map(params![user_id, business_id, limit], |row| {
        Ok(Notification {
            id: row.get(0)?,
            title: row.get(1)?,
            message: row.get(2)?,
            kind: row.get(3)?,
            business_id: row.get(4)?,
            user_id: row.get(5)?,
            is_read: row.get::<_, i32>(6)? != 0,
            created_at: parse_dt(&row.get::<_, String>(7)?),
        })
    })?;

    let mut notes = vec![];
    for row in rows {
        notes.push(row?);
    }
    Ok(notes)
}

pub fn mark_notification_read(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE notifications SET is_read = 1 WHERE id = ?1",
        params![id],
    )?;
    Ok(count > 0)
}
