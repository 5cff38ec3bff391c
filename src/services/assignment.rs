use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Actor, BookingDetail, BookingStatus, Role};

/// Decides who may move a booking into ASSIGNED and which staff member it
/// lands on. Two implementations exist because the product has supported
/// both at different times; the active one is chosen from config at startup.
pub trait AssignmentPolicy: Send + Sync {
    fn resolve_assignee(
        &self,
        conn: &Connection,
        booking: &BookingDetail,
        actor: &Actor,
        staff_id: Option<&str>,
    ) -> Result<String, AppError>;
}

/// Only business admins assign, and they must name the staff member.
pub struct AdminAssigns;

impl AssignmentPolicy for AdminAssigns {
    fn resolve_assignee(
        &self,
        conn: &Connection,
        booking: &BookingDetail,
        actor: &Actor,
        staff_id: Option<&str>,
    ) -> Result<String, AppError> {
        match actor.role {
            Role::BusinessAdmin => admin_pick_staff(conn, booking, staff_id),
            _ => Err(AppError::Forbidden(
                "Only business admins can assign bookings to staff".to_string(),
            )),
        }
    }
}

/// Staff accept confirmed bookings onto themselves, guarded by an overlap
/// check against their other assigned bookings. Admins can still assign
/// directly.
pub struct StaffSelfAccepts;

impl AssignmentPolicy for StaffSelfAccepts {
    fn resolve_assignee(
        &self,
        conn: &Connection,
        booking: &BookingDetail,
        actor: &Actor,
        staff_id: Option<&str>,
    ) -> Result<String, AppError> {
        match actor.role {
            Role::BusinessAdmin => admin_pick_staff(conn, booking, staff_id),
            Role::Staff => {
                if booking.booking.status != BookingStatus::Confirmed {
                    return Err(AppError::Forbidden(
                        "Only confirmed bookings can be accepted".to_string(),
                    ));
                }
                let overlaps = queries::staff_has_overlapping_assignment(
                    conn,
                    &actor.id,
                    &booking.booking.start_time,
                    &booking.booking.end_time,
                    &booking.booking.id,
                )?;
                if overlaps {
                    return Err(AppError::Conflict(
                        "You already have an assigned booking overlapping this time".to_string(),
                    ));
                }
                Ok(actor.id.clone())
            }
            _ => Err(AppError::Forbidden(
                "Only business admins can assign bookings to staff".to_string(),
            )),
        }
    }
}

/// Resolve and sanity-check the staff member named in an admin assignment:
/// they must exist, hold the STAFF role, and belong to the booking's business.
fn admin_pick_staff(
    conn: &Connection,
    booking: &BookingDetail,
    staff_id: Option<&str>,
) -> Result<String, AppError> {
    let staff_id = staff_id.ok_or_else(|| {
        AppError::Validation("staff_id is required when assigning a booking".to_string())
    })?;

    let staff = queries::get_user(conn, staff_id)?
        .ok_or_else(|| AppError::NotFound("staff member".to_string()))?;

    if staff.role != Role::Staff {
        return Err(AppError::Validation(
            "Assignee must be a staff member".to_string(),
        ));
    }
    if staff.business_id.as_deref() != Some(booking.business_id.as_str()) {
        return Err(AppError::Validation(
            "Assignee does not belong to this business".to_string(),
        ));
    }

    Ok(staff.id)
}

pub fn policy_from_name(name: &str) -> Box<dyn AssignmentPolicy> {
    match name {
        "self-accept" => Box::new(StaffSelfAccepts),
        _ => Box::new(AdminAssigns),
    }
}
