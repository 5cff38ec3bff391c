pub mod bookings;
pub mod business;
pub mod health;
pub mod notifications;

use axum::http::HeaderMap;

use crate::errors::AppError;
use crate::models::{Actor, Role};

/// Pull the authenticated actor out of the headers set by the auth layer
/// in front of this service. Requests without a usable identity are 401s.
pub fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, AppError> {
    let id = headers
        .get("x-actor-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let role = headers
        .get("x-actor-role")
        .and_then(|v| v.to_str().ok())
        .and_then(Role::parse)
        .ok_or(AppError::Unauthorized)?;

    let business_id = headers
        .get("x-actor-business-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string());

    Ok(Actor {
        id: id.to_string(),
        role,
        business_id,
    })
}

pub fn require_role(actor: &Actor, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&actor.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "{} role is not allowed here",
            actor.role.as_str()
        )))
    }
}
