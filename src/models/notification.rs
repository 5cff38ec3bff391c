use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub business_id: Option<String>,
    pub user_id: Option<String>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

/// Payload handed to the notification sink. Either a business-wide or a
/// per-user address, never both.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub kind: String,
    pub business_id: Option<String>,
    pub user_id: Option<String>,
}
