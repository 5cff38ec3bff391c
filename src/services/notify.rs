use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;

use crate::db::queries;
use crate::models::NewNotification;

/// Write-only side-effect channel. Delivery is best-effort: callers log
/// failures and carry on, they never roll back the operation that
/// triggered the notification.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, note: NewNotification) -> anyhow::Result<()>;
}

/// Default sink: a row in the notifications table, picked up by the
/// notification list endpoint.
pub struct DbNotificationSink {
    db: Arc<Mutex<Connection>>,
}

impl DbNotificationSink {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationSink for DbNotificationSink {
    async fn deliver(&self, note: NewNotification) -> anyhow::Result<()> {
        let conn = self.db.lock().unwrap();
        queries::insert_notification(&conn, &note)?;
        Ok(())
    }
}
