use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::assignment::AssignmentPolicy;
use crate::services::notify::NotificationSink;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub assignment: Box<dyn AssignmentPolicy>,
    pub notifier: Box<dyn NotificationSink>,
}
