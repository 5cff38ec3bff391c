use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// "admin" (the default) or "self-accept"; picks which assignment
    /// policy is wired up at startup.
    pub assignment_policy: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "bookwell.db".to_string()),
            assignment_policy: env::var("ASSIGNMENT_POLICY")
                .unwrap_or_else(|_| "admin".to_string()),
        }
    }
}
