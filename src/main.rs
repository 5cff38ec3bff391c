use std::sync::{Arc, Mutex};

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use bookwell::config::AppConfig;
use bookwell::db;
use bookwell::handlers;
use bookwell::services::assignment;
use bookwell::services::notify::DbNotificationSink;
use bookwell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let db = Arc::new(Mutex::new(conn));

    let policy = assignment::policy_from_name(&config.assignment_policy);
    tracing::info!("using '{}' assignment policy", config.assignment_policy);

    let state = Arc::new(AppState {
        db: Arc::clone(&db),
        config: config.clone(),
        assignment: policy,
        notifier: Box::new(DbNotificationSink::new(db)),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route("/api/bookings/mine", get(handlers::bookings::my_bookings))
        .route(
            "/api/bookings/:id/status",
            patch(handlers::bookings::update_status),
        )
        .route(
            "/api/business/bookings",
            get(handlers::bookings::business_bookings),
        )
        .route(
            "/api/business/bookings/pending-count",
            get(handlers::bookings::pending_count),
        )
        .route("/api/business/hours", get(handlers::business::get_hours))
        .route("/api/notifications", get(handlers::notifications::list))
        .route(
            "/api/notifications/:id/read",
            post(handlers::notifications::mark_read),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
