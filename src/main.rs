//! VentyTime event platform
//!
//! Main application entry point

use std::time::Duration;
use tracing::info;

use VentyTime::{
    config::Settings,
    database::{connection::create_pool, run_migrations, DatabaseService},
    handlers::{self, AppState},
    middleware::{RateLimitConfig, RateLimiter},
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenv::dotenv().ok();
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    logging::init_logging(&settings.logging)?;

    info!("Starting VentyTime server...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = VentyTime::database::connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        acquire_timeout: Duration::from_secs(30),
        idle_timeout: Some(Duration::from_secs(600)),
        max_lifetime: Some(Duration::from_secs(1800)),
    };
    let db_pool = create_pool(&db_config).await?;

    // Run database migrations
    run_migrations(&db_pool).await?;

    // Initialize services
    info!("Initializing services...");
    let database_service = DatabaseService::new(db_pool.clone());
    let services = ServiceFactory::new(settings.clone(), database_service)?;

    // Login throttling
    let login_limiter = RateLimiter::new(RateLimitConfig {
        max_requests: settings.security.login_rate_limit,
        window_duration: Duration::from_secs(settings.security.login_rate_window_seconds),
        burst_allowance: 0,
    });

    // Ensure the upload directory exists before serving from it
    tokio::fs::create_dir_all(&settings.uploads.directory).await?;

    let state = AppState {
        settings: settings.clone(),
        services,
        login_limiter,
        pool: db_pool,
    };

    let app = handlers::router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("VentyTime server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("VentyTime server has been shut down.");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown handler");
        return;
    }
    info!("Shutdown signal received");
}
