use std::net::SocketAddr;
use std::time::Duration;

use dotenvy::dotenv;
use student_portal::api::rate_limit::RateLimitConfig;
use student_portal::config::Config;
use student_portal::{api, app, db, seed, AppState, PasswordHasher, Repository, SqliteSessionStore};
use time::Duration as TimeDuration;
use tower_sessions::{ExpiredDeletion, Expiry, SessionManagerLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SESSION_CLEANUP_PERIOD: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    dotenv().ok();
    let config = Config::from_env()?;

    let conn = db::open(&config.database_url, config.db_max_connections).await?;
    let repo = Repository::new(conn.clone());
    let hasher = PasswordHasher::new(config.bcrypt_cost);

    if config.seed_sample_data && repo.count_users().await? == 0 {
        info!("Empty database, inserting sample data");
        seed::seed(&repo, &hasher, api::today()).await?;
    }

    let store = SqliteSessionStore::new(conn.clone());
    let cleanup = tokio::task::spawn(delete_expired_sessions(store.clone()));

    let sessions = SessionManagerLayer::new(store)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(TimeDuration::hours(
            config.session_inactivity_hours,
        )));

    let state = AppState::new(
        repo,
        hasher,
        RateLimitConfig {
            max_requests: config.rate_limit_max_requests,
            window: config.rate_limit_window,
            ..Default::default()
        },
    );

    let addr = config.bind_addr();
    info!("Server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app(state, sessions).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    cleanup.abort();
    conn.close().await?;
    info!("Database connection closed");

    Ok(())
}

async fn delete_expired_sessions(store: SqliteSessionStore) {
    let mut interval = tokio::time::interval(SESSION_CLEANUP_PERIOD);
    loop {
        interval.tick().await;
        if let Err(e) = store.delete_expired().await {
            warn!("Failed to delete expired sessions: {}", e);
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
