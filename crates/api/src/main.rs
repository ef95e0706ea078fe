use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wikidraft_api::config::ServerConfig;
use wikidraft_api::generator::HttpContentGenerator;
use wikidraft_api::router::build_app_router;
use wikidraft_api::state::AppState;
use wikidraft_core::generator::{ContentGenerator, UnconfiguredGenerator};
use wikidraft_core::memory::{InMemoryDraftStore, InMemoryVersionLog};
use wikidraft_core::store::{DraftStore, VersionLog};
use wikidraft_db::store::{PgDraftStore, PgVersionLog};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "wikidraft_api=debug,wikidraft_core=debug,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let drafts: Arc<dyn DraftStore>;
    let versions: Arc<dyn VersionLog>;
    let pool = match &config.database_url {
        Some(database_url) => {
            let pool = wikidraft_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            wikidraft_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            wikidraft_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            drafts = Arc::new(PgDraftStore::new(pool.clone()));
            versions = Arc::new(PgVersionLog::new(pool.clone()));
            Some(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage");
            drafts = Arc::new(InMemoryDraftStore::new());
            versions = Arc::new(InMemoryVersionLog::new());
            None
        }
    };

    // --- Content generator ---
    let generator: Arc<dyn ContentGenerator> = match &config.generator.url {
        Some(url) => {
            tracing::info!(
                url = %url,
                timeout_secs = config.generator.timeout_secs,
                "Content generator configured"
            );
            Arc::new(HttpContentGenerator::new(url.clone()))
        }
        None => {
            tracing::warn!("GENERATOR_URL not set, draft regeneration is disabled");
            Arc::new(UnconfiguredGenerator)
        }
    };

    // --- App state ---
    let shutdown = CancellationToken::new();
    let state = AppState {
        drafts,
        versions,
        generator,
        pool,
        config: Arc::new(config.clone()),
        shutdown: shutdown.clone(),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let drain = shutdown.clone();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { drain.cancelled().await })
            .await
    });

    shutdown_signal().await;
    // Stops accepting connections and aborts in-flight generator calls.
    shutdown.cancel();

    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    match tokio::time::timeout(grace, server).await {
        Ok(Ok(Ok(()))) => tracing::info!("Graceful shutdown complete"),
        Ok(Ok(Err(e))) => tracing::error!(error = %e, "Server error"),
        Ok(Err(e)) => tracing::error!(error = %e, "Server task failed"),
        Err(_) => tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "Shutdown grace period elapsed with requests still in flight"
        ),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
