use std::sync::Arc;

use football_stats_api::api::{self, AppState};
use football_stats_api::config::Config;
use football_stats_api::infrastructure::repositories::PostgresStatsRepository;
use football_stats_api::infrastructure::PgStore;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = Config::from_env().expect("Invalid configuration");

    // Connect to database in the background; requests fail with 500 until it is up
    let store = PgStore::new();
    let connect_task = store.spawn_connect(config.database.clone());

    let repository = PostgresStatsRepository::new(Arc::clone(&store));
    let app = api::router(AppState::new(Arc::new(repository)));

    // Start server
    let addr = config.bind_addr();
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");

    connect_task.abort();
}
