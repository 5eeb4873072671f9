use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sqlx::migrate::MigrateError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;

use crate::config::DatabaseConfig;
use crate::domain::errors::{StatsError, StatsResult};
use crate::domain::repositories::ConnectionState;

const PING_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
enum ConnectError {
    #[error("connection failed: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] MigrateError),
}

/// Lazily initialised handle to the PostgreSQL pool
///
/// The pool is published once, after the first successful connection and
/// migration run. Until then every caller of [`PgStore::pool`] gets a
/// `StatsError::Store`, so the HTTP server can start serving before the
/// database is reachable.
#[derive(Debug, Default)]
pub struct PgStore {
    pool: OnceCell<PgPool>,
    connecting: AtomicBool,
}

impl PgStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Wraps an already connected pool
    pub fn from_pool(pool: PgPool) -> Arc<Self> {
        Arc::new(Self {
            pool: OnceCell::new_with(Some(pool)),
            connecting: AtomicBool::new(false),
        })
    }

    /// Starts connecting in the background, retrying until it succeeds
    pub fn spawn_connect(self: &Arc<Self>, config: DatabaseConfig) -> JoinHandle<()> {
        self.connecting.store(true, Ordering::SeqCst);
        let store = Arc::clone(self);
        tokio::spawn(async move {
            store.connect_with_retry(&config).await;
        })
    }

    /// Connects and runs migrations, retrying with a fixed delay forever
    ///
    /// Concurrent callers share a single connection attempt.
    pub async fn connect_with_retry(&self, config: &DatabaseConfig) -> &PgPool {
        self.connecting.store(true, Ordering::SeqCst);

        let pool = self
            .pool
            .get_or_init(|| async {
                let mut attempt: u32 = 0;
                loop {
                    attempt += 1;
                    tracing::info!(attempt, "Connecting to database...");

                    match Self::try_connect(config).await {
                        Ok(pool) => {
                            tracing::info!("Database connected successfully");
                            break pool;
                        }
                        Err(e) => {
                            tracing::error!(
                                attempt,
                                error = %e,
                                "Database connection error. Retrying in {}s...",
                                config.retry_delay.as_secs()
                            );
                            tokio::time::sleep(config.retry_delay).await;
                        }
                    }
                }
            })
            .await;

        self.connecting.store(false, Ordering::SeqCst);
        pool
    }

    async fn try_connect(config: &DatabaseConfig) -> Result<PgPool, ConnectError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(pool)
    }

    /// Returns the pool, or a store error while not yet connected
    pub fn pool(&self) -> StatsResult<&PgPool> {
        self.pool
            .get()
            .ok_or_else(|| StatsError::store("store not connected"))
    }

    /// Pings the store with `SELECT 1`
    pub async fn state(&self) -> ConnectionState {
        let Some(pool) = self.pool.get() else {
            return if self.connecting.load(Ordering::SeqCst) {
                ConnectionState::Connecting
            } else {
                ConnectionState::Disconnected
            };
        };

        let ping = sqlx::query("SELECT 1").execute(pool);
        match tokio::time::timeout(PING_TIMEOUT, ping).await {
            Ok(Ok(_)) => ConnectionState::Connected,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Database ping failed");
                ConnectionState::Disconnected
            }
            Err(_) => {
                tracing::warn!("Database ping timed out");
                ConnectionState::Disconnected
            }
        }
    }
}
