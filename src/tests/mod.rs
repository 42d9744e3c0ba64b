//! Shared test helpers and end-to-end HTTP tests.
//!
//! Tests that need a real Postgres are `#[ignore]`d and read its URL from
//! `LOGSINK_TEST_DATABASE_URL`. Run them with
//! `LOGSINK_TEST_DATABASE_URL=postgres://... cargo test -- --include-ignored`;
//! they panic if the variable is unset. Tests of degraded behaviour use a pool
//! aimed at a closed port, so they always run.


use crate::database::initialize_schema;
use crate::env::AppConfig;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard, OnceCell};

pub const TEST_DATABASE_URL_VAR: &str = "LOGSINK_TEST_DATABASE_URL";

static SCHEMA_READY: OnceCell<()> = OnceCell::const_new();
static DATABASE_LOCK: Mutex<()> = Mutex::const_new(());

/// Pool for the live test database. Panics when none is configured.
pub async fn test_pool() -> PgPool {
    let url = std::env::var(TEST_DATABASE_URL_VAR)
        .unwrap_or_else(|_| panic!("{TEST_DATABASE_URL_VAR} must point at a Postgres database"));
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&url)
        .await
        .expect("Failed to connect to the test database");

    SCHEMA_READY
        .get_or_init(|| async {
            initialize_schema(&pool)
                .await
                .expect("Failed to initialize test schema");
        })
        .await;

    pool
}

/// Serialize tests that rely on the exact contents of the `logs` table
pub async fn lock_database() -> MutexGuard<'static, ()> {
    DATABASE_LOCK.lock().await
}

/// Pool whose every checkout fails quickly: nothing listens on port 1
pub fn unreachable_pool() -> PgPool {
    let options = PgConnectOptions::new()
        .host("127.0.0.1")
        .port(1)
        .username("logs_user")
        .password("logs_password")
        .database("logs_db");
    PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy_with(options)
}

/// Default configuration bound to an ephemeral local port
pub fn test_config() -> AppConfig {
    AppConfig {
        bind_address: SocketAddr::from(([127, 0, 0, 1], 0)),
        ..AppConfig::default()
    }
}
