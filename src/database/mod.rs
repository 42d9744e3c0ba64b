//!
//! # Database Module for logsink
//!
//! This module owns everything that touches Postgres: the connection pool,
//! the startup schema initializer and (in `queries`) every SQL statement the
//! service runs.
//!
//! ## Features
//!
//! - **Lazy Pool**: The pool is created without touching the network, so a
//!   missing database never prevents the process from starting.
//! - **Scoped Checkout**: Each request borrows a pooled connection that is
//!   returned on every exit path, error paths included.
//! - **Idempotent Schema**: The `logs` table and its two indexes are created
//!   with `IF NOT EXISTS` on every start.
//! - **Read Snapshots**: Endpoints that issue several reads run them inside a
//!   single read-only `REPEATABLE READ` transaction.

pub mod queries;

use crate::env::AppConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use std::time::Duration;
use tracing::{error, info};

///////////////////////////////////////////////////////////////////////////////
//****                            Schema                                 ****//
///////////////////////////////////////////////////////////////////////////////

pub const CREATE_LOGS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS logs (
        id SERIAL PRIMARY KEY,
        timestamp TIMESTAMPTZ DEFAULT NOW(),
        level VARCHAR(10) NOT NULL,
        message TEXT NOT NULL,
        service VARCHAR(100) DEFAULT 'unknown',
        data JSONB DEFAULT '{}'
    )
"#;

pub const CREATE_TIMESTAMP_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_logs_timestamp ON logs(timestamp DESC)";

pub const CREATE_LEVEL_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_logs_level ON logs(level)";

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Build the connection pool from configuration.
///
/// No connection is opened here; the first checkout connects.
pub fn create_pool(config: &AppConfig) -> PgPool {
    info!(
        "Configuring pool for {} (max {} connections)",
        config.redacted_database_url(),
        config.db_max_connections
    );
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .connect_lazy_with(config.connect_options())
}

/// Create the `logs` table and its indexes if they do not exist yet
pub async fn initialize_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in [CREATE_LOGS_TABLE, CREATE_TIMESTAMP_INDEX, CREATE_LEVEL_INDEX] {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Startup wrapper around `initialize_schema`: failures are logged, never fatal.
///
/// The service keeps running and answers with 500s until the database is reachable.
pub async fn initialize_schema_or_warn(pool: &PgPool) -> bool {
    match initialize_schema(pool).await {
        Ok(()) => {
            info!("Database schema initialized");
            true
        }
        Err(e) => {
            error!("Database schema initialization failed: {}", e);
            false
        }
    }
}

/// Open a read-only snapshot so several reads observe the same table state
pub async fn begin_read_snapshot(
    pool: &PgPool,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
