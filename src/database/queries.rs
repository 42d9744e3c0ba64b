//! # Database Queries Module
//!
//! This module centralizes every SQL statement logsink runs. Each function
//! takes any Postgres executor, so it runs equally on the pool or inside a
//! transaction opened by the caller.
//!
//! ## Query Categories
//!
//! - **Health Queries**: Connectivity probe
//! - **Log Queries**: Insert, page through and clear log entries
//! - **Stats Queries**: Counts and groupings over the whole table

use crate::models::{LogEntry, NewLog};
use sqlx::PgExecutor;

const LOG_COLUMNS: &str = "id, timestamp, level, message, service, data";

/// Key used in aggregate maps for rows whose grouping column is NULL
pub const NULL_GROUP_KEY: &str = "null";

///////////////////////////////////////////////////////////////////////////////
//****                         Health Queries                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Trivial round trip to prove the database answers
pub async fn ping<'e, E>(executor: E) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query("SELECT 1").execute(executor).await?;
    Ok(())
}

///////////////////////////////////////////////////////////////////////////////
//****                           Log Queries                             ****//
///////////////////////////////////////////////////////////////////////////////

/// Fetch one page of entries, newest first (ties broken by newest id)
pub async fn fetch_logs_page<'e, E>(
    executor: E,
    limit: i64,
    offset: i64,
) -> Result<Vec<LogEntry>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, LogEntry>(&format!(
        "SELECT {LOG_COLUMNS} FROM logs ORDER BY timestamp DESC, id DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

/// Count every row in the table
pub async fn count_logs<'e, E>(executor: E) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM logs")
        .fetch_one(executor)
        .await
}

/// Insert one entry and return it with its server-assigned `id` and `timestamp`
pub async fn insert_log<'e, E>(executor: E, new_log: &NewLog) -> Result<LogEntry, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, LogEntry>(&format!(
        "INSERT INTO logs (level, message, service, data) VALUES ($1, $2, $3, $4) RETURNING {LOG_COLUMNS}"
    ))
    .bind(&new_log.level)
    .bind(&new_log.message)
    .bind(&new_log.service)
    .bind(&new_log.data)
    .fetch_one(executor)
    .await
}

/// Delete every entry, returning how many rows were removed
pub async fn delete_all_logs<'e, E>(executor: E) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM logs").execute(executor).await?;
    Ok(result.rows_affected())
}

///////////////////////////////////////////////////////////////////////////////
//****                          Stats Queries                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Row count for every distinct level
pub async fn count_by_level<'e, E>(executor: E) -> Result<Vec<(String, i64)>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let rows: Vec<(Option<String>, i64)> =
        sqlx::query_as("SELECT level, COUNT(*) AS count FROM logs GROUP BY level")
            .fetch_all(executor)
            .await?;
    Ok(label_groups(rows))
}

/// Row count for the `limit` busiest services, busiest first.
/// Ties are broken by service name so the cut-off is stable.
pub async fn count_by_service_top<'e, E>(
    executor: E,
    limit: i64,
) -> Result<Vec<(String, i64)>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let rows: Vec<(Option<String>, i64)> = sqlx::query_as(
        "SELECT service, COUNT(*) AS count FROM logs
         GROUP BY service
         ORDER BY count DESC, service ASC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(executor)
    .await?;
    Ok(label_groups(rows))
}

/// The most recent entry, if any
pub async fn fetch_latest_log<'e, E>(executor: E) -> Result<Option<LogEntry>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, LogEntry>(&format!(
        "SELECT {LOG_COLUMNS} FROM logs ORDER BY timestamp DESC, id DESC LIMIT 1"
    ))
    .fetch_optional(executor)
    .await
}

fn label_groups(rows: Vec<(Option<String>, i64)>) -> Vec<(String, i64)> {
    rows.into_iter()
        .map(|(key, count)| (key.unwrap_or_else(|| NULL_GROUP_KEY.to_string()), count))
        .collect()
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
