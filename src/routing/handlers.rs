//! # Routing Handlers Module
//!
//! Request handlers for the log endpoints. Each handler borrows one pooled
//! connection (or one read snapshot), runs its statements and converts any
//! failure into a JSON error body through `ApiError`.
//!
//! ## Endpoints
//!
//! - `GET /logs`: newest-first page plus the total row count
//! - `POST /logs`: insert one entry, echo the stored row with a 201
//! - `GET /stats`: total, per-level counts, top services, latest entry
//! - `DELETE /logs/clear`: remove every entry
//!
//! `GET /health` lives in the `health` module.

use crate::{
    AppState,
    database::{begin_read_snapshot, queries},
    logging::errors::{ApiError, log_api_error},
    models::{
        NewLog, Pagination,
        responses::{ClearResponse, CreatedLog, LogsPage, StatsResponse},
    },
};
use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Number of services reported by `/stats`
pub const TOP_SERVICES: i64 = 10;

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// `GET /logs`
pub async fn handle_list_logs(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<LogsPage>, ApiError> {
    let pagination = Pagination::from_query(&params);
    let page = list_logs(&state.db, pagination)
        .await
        .inspect_err(|e| log_api_error("list_logs", e))?;
    debug!(
        "Listed {} of {} logs (limit {}, offset {})",
        page.returned, page.total, page.limit, page.offset
    );
    Ok(Json(page))
}

/// `POST /logs`
pub async fn handle_create_log(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedLog>), ApiError> {
    let created = create_log(&state.db, &body)
        .await
        .inspect_err(|e| log_api_error("create_log", e))?;
    debug!(
        "Stored log {} (level {}, service {:?})",
        created.log.id, created.log.level, created.log.service
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /stats`
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let stats = collect_stats(&state.db)
        .await
        .inspect_err(|e| log_api_error("stats", e))?;
    Ok(Json(stats))
}

/// `DELETE /logs/clear`
pub async fn handle_clear_logs(
    State(state): State<AppState>,
) -> Result<Json<ClearResponse>, ApiError> {
    let deleted = clear_logs(&state.db)
        .await
        .inspect_err(|e| log_api_error("clear_logs", e))?;
    Ok(Json(ClearResponse::new(deleted)))
}

///////////////////////////////////////////////////////////////////////////////
//****                        Endpoint Logic                             ****//
///////////////////////////////////////////////////////////////////////////////

/// One page and the table total, read from the same snapshot
pub async fn list_logs(pool: &PgPool, pagination: Pagination) -> Result<LogsPage, ApiError> {
    let mut tx = begin_read_snapshot(pool).await?;
    let logs = queries::fetch_logs_page(&mut *tx, pagination.limit, pagination.offset).await?;
    let total = queries::count_logs(&mut *tx).await?;
    tx.commit().await?;

    Ok(LogsPage {
        returned: logs.len(),
        logs,
        total,
        limit: pagination.limit,
        offset: pagination.offset,
    })
}

/// Parse the raw body and insert it
pub async fn create_log(pool: &PgPool, body: &[u8]) -> Result<CreatedLog, ApiError> {
    let new_log = NewLog::from_body(body)?;
    let log = queries::insert_log(pool, &new_log).await?;
    Ok(CreatedLog { success: true, log })
}

/// Aggregate counts; an empty table short-circuits after the first count
pub async fn collect_stats(pool: &PgPool) -> Result<StatsResponse, ApiError> {
    let mut tx = begin_read_snapshot(pool).await?;

    let total_logs = queries::count_logs(&mut *tx).await?;
    if total_logs == 0 {
        tx.commit().await?;
        return Ok(StatsResponse::default());
    }

    let levels = queries::count_by_level(&mut *tx).await?.into_iter().collect();
    let services = queries::count_by_service_top(&mut *tx, TOP_SERVICES)
        .await?
        .into_iter()
        .collect();
    let last_log = queries::fetch_latest_log(&mut *tx).await?;
    tx.commit().await?;

    Ok(StatsResponse {
        total_logs,
        levels,
        services,
        last_log,
    })
}

/// Delete everything. Destructive, so always logged.
pub async fn clear_logs(pool: &PgPool) -> Result<u64, ApiError> {
    let deleted = queries::delete_all_logs(pool).await?;
    if deleted > 0 {
        warn!("Cleared {} logs", deleted);
    } else {
        info!("Clear requested on an empty table");
    }
    Ok(deleted)
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{lock_database, test_pool, unreachable_pool};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_without_body_never_touches_database() {
        // The pool is unreachable, so reaching the database would be a 500
        let pool = unreachable_pool();
        let err = create_log(&pool, b"").await.unwrap_err();
        assert!(matches!(err, ApiError::NoData));
    }

    #[tokio::test]
    async fn test_non_object_body_never_touches_database() {
        let pool = unreachable_pool();
        let err = create_log(&pool, b"[1, 2]").await.unwrap_err();
        assert!(matches!(err, ApiError::NotAnObject("array")));
    }

    #[tokio::test]
    async fn test_database_failure_surfaces_as_api_error() {
        let pool = unreachable_pool();
        let err = list_logs(&pool, Pagination::default()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    #[ignore = "needs LOGSINK_TEST_DATABASE_URL"]
    async fn test_stats_sum_to_total() {
        let pool = test_pool().await;
        let _guard = lock_database().await;
        clear_logs(&pool).await.unwrap();

        assert_eq!(
            serde_json::to_value(collect_stats(&pool).await.unwrap()).unwrap(),
            json!({"total_logs": 0, "levels": {}, "services": {}, "last_log": null})
        );

        for (level, service) in [("info", "api"), ("info", "web"), ("error", "api")] {
            let body = json!({"level": level, "service": service, "message": "m"}).to_string();
            create_log(&pool, body.as_bytes()).await.unwrap();
        }

        let stats = collect_stats(&pool).await.unwrap();
        assert_eq!(stats.total_logs, 3);
        assert_eq!(stats.levels.values().sum::<i64>(), 3);
        assert_eq!(stats.services.values().sum::<i64>(), 3);
        assert_eq!(stats.levels["info"], 2);
        assert_eq!(stats.services["api"], 2);
        assert_eq!(stats.last_log.unwrap().level, "error");

        assert_eq!(clear_logs(&pool).await.unwrap(), 3);
        assert_eq!(clear_logs(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "needs LOGSINK_TEST_DATABASE_URL"]
    async fn test_negative_limit_is_a_database_error() {
        let pool = test_pool().await;
        let pagination = Pagination {
            limit: -1,
            offset: 0,
        };
        let err = list_logs(&pool, pagination).await.unwrap_err();
        assert!(matches!(err, ApiError::Database(_)));
    }
}
