//! # Health Check Module
//!
//! This module answers `GET /health` by probing the database with a no-op
//! query. The process itself never fails a health check; only the database
//! can be reported as disconnected.
//!
//! ## Responses
//!
//! - **200**: `{"status": "ok", "database": "connected", "timestamp": "<ISO-8601>"}`
//! - **500**: `{"status": "error", "database": "disconnected", "error": "<driver message>"}`

use crate::AppState;
use crate::database::queries;
use crate::models::log_entry::format_timestamp;
use crate::models::responses::{HealthFailure, HealthResponse};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, warn};

///////////////////////////////////////////////////////////////////////////////
//****                         Public Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Database connectivity as reported by the health endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseStatus {
    Connected,
    Disconnected(String),
}

impl DatabaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseStatus::Connected => "connected",
            DatabaseStatus::Disconnected(_) => "disconnected",
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Run the connectivity probe against the pool
pub async fn probe_database(pool: &PgPool) -> DatabaseStatus {
    match queries::ping(pool).await {
        Ok(()) => DatabaseStatus::Connected,
        Err(e) => DatabaseStatus::Disconnected(e.to_string()),
    }
}

/// `GET /health`
pub async fn handle_health(State(state): State<AppState>) -> Response {
    let status = probe_database(&state.db).await;
    match status {
        DatabaseStatus::Connected => {
            debug!("Health check passed");
            Json(HealthResponse {
                status: "ok",
                database: status.as_str(),
                timestamp: format_timestamp(&Utc::now()),
            })
            .into_response()
        }
        DatabaseStatus::Disconnected(ref error) => {
            warn!("Health check failed, database unreachable: {}", error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthFailure {
                    status: "error",
                    database: status.as_str(),
                    error: error.clone(),
                }),
            )
                .into_response()
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{test_pool, unreachable_pool};

    #[test]
    fn test_status_labels() {
        assert_eq!(DatabaseStatus::Connected.as_str(), "connected");
        assert_eq!(
            DatabaseStatus::Disconnected("boom".to_string()).as_str(),
            "disconnected"
        );
    }

    #[tokio::test]
    async fn test_unreachable_database_is_disconnected() {
        let status = probe_database(&unreachable_pool()).await;
        assert!(matches!(status, DatabaseStatus::Disconnected(_)));
    }

    #[tokio::test]
    #[ignore = "needs LOGSINK_TEST_DATABASE_URL"]
    async fn test_live_database_is_connected() {
        let pool = test_pool().await;
        assert_eq!(probe_database(&pool).await, DatabaseStatus::Connected);
    }
}
