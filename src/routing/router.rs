//! # Router Module
//!
//! This module creates the axum router for logsink and wires in its middleware.
//!
//! ## Routes
//!
//! | Method & Path        | Handler                         |
//! |----------------------|---------------------------------|
//! | `GET /health`        | `health::handle_health`         |
//! | `GET /logs`          | `handlers::handle_list_logs`    |
//! | `POST /logs`         | `handlers::handle_create_log`   |
//! | `GET /stats`         | `handlers::handle_stats`        |
//! | `DELETE /logs/clear` | `handlers::handle_clear_logs`   |
//!
//! ## Middleware
//!
//! 1. Application state injection, with no request body limit on `/logs`
//! 2. Permissive CORS, unless disabled in configuration
//! 3. HTTP tracing layer for per-request spans

use super::handlers::{handle_clear_logs, handle_create_log, handle_list_logs, handle_stats};
use crate::AppState;
use crate::health::handle_health;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

pub fn create_router(state: AppState) -> Router {
    let cors_enabled = state.config.cors_enabled;

    let router = Router::new()
        .route("/health", get(handle_health))
        // `message` is an unbounded TEXT column, so bodies are not size capped
        .route(
            "/logs",
            get(handle_list_logs)
                .post(handle_create_log)
                .layer(DefaultBodyLimit::disable()),
        )
        .route("/logs/clear", delete(handle_clear_logs))
        .route("/stats", get(handle_stats))
        .with_state(state);

    let router = if cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
// End-to-end router tests are in the tests module
