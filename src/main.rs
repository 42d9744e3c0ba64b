//! logsink: a small log ingestion and query service.
//!
//! Structured log entries arrive over HTTP, are stored in one Postgres table
//! and can be listed, paginated, aggregated and cleared.
//!
//! Modules:
//! - `env`: environment configuration
//! - `database`: pool factory, schema initializer and SQL queries
//! - `models`: stored rows, insert payloads and response bodies
//! - `logging`: tracing setup and the API error type
//! - `health`: database connectivity endpoint
//! - `routing`: router and log endpoints
//! - `server`: listener lifecycle and graceful shutdown
//! - `cli`: command-line entry point

mod cli;
mod database;
mod env;
mod health;
mod logging;
mod models;
mod routing;
mod server;
#[cfg(test)]
mod tests;

use sqlx::PgPool;
use std::process::ExitCode;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: env::AppConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    cli::parse_cli_commands().await
}
