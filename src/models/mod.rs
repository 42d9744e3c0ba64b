//! # Models Module
//!
//! Typed records shared by the database layer, the HTTP handlers and the CLI.
//!
//! - `log_entry`: the stored `LogEntry` row and the `NewLog` insert payload
//! - `pagination`: `limit`/`offset` extraction for the listing endpoint
//! - `responses`: JSON bodies returned by each endpoint

pub mod log_entry;
pub mod pagination;
pub mod responses;

pub use log_entry::{BodyRejection, LogEntry, NewLog};
pub use pagination::Pagination;
