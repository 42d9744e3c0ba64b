//! # Routing Module
//!
//! - `router`: assembles the axum `Router` with its middleware
//! - `handlers`: the log endpoints and their database logic

pub mod handlers;
pub mod router;
