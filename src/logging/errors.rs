//! # Error Handling Module
//!
//! Every handler returns `Result<_, ApiError>`. The error converts itself into
//! a JSON response so no failure escapes to the framework:
//!
//! - `NoData` becomes `400 {"error": "No data provided"}`
//! - `NotAnObject` becomes `500 {"error": "Log entry must be a JSON object, got <type>"}`
//! - `Database` becomes `500 {"error": "<driver message>"}`

use crate::models::{BodyRejection, responses::ErrorBody};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body was missing, unparseable or empty
    #[error("No data provided")]
    NoData,
    /// The body parsed to a JSON value fields cannot be read from
    #[error("Log entry must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    /// Any failure reported by the database driver or the pool
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoData => StatusCode::BAD_REQUEST,
            ApiError::NotAnObject(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BodyRejection> for ApiError {
    fn from(rejection: BodyRejection) -> Self {
        match rejection {
            BodyRejection::Missing => ApiError::NoData,
            BodyRejection::NotAnObject(kind) => ApiError::NotAnObject(kind),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Log a handler failure with the operation it came from.
///
/// Client mistakes are warnings; everything else is an error.
pub fn log_api_error(operation: &'static str, err: &ApiError) {
    match err {
        ApiError::NoData => warn!(
            target: "logsink::errors",
            operation = operation,
            "Rejected request: {}",
            err
        ),
        ApiError::NotAnObject(_) => error!(
            target: "logsink::errors",
            operation = operation,
            "Unusable request body: {}",
            err
        ),
        ApiError::Database(e) => error!(
            target: "logsink::errors",
            operation = operation,
            "Database failure: {}",
            e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NoData.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_carry_raw_driver_text() {
        assert_eq!(ApiError::NoData.to_string(), "No data provided");
        let err = ApiError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.to_string(), sqlx::Error::PoolTimedOut.to_string());
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::NoData.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_body_rejections_map_to_distinct_statuses() {
        let missing = ApiError::from(BodyRejection::Missing);
        assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);

        let not_object = ApiError::from(BodyRejection::NotAnObject("array"));
        assert_eq!(not_object.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            not_object.to_string(),
            "Log entry must be a JSON object, got array"
        );
    }
}
