//! Log entry stored in Postgres and exposed via the API.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};
use sqlx::FromRow;

pub const DEFAULT_LEVEL: &str = "info";
pub const DEFAULT_MESSAGE: &str = "";
pub const DEFAULT_SERVICE: &str = "unknown";

/// One row of the `logs` table
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LogEntry {
    pub id: i32,
    #[serde(serialize_with = "serialize_iso8601")]
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub message: String,
    pub service: Option<String>,
    pub data: Option<Value>,
}

/// Render a timestamp as ISO-8601 with microseconds and an explicit offset,
/// e.g. `2025-01-31T09:15:02.123456+00:00`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, false)
}

fn serialize_iso8601<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(timestamp))
}

/// Insert payload extracted from a client-supplied JSON body.
///
/// Fields are taken permissively: a missing field gets its default, a JSON
/// `null` becomes SQL `NULL` (the column constraints decide), and any other
/// non-string value is passed through as its JSON text. `data` is stored as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLog {
    pub level: Option<String>,
    pub message: Option<String>,
    pub service: Option<String>,
    pub data: Value,
}

/// Why a request body could not become a `NewLog`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRejection {
    /// Nothing usable: empty, unparseable, or a falsy JSON value
    Missing,
    /// A non-empty JSON value that is not an object, named by its JSON type
    NotAnObject(&'static str),
}

impl NewLog {
    /// Parse a raw request body.
    ///
    /// An empty or unparseable body, and falsy JSON (`{}`, `null`, `[]`, `""`,
    /// `0`, `false`), count as missing. Any other non-object is rejected
    /// separately since fields cannot be read from it.
    pub fn from_body(body: &[u8]) -> Result<Self, BodyRejection> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(BodyRejection::Missing);
        }
        let value: Value = serde_json::from_slice(body).map_err(|_| BodyRejection::Missing)?;
        if !is_truthy(&value) {
            return Err(BodyRejection::Missing);
        }
        match value {
            Value::Object(fields) => Ok(Self::from_fields(&fields)),
            Value::Array(_) => Err(BodyRejection::NotAnObject("array")),
            Value::String(_) => Err(BodyRejection::NotAnObject("string")),
            Value::Number(_) => Err(BodyRejection::NotAnObject("number")),
            Value::Bool(_) => Err(BodyRejection::NotAnObject("boolean")),
            Value::Null => Err(BodyRejection::Missing),
        }
    }

    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            level: text_field(fields, "level", DEFAULT_LEVEL),
            message: text_field(fields, "message", DEFAULT_MESSAGE),
            service: text_field(fields, "service", DEFAULT_SERVICE),
            data: fields.get("data").cloned().unwrap_or_else(|| json!({})),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn text_field(fields: &Map<String, Value>, key: &str, default: &str) -> Option<String> {
    match fields.get(key) {
        None => Some(default.to_string()),
        Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => Some(other.to_string()),
    }
}
