//! Ingest payload parsing.
//!
//! # Responsibility
//! - Parse raw request bodies into `NewLogEntry` or a tagged rejection.
//!
//! # Invariants
//! - A `NewLogEntry` always holds a recognized severity and a message of
//!   1..=1000 UTF-16 code units.
//! - Parsing is pure: same input, same outcome, no side effects.
//! - Fields other than `severity` and `message` are ignored.

use crate::model::log_entry::Severity;
use serde_json::Value;

/// Upper bound on message length, in UTF-16 code units.
pub const MAX_MESSAGE_LEN: usize = 1000;

/// Reason an ingest payload was rejected.
///
/// Detail is for operator logs only; callers see a generic rejection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("request body is missing")]
    MissingBody,
    #[error("request body is not valid JSON: {0}")]
    MalformedJson(String),
    #[error("payload must be a JSON object")]
    NotAnObject,
    #[error("severity must be one of info|warning|error")]
    InvalidSeverity,
    #[error("message must be a string")]
    InvalidMessage,
    #[error("message length {len} is outside 1..=1000")]
    MessageLength { len: usize },
}

/// Validated ingest input. Only obtainable through validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogEntry {
    severity: Severity,
    message: String,
}

impl NewLogEntry {
    /// Creates validated input from typed parts.
    ///
    /// # Errors
    /// - `MessageLength` when `message` is empty or longer than 1000 units.
    pub fn new(severity: Severity, message: impl Into<String>) -> Result<Self, ValidationError> {
        let message = message.into();
        let len = message_len(&message);
        if len == 0 || len > MAX_MESSAGE_LEN {
            return Err(ValidationError::MessageLength { len });
        }
        Ok(Self { severity, message })
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn into_parts(self) -> (Severity, String) {
        (self.severity, self.message)
    }
}

/// Parses an optional raw request body.
///
/// An absent or empty body is rejected the same way as a JSON `null`.
pub fn parse_ingest_body(body: Option<&str>) -> Result<NewLogEntry, ValidationError> {
    let raw = match body {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(ValidationError::MissingBody),
    };
    let payload: Value = serde_json::from_str(raw)
        .map_err(|err| ValidationError::MalformedJson(err.to_string()))?;
    validate_payload(&payload)
}

/// Validates an already decoded JSON payload.
pub fn validate_payload(payload: &Value) -> Result<NewLogEntry, ValidationError> {
    let object = payload.as_object().ok_or(ValidationError::NotAnObject)?;

    let severity = object
        .get("severity")
        .and_then(Value::as_str)
        .and_then(Severity::parse)
        .ok_or(ValidationError::InvalidSeverity)?;

    let message = object
        .get("message")
        .and_then(Value::as_str)
        .ok_or(ValidationError::InvalidMessage)?;

    NewLogEntry::new(severity, message)
}

fn message_len(message: &str) -> usize {
    message.encode_utf16().count()
}
