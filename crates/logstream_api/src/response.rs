//! Response envelope and fixed body shapes.

use log::error;
use logstream_core::ServiceError;
use serde::{Deserialize, Serialize};

pub const ENTRY_CREATED_MESSAGE: &str = "Log entry created";
pub const NOT_FOUND_MESSAGE: &str = "Not found";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

/// Pre-rendered 500 body used when rendering itself fails.
const INTERNAL_ERROR_BODY: &str = r#"{"error":"Internal server error"}"#;

/// Status code plus serialized JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub body: String,
}

/// 201 body for a stored entry.
#[derive(Debug, Serialize)]
pub(crate) struct CreatedBody<'a> {
    pub message: &'static str,
    pub id: &'a str,
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub error: &'static str,
}

impl ApiResponse {
    /// Serializes `body` as JSON; falls back to a generic 500 if that fails.
    pub fn json<T: Serialize>(status_code: u16, body: &T) -> Self {
        match serde_json::to_string(body) {
            Ok(body) => Self { status_code, body },
            Err(err) => {
                error!(
                    "event=response_render module=api status=error error_code=serialize_failed error={err}"
                );
                Self::internal_error()
            }
        }
    }

    pub fn error(status_code: u16, message: &'static str) -> Self {
        Self::json(status_code, &ErrorBody { error: message })
    }

    /// Maps a service failure to its generic public outcome.
    pub fn from_service_error(err: &ServiceError) -> Self {
        Self::error(err.status_code(), err.public_message())
    }

    pub fn internal_error() -> Self {
        Self {
            status_code: 500,
            body: INTERNAL_ERROR_BODY.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
