//! Request handlers and dispatcher.
//!
//! # Responsibility
//! - Turn ingest/query outcomes into fixed status codes and bodies.
//! - Route `POST /entries` and `GET /entries/recent` to their handlers.
//!
//! # Invariants
//! - Handlers never panic across the boundary; panics become 500.
//! - Bodies carry only the fixed generic error messages; failure detail
//!   goes to the operator log.

use crate::response::{
    ApiResponse, CreatedBody, ENTRY_CREATED_MESSAGE, METHOD_NOT_ALLOWED_MESSAGE,
    NOT_FOUND_MESSAGE,
};
use log::{error, info, warn};
use logstream_core::{
    Clock, IngestService, LogStore, QueryService, ServiceConfig, ServiceError, SqliteLogStore,
    StoreResult, SystemClock, RECENT_ENTRIES_LIMIT,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

pub const ENTRIES_PATH: &str = "/entries";
pub const RECENT_ENTRIES_PATH: &str = "/entries/recent";

/// Handles `POST /entries`.
///
/// 201 with the new id, 400 for invalid input, 500 for store or
/// unexpected failures.
pub fn handle_ingest<S: LogStore, C: Clock>(
    service: &IngestService<S, C>,
    body: Option<&str>,
) -> ApiResponse {
    let outcome = contain_panics("ingest", || service.ingest(body));
    let response = match outcome {
        Ok(entry) => ApiResponse::json(
            201,
            &CreatedBody {
                message: ENTRY_CREATED_MESSAGE,
                id: entry.id.as_str(),
            },
        ),
        Err(err) => ApiResponse::from_service_error(&err),
    };
    log_outcome("ingest", &response);
    response
}

/// Handles `GET /entries/recent`.
///
/// 200 with `{ logs, count }` (possibly empty), 500 on failure.
pub fn handle_read_recent<S: LogStore>(service: &QueryService<S>) -> ApiResponse {
    handle_read_recent_limited(service, RECENT_ENTRIES_LIMIT)
}

/// `GET /entries/recent` with a window smaller than the default.
pub fn handle_read_recent_limited<S: LogStore>(
    service: &QueryService<S>,
    max_count: u32,
) -> ApiResponse {
    let response = match contain_panics("read_recent", || service.recent_with_limit(max_count)) {
        Ok(recent) => ApiResponse::json(200, &recent),
        Err(err) => ApiResponse::from_service_error(&err),
    };
    log_outcome("read_recent", &response);
    response
}

/// Both handlers over one shared store handle.
pub struct LogApi<S: LogStore + Clone, C: Clock = SystemClock> {
    ingest: IngestService<S, C>,
    query: QueryService<S>,
}

impl<S: LogStore + Clone> LogApi<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl LogApi<Arc<SqliteLogStore>> {
    /// Opens the configured SQLite collection and wires both handlers to it.
    pub fn from_config(config: &ServiceConfig) -> StoreResult<Self> {
        let store = SqliteLogStore::open(
            &config.db_path,
            config.table_name.clone(),
            config.store_timeout,
        )?;
        info!(
            "event=api_init module=api status=ok table={} db_path={}",
            config.table_name,
            config.db_path.display()
        );
        Ok(Self::new(Arc::new(store)))
    }
}

impl<S: LogStore + Clone, C: Clock> LogApi<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            ingest: IngestService::with_clock(store.clone(), clock),
            query: QueryService::new(store),
        }
    }

    pub fn ingest(&self, body: Option<&str>) -> ApiResponse {
        handle_ingest(&self.ingest, body)
    }

    pub fn read_recent(&self) -> ApiResponse {
        handle_read_recent(&self.query)
    }

    pub fn read_recent_limited(&self, max_count: u32) -> ApiResponse {
        handle_read_recent_limited(&self.query, max_count)
    }

    /// Dispatches one request by method and path.
    ///
    /// A query string on `path` is ignored. Unknown paths get 404; known
    /// paths with another method get 405.
    pub fn route(&self, method: &str, path: &str, body: Option<&str>) -> ApiResponse {
        let path = path.split_once('?').map_or(path, |(path, _)| path);
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        let method = method.trim().to_ascii_uppercase();

        match (method.as_str(), path) {
            ("POST", ENTRIES_PATH) => self.ingest(body),
            ("GET", RECENT_ENTRIES_PATH) => self.read_recent(),
            (_, ENTRIES_PATH) | (_, RECENT_ENTRIES_PATH) => {
                warn!("event=route module=api status=rejected method={method} path={path} status_code=405");
                ApiResponse::error(405, METHOD_NOT_ALLOWED_MESSAGE)
            }
            _ => {
                warn!("event=route module=api status=rejected method={method} path={path} status_code=404");
                ApiResponse::error(404, NOT_FOUND_MESSAGE)
            }
        }
    }
}

fn contain_panics<T>(
    operation: &str,
    f: impl FnOnce() -> Result<T, ServiceError>,
) -> Result<T, ServiceError> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        Err(ServiceError::Unexpected(format!(
            "panic while handling {operation}"
        )))
    })
}

fn log_outcome(operation: &str, response: &ApiResponse) {
    if response.status_code >= 500 {
        error!(
            "event=http_response module=api status=error operation={} status_code={}",
            operation, response.status_code
        );
    } else {
        info!(
            "event=http_response module=api status=ok operation={} status_code={}",
            operation, response.status_code
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{contain_panics, LogApi};
    use logstream_core::{InMemoryLogStore, ServiceError};
    use std::sync::Arc;

    #[test]
    fn panics_are_reported_as_unexpected() {
        let outcome: Result<(), ServiceError> =
            contain_panics("probe", || panic!("store driver exploded"));
        let err = outcome.unwrap_err();
        assert!(matches!(err, ServiceError::Unexpected(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn route_ignores_query_string_and_trailing_slash() {
        let api = LogApi::new(Arc::new(InMemoryLogStore::new()));
        assert_eq!(api.route("get", "/entries/recent/?limit=5", None).status_code, 200);
        assert_eq!(api.route("GET", "/entries/recent", None).status_code, 200);
    }

    #[test]
    fn unknown_routes_and_methods_are_rejected() {
        let api = LogApi::new(Arc::new(InMemoryLogStore::new()));

        let missing = api.route("GET", "/entries/oldest", None);
        assert_eq!(missing.status_code, 404);
        assert_eq!(missing.body, r#"{"error":"Not found"}"#);

        let wrong_method = api.route("DELETE", "/entries", None);
        assert_eq!(wrong_method.status_code, 405);
        assert_eq!(wrong_method.body, r#"{"error":"Method not allowed"}"#);

        assert_eq!(api.route("POST", "/entries/recent", Some("{}")).status_code, 405);
        assert_eq!(api.route("GET", "/entries", None).status_code, 405);
    }
}
