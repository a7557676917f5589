//! HTTP-shaped boundary for the logstream services.
//!
//! Transport is external: callers hand in method, path and body, and get
//! back a status code plus a JSON body.

pub mod api;
pub mod response;

pub use api::{
    handle_ingest, handle_read_recent, handle_read_recent_limited, LogApi, ENTRIES_PATH,
    RECENT_ENTRIES_PATH,
};
pub use response::ApiResponse;
