//! Process configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve store, timeout and logging settings once at startup.
//! - Reject a missing or unsafe collection name before any store access.
//!
//! # Invariants
//! - `TableName` only holds names usable verbatim as SQL identifiers.
//! - Empty environment values are treated as unset.

use crate::logging::{default_log_level, normalize_level};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const TABLE_NAME_ENV: &str = "TABLE_NAME";
pub const DB_PATH_ENV: &str = "LOGSTREAM_DB_PATH";
pub const STORE_TIMEOUT_ENV: &str = "LOGSTREAM_STORE_TIMEOUT_SECS";
pub const LOG_LEVEL_ENV: &str = "LOGSTREAM_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "LOGSTREAM_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "logstream.sqlite3";
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 5;
const MAX_STORE_TIMEOUT_SECS: u64 = 9;

static TABLE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,254}$").expect("valid table name regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("TABLE_NAME is not set")]
    MissingTableName,
    #[error("invalid table name `{0}`; expected letters, digits or `_`, not starting with a digit")]
    InvalidTableName(String),
    #[error("invalid LOGSTREAM_STORE_TIMEOUT_SECS `{0}`; expected whole seconds in 1..=9")]
    InvalidStoreTimeout(String),
    #[error("invalid LOGSTREAM_LOG_LEVEL: {0}")]
    InvalidLogLevel(String),
}

/// Validated store collection name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingTableName);
        }
        if !TABLE_NAME_RE.is_match(trimmed) {
            return Err(ConfigError::InvalidTableName(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TableName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Settings shared by the ingest and query entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub table_name: TableName,
    pub db_path: PathBuf,
    /// Bound on every store call; expiry surfaces as a store failure.
    pub store_timeout: Duration,
    pub log_level: &'static str,
    /// `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl ServiceConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an injectable variable lookup.
    ///
    /// # Errors
    /// - `MissingTableName` when `TABLE_NAME` is unset or blank.
    /// - `InvalidTableName`, `InvalidStoreTimeout`, `InvalidLogLevel` for
    ///   malformed values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let table_name = match var(TABLE_NAME_ENV) {
            Some(raw) => TableName::parse(&raw)?,
            None => return Err(ConfigError::MissingTableName),
        };

        let db_path = var(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let store_timeout = match var(STORE_TIMEOUT_ENV) {
            Some(raw) => parse_store_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
        };

        let log_level = match var(LOG_LEVEL_ENV) {
            Some(raw) => normalize_level(&raw)
                .map_err(|err| ConfigError::InvalidLogLevel(err.to_string()))?,
            None => default_log_level(),
        };

        Ok(Self {
            table_name,
            db_path,
            store_timeout,
            log_level,
            log_dir: var(LOG_DIR_ENV).map(PathBuf::from),
        })
    }
}

fn parse_store_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if (1..=MAX_STORE_TIMEOUT_SECS).contains(&secs) => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidStoreTimeout(raw.to_string())),
    }
}
