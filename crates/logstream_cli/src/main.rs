//! Command-line entry point.
//!
//! Resolves configuration from the environment, opens the configured
//! collection and runs one ingest or read request against it.

use clap::{Parser, Subcommand};
use log::error;
use logstream_api::{ApiResponse, LogApi};
use logstream_core::{init_logging, ServiceConfig, RECENT_ENTRIES_LIMIT};
use std::error::Error;

/// Ingest and read log entries.
#[derive(Parser, Debug)]
#[command(name = "logstream", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit one log entry (POST /entries)
    Ingest {
        /// Entry severity: info, warning or error
        #[arg(long, conflicts_with = "body")]
        severity: Option<String>,
        /// Entry message, 1 to 1000 characters
        #[arg(long, conflicts_with = "body")]
        message: Option<String>,
        /// Raw JSON request body
        #[arg(long)]
        body: Option<String>,
    },

    /// Show the most recent entries, newest first (GET /entries/recent)
    Recent {
        /// Number of entries to show
        #[arg(long, default_value_t = RECENT_ENTRIES_LIMIT,
              value_parser = clap::value_parser!(u32).range(1..=i64::from(RECENT_ENTRIES_LIMIT)))]
        limit: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    match run(&cli.command) {
        Ok(response) => {
            println!("{}", response.status_code);
            println!("{}", response.body);
            if !response.is_success() {
                std::process::exit(1);
            }
        }
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("Error: {err}");
            std::process::exit(2);
        }
    }
}

fn run(command: &Commands) -> Result<ApiResponse, Box<dyn Error>> {
    let config = ServiceConfig::from_env()?;
    init_logging(config.log_level, config.log_dir.as_deref())?;
    let api = LogApi::from_config(&config)?;

    let response = match command {
        Commands::Ingest {
            severity,
            message,
            body,
        } => {
            let body = match body {
                Some(raw) => Some(raw.clone()),
                None => ingest_body(severity.as_deref(), message.as_deref()),
            };
            api.ingest(body.as_deref())
        }
        Commands::Recent { limit } => api.read_recent_limited(*limit),
    };
    Ok(response)
}

/// Builds the JSON request body from flags; absent flags stay absent so the
/// service rejects them like any other incomplete payload.
fn ingest_body(severity: Option<&str>, message: Option<&str>) -> Option<String> {
    if severity.is_none() && message.is_none() {
        return None;
    }
    let mut payload = serde_json::Map::new();
    if let Some(severity) = severity {
        payload.insert("severity".to_string(), severity.into());
    }
    if let Some(message) = message {
        payload.insert("message".to_string(), message.into());
    }
    Some(serde_json::Value::Object(payload).to_string())
}

#[cfg(test)]
mod tests {
    use super::{ingest_body, Cli, Commands};
    use clap::Parser;
    use serde_json::json;

    #[test]
    fn ingest_flags_become_json_body() {
        let body = ingest_body(Some("info"), Some("Test log message")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, json!({ "severity": "info", "message": "Test log message" }));

        assert_eq!(ingest_body(None, None), None);
        let partial = ingest_body(Some("info"), None).unwrap();
        assert_eq!(partial, r#"{"severity":"info"}"#);
    }

    #[test]
    fn recent_limit_is_bounded() {
        let cli = Cli::try_parse_from(["logstream", "recent"]).unwrap();
        assert!(matches!(cli.command, Commands::Recent { limit: 100 }));

        let cli = Cli::try_parse_from(["logstream", "recent", "--limit", "5"]).unwrap();
        assert!(matches!(cli.command, Commands::Recent { limit: 5 }));

        assert!(Cli::try_parse_from(["logstream", "recent", "--limit", "0"]).is_err());
        assert!(Cli::try_parse_from(["logstream", "recent", "--limit", "101"]).is_err());
    }

    #[test]
    fn body_conflicts_with_field_flags() {
        let result = Cli::try_parse_from([
            "logstream",
            "ingest",
            "--body",
            "{}",
            "--severity",
            "info",
        ]);
        assert!(result.is_err());
    }
}
