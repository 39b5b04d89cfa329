//! CLI module for logdeck
//!
//! Command-line interface definitions and handlers for the log
//! dashboard client.
//!
//! # Commands
//!
//! - `view` - Run one full dashboard cycle (logs + chart + summary)
//! - `logs` - Fetch a page of raw log entries
//! - `series` - Fetch the bucketed time series
//! - `summary` - Fetch summary statistics
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Full dashboard over the last 24 hours
//! logdeck view
//!
//! # POST errors, hourly buckets grouped by method
//! logdeck view --search 'method="POST" status!=200' --interval 1h --group-by method
//!
//! # Second page of raw logs
//! logdeck logs --page 2
//! ```

pub mod commands;
pub mod completions;
pub mod config;
pub mod output;
pub mod view;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::{ConfigError, LogdeckConfig};
use crate::query::{BucketInterval, GroupBy, QueryState, TimeWindow, SERVICE_TIME_FORMAT};
use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// logdeck - Access-log dashboard client
#[derive(Parser, Debug)]
#[command(
    name = "logdeck",
    version,
    about = "Terminal dashboard client for HTTP access-log analytics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one full dashboard cycle
    View(ViewArgs),
    /// Fetch a page of raw log entries
    Logs(LogsArgs),
    /// Fetch the bucketed time series
    Series(SeriesArgs),
    /// Fetch summary statistics
    Summary(SummaryArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every query command.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "logdeck.toml")]
    pub config: PathBuf,

    /// Override the analytics service URL
    #[arg(long, env = "LOGDECK_URL")]
    pub url: Option<String>,

    /// Override the log level
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

/// Time-window selection, shared by every query command.
#[derive(Args, Debug)]
pub struct WindowArgs {
    /// Window start (yyyy-MM-ddTHH:mm:ss); requires --end
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// Window end (yyyy-MM-ddTHH:mm:ss); requires --start
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// Window length in hours, ending now (ignored with --start/--end)
    #[arg(long)]
    pub last_hours: Option<i64>,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Free-text search (e.g. 'method="POST" and status!=200')
    #[arg(short, long)]
    pub search: Option<String>,

    /// 1-based page of the log table
    #[arg(short, long)]
    pub page: Option<u64>,

    /// Log page size
    #[arg(long)]
    pub limit: Option<u64>,

    /// Time-series grouping (status | method)
    #[arg(short, long)]
    pub group_by: Option<GroupBy>,

    /// Time-series bucket interval (1m | 5m | 15m | 1h)
    #[arg(short, long)]
    pub interval: Option<BucketInterval>,
}

#[derive(Args, Debug)]
pub struct LogsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Free-text search (e.g. 'method="POST" and status!=200')
    #[arg(short, long)]
    pub search: Option<String>,

    /// 1-based page of the log table
    #[arg(short, long)]
    pub page: Option<u64>,

    /// Log page size
    #[arg(long)]
    pub limit: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Time-series grouping (status | method)
    #[arg(short, long)]
    pub group_by: Option<GroupBy>,

    /// Time-series bucket interval (1m | 5m | 15m | 1h)
    #[arg(short, long)]
    pub interval: Option<BucketInterval>,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub window: WindowArgs,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write an example configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output path
    #[arg(short, long, default_value = "logdeck.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

/// Load configuration with CLI overrides applied on top of the
/// file/env/default layers.
pub fn load_config_with_overrides(common: &CommonArgs) -> Result<LogdeckConfig, ConfigError> {
    let mut config = if common.config.exists() {
        LogdeckConfig::load(Some(&common.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        LogdeckConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(ref url) = common.url {
        config.service.url = url.clone();
    }
    if let Some(ref level) = common.log_level {
        config.logging.level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Resolve the query window from CLI args, falling back to the
/// configured default window.
pub fn resolve_window(args: &WindowArgs, config: &LogdeckConfig) -> anyhow::Result<TimeWindow> {
    match (&args.start, &args.end) {
        (Some(start), Some(end)) => {
            let start = NaiveDateTime::parse_from_str(start, SERVICE_TIME_FORMAT)
                .with_context(|| format!("invalid --start timestamp: {}", start))?;
            let end = NaiveDateTime::parse_from_str(end, SERVICE_TIME_FORMAT)
                .with_context(|| format!("invalid --end timestamp: {}", end))?;
            Ok(TimeWindow::new(start, end)?)
        }
        _ => {
            let hours = args.last_hours.unwrap_or(config.query.window_hours);
            Ok(TimeWindow::last_hours(hours))
        }
    }
}

/// Build the initial query state from config defaults plus CLI
/// overrides.
pub fn build_query_state(
    config: &LogdeckConfig,
    window: TimeWindow,
    search: Option<&str>,
    page: Option<u64>,
    limit: Option<u64>,
    group_by: Option<GroupBy>,
    interval: Option<BucketInterval>,
) -> anyhow::Result<QueryState> {
    let mut state = QueryState::new(window, limit.unwrap_or(config.query.limit))?;
    state = state.with_grouping(group_by.unwrap_or(config.query.group_by));
    state = state.with_interval(interval.unwrap_or(config.query.interval));
    if let Some(text) = search {
        state = state.with_search(crate::filter::parse(text));
    }
    if let Some(page) = page {
        state = state.with_page(page);
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn common() -> CommonArgs {
        CommonArgs {
            config: PathBuf::from("/nonexistent/logdeck.toml"),
            url: None,
            log_level: None,
            json: false,
        }
    }

    #[test]
    fn test_cli_parses_view_command() {
        let cli = Cli::try_parse_from([
            "logdeck",
            "view",
            "--search",
            r#"method="GET""#,
            "--interval",
            "1h",
            "--group-by",
            "method",
        ])
        .unwrap();
        match cli.command {
            Commands::View(args) => {
                assert_eq!(args.search.as_deref(), Some(r#"method="GET""#));
                assert_eq!(args.interval, Some(BucketInterval::OneHour));
                assert_eq!(args.group_by, Some(GroupBy::Method));
            }
            _ => panic!("expected view command"),
        }
    }

    #[test]
    fn test_cli_rejects_invalid_interval() {
        let result = Cli::try_parse_from(["logdeck", "series", "--interval", "2d"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_start_requires_end() {
        let result =
            Cli::try_parse_from(["logdeck", "logs", "--start", "2024-05-01T00:00:00"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let config = load_config_with_overrides(&common()).unwrap();
        assert_eq!(config.query.limit, 100);
    }

    #[test]
    fn test_url_override_wins() {
        let mut args = common();
        args.url = Some("http://override:9000".to_string());
        let config = load_config_with_overrides(&args).unwrap();
        assert_eq!(config.service.url, "http://override:9000");
    }

    #[test]
    fn test_resolve_window_explicit_bounds() {
        let args = WindowArgs {
            start: Some("2024-05-01T00:00:00".to_string()),
            end: Some("2024-05-02T00:00:00".to_string()),
            last_hours: None,
        };
        let window = resolve_window(&args, &LogdeckConfig::default()).unwrap();
        assert_eq!(window.start_param(), "2024-05-01T00:00:00");
        assert_eq!(window.end_param(), "2024-05-02T00:00:00");
    }

    #[test]
    fn test_resolve_window_rejects_garbage() {
        let args = WindowArgs {
            start: Some("yesterday".to_string()),
            end: Some("2024-05-02T00:00:00".to_string()),
            last_hours: None,
        };
        assert!(resolve_window(&args, &LogdeckConfig::default()).is_err());
    }

    #[test]
    fn test_build_query_state_applies_overrides() {
        let config = LogdeckConfig::default();
        let window = TimeWindow::last_hours(24);
        let state = build_query_state(
            &config,
            window,
            Some("status=500"),
            Some(3),
            Some(50),
            Some(GroupBy::Method),
            None,
        )
        .unwrap();

        assert_eq!(state.limit, 50);
        assert_eq!(state.offset, 100);
        assert_eq!(state.group_by, GroupBy::Method);
        assert_eq!(state.interval, BucketInterval::FiveMinutes);
        assert!(state.filters.status.is_some());
    }
}
