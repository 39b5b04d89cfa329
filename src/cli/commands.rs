//! Handlers for the single-query commands (`logs`, `series`,
//! `summary`). Each builds a client from config, issues exactly one
//! fetch, and renders the result.

use crate::chart;
use crate::cli::{output, LogsArgs, SeriesArgs, SummaryArgs};
use crate::client::{AnalyticsApi, HttpAnalyticsClient};
use crate::filter;
use crate::query::QueryState;
use anyhow::Context;

fn client_for(config: &crate::config::LogdeckConfig) -> HttpAnalyticsClient {
    HttpAnalyticsClient::new(config.service.url.clone(), config.service.timeout_seconds)
}

/// Handle `logdeck logs`
pub async fn handle_logs(args: &LogsArgs) -> anyhow::Result<String> {
    let config = crate::cli::load_config_with_overrides(&args.common)?;
    let window = crate::cli::resolve_window(&args.window, &config)?;

    let mut state = QueryState::new(window, args.limit.unwrap_or(config.query.limit))?;
    if let Some(ref text) = args.search {
        state = state.with_search(filter::parse(text));
    }
    if let Some(page) = args.page {
        state = state.with_page(page);
    }

    let client = client_for(&config);
    let logs = client
        .fetch_logs(&state.window, &state.filters, state.offset, state.limit)
        .await
        .context("fetching logs")?;

    Ok(if args.common.json {
        output::format_logs_json(&logs)
    } else {
        output::format_logs_table(&logs, state.current_page())
    })
}

/// Handle `logdeck series`
pub async fn handle_series(args: &SeriesArgs) -> anyhow::Result<String> {
    let config = crate::cli::load_config_with_overrides(&args.common)?;
    let window = crate::cli::resolve_window(&args.window, &config)?;

    let client = client_for(&config);
    let series = client
        .fetch_time_series(
            &window,
            args.interval.unwrap_or(config.query.interval),
            args.group_by.unwrap_or(config.query.group_by),
        )
        .await
        .context("fetching time series")?;

    let table = chart::to_rows(Some(&series));
    Ok(if args.common.json {
        output::format_chart_json(&table)
    } else {
        output::format_chart_table(&table)
    })
}

/// Handle `logdeck summary`
pub async fn handle_summary(args: &SummaryArgs) -> anyhow::Result<String> {
    let config = crate::cli::load_config_with_overrides(&args.common)?;
    let window = crate::cli::resolve_window(&args.window, &config)?;

    let client = client_for(&config);
    let summary = client
        .fetch_summary(&window)
        .await
        .context("fetching summary")?;

    Ok(if args.common.json {
        output::format_summary_json(&summary)
    } else {
        output::format_summary(&summary)
    })
}
