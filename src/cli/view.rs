//! Handler for `logdeck view`: one full dashboard cycle rendered to
//! the terminal.

use crate::chart;
use crate::cli::{output, ViewArgs};
use crate::client::HttpAnalyticsClient;
use crate::dashboard::{Dashboard, Phase};
use anyhow::bail;
use colored::Colorize;

/// Handle `logdeck view`
///
/// Builds the initial query state from config and CLI overrides, runs
/// one full cycle through the orchestrator, and renders the resulting
/// view model.
pub async fn handle_view(args: &ViewArgs) -> anyhow::Result<String> {
    let config = crate::cli::load_config_with_overrides(&args.common)?;
    let window = crate::cli::resolve_window(&args.window, &config)?;
    let state = crate::cli::build_query_state(
        &config,
        window,
        args.search.as_deref(),
        args.page,
        args.limit,
        args.group_by,
        args.interval,
    )?;

    let client = HttpAnalyticsClient::new(config.service.url.clone(), config.service.timeout_seconds);
    let mut dashboard = Dashboard::new(client, state);
    dashboard.load().await;

    let view = dashboard.view();
    if dashboard.phase() == Phase::Failed {
        bail!(
            "{}",
            view.error.as_deref().unwrap_or("dashboard cycle failed")
        );
    }

    if args.common.json {
        return Ok(serde_json::to_string_pretty(&serde_json::json!({
            "logs": view.logs,
            "time_series": view.time_series,
            "summary": view.summary,
        }))?);
    }

    let mut out = String::new();

    out.push_str(&format!("{}\n", "Time Series Distribution".bold()));
    out.push_str(&output::format_chart_table(&chart::to_rows(
        view.time_series.as_ref(),
    )));
    out.push('\n');

    if let Some(ref summary) = view.summary {
        out.push_str(&format!("\n{}\n", "Summary".bold()));
        out.push_str(&output::format_summary(summary));
    }

    out.push_str(&format!("\n{}\n", "Logs".bold()));
    out.push_str(&output::format_logs_table(
        &view.logs,
        dashboard.state().current_page(),
    ));

    Ok(out)
}
