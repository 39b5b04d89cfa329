//! Dashboard orchestration.
//!
//! [`Dashboard`] owns the active [`QueryState`], turns user intents into
//! fetch cycles against the analytics service, and folds the results
//! into a [`ViewModel`]. A cycle fans out up to three queries against
//! one immutable state snapshot and joins them before anything becomes
//! visible; cycles are totally ordered by id, and a result from a
//! superseded cycle is dropped on arrival regardless of when it lands.

mod view;

pub use view::ViewModel;

use crate::client::{AnalyticsApi, ClientError};
use crate::filter;
use crate::model::{LogEntry, SummaryData, TimeSeriesData};
use crate::query::{BucketInterval, GroupBy, QueryState, TimeWindow};

/// Message shown for any failed cycle. Transport and service failures
/// are not distinguished in the UI; details go to the log.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch data. Please try again.";

/// A user action the dashboard reacts to.
#[derive(Debug, Clone)]
pub enum Intent {
    /// Free-text search entry; parsed into filters, resets pagination
    Search(String),
    /// Date-range selection; resets pagination
    Window(TimeWindow),
    /// Time-series grouping change; re-fetches the chart only
    Grouping(GroupBy),
    /// Time-series bucket-interval change; re-fetches the chart only
    Interval(BucketInterval),
    /// Jump to a 1-based page of the log table
    Page(u64),
}

/// Lifecycle of the most recent cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Which queries a cycle issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleScope {
    /// Logs + time series + summary, committed all-or-nothing
    Full,
    /// Time series only; logs and summary stay untouched
    SeriesOnly,
}

/// Handle for one issued cycle: its id, scope, and the state snapshot
/// it must be executed against.
#[derive(Debug, Clone)]
pub struct CycleTicket {
    pub id: u64,
    pub scope: CycleScope,
    pub snapshot: QueryState,
}

/// Settled result of a cycle, still tagged with its id so the commit
/// step can drop it if a newer cycle has started since.
#[derive(Debug)]
pub enum CycleOutcome {
    Full {
        id: u64,
        result: Result<(Vec<LogEntry>, TimeSeriesData, SummaryData), ClientError>,
    },
    Series {
        id: u64,
        result: Result<TimeSeriesData, ClientError>,
    },
}

impl CycleOutcome {
    pub fn id(&self) -> u64 {
        match self {
            CycleOutcome::Full { id, .. } | CycleOutcome::Series { id, .. } => *id,
        }
    }
}

/// Query/state orchestrator for the log dashboard.
pub struct Dashboard<A: AnalyticsApi> {
    client: A,
    state: QueryState,
    view: ViewModel,
    phase: Phase,
    cycle: u64,
}

impl<A: AnalyticsApi> Dashboard<A> {
    pub fn new(client: A, state: QueryState) -> Self {
        Self {
            client,
            state,
            view: ViewModel::default(),
            phase: Phase::Idle,
            cycle: 0,
        }
    }

    /// Current query snapshot.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Current view model.
    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Apply an intent to the query state and open a new cycle.
    ///
    /// The returned ticket carries the snapshot the cycle must run
    /// against; any cycle opened earlier is superseded from this point
    /// on, whether or not its responses have arrived.
    pub fn begin(&mut self, intent: Intent) -> CycleTicket {
        let scope = match intent {
            Intent::Search(ref text) => {
                self.state = self.state.with_search(filter::parse(text));
                CycleScope::Full
            }
            Intent::Window(window) => {
                self.state = self.state.with_window(window);
                CycleScope::Full
            }
            Intent::Page(page) => {
                self.state = self.state.with_page(page);
                CycleScope::Full
            }
            Intent::Grouping(group_by) => {
                self.state = self.state.with_grouping(group_by);
                CycleScope::SeriesOnly
            }
            Intent::Interval(interval) => {
                self.state = self.state.with_interval(interval);
                CycleScope::SeriesOnly
            }
        };

        self.open_cycle(scope)
    }

    /// Open a full cycle against the current state without mutating it
    /// (initial load, or an explicit re-fetch).
    pub fn begin_refresh(&mut self) -> CycleTicket {
        self.open_cycle(CycleScope::Full)
    }

    fn open_cycle(&mut self, scope: CycleScope) -> CycleTicket {
        self.cycle += 1;
        self.phase = Phase::Loading;
        self.view.loading = true;
        self.view.error = None;

        tracing::debug!(
            cycle = self.cycle,
            scope = ?scope,
            offset = self.state.offset,
            "Cycle started"
        );

        CycleTicket {
            id: self.cycle,
            scope,
            snapshot: self.state.clone(),
        }
    }

    /// Run a cycle's queries to completion.
    ///
    /// A full cycle issues all three fetches concurrently and waits for
    /// every one to settle; the first failure (logs, then series, then
    /// summary) becomes the cycle's error. This only reads the ticket's
    /// snapshot, never the live state.
    pub async fn execute(&self, ticket: &CycleTicket) -> CycleOutcome {
        let snapshot = &ticket.snapshot;

        match ticket.scope {
            CycleScope::Full => {
                let (logs, series, summary) = tokio::join!(
                    self.client.fetch_logs(
                        &snapshot.window,
                        &snapshot.filters,
                        snapshot.offset,
                        snapshot.limit,
                    ),
                    self.client.fetch_time_series(
                        &snapshot.window,
                        snapshot.interval,
                        snapshot.group_by,
                    ),
                    self.client.fetch_summary(&snapshot.window),
                );

                let result = match (logs, series, summary) {
                    (Ok(logs), Ok(series), Ok(summary)) => Ok((logs, series, summary)),
                    (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => Err(e),
                };

                CycleOutcome::Full {
                    id: ticket.id,
                    result,
                }
            }
            CycleScope::SeriesOnly => {
                let result = self
                    .client
                    .fetch_time_series(&snapshot.window, snapshot.interval, snapshot.group_by)
                    .await;

                CycleOutcome::Series {
                    id: ticket.id,
                    result,
                }
            }
        }
    }

    /// Fold a settled cycle into the view model.
    ///
    /// Outcomes from superseded cycles are dropped unconditionally:
    /// last cycle wins, not last arrival. A failed full cycle clears
    /// prior data; a failed series cycle clears only the chart.
    pub fn commit(&mut self, outcome: CycleOutcome) {
        if outcome.id() != self.cycle {
            tracing::debug!(
                cycle = outcome.id(),
                current = self.cycle,
                "Discarding result from superseded cycle"
            );
            return;
        }

        match outcome {
            CycleOutcome::Full { id, result } => match result {
                Ok((logs, series, summary)) => {
                    tracing::info!(cycle = id, logs = logs.len(), "Cycle completed");
                    self.view = ViewModel {
                        logs,
                        time_series: Some(series),
                        summary: Some(summary),
                        loading: false,
                        error: None,
                    };
                    self.phase = Phase::Ready;
                }
                Err(e) => {
                    tracing::warn!(cycle = id, error = %e, "Cycle failed");
                    self.view = ViewModel {
                        error: Some(FETCH_ERROR_MESSAGE.to_string()),
                        ..ViewModel::default()
                    };
                    self.phase = Phase::Failed;
                }
            },
            CycleOutcome::Series { id, result } => match result {
                Ok(series) => {
                    tracing::info!(cycle = id, buckets = series.labels.len(), "Chart re-fetched");
                    self.view.time_series = Some(series);
                    self.view.loading = false;
                    self.view.error = None;
                    self.phase = Phase::Ready;
                }
                Err(e) => {
                    tracing::warn!(cycle = id, error = %e, "Chart re-fetch failed");
                    self.view.time_series = None;
                    self.view.loading = false;
                    self.view.error = Some(FETCH_ERROR_MESSAGE.to_string());
                    self.phase = Phase::Failed;
                }
            },
        }
    }

    /// Convenience: apply an intent and drive its cycle to completion.
    pub async fn handle(&mut self, intent: Intent) {
        let ticket = self.begin(intent);
        let outcome = self.execute(&ticket).await;
        self.commit(outcome);
    }

    /// Convenience: run an initial or repeated full load of the current
    /// state.
    pub async fn load(&mut self) {
        let ticket = self.begin_refresh();
        let outcome = self.execute(&ticket).await;
        self.commit(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterSet;
    use crate::model::Dataset;
    use crate::query::{QueryError, SERVICE_TIME_FORMAT};
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use std::sync::Mutex;

    /// Scripted analytics service for orchestrator tests. Each fetch
    /// records the parameters it was called with and returns canned
    /// data tagged with the mock's marker.
    struct ScriptedService {
        marker: String,
        fail_series: bool,
        fail_summary: bool,
        log_calls: Mutex<Vec<(u64, u64, FilterSet)>>,
    }

    impl ScriptedService {
        fn new(marker: &str) -> Self {
            Self {
                marker: marker.to_string(),
                fail_series: false,
                fail_summary: false,
                log_calls: Mutex::new(Vec::new()),
            }
        }

        fn entry(&self) -> LogEntry {
            LogEntry {
                timestamp: "2024-05-01T12:00:00".into(),
                host: self.marker.clone(),
                method: "GET".into(),
                protocol: "HTTP/1.1".into(),
                referer: "-".into(),
                request: "/".into(),
                status: 200,
                user_identifier: "user1".into(),
                bytes: 512,
            }
        }

        fn series(&self) -> TimeSeriesData {
            TimeSeriesData {
                labels: vec![format!("{}-bucket", self.marker)],
                datasets: vec![Dataset {
                    label: "200".into(),
                    data: vec![1.0],
                    background_color: None,
                }],
            }
        }
    }

    #[async_trait]
    impl AnalyticsApi for ScriptedService {
        async fn fetch_logs(
            &self,
            _window: &TimeWindow,
            filters: &FilterSet,
            offset: u64,
            limit: u64,
        ) -> Result<Vec<LogEntry>, ClientError> {
            self.log_calls
                .lock()
                .unwrap()
                .push((offset, limit, filters.clone()));
            Ok(vec![self.entry()])
        }

        async fn fetch_time_series(
            &self,
            _window: &TimeWindow,
            _interval: BucketInterval,
            _group_by: GroupBy,
        ) -> Result<TimeSeriesData, ClientError> {
            if self.fail_series {
                Err(ClientError::HttpStatus(500))
            } else {
                Ok(self.series())
            }
        }

        async fn fetch_summary(
            &self,
            _window: &TimeWindow,
        ) -> Result<SummaryData, ClientError> {
            if self.fail_summary {
                Err(ClientError::ConnectionFailed("refused".into()))
            } else {
                Ok(SummaryData {
                    total_requests: 1,
                    status_distribution: [("200".to_string(), 1u64)].into_iter().collect(),
                    method_distribution: [("GET".to_string(), 1u64)].into_iter().collect(),
                    average_response_size: 512.0,
                })
            }
        }
    }

    fn window() -> TimeWindow {
        let start =
            NaiveDateTime::parse_from_str("2024-05-01T00:00:00", SERVICE_TIME_FORMAT).unwrap();
        let end =
            NaiveDateTime::parse_from_str("2024-05-02T00:00:00", SERVICE_TIME_FORMAT).unwrap();
        TimeWindow::new(start, end).unwrap()
    }

    fn dashboard(service: ScriptedService) -> Result<Dashboard<ScriptedService>, QueryError> {
        Ok(Dashboard::new(service, QueryState::new(window(), 100)?))
    }

    #[tokio::test]
    async fn test_load_transitions_to_ready() {
        let mut dash = dashboard(ScriptedService::new("a")).unwrap();
        assert_eq!(dash.phase(), Phase::Idle);

        dash.load().await;

        assert_eq!(dash.phase(), Phase::Ready);
        let view = dash.view();
        assert_eq!(view.logs.len(), 1);
        assert!(view.time_series.is_some());
        assert!(view.summary.is_some());
        assert!(!view.loading);
        assert!(view.error.is_none());
    }

    #[tokio::test]
    async fn test_failed_cycle_clears_prior_data() {
        let mut dash = dashboard(ScriptedService::new("a")).unwrap();
        dash.load().await;
        assert!(!dash.view().logs.is_empty());

        let mut failing = ScriptedService::new("b");
        failing.fail_summary = true;
        let mut dash = Dashboard::new(failing, dash.state().clone());
        dash.load().await;

        assert_eq!(dash.phase(), Phase::Failed);
        let view = dash.view();
        assert!(view.logs.is_empty());
        assert!(view.time_series.is_none());
        assert!(view.summary.is_none());
        assert_eq!(view.error.as_deref(), Some(FETCH_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_any_single_failure_fails_whole_cycle() {
        let mut service = ScriptedService::new("a");
        service.fail_series = true;
        let mut dash = dashboard(service).unwrap();

        dash.load().await;

        // Logs succeeded but the cycle is all-or-nothing.
        assert_eq!(dash.phase(), Phase::Failed);
        assert!(dash.view().logs.is_empty());
    }

    #[tokio::test]
    async fn test_search_intent_resets_offset_and_parses_filters() {
        let mut dash = dashboard(ScriptedService::new("a")).unwrap();
        dash.handle(Intent::Page(3)).await;
        assert_eq!(dash.state().offset, 200);

        dash.handle(Intent::Search(r#"method="POST" and status!=200"#.into()))
            .await;

        assert_eq!(dash.state().offset, 0);
        assert_eq!(dash.state().filters.method.as_deref(), Some("POST"));
        let calls = dash.client.log_calls.lock().unwrap();
        let (offset, limit, filters) = calls.last().unwrap().clone();
        assert_eq!(offset, 0);
        assert_eq!(limit, 100);
        assert_eq!(filters.method.as_deref(), Some("POST"));
    }

    #[tokio::test]
    async fn test_grouping_intent_is_series_only() {
        let mut dash = dashboard(ScriptedService::new("a")).unwrap();
        dash.load().await;
        let logs_before = dash.view().logs.clone();
        let calls_before = dash.client.log_calls.lock().unwrap().len();

        dash.handle(Intent::Grouping(GroupBy::Method)).await;

        assert_eq!(dash.state().group_by, GroupBy::Method);
        assert_eq!(dash.view().logs, logs_before);
        assert!(dash.view().summary.is_some());
        // No additional /logs fetch was issued.
        assert_eq!(dash.client.log_calls.lock().unwrap().len(), calls_before);
    }

    #[tokio::test]
    async fn test_interval_intent_preserves_offset() {
        let mut dash = dashboard(ScriptedService::new("a")).unwrap();
        dash.handle(Intent::Page(2)).await;

        dash.handle(Intent::Interval(BucketInterval::OneHour)).await;

        assert_eq!(dash.state().offset, 100);
        assert_eq!(dash.state().interval, BucketInterval::OneHour);
    }

    #[tokio::test]
    async fn test_series_failure_keeps_logs_and_summary() {
        let mut dash = dashboard(ScriptedService::new("a")).unwrap();
        dash.load().await;

        dash.client.fail_series = true;
        dash.handle(Intent::Grouping(GroupBy::Method)).await;

        assert_eq!(dash.phase(), Phase::Failed);
        let view = dash.view();
        assert!(!view.logs.is_empty());
        assert!(view.summary.is_some());
        assert!(view.time_series.is_none());
        assert_eq!(view.error.as_deref(), Some(FETCH_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_last_cycle_wins_over_late_arrival() {
        let mut dash = dashboard(ScriptedService::new("old")).unwrap();

        // Cycle 1 issued, then superseded by cycle 2 before its results
        // are committed.
        let ticket1 = dash.begin(Intent::Page(1));
        let ticket2 = dash.begin(Intent::Page(2));
        assert!(ticket2.id > ticket1.id);

        let outcome1 = dash.execute(&ticket1).await;
        let outcome2 = dash.execute(&ticket2).await;

        // Fresh result lands first; the stale one arrives afterwards.
        dash.commit(outcome2);
        assert_eq!(dash.phase(), Phase::Ready);
        let page_after_fresh = dash.view().logs.clone();

        dash.commit(outcome1);

        // The late cycle-1 result was dropped, not applied.
        assert_eq!(dash.view().logs, page_after_fresh);
        assert_eq!(dash.phase(), Phase::Ready);
        assert_eq!(dash.state().offset, 100);
    }

    #[tokio::test]
    async fn test_stale_failure_cannot_clobber_fresh_success() {
        let mut dash = dashboard(ScriptedService::new("a")).unwrap();

        let ticket1 = dash.begin(Intent::Page(1));
        dash.client.fail_summary = true;
        let outcome1 = dash.execute(&ticket1).await;
        dash.client.fail_summary = false;

        let ticket2 = dash.begin(Intent::Page(2));
        let outcome2 = dash.execute(&ticket2).await;

        dash.commit(outcome2);
        dash.commit(outcome1);

        assert_eq!(dash.phase(), Phase::Ready);
        assert!(dash.view().error.is_none());
        assert!(!dash.view().logs.is_empty());
    }

    #[tokio::test]
    async fn test_failed_then_new_intent_recovers() {
        let mut service = ScriptedService::new("a");
        service.fail_series = true;
        let mut dash = dashboard(service).unwrap();
        dash.load().await;
        assert_eq!(dash.phase(), Phase::Failed);

        dash.client.fail_series = false;
        dash.handle(Intent::Page(1)).await;

        assert_eq!(dash.phase(), Phase::Ready);
        assert!(dash.view().error.is_none());
    }

    #[tokio::test]
    async fn test_begin_sets_loading_and_clears_error() {
        let mut service = ScriptedService::new("a");
        service.fail_series = true;
        let mut dash = dashboard(service).unwrap();
        dash.load().await;
        assert!(dash.view().error.is_some());

        let _ticket = dash.begin(Intent::Page(1));
        assert_eq!(dash.phase(), Phase::Loading);
        assert!(dash.view().loading);
        assert!(dash.view().error.is_none());
    }
}
