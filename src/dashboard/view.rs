//! View model presented to the rendering layer.

use crate::model::{LogEntry, SummaryData, TimeSeriesData};

/// Everything the presentation layer needs to draw the dashboard.
///
/// Created empty, then replaced as cycles complete. A failed full cycle
/// clears prior data rather than leaving stale results behind.
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    /// Raw log page in server order; never re-sorted client-side
    pub logs: Vec<LogEntry>,
    /// Bucketed counts for the chart, absent until first fetched
    pub time_series: Option<TimeSeriesData>,
    /// Summary statistics, absent until first fetched
    pub summary: Option<SummaryData>,
    /// True while a cycle is in flight
    pub loading: bool,
    /// User-visible failure message, absent unless the last cycle failed
    pub error: Option<String>,
}
