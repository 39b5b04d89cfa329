//! Wire types for the log-analytics service.
//!
//! These mirror the JSON bodies returned by the service's `/logs`,
//! `/time-series`, and `/summary` endpoints. The client never mutates a
//! log entry; everything here is externally sourced data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One HTTP access-log record as returned by `GET /logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Second-precision local timestamp (`yyyy-MM-ddTHH:mm:ss`)
    pub timestamp: String,
    pub host: String,
    pub method: String,
    pub protocol: String,
    pub referer: String,
    pub request: String,
    pub status: u16,
    pub user_identifier: String,
    pub bytes: u64,
}

/// One chart series within a time-series response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Group value this series represents (a status code or method name)
    pub label: String,
    /// One count per bucket, index-aligned with `TimeSeriesData::labels`
    pub data: Vec<f64>,
    /// Display color chosen by the service
    #[serde(rename = "backgroundColor", default)]
    pub background_color: Option<String>,
}

/// Aggregated counts per time bucket as returned by `GET /time-series`.
///
/// Index i across `labels` and every dataset's `data` refers to the same
/// bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Summary statistics as returned by `GET /summary`.
///
/// Distribution keys arrive as JSON object keys, so status codes are
/// strings here. The service computes the numbers; the client treats
/// them as opaque apart from percentage display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryData {
    pub total_requests: u64,
    pub status_distribution: BTreeMap<String, u64>,
    pub method_distribution: BTreeMap<String, u64>,
    pub average_response_size: f64,
}

impl SummaryData {
    /// Share of total requests for one distribution bucket, as a
    /// percentage. Returns 0.0 when there are no requests at all.
    pub fn percentage(&self, count: u64) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            count as f64 / self.total_requests as f64 * 100.0
        }
    }

    /// Status codes sorted by count descending, capped at `n`.
    pub fn top_statuses(&self, n: usize) -> Vec<(&str, u64)> {
        Self::top_n(&self.status_distribution, n)
    }

    /// Methods sorted by count descending, capped at `n`.
    pub fn top_methods(&self, n: usize) -> Vec<(&str, u64)> {
        Self::top_n(&self.method_distribution, n)
    }

    fn top_n(dist: &BTreeMap<String, u64>, n: usize) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> =
            dist.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_with(total: u64, statuses: &[(&str, u64)]) -> SummaryData {
        SummaryData {
            total_requests: total,
            status_distribution: statuses
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            method_distribution: BTreeMap::new(),
            average_response_size: 0.0,
        }
    }

    #[test]
    fn test_percentage_normal() {
        let summary = summary_with(200, &[("200", 150)]);
        assert!((summary.percentage(150) - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percentage_zero_total_is_zero_not_nan() {
        let summary = summary_with(0, &[]);
        let pct = summary.percentage(0);
        assert_eq!(pct, 0.0);
        assert!(!pct.is_nan());
    }

    #[test]
    fn test_top_statuses_sorted_and_capped() {
        let summary = summary_with(100, &[("200", 50), ("404", 30), ("500", 20)]);
        let top = summary.top_statuses(2);
        assert_eq!(top, vec![("200", 50), ("404", 30)]);
    }

    #[test]
    fn test_top_statuses_tie_breaks_by_key() {
        let summary = summary_with(40, &[("500", 20), ("404", 20)]);
        let top = summary.top_statuses(5);
        assert_eq!(top, vec![("404", 20), ("500", 20)]);
    }

    #[test]
    fn test_log_entry_deserializes_service_shape() {
        let json = serde_json::json!({
            "timestamp": "2024-05-01T12:00:00",
            "host": "10.0.0.1",
            "method": "GET",
            "protocol": "HTTP/1.1",
            "referer": "https://example.com",
            "request": "/path/to/resource",
            "status": 200,
            "user_identifier": "user1",
            "bytes": 1234
        });
        let entry: LogEntry = serde_json::from_value(json).unwrap();
        assert_eq!(entry.method, "GET");
        assert_eq!(entry.status, 200);
        assert_eq!(entry.bytes, 1234);
    }

    #[test]
    fn test_time_series_deserializes_background_color() {
        let json = serde_json::json!({
            "labels": ["12:00:00", "12:05:00"],
            "datasets": [
                {"label": "200", "data": [3.0, 5.0], "backgroundColor": "rgba(75, 192, 192, 0.6)"}
            ]
        });
        let data: TimeSeriesData = serde_json::from_value(json).unwrap();
        assert_eq!(data.labels.len(), 2);
        assert_eq!(data.datasets[0].data, vec![3.0, 5.0]);
        assert!(data.datasets[0].background_color.is_some());
    }
}
