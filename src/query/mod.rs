//! Query-state model.
//!
//! [`QueryState`] is the canonical snapshot of everything a dashboard
//! query depends on: time window, text filters, grouping, bucket
//! interval, and pagination. Every transition produces a new value and
//! never touches the old one, so an in-flight fetch keeps reading the
//! snapshot it was issued against while the dashboard moves on.

mod error;

pub use error::QueryError;

use crate::filter::FilterSet;
use chrono::{Duration, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp format the analytics service expects (second precision,
/// local time, no zone suffix).
pub const SERVICE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Inclusive time range for a query. Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, QueryError> {
        if start > end {
            return Err(QueryError::InvalidWindow {
                start: start.format(SERVICE_TIME_FORMAT).to_string(),
                end: end.format(SERVICE_TIME_FORMAT).to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Window covering the last `hours` hours, ending now.
    pub fn last_hours(hours: i64) -> Self {
        let end = Local::now().naive_local();
        let start = end - Duration::hours(hours.max(0));
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Start bound in the service's wire format.
    pub fn start_param(&self) -> String {
        self.start.format(SERVICE_TIME_FORMAT).to_string()
    }

    /// End bound in the service's wire format.
    pub fn end_param(&self) -> String {
        self.end.format(SERVICE_TIME_FORMAT).to_string()
    }
}

/// Field the time-series query groups counts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    #[default]
    Status,
    Method,
}

impl GroupBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Status => "status",
            GroupBy::Method => "method",
        }
    }
}

impl FromStr for GroupBy {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "status" => Ok(GroupBy::Status),
            "method" => Ok(GroupBy::Method),
            _ => Err(QueryError::InvalidValue {
                field: "group_by",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket width for time-series aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BucketInterval {
    #[serde(rename = "1m")]
    OneMinute,
    #[default]
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
}

impl BucketInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketInterval::OneMinute => "1m",
            BucketInterval::FiveMinutes => "5m",
            BucketInterval::FifteenMinutes => "15m",
            BucketInterval::OneHour => "1h",
        }
    }
}

impl FromStr for BucketInterval {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" => Ok(BucketInterval::OneMinute),
            "5m" => Ok(BucketInterval::FiveMinutes),
            "15m" => Ok(BucketInterval::FifteenMinutes),
            "1h" => Ok(BucketInterval::OneHour),
            _ => Err(QueryError::InvalidValue {
                field: "interval",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BucketInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of the active dashboard query.
///
/// Invariants held by construction: `limit >= 1`, `offset` is a
/// multiple of `limit`, and `offset` resets to 0 whenever the window or
/// the filters change (a page position is only meaningful relative to
/// the filter set and window it was computed against).
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub window: TimeWindow,
    pub filters: FilterSet,
    pub group_by: GroupBy,
    pub interval: BucketInterval,
    pub offset: u64,
    pub limit: u64,
}

impl QueryState {
    pub fn new(window: TimeWindow, limit: u64) -> Result<Self, QueryError> {
        if limit == 0 {
            return Err(QueryError::ZeroLimit);
        }
        Ok(Self {
            window,
            filters: FilterSet::default(),
            group_by: GroupBy::default(),
            interval: BucketInterval::default(),
            offset: 0,
            limit,
        })
    }

    /// Replace the filter set; resets to the first page.
    pub fn with_search(&self, filters: FilterSet) -> Self {
        Self {
            filters,
            offset: 0,
            ..self.clone()
        }
    }

    /// Replace the time window; resets to the first page.
    pub fn with_window(&self, window: TimeWindow) -> Self {
        Self {
            window,
            offset: 0,
            ..self.clone()
        }
    }

    /// Replace the grouping key. Pagination and filters are untouched;
    /// grouping affects only the time-series query.
    pub fn with_grouping(&self, group_by: GroupBy) -> Self {
        Self {
            group_by,
            ..self.clone()
        }
    }

    /// Replace the bucket interval. Pagination and filters are
    /// untouched.
    pub fn with_interval(&self, interval: BucketInterval) -> Self {
        Self {
            interval,
            ..self.clone()
        }
    }

    /// Jump to a 1-based page number. Page 0 is clamped to page 1.
    pub fn with_page(&self, page: u64) -> Self {
        Self {
            offset: page.saturating_sub(1) * self.limit,
            ..self.clone()
        }
    }

    /// 1-based page number the current offset corresponds to.
    pub fn current_page(&self) -> u64 {
        self.offset / self.limit + 1
    }
}
