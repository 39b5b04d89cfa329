//! Analytics service client.
//!
//! Thin adapter over the remote log-analytics HTTP API. Each operation
//! is one request/response round trip with no caching and no retry;
//! every parameter comes explicitly from a single [`QueryState`]
//! snapshot so the three dashboard queries can never disagree about the
//! window they cover.

mod error;

pub use error::ClientError;

use crate::filter::FilterSet;
use crate::model::{LogEntry, SummaryData, TimeSeriesData};
use crate::query::{BucketInterval, GroupBy, TimeWindow};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Read operations against the analytics service.
///
/// The dashboard orchestrator is generic over this trait so tests can
/// drive it with scripted responses.
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// Fetch one page of raw log entries, server order preserved.
    async fn fetch_logs(
        &self,
        window: &TimeWindow,
        filters: &FilterSet,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<LogEntry>, ClientError>;

    /// Fetch bucketed counts grouped by `group_by`.
    async fn fetch_time_series(
        &self,
        window: &TimeWindow,
        interval: BucketInterval,
        group_by: GroupBy,
    ) -> Result<TimeSeriesData, ClientError>;

    /// Fetch summary statistics for the window.
    async fn fetch_summary(&self, window: &TimeWindow) -> Result<SummaryData, ClientError>;
}

/// HTTP implementation of [`AnalyticsApi`] backed by `reqwest`.
pub struct HttpAnalyticsClient {
    base_url: String,
    client: Client,
    timeout_seconds: u64,
}

impl HttpAnalyticsClient {
    /// Create a client for the service at `base_url`
    /// (e.g. "http://localhost:8000").
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: base_url.into(),
            client,
            timeout_seconds,
        }
    }

    /// Create a client with a caller-supplied `reqwest` client (for
    /// testing).
    pub fn with_client(base_url: impl Into<String>, client: Client, timeout_seconds: u64) -> Self {
        Self {
            base_url: base_url.into(),
            client,
            timeout_seconds,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            ClientError::InvalidResponse(format!("Failed to read response body: {}", e))
        })?;

        serde_json::from_str(&body).map_err(|e| {
            ClientError::InvalidResponse(format!("Failed to parse {} response: {}", path, e))
        })
    }

    fn classify_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout(self.timeout_seconds)
        } else {
            ClientError::ConnectionFailed(e.to_string())
        }
    }
}

#[async_trait]
impl AnalyticsApi for HttpAnalyticsClient {
    async fn fetch_logs(
        &self,
        window: &TimeWindow,
        filters: &FilterSet,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<LogEntry>, ClientError> {
        let mut params = vec![
            ("start_time", window.start_param()),
            ("end_time", window.end_param()),
        ];
        if let Some(ref method) = filters.method {
            params.push(("method", method.clone()));
        }
        // The service's /logs endpoint only understands equality; the
        // parsed operator stays in the model but the wire carries the
        // bare value.
        if let Some(predicate) = filters.status {
            params.push(("status", predicate.value.to_string()));
        }
        params.push(("limit", limit.to_string()));
        params.push(("offset", offset.to_string()));

        self.get_json("/logs", &params).await
    }

    async fn fetch_time_series(
        &self,
        window: &TimeWindow,
        interval: BucketInterval,
        group_by: GroupBy,
    ) -> Result<TimeSeriesData, ClientError> {
        let params = [
            ("start_time", window.start_param()),
            ("end_time", window.end_param()),
            ("interval", interval.as_str().to_string()),
            ("group_by", group_by.as_str().to_string()),
        ];

        self.get_json("/time-series", &params).await
    }

    async fn fetch_summary(&self, window: &TimeWindow) -> Result<SummaryData, ClientError> {
        let params = [
            ("start_time", window.start_param()),
            ("end_time", window.end_param()),
        ];

        self.get_json("/summary", &params).await
    }
}
