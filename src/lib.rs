//! logdeck - Terminal dashboard client for HTTP access-log analytics
//!
//! This library provides the query/state orchestration core of the
//! dashboard: free-text filter parsing, an immutable query-state model,
//! an analytics service client, the fetch-cycle orchestrator, and chart
//! row reshaping. All query execution lives in the remote service.

pub mod chart;
pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod filter;
pub mod logging;
pub mod model;
pub mod query;
