//! Chart row reshaping.
//!
//! The service returns a time series as parallel arrays (one label list,
//! one value list per dataset). Generic table/chart widgets want one
//! row per bucket instead, so this module pivots the arrays by index.

use crate::model::TimeSeriesData;

/// One time bucket with the value of every series at that bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    /// Bucket name from the service's label array
    pub bucket: String,
    /// (series label, value) pairs, dataset order preserved
    pub cells: Vec<(String, f64)>,
}

/// Result of reshaping a time-series response.
///
/// `NoData` is a distinct sentinel so the rendering layer can tell
/// "nothing fetched yet" apart from "fetched, zero buckets" — an empty
/// `Rows` list is never produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartTable {
    NoData,
    Rows(Vec<ChartRow>),
}

impl ChartTable {
    pub fn is_empty(&self) -> bool {
        matches!(self, ChartTable::NoData)
    }
}

/// Pivot a time-series response into row-oriented chart rows.
///
/// Produces exactly one row per label; row i carries `dataset.data[i]`
/// for every dataset. A dataset shorter than the label list contributes
/// 0 for the missing buckets rather than failing the whole reshape.
pub fn to_rows(data: Option<&TimeSeriesData>) -> ChartTable {
    let data = match data {
        Some(d) if !d.labels.is_empty() => d,
        _ => return ChartTable::NoData,
    };

    let rows = data
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| ChartRow {
            bucket: label.clone(),
            cells: data
                .datasets
                .iter()
                .map(|ds| {
                    let value = ds.data.get(i).copied().unwrap_or(0.0);
                    (ds.label.clone(), value)
                })
                .collect(),
        })
        .collect();

    ChartTable::Rows(rows)
}
