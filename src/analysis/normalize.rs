//! Reading normalization for charting.
//!
//! `normalize` takes the flat list of `Reading`s produced by the ingest
//! layer and shapes it into a `ReadingTable`: one series per measurement
//! type, rows sorted oldest-first, and null values dropped so numeric
//! charting never sees a gap marker. The table is what the CLI prints and
//! the endpoint serves.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::ingest::readings::readings_from_items;
use crate::logging::{self, Component};
use crate::model::{MonitorResult, Reading};

// ---------------------------------------------------------------------------
// Table types
// ---------------------------------------------------------------------------

/// One row of a readings table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingRow {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
}

/// All rows for one measurement type, ascending by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureSeries {
    pub measure_type: String,
    pub unit: String,
    pub rows: Vec<ReadingRow>,
}

/// Normalized readings for one station.
///
/// A table with no rows is a valid result (the station reported only
/// nulls, or nothing at all), distinct from a failed fetch.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ReadingTable {
    /// One series per measurement type, ordered by measure type name.
    pub series: Vec<MeasureSeries>,
    /// Number of readings dropped because their value was missing.
    pub dropped: usize,
}

impl ReadingTable {
    /// Every row across all series, series by series.
    pub fn rows(&self) -> impl Iterator<Item = &ReadingRow> {
        self.series.iter().flat_map(|s| s.rows.iter())
    }

    pub fn row_count(&self) -> usize {
        self.series.iter().map(|s| s.rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// The series for one measurement type, if present.
    pub fn series_for(&self, measure_type: &str) -> Option<&MeasureSeries> {
        self.series.iter().find(|s| s.measure_type == measure_type)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Groups readings by measurement type, drops missing values, and sorts
/// each series ascending by timestamp.
///
/// The sort is stable, so readings sharing a timestamp keep their input
/// order.
pub fn normalize(readings: Vec<Reading>) -> ReadingTable {
    let mut grouped: BTreeMap<String, Vec<ReadingRow>> = BTreeMap::new();
    let mut dropped = 0;

    for reading in readings {
        let Some(value) = reading.value else {
            dropped += 1;
            continue;
        };

        grouped
            .entry(reading.measure_type)
            .or_default()
            .push(ReadingRow {
                timestamp: reading.timestamp,
                value,
                unit: reading.unit,
            });
    }

    if dropped > 0 {
        logging::debug(
            Component::Normalize,
            None,
            &format!("Dropped {} readings with missing values", dropped),
        );
    }

    let series = grouped
        .into_iter()
        .map(|(measure_type, mut rows)| {
            rows.sort_by_key(|row| row.timestamp);
            let unit = rows.first().map(|r| r.unit.clone()).unwrap_or_default();
            MeasureSeries {
                measure_type,
                unit,
                rows,
            }
        })
        .collect();

    ReadingTable { series, dropped }
}

/// Normalizes a raw JSON `items` value.
///
/// # Errors
/// `MalformedPayload` if `items` is not a list or an item lacks the fields a
/// reading needs. An empty list is `Ok` with a zero-row table.
pub fn normalize_items(items: &Value) -> MonitorResult<ReadingTable> {
    readings_from_items(items).map(normalize)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
