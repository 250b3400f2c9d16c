//! Readings response parsing.
//!
//! Turns the `items` array of a `/id/stations/{id}/readings` response into
//! `Reading`s. Values are kept as-is (including nulls); ordering, grouping
//! and dropping of missing values happen in `analysis::normalize`.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::logging::{self, Component};
use crate::model::{ErrorKind, MonitorError, MonitorResult, Reading, UNKNOWN_UNIT};

#[derive(Deserialize)]
struct ReadingsResponse {
    items: Option<Value>,
}

/// Parses a readings response body into a flat list of `Reading`s in
/// response order.
///
/// # Errors
/// - `MalformedPayload` - invalid JSON, no `items`, or an item that is not
///   structurally a reading (see `readings_from_items`).
/// - `EmptyResult` - a valid response with zero readings in the window.
pub fn parse_readings_response(json: &str) -> MonitorResult<Vec<Reading>> {
    let response: ReadingsResponse = serde_json::from_str(json)?;

    let items = response
        .items
        .ok_or_else(|| MonitorError::malformed("Readings response has no items key"))?;

    let readings = readings_from_items(&items)?;

    if readings.is_empty() {
        return Err(MonitorError::empty("No readings in the requested window"));
    }

    Ok(readings)
}

/// Converts a JSON `items` value into `Reading`s.
///
/// Each item must be an object with a `dateTime` string. A missing or null
/// `value` becomes `None`; an array value (duplicate readings for one
/// instant) keeps its first number. An empty array is valid and yields an
/// empty list.
pub fn readings_from_items(items: &Value) -> MonitorResult<Vec<Reading>> {
    let entries = items
        .as_array()
        .ok_or_else(|| MonitorError::malformed("Readings items is not a list"))?;

    entries
        .iter()
        .enumerate()
        .map(|(index, item)| reading_from_item(index, item))
        .collect()
}

fn reading_from_item(index: usize, item: &Value) -> MonitorResult<Reading> {
    let object = item
        .as_object()
        .ok_or_else(|| MonitorError::malformed(format!("Reading {} is not an object", index)))?;

    let date_time = object
        .get("dateTime")
        .and_then(Value::as_str)
        .ok_or_else(|| MonitorError::malformed(format!("Reading {} has no dateTime", index)))?;

    let timestamp = DateTime::parse_from_rfc3339(date_time)
        .map_err(|e| {
            MonitorError::with_source(
                ErrorKind::MalformedPayload,
                format!("Reading {} has an invalid dateTime '{}'", index, date_time),
                e,
            )
        })?
        .with_timezone(&Utc);

    let value = match object.get("value") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::Array(values)) => values.iter().find_map(Value::as_f64),
        Some(Value::String(s)) => match s.parse::<f64>() {
            Ok(v) => Some(v),
            Err(e) => {
                // Log but don't fail - treat as a dropped-out sensor
                logging::warn(
                    Component::Api,
                    None,
                    &format!("Failed to parse value '{}' at {}: {}", s, date_time, e),
                );
                None
            }
        },
        Some(other) => {
            return Err(MonitorError::malformed(format!(
                "Reading {} has a non-numeric value: {}",
                index, other
            )));
        }
    };

    let measure_ref = match object.get("measure") {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(Value::Object(m)) => m.get("@id").and_then(Value::as_str),
        _ => None,
    };

    let (measure_type, unit) = match measure_ref {
        Some(reference) => describe_measure(reference),
        None => ("unknown".to_string(), UNKNOWN_UNIT.to_string()),
    };

    Ok(Reading {
        timestamp,
        value,
        unit,
        measure_type,
    })
}

/// Splits a measure reference into `(measure_type, unit)`.
///
/// The last path segment is
/// `{station}-{parameter}-{qualifier}-{valueType}-{period}-{unit}`, e.g.
/// `1029TH-level-downstage-i-15_min-mASD` → `("level-downstage", "mASD")`.
/// An empty qualifier gives just the parameter. References that don't
/// follow the pattern are returned whole with an unknown unit.
pub fn describe_measure(reference: &str) -> (String, String) {
    let id = reference.rsplit('/').next().unwrap_or(reference);
    let parts: Vec<&str> = id.split('-').collect();

    if parts.len() < 6 || parts[1].is_empty() {
        return (id.to_string(), UNKNOWN_UNIT.to_string());
    }

    let parameter = parts[1];
    let qualifier = parts[2];
    let measure_type = if qualifier.is_empty() {
        parameter.to_string()
    } else {
        format!("{}-{}", parameter, qualifier)
    };

    let unit = if parts[5].is_empty() { UNKNOWN_UNIT } else { parts[5] };

    (measure_type, unit.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
