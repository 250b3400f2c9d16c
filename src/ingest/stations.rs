//! Station catalog and station detail parsing.
//!
//! Handles the two station-shaped responses of the flood-monitoring API:
//! the active station listing (`/id/stations?status=Active`) and the detail
//! record of one station (`/id/stations/{id}`), from which the available
//! measures are read. See `fixtures.rs` for annotated examples.

use serde::Deserialize;

use crate::logging::{self, Component};
use crate::model::{AvailableMeasure, Measure, MonitorError, MonitorResult, Station, UNKNOWN_UNIT};

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct StationListResponse {
    items: Vec<StationItem>,
}

#[derive(Deserialize)]
struct StationItem {
    notation: String,
    label: OneOrMany<String>,
    #[serde(rename = "riverName")]
    river_name: Option<String>,
    town: Option<String>,
    #[serde(rename = "catchmentName")]
    catchment_name: Option<String>,
}

#[derive(Deserialize)]
struct StationDetailResponse {
    items: OneOrMany<StationDetail>,
}

#[derive(Deserialize)]
struct StationDetail {
    measures: Option<OneOrMany<MeasureItem>>,
}

#[derive(Deserialize)]
struct MeasureItem {
    parameter: Option<String>,
    qualifier: Option<String>,
    unit: Option<String>,
    #[serde(rename = "unitName")]
    unit_name: Option<String>,
}

/// The API collapses single-element arrays into a bare value.
///
/// `Many` is tried first: derived structs also accept sequences, so trying
/// `One` first would misread an array.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

// ---------------------------------------------------------------------------
// Station catalog
// ---------------------------------------------------------------------------

/// Parses the active station listing into `Station`s, in response order.
///
/// # Errors
/// - `MalformedPayload` - invalid JSON, no `items`, an item without
///   `notation`/`label`, or a catalog where no station carries a river or
///   town at all (nothing could ever be selected from it).
/// - `EmptyResult` - a well-formed listing with zero stations.
pub fn parse_station_catalog(json: &str) -> MonitorResult<Vec<Station>> {
    let response: StationListResponse = serde_json::from_str(json)?;

    if response.items.is_empty() {
        return Err(MonitorError::empty("Station catalog contained no stations"));
    }

    let stations: Vec<Station> = response.items.into_iter().map(into_station).collect();

    if !stations.iter().any(|s| s.river.is_some()) {
        return Err(MonitorError::malformed("No station in the catalog has a riverName"));
    }
    if !stations.iter().any(|s| s.town.is_some()) {
        return Err(MonitorError::malformed("No station in the catalog has a town"));
    }

    Ok(stations)
}

fn into_station(item: StationItem) -> Station {
    let label = item
        .label
        .into_vec()
        .into_iter()
        .next()
        .unwrap_or_else(|| item.notation.clone());

    Station {
        id: item.notation,
        label,
        river: non_blank(item.river_name),
        town: non_blank(item.town),
        catchment: non_blank(item.catchment_name),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Station measures
// ---------------------------------------------------------------------------

/// Parses a station detail record into the measures that can be requested
/// for it, one entry per `Measure` kind (first occurrence wins).
///
/// Measures without a `parameter`, or whose kind is not one we model
/// (rainfall, for example), are logged and skipped.
///
/// # Errors
/// - `MalformedPayload` - invalid JSON, no `items`, or no `measures` key.
pub fn parse_station_measures(json: &str, station_id: &str) -> MonitorResult<Vec<AvailableMeasure>> {
    let response: StationDetailResponse = serde_json::from_str(json)?;

    let detail = response
        .items
        .into_vec()
        .into_iter()
        .next()
        .ok_or_else(|| MonitorError::malformed(format!("No detail record for station {}", station_id)))?;

    let measures = detail.measures.ok_or_else(|| {
        MonitorError::malformed(format!("Station {} detail has no measures", station_id))
    })?;

    let mut available: Vec<AvailableMeasure> = Vec::new();

    for item in measures.into_vec() {
        let Some(parameter) = item.parameter.as_deref() else {
            logging::warn(
                Component::Api,
                Some(station_id),
                "Parameter descriptor not found in measure, skipping",
            );
            continue;
        };

        let qualifier = item.qualifier.as_deref().unwrap_or("");
        let measure = match Measure::classify(parameter, qualifier) {
            Ok(measure) => measure,
            Err(e) => {
                logging::debug(Component::Api, Some(station_id), &e.to_string());
                continue;
            }
        };

        if available.iter().any(|a| a.measure == measure) {
            continue;
        }

        available.push(AvailableMeasure {
            measure,
            unit: unit_label(&item),
        });
    }

    Ok(available)
}

/// `unit` is a vocabulary URL (`…/unit#Meter`); keep the fragment.
fn unit_label(item: &MeasureItem) -> String {
    item.unit
        .as_deref()
        .and_then(|u| u.rsplit('#').next())
        .filter(|u| !u.is_empty())
        .or(item.unit_name.as_deref())
        .unwrap_or(UNKNOWN_UNIT)
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
