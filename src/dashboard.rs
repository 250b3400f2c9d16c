//! The river → town → station → readings selection pipeline.
//!
//! A `Selection` carries everything the user has chosen so far. `resolve`
//! runs the linear fetch → filter → normalize flow for it and returns what
//! the presentation layer should show next: a list to pick from, or a
//! readings table. Nothing is remembered between calls; a changed selection
//! is simply resolved again.

use serde::Serialize;

use crate::analysis::normalize::{ReadingTable, normalize};
use crate::catalog::Catalog;
use crate::ingest::client::FloodMonitorClient;
use crate::model::{DEFAULT_WINDOW_HOURS, Measure, MonitorResult, Station};

/// The user's current choice, threaded explicitly through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub river: Option<String>,
    pub town: Option<String>,
    pub station: Option<String>,
    pub measure: Option<Measure>,
    pub window_hours: u32,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            river: None,
            town: None,
            station: None,
            measure: None,
            window_hours: DEFAULT_WINDOW_HOURS,
        }
    }
}

/// What to present for a selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum SelectionView {
    Rivers {
        rivers: Vec<String>,
    },
    Towns {
        river: String,
        towns: Vec<String>,
    },
    Stations {
        river: String,
        town: String,
        stations: Vec<Station>,
    },
    Readings {
        station_id: String,
        /// Catalog metadata, absent when the id isn't in the active catalog.
        station: Option<Station>,
        window_hours: u32,
        table: ReadingTable,
    },
}

/// Resolves a selection against the catalog, fetching readings once a
/// station has been chosen.
///
/// A station choice takes precedence over river/town, so a station can be
/// opened directly by id. Empty listings are `Ok`; only the readings fetch
/// can fail.
pub fn resolve(
    client: &FloodMonitorClient,
    catalog: &Catalog,
    selection: &Selection,
) -> MonitorResult<SelectionView> {
    if let Some(station_id) = selection.station.as_deref() {
        let table = load_readings(client, station_id, selection.measure, selection.window_hours)?;
        return Ok(SelectionView::Readings {
            station_id: station_id.to_string(),
            station: catalog.find(station_id).cloned(),
            window_hours: selection.window_hours,
            table,
        });
    }

    let view = match (selection.river.as_deref(), selection.town.as_deref()) {
        (None, _) => SelectionView::Rivers {
            rivers: catalog.rivers().into_iter().map(String::from).collect(),
        },
        (Some(river), None) => SelectionView::Towns {
            river: river.to_string(),
            towns: catalog.towns(river).into_iter().map(String::from).collect(),
        },
        (Some(river), Some(town)) => SelectionView::Stations {
            river: river.to_string(),
            town: town.to_string(),
            stations: catalog.stations(river, town).into_iter().cloned().collect(),
        },
    };

    Ok(view)
}

/// Fetches a station's readings for the window and normalizes them.
///
/// # Errors
/// Whatever the fetch reports; `EmptyResult` when the station had no
/// readings in the window.
pub fn load_readings(
    client: &FloodMonitorClient,
    station_id: &str,
    measure: Option<Measure>,
    window_hours: u32,
) -> MonitorResult<ReadingTable> {
    let readings = match measure {
        Some(measure) => client.fetch_measure_readings(station_id, measure, window_hours)?,
        None => client.fetch_readings(station_id, window_hours)?,
    };
    Ok(normalize(readings))
}
