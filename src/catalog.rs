//! River → town → station resolution over the in-memory station catalog.
//!
//! The catalog is fetched once and then only read; every lookup here is a
//! deterministic filter over it with no I/O. Listings are sorted sets so the
//! dropdowns (or CLI listings) built from them are stable between runs.

use std::collections::BTreeSet;

use crate::logging::{self, Component};
use crate::model::Station;

/// The active station catalog, indexed for dropdown-style selection.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    stations: Vec<Station>,
}

impl Catalog {
    pub fn new(stations: Vec<Station>) -> Self {
        let unlisted = stations
            .iter()
            .filter(|s| s.river.is_none() || s.town.is_none())
            .count();
        if unlisted > 0 {
            logging::debug(
                Component::Catalog,
                None,
                &format!("{} stations lack a river or town and won't be listed", unlisted),
            );
        }
        Self { stations }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Every river that has at least one station.
    pub fn rivers(&self) -> BTreeSet<&str> {
        self.stations
            .iter()
            .filter_map(|s| s.river.as_deref())
            .collect()
    }

    /// Every town with a station on `river`. Unknown rivers give an empty set.
    pub fn towns(&self, river: &str) -> BTreeSet<&str> {
        self.stations
            .iter()
            .filter(|s| s.river.as_deref() == Some(river))
            .filter_map(|s| s.town.as_deref())
            .collect()
    }

    /// Stations on `river` in `town`, in catalog order.
    ///
    /// A combination with no stations is an empty list, not an error.
    pub fn stations(&self, river: &str, town: &str) -> Vec<&Station> {
        self.stations
            .iter()
            .filter(|s| s.river.as_deref() == Some(river) && s.town.as_deref() == Some(town))
            .collect()
    }

    /// Looks a station up by its notation.
    pub fn find(&self, station_id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == station_id)
    }
}

impl From<Vec<Station>> for Catalog {
    fn from(stations: Vec<Station>) -> Self {
        Catalog::new(stations)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
