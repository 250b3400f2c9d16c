//! Environment Agency flood-monitoring API client.
//!
//! Handles URL construction and the single-shot blocking GETs against:
//!   https://environment.data.gov.uk/flood-monitoring/
//!
//! Every call returns a `MonitorResult`; transport failures, non-2xx
//! responses and unexpected payloads all come back as `Err` values, never
//! as panics. Requests are not retried and use reqwest's default timeout.

use chrono::{DateTime, Duration, Utc};

use crate::ingest::{readings, stations};
use crate::logging::{self, Component};
use crate::model::{
    AvailableMeasure, DEFAULT_BASE_URL, Measure, MonitorError, MonitorResult, Reading, Station,
};

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Formats the start of a readings window the way the API expects
/// (`YYYY-MM-DDTHH:MM:SSZ`, UTC).
pub fn format_since(since: DateTime<Utc>) -> String {
    since.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Start of a trailing window of `window_hours` ending at `now`.
///
/// Windows reaching before chrono's representable range start at the Unix
/// epoch instead.
pub fn window_start(now: DateTime<Utc>, window_hours: u32) -> DateTime<Utc> {
    now.checked_sub_signed(Duration::hours(i64::from(window_hours)))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Active station catalog. Only active stations are requested so that
/// decommissioned entries with inconsistent metadata never reach the catalog.
pub fn stations_url(base_url: &str) -> String {
    format!("{}/id/stations?status=Active", base_url.trim_end_matches('/'))
}

/// Detail record for one station, including its measures.
pub fn station_url(base_url: &str, station_id: &str) -> String {
    format!(
        "{}/id/stations/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(station_id)
    )
}

/// Readings for one station since `since`, optionally filtered to a measure.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use flomon_dashboard::ingest::client::readings_url;
/// use flomon_dashboard::model::Measure;
///
/// let since = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
/// let url = readings_url(
///     "https://environment.data.gov.uk/flood-monitoring",
///     "1029TH",
///     Some(Measure::Downstage),
///     since,
/// );
/// assert!(url.ends_with("readings?since=2024-05-01T10:00:00Z&parameter=level&qualifier=Downstream%20Stage"));
/// ```
pub fn readings_url(
    base_url: &str,
    station_id: &str,
    measure: Option<Measure>,
    since: DateTime<Utc>,
) -> String {
    let mut url = format!(
        "{}/readings?since={}",
        station_url(base_url, station_id),
        format_since(since)
    );
    if let Some(measure) = measure {
        url.push('&');
        url.push_str(&measure.query_filter());
    }
    url
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Blocking client for the flood-monitoring API.
pub struct FloodMonitorClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl FloodMonitorClient {
    /// Client against the public API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against another deployment of the same API (or a mock).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the active station catalog.
    ///
    /// # Errors
    /// `NetworkFailure`, `HttpStatus(code)`, `MalformedPayload`, or
    /// `EmptyResult` when the catalog is empty.
    pub fn fetch_stations(&self) -> MonitorResult<Vec<Station>> {
        let stations = self
            .get(&stations_url(&self.base_url), "station catalog")
            .and_then(|body| stations::parse_station_catalog(&body))
            .inspect_err(|e| logging::log_fetch_failure(None, "Station catalog fetch", e))?;
        logging::info(
            Component::Api,
            None,
            &format!("Loaded {} active stations", stations.len()),
        );
        Ok(stations)
    }

    /// Fetches the measures a station can be queried for.
    pub fn fetch_station_measures(&self, station_id: &str) -> MonitorResult<Vec<AvailableMeasure>> {
        let measures = self
            .get(&station_url(&self.base_url, station_id), "station measures")
            .and_then(|body| stations::parse_station_measures(&body, station_id))
            .inspect_err(|e| logging::log_fetch_failure(Some(station_id), "Measures fetch", e))?;
        logging::debug(
            Component::Api,
            Some(station_id),
            &format!("{} measure types available", measures.len()),
        );
        Ok(measures)
    }

    /// Fetches every reading a station reported in the trailing window.
    ///
    /// # Errors
    /// `EmptyResult` when the station reported nothing in the window, so the
    /// caller can tell "no data" apart from a failed request.
    pub fn fetch_readings(&self, station_id: &str, window_hours: u32) -> MonitorResult<Vec<Reading>> {
        self.fetch_readings_filtered(station_id, None, window_hours)
    }

    /// Like `fetch_readings`, restricted to one measurement kind.
    pub fn fetch_measure_readings(
        &self,
        station_id: &str,
        measure: Measure,
        window_hours: u32,
    ) -> MonitorResult<Vec<Reading>> {
        self.fetch_readings_filtered(station_id, Some(measure), window_hours)
    }

    fn fetch_readings_filtered(
        &self,
        station_id: &str,
        measure: Option<Measure>,
        window_hours: u32,
    ) -> MonitorResult<Vec<Reading>> {
        let since = window_start(Utc::now(), window_hours);
        let url = readings_url(&self.base_url, station_id, measure, since);

        let result = self
            .get(&url, "readings")
            .and_then(|body| readings::parse_readings_response(&body));

        match result {
            Ok(readings) => {
                logging::debug(
                    Component::Api,
                    Some(station_id),
                    &format!("{} readings since {}", readings.len(), format_since(since)),
                );
                Ok(readings)
            }
            Err(e) => {
                logging::log_fetch_failure(Some(station_id), "Readings fetch", &e);
                Err(e)
            }
        }
    }

    /// Issues one GET and returns the body of a 2xx response.
    fn get(&self, url: &str, what: &str) -> MonitorResult<String> {
        logging::debug(Component::Api, None, &format!("Fetching: {}", url));

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| MonitorError::network(format!("Request for {} failed", what), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::status(
                status.as_u16(),
                format!("API returned {} for {}", status, what),
            ));
        }

        response
            .text()
            .map_err(|e| MonitorError::network(format!("Reading {} response body failed", what), e))
    }
}

impl Default for FloodMonitorClient {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
