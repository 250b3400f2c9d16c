//! Core data types for the flood-monitoring dashboard.
//!
//! This module defines the shared domain model imported by all other modules:
//! stations, readings, measurement kinds, and the error taxonomy every fetch
//! and normalization step reports through. It contains no I/O.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// API constants
// ---------------------------------------------------------------------------

/// Base URL of the Environment Agency real-time flood-monitoring API.
pub const DEFAULT_BASE_URL: &str = "https://environment.data.gov.uk/flood-monitoring";

/// Trailing window, in hours, used when no window is requested explicitly.
pub const DEFAULT_WINDOW_HOURS: u32 = 24;

/// Longest trailing window accepted from users, one leap year.
pub const MAX_WINDOW_HOURS: u32 = 366 * 24;

/// Checks a user-supplied window is between 1 and `MAX_WINDOW_HOURS`.
pub fn validate_window_hours(hours: u32) -> Result<u32, String> {
    if hours == 0 || hours > MAX_WINDOW_HOURS {
        return Err(format!(
            "window must be between 1 and {} hours, got {}",
            MAX_WINDOW_HOURS, hours
        ));
    }
    Ok(hours)
}

/// Unit label used when the API does not say what a measure is recorded in.
pub const UNKNOWN_UNIT: &str = "unknown";

// ---------------------------------------------------------------------------
// Station and reading types
// ---------------------------------------------------------------------------

/// A flood-monitoring station from the active station catalog.
///
/// `id` is the API `notation`, the identifier used to request readings.
/// River and town are optional upstream; stations without them can still be
/// fetched by id but never appear in catalog listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub id: String,
    pub label: String,
    pub river: Option<String>,
    pub town: Option<String>,
    pub catchment: Option<String>,
}

/// A single timestamped measurement from a station.
///
/// `value` stays `None` when the API reported null or omitted it; the
/// normalizer drops those before charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
    pub unit: String,
    /// `{parameter}-{qualifier}` taken from the measure reference, e.g. `level-downstage`.
    pub measure_type: String,
}

impl Reading {
    /// The typed measurement kind, if the measure type maps onto a known one.
    pub fn measure(&self) -> Option<Measure> {
        let (parameter, qualifier) = self
            .measure_type
            .split_once('-')
            .unwrap_or((self.measure_type.as_str(), ""));
        Measure::classify(parameter, qualifier).ok()
    }
}

/// A measurement kind a station reports, with the unit it is recorded in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableMeasure {
    pub measure: Measure,
    pub unit: String,
}

// ---------------------------------------------------------------------------
// Measurement kinds
// ---------------------------------------------------------------------------

/// The kinds of measurement the flood-monitoring API can return.
///
/// Level-derived kinds (stage, tidal level, …) are all `parameter=level`
/// upstream and are told apart by their qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Flow,
    Wind,
    Tidal,
    Stage,
    Logged,
    Downstage,
    Groundwater,
    Temperature,
}

impl Measure {
    pub const ALL: [Measure; 8] = [
        Measure::Flow,
        Measure::Wind,
        Measure::Tidal,
        Measure::Stage,
        Measure::Logged,
        Measure::Downstage,
        Measure::Groundwater,
        Measure::Temperature,
    ];

    /// The lowercase label the API uses for this measure.
    pub fn as_str(&self) -> &'static str {
        match self {
            Measure::Flow => "flow",
            Measure::Wind => "wind",
            Measure::Tidal => "tidal level",
            Measure::Stage => "stage",
            Measure::Logged => "logged",
            Measure::Downstage => "downstream stage",
            Measure::Groundwater => "groundwater",
            Measure::Temperature => "temperature",
        }
    }

    /// The qualifier a level-derived kind is requested with, or `None` for
    /// kinds requested directly by parameter.
    pub fn level_qualifier(&self) -> Option<&'static str> {
        match self {
            Measure::Tidal => Some("Tidal Level"),
            Measure::Stage => Some("Stage"),
            Measure::Logged => Some("Logged"),
            Measure::Downstage => Some("Downstream Stage"),
            Measure::Groundwater => Some("Groundwater"),
            Measure::Flow | Measure::Wind | Measure::Temperature => None,
        }
    }

    /// Query-string filter selecting this measure on a readings request.
    ///
    /// Values are already percent-encoded.
    pub fn query_filter(&self) -> String {
        match self.level_qualifier() {
            Some(qualifier) => {
                format!("parameter=level&qualifier={}", urlencoding::encode(qualifier))
            }
            None => format!("parameter={}", self.as_str()),
        }
    }

    /// Classifies an API `parameter`/`qualifier` pair.
    ///
    /// When the parameter is `level` the qualifier decides the kind;
    /// otherwise the parameter itself does.
    pub fn classify(parameter: &str, qualifier: &str) -> MonitorResult<Measure> {
        if parameter.eq_ignore_ascii_case("level") {
            qualifier.parse()
        } else {
            parameter.parse()
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Measure {
    type Err = MonitorError;

    /// Accepts API labels ("Downstream Stage") as well as the tokens found in
    /// measure ids ("downstage", "tidal_level").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', " ");
        match normalized.as_str() {
            "flow" => Ok(Measure::Flow),
            "wind" => Ok(Measure::Wind),
            "tidal level" | "tidal" => Ok(Measure::Tidal),
            "stage" => Ok(Measure::Stage),
            "logged" => Ok(Measure::Logged),
            "downstream stage" | "downstage" => Ok(Measure::Downstage),
            "groundwater" => Ok(Measure::Groundwater),
            "temperature" => Ok(Measure::Temperature),
            _ => Err(MonitorError::new(
                ErrorKind::UnknownMeasure,
                format!("Could not convert \"{}\" into a measurement kind", s),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Result alias used by every fallible operation in the crate.
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Classification of an expected failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Connection refused, DNS failure, timeout, or a broken response body.
    NetworkFailure,
    /// Non-2xx HTTP response, carrying the status code.
    HttpStatus(u16),
    /// The response body was not the JSON shape we expect.
    MalformedPayload,
    /// A valid response that contained zero items.
    EmptyResult,
    /// A measurement name that does not map onto a known `Measure`.
    UnknownMeasure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NetworkFailure => write!(f, "network failure"),
            ErrorKind::HttpStatus(code) => write!(f, "HTTP error: {}", code),
            ErrorKind::MalformedPayload => write!(f, "malformed payload"),
            ErrorKind::EmptyResult => write!(f, "empty result"),
            ErrorKind::UnknownMeasure => write!(f, "unknown measure"),
        }
    }
}

/// An expected failure from fetching or shaping flood-monitoring data.
///
/// Built once at the failure site and never mutated afterwards.
#[derive(Debug)]
pub struct MonitorError {
    kind: ErrorKind,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl MonitorError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        MonitorError {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        MonitorError {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn network(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::with_source(ErrorKind::NetworkFailure, message, source)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::HttpStatus(code), message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedPayload, message)
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyResult, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status code, for `HttpStatus` errors.
    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::HttpStatus(code) => Some(code),
            _ => None,
        }
    }

    /// Short explanation suitable for showing to the user.
    pub fn why(&self) -> &'static str {
        match self.kind {
            ErrorKind::NetworkFailure => "Could not reach the flood-monitoring API",
            ErrorKind::HttpStatus(_) => "API rejected the request and returned no data",
            ErrorKind::MalformedPayload => "API request did not return the expected data",
            ErrorKind::EmptyResult => "No data available for this selection",
            ErrorKind::UnknownMeasure => "Unrecognised measurement type",
        }
    }
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<serde_json::Error> for MonitorError {
    fn from(err: serde_json::Error) -> Self {
        MonitorError::with_source(
            ErrorKind::MalformedPayload,
            format!("JSON deserialization failed: {}", err),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_window_hours_bounds() {
        assert_eq!(validate_window_hours(1), Ok(1));
        assert_eq!(validate_window_hours(MAX_WINDOW_HOURS), Ok(MAX_WINDOW_HOURS));
        assert!(validate_window_hours(0).is_err());
        assert!(validate_window_hours(MAX_WINDOW_HOURS + 1).is_err());
        assert!(validate_window_hours(u32::MAX).is_err());
    }

    #[test]
    fn test_measure_parses_api_labels_and_id_tokens() {
        assert_eq!("Downstream Stage".parse::<Measure>().unwrap(), Measure::Downstage);
        assert_eq!("downstage".parse::<Measure>().unwrap(), Measure::Downstage);
        assert_eq!("tidal_level".parse::<Measure>().unwrap(), Measure::Tidal);
        assert_eq!(" FLOW ".parse::<Measure>().unwrap(), Measure::Flow);
    }

    #[test]
    fn test_unknown_measure_is_an_error_not_a_panic() {
        let err = "rainfall".parse::<Measure>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownMeasure);
        assert!(err.message().contains("rainfall"));
    }

    #[test]
    fn test_measure_label_round_trips_for_every_kind() {
        for measure in Measure::ALL {
            assert_eq!(measure.as_str().parse::<Measure>().unwrap(), measure);
        }
    }

    #[test]
    fn test_classify_uses_qualifier_only_for_level() {
        assert_eq!(Measure::classify("level", "Stage").unwrap(), Measure::Stage);
        assert_eq!(Measure::classify("flow", "Logged").unwrap(), Measure::Flow);
        assert!(Measure::classify("level", "").is_err());
    }

    #[test]
    fn test_query_filter_splits_level_and_direct_parameters() {
        assert_eq!(Measure::Flow.query_filter(), "parameter=flow");
        assert_eq!(Measure::Temperature.query_filter(), "parameter=temperature");
        assert_eq!(
            Measure::Downstage.query_filter(),
            "parameter=level&qualifier=Downstream%20Stage"
        );
        assert_eq!(Measure::Stage.query_filter(), "parameter=level&qualifier=Stage");
    }

    #[test]
    fn test_reading_measure_from_measure_type() {
        let reading = Reading {
            timestamp: Utc::now(),
            value: Some(0.4),
            unit: "mASD".to_string(),
            measure_type: "level-downstage".to_string(),
        };
        assert_eq!(reading.measure(), Some(Measure::Downstage));
    }

    #[test]
    fn test_status_error_carries_code() {
        let err = MonitorError::status(503, "stations");
        assert_eq!(err.kind(), ErrorKind::HttpStatus(503));
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.to_string(), "HTTP error: 503: stations");
    }

    #[test]
    fn test_json_error_converts_to_malformed_payload_with_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: MonitorError = json_err.into();
        assert_eq!(err.kind(), ErrorKind::MalformedPayload);
        assert!(err.source().is_some(), "underlying cause should be kept");
    }

    #[test]
    fn test_result_alias_maps_success_and_passes_errors_through() {
        let ok: MonitorResult<u32> = Ok(2);
        assert_eq!(ok.map(|v| v * 10).unwrap_or(0), 20);

        let err: MonitorResult<u32> = Err(MonitorError::empty("no items"));
        let mapped = err.map(|v| v * 10);
        assert!(mapped.is_err());
        assert_eq!(mapped.as_ref().unwrap_err().kind(), ErrorKind::EmptyResult);
        assert_eq!(mapped.unwrap_or(7), 7);
    }

    #[test]
    #[should_panic]
    fn test_unwrap_on_err_is_fatal() {
        let err: MonitorResult<u32> = Err(MonitorError::malformed("bad"));
        err.unwrap();
    }
}
