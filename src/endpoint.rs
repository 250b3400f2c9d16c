//! HTTP endpoint serving the selection pipeline as JSON
//!
//! Lets an external front end (a web page, a notebook) drive the same
//! river → town → station → readings flow as the CLI.
//!
//! Endpoints:
//! - GET /health - Service health check
//! - GET /rivers - Rivers with at least one active station
//! - GET /towns?river={river} - Towns on a river
//! - GET /stations?river={river}&town={town} - Stations in a town on a river
//! - GET /stations/{id}/measures - Measurement kinds a station reports
//! - GET /stations/{id}/readings?hours={n}&measure={kind} - Normalized readings table

use std::collections::HashMap;

use serde_json::{Value, json};

use crate::catalog::Catalog;
use crate::dashboard::{self, Selection};
use crate::ingest::client::FloodMonitorClient;
use crate::logging::{self, Component};
use crate::model::{ErrorKind, Measure, MonitorError, validate_window_hours};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Everything a request needs: the API client, the catalog loaded at
/// start-up, and the default readings window.
pub struct EndpointState {
    pub client: FloodMonitorClient,
    pub catalog: Catalog,
    pub window_hours: u32,
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Routes one request URL (path plus query string) to a status code and
/// JSON body.
pub fn route(state: &EndpointState, url: &str) -> (u16, Value) {
    let (path, query) = split_query(url);
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match segments.as_slice() {
        ["health"] => handle_health(state),
        ["rivers"] => handle_selection(state, Selection::default()),
        ["towns"] => match query.get("river") {
            Some(river) => handle_selection(
                state,
                Selection {
                    river: Some(river.clone()),
                    ..Selection::default()
                },
            ),
            None => bad_request("Missing query parameter: river"),
        },
        ["stations"] => match (query.get("river"), query.get("town")) {
            (Some(river), Some(town)) => handle_selection(
                state,
                Selection {
                    river: Some(river.clone()),
                    town: Some(town.clone()),
                    ..Selection::default()
                },
            ),
            _ => bad_request("Missing query parameters: river and town"),
        },
        ["stations", station_id, "measures"] => match decode_segment(station_id) {
            Some(id) => handle_measures(state, &id),
            None => bad_request("Station id is not valid UTF-8"),
        },
        ["stations", station_id, "readings"] => match decode_segment(station_id) {
            Some(id) => handle_readings(state, &id, &query),
            None => bad_request("Station id is not valid UTF-8"),
        },
        _ => (
            404,
            json!({
                "error": "Not found",
                "available_endpoints": [
                    "/health",
                    "/rivers",
                    "/towns?river={river}",
                    "/stations?river={river}&town={town}",
                    "/stations/{id}/measures",
                    "/stations/{id}/readings?hours={n}&measure={kind}"
                ]
            }),
        ),
    }
}

/// Handle /health endpoint
fn handle_health(state: &EndpointState) -> (u16, Value) {
    (
        200,
        json!({
            "status": "ok",
            "service": "flomon_dashboard",
            "version": env!("CARGO_PKG_VERSION"),
            "stations": state.catalog.len()
        }),
    )
}

/// Handle the listing endpoints; these never touch the network.
fn handle_selection(state: &EndpointState, selection: Selection) -> (u16, Value) {
    match dashboard::resolve(&state.client, &state.catalog, &selection) {
        Ok(view) => (200, to_json(&view)),
        Err(e) => error_response(&e),
    }
}

/// Handle /stations/{id}/measures endpoint
fn handle_measures(state: &EndpointState, station_id: &str) -> (u16, Value) {
    match state.client.fetch_station_measures(station_id) {
        Ok(measures) => (
            200,
            json!({ "station_id": station_id, "measures": to_json(&measures) }),
        ),
        Err(e) => error_response(&e),
    }
}

/// Handle /stations/{id}/readings endpoint
fn handle_readings(
    state: &EndpointState,
    station_id: &str,
    query: &HashMap<String, String>,
) -> (u16, Value) {
    let window_hours = match query.get("hours") {
        None => state.window_hours,
        Some(raw) => match raw.parse::<u32>().map_err(|e| e.to_string()).and_then(validate_window_hours) {
            Ok(hours) => hours,
            Err(e) => return bad_request(&format!("Invalid hours '{}': {}", raw, e)),
        },
    };

    let measure = match query.get("measure").map(|m| m.parse::<Measure>()).transpose() {
        Ok(measure) => measure,
        Err(e) => return error_response(&e),
    };

    let selection = Selection {
        station: Some(station_id.to_string()),
        measure,
        window_hours,
        ..Selection::default()
    };

    match dashboard::resolve(&state.client, &state.catalog, &selection) {
        Ok(view) => (200, to_json(&view)),
        Err(e) => error_response(&e),
    }
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Stable snake_case name of an error kind for JSON bodies.
pub fn kind_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NetworkFailure => "network_failure",
        ErrorKind::HttpStatus(_) => "http_status",
        ErrorKind::MalformedPayload => "malformed_payload",
        ErrorKind::EmptyResult => "no_data",
        ErrorKind::UnknownMeasure => "unknown_measure",
    }
}

/// Maps an error to the status code and body the endpoint returns.
///
/// "No data" is a 404 so a front end can show an empty state; anything that
/// went wrong upstream is a 502.
pub fn error_response(err: &MonitorError) -> (u16, Value) {
    let status = match err.kind() {
        ErrorKind::EmptyResult => 404,
        ErrorKind::UnknownMeasure => 400,
        ErrorKind::NetworkFailure | ErrorKind::HttpStatus(_) | ErrorKind::MalformedPayload => 502,
    };

    let mut body = json!({
        "error": err.why(),
        "kind": kind_name(err.kind()),
        "detail": err.to_string()
    });
    if let Some(code) = err.status_code() {
        body["upstream_status"] = json!(code);
    }

    (status, body)
}

fn bad_request(message: &str) -> (u16, Value) {
    (400, json!({ "error": message, "kind": "bad_request" }))
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| json!({ "error": e.to_string() }))
}

// ---------------------------------------------------------------------------
// Query strings
// ---------------------------------------------------------------------------

/// Splits a request URL into its path and decoded query parameters.
fn split_query(url: &str) -> (&str, HashMap<String, String>) {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));

    let params = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            Some((decode(key)?, decode(value)?))
        })
        .collect();

    (path, params)
}

/// Path segments keep a literal '+'; only percent escapes are decoded.
fn decode_segment(segment: &str) -> Option<String> {
    urlencoding::decode(segment).ok().map(|s| s.into_owned())
}

fn decode(component: &str) -> Option<String> {
    urlencoding::decode(&component.replace('+', " "))
        .ok()
        .map(|s| s.into_owned())
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port. Blocks, serving one
/// request at a time.
pub fn start_endpoint_server(port: u16, state: EndpointState) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    logging::info(
        Component::Endpoint,
        None,
        &format!("HTTP endpoint listening on http://0.0.0.0:{}", port),
    );

    serve(server, &state);
    Ok(())
}

/// Answers requests from an already-bound server until it shuts down.
pub fn serve(server: tiny_http::Server, state: &EndpointState) {
    for request in server.incoming_requests() {
        let (status, body) = route(state, request.url());
        logging::debug(
            Component::Endpoint,
            None,
            &format!("{} {} -> {}", request.method(), request.url(), status),
        );

        if let Err(e) = request.respond(create_response(status, &body)) {
            logging::error(Component::Endpoint, None, &format!("Failed to send response: {}", e));
        }
    }
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: &Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(json).unwrap_or_else(|_| "{}".to_string());

    let response = tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code));

    match tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::fixture_station_catalog_json;
    use crate::ingest::stations::parse_station_catalog;

    fn state() -> EndpointState {
        EndpointState {
            // Only routes that fail before any fetch are exercised here.
            client: FloodMonitorClient::with_base_url("http://127.0.0.1:9"),
            catalog: Catalog::from(
                parse_station_catalog(fixture_station_catalog_json()).expect("fixture should parse"),
            ),
            window_hours: 24,
        }
    }

    #[test]
    fn test_health_reports_catalog_size() {
        let (status, body) = route(&state(), "/health");
        assert_eq!(status, 200);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["stations"], 4);
    }

    #[test]
    fn test_rivers_lists_catalog_rivers() {
        let (status, body) = route(&state(), "/rivers");
        assert_eq!(status, 200);
        assert_eq!(body["rivers"], json!(["Cherwell", "Thames"]));
    }

    #[test]
    fn test_towns_decodes_query_value() {
        let (status, body) = route(&state(), "/towns?river=Thames");
        assert_eq!(status, 200);
        assert_eq!(body["towns"], json!(["Oxford", "Reading"]));
    }

    #[test]
    fn test_stations_requires_river_and_town() {
        let (status, _) = route(&state(), "/stations?river=Thames");
        assert_eq!(status, 400);

        let (status, body) = route(&state(), "/stations?river=Thames&town=Oxford");
        assert_eq!(status, 200);
        assert_eq!(body["stations"][0]["id"], "1501TH");
    }

    #[test]
    fn test_invalid_hours_is_bad_request() {
        let (status, _) = route(&state(), "/stations/1501TH/readings?hours=zero");
        assert_eq!(status, 400);
        let (status, _) = route(&state(), "/stations/1501TH/readings?hours=0");
        assert_eq!(status, 400);
    }

    #[test]
    fn test_oversized_hours_is_bad_request() {
        let (status, body) = route(&state(), "/stations/1501TH/readings?hours=4294967295");
        assert_eq!(status, 400);
        assert_eq!(body["kind"], "bad_request");

        let (status, _) = route(&state(), "/stations/1501TH/readings?hours=8785");
        assert_eq!(status, 400);
    }

    #[test]
    fn test_decode_segment_keeps_plus() {
        assert_eq!(decode_segment("A%20B").as_deref(), Some("A B"));
        assert_eq!(decode_segment("A+B").as_deref(), Some("A+B"));
    }

    #[test]
    fn test_unknown_measure_is_bad_request() {
        let (status, body) = route(&state(), "/stations/1501TH/readings?measure=rainfall");
        assert_eq!(status, 400);
        assert_eq!(body["kind"], "unknown_measure");
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let (status, body) = route(&state(), "/site/1501TH");
        assert_eq!(status, 404);
        assert!(body["available_endpoints"].is_array());
    }

    #[test]
    fn test_error_response_status_mapping() {
        assert_eq!(error_response(&MonitorError::empty("none")).0, 404);
        assert_eq!(error_response(&MonitorError::malformed("bad")).0, 502);

        let (status, body) = error_response(&MonitorError::status(503, "down"));
        assert_eq!(status, 502);
        assert_eq!(body["upstream_status"], 503);
        assert_eq!(body["kind"], "http_status");
    }

    #[test]
    fn test_split_query_decodes_plus_and_percent() {
        let (path, query) = split_query("/towns?river=River%20Dikler&town=Little+Rissington");
        assert_eq!(path, "/towns");
        assert_eq!(query.get("river").map(String::as_str), Some("River Dikler"));
        assert_eq!(query.get("town").map(String::as_str), Some("Little Rissington"));
    }
}
