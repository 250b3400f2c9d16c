//! Shared helpers for the integration tests: a throwaway flood-monitoring
//! API served by tiny_http on a random local port.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::thread;

/// A canned answer for one request path.
pub struct Route {
    pub path: String,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn ok(path: &str, body: &str) -> Self {
        Self {
            path: path.to_string(),
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(path: &str, status: u16) -> Self {
        Self {
            path: path.to_string(),
            status,
            body: format!("{{\"error\": \"status {}\"}}", status),
        }
    }
}

/// Running mock API. Requests are served until the test process exits.
pub struct MockApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockApi {
    /// Every request URL (path plus query) received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

/// Starts a mock API answering `routes` by path; anything else gets a 404.
pub fn start_mock_api(routes: Vec<Route>) -> MockApi {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind mock API");
    let addr = server.server_addr().to_ip().expect("mock API has an IP address");
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    thread::spawn(move || {
        for request in server.incoming_requests() {
            let url = request.url().to_string();
            seen.lock().expect("request log").push(url.clone());

            let path = url.split('?').next().unwrap_or("");
            let (status, body) = routes
                .iter()
                .find(|r| r.path == path)
                .map(|r| (r.status, r.body.clone()))
                .unwrap_or((404, "{}".to_string()));

            let response = tiny_http::Response::from_string(body).with_status_code(status);
            let _ = request.respond(response);
        }
    });

    MockApi {
        base_url: format!("http://{}", addr),
        requests,
    }
}

/// Base URL of a port nothing is listening on.
pub fn dead_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let port = listener.local_addr().expect("probe address").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

pub const CATALOG_JSON: &str = r#"{
  "items": [
    { "notation": "1501TH", "label": "Oxford Osney Lock", "riverName": "Thames", "town": "Oxford" },
    { "notation": "2200TH", "label": "Reading Caversham Lock", "riverName": "Thames", "town": "Reading" },
    { "notation": "1302TH", "label": "Kings Mill", "riverName": "Cherwell", "town": "Oxford" }
  ]
}"#;

pub const STATION_DETAIL_JSON: &str = r#"{
  "items": {
    "notation": "1501TH",
    "measures": [
      {
        "parameter": "level",
        "qualifier": "Stage",
        "unit": "http://qudt.org/1.1/vocab/unit#Meter"
      },
      {
        "parameter": "flow",
        "qualifier": "",
        "unitName": "m3/s"
      }
    ]
  }
}"#;

/// Stage readings out of time order with one dropped-out sensor value,
/// plus one flow reading.
pub const READINGS_JSON: &str = r#"{
  "items": [
    {
      "dateTime": "2024-05-01T10:30:00Z",
      "measure": "http://environment.data.gov.uk/flood-monitoring/id/measures/1501TH-level-stage-i-15_min-mASD",
      "value": 1.42
    },
    {
      "dateTime": "2024-05-01T10:00:00Z",
      "measure": "http://environment.data.gov.uk/flood-monitoring/id/measures/1501TH-level-stage-i-15_min-mASD",
      "value": 1.38
    },
    {
      "dateTime": "2024-05-01T10:15:00Z",
      "measure": "http://environment.data.gov.uk/flood-monitoring/id/measures/1501TH-level-stage-i-15_min-mASD",
      "value": null
    },
    {
      "dateTime": "2024-05-01T10:00:00Z",
      "measure": "http://environment.data.gov.uk/flood-monitoring/id/measures/1501TH-flow--i-15_min-m3_s",
      "value": 12.5
    }
  ]
}"#;

pub const EMPTY_READINGS_JSON: &str = r#"{ "items": [] }"#;
