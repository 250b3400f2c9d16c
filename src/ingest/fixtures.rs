//! Test fixtures: representative JSON payloads from the flood-monitoring API.
//!
//! These fixtures are structurally complete but truncated to the minimum
//! needed to exercise the parsers. They follow the envelopes returned by:
//!   https://environment.data.gov.uk/flood-monitoring/id/stations?status=Active
//!   https://environment.data.gov.uk/flood-monitoring/id/stations/{id}
//!   https://environment.data.gov.uk/flood-monitoring/id/stations/{id}/readings
//!
//! Response shape:
//!   response.items[]            - array for listings, a single object for /id/stations/{id}
//!     .notation                 - station identifier (string)
//!     .label                    - display name; occasionally an array of names
//!     .riverName / .town        - optional, absent for some stations
//!     .measures                 - a single object when the station has one measure
//!   readings.items[]
//!     .dateTime                 - ISO 8601, always UTC ("Z")
//!     .measure                  - measure URL, last segment
//!                                 {station}-{parameter}-{qualifier}-{type}-{period}-{unit}
//!     .value                    - number; null or absent when the sensor dropped out

/// Four active stations: two on the Thames (Oxford, Reading), one on the
/// Cherwell (Oxford), and one with no river/town, as some stations have.
/// The Reading station's label comes back as an array.
#[cfg(test)]
pub(crate) fn fixture_station_catalog_json() -> &'static str {
    r#"{
      "@context": "http://environment.data.gov.uk/flood-monitoring/meta/context.jsonld",
      "meta": { "publisher": "Environment Agency", "version": "0.9", "hasFormat": [] },
      "items": [
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/1501TH",
          "notation": "1501TH",
          "label": "Oxford Osney Lock",
          "riverName": "Thames",
          "town": "Oxford",
          "catchmentName": "Thames and South Chilterns",
          "status": "http://environment.data.gov.uk/flood-monitoring/def/core/statusActive"
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/2200TH",
          "notation": "2200TH",
          "label": ["Reading Caversham Lock", "Caversham"],
          "riverName": "Thames",
          "town": "Reading",
          "catchmentName": "Thames and South Chilterns"
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/1302TH",
          "notation": "1302TH",
          "label": "Kings Mill",
          "riverName": "Cherwell",
          "town": "Oxford"
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/E72639",
          "notation": "E72639",
          "label": "Tilbury Docks",
          "catchmentName": "Thames Estuary"
        }
      ]
    }"#
}

/// Single-station detail for 1029TH with two measures as an array. The
/// stage measure appears twice upstream (instantaneous and logged feed).
#[cfg(test)]
pub(crate) fn fixture_station_measures_json() -> &'static str {
    r#"{
      "items": {
        "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/1029TH",
        "notation": "1029TH",
        "label": "Bourton Dickler",
        "riverName": "River Dikler",
        "town": "Little Rissington",
        "measures": [
          {
            "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/1029TH-level-downstage-i-15_min-mASD",
            "parameter": "level",
            "parameterName": "Water Level",
            "qualifier": "Downstream Stage",
            "unit": "http://qudt.org/1.1/vocab/unit#Meter",
            "unitName": "mASD"
          },
          {
            "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/1029TH-level-stage-i-15_min-mASD",
            "parameter": "level",
            "parameterName": "Water Level",
            "qualifier": "Stage",
            "unitName": "mASD"
          },
          {
            "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/1029TH-level-stage-i-15_min-mASD-logged",
            "parameter": "level",
            "qualifier": "Stage",
            "unitName": "mASD"
          },
          {
            "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/1029TH-rainfall-tipping_bucket_raingauge-t-15_min-mm",
            "parameter": "rainfall",
            "qualifier": "Tipping Bucket Raingauge",
            "unitName": "mm"
          },
          {
            "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/1029TH-unlabelled",
            "qualifier": "Stage"
          }
        ]
      }
    }"#
}

/// Single-station detail where `measures` is one object, not an array.
#[cfg(test)]
pub(crate) fn fixture_single_measure_json() -> &'static str {
    r#"{
      "items": {
        "notation": "3400TH",
        "label": "Kingston",
        "measures": {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-flow--i-15_min-m3_s",
          "parameter": "flow",
          "qualifier": "",
          "unit": "http://qudt.org/1.1/vocab/unit#CubicMeterPerSecond"
        }
      }
    }"#
}

/// Readings for 1029TH out of order, with one null value, one missing
/// value, and a second (flow) measure.
#[cfg(test)]
pub(crate) fn fixture_readings_json() -> &'static str {
    r#"{
      "items": [
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/data/readings/1029TH-level-downstage-i-15_min-mASD/2024-05-01T10-30-00Z",
          "dateTime": "2024-05-01T10:30:00Z",
          "measure": "http://environment.data.gov.uk/flood-monitoring/id/measures/1029TH-level-downstage-i-15_min-mASD",
          "value": 0.215
        },
        {
          "dateTime": "2024-05-01T10:00:00Z",
          "measure": "http://environment.data.gov.uk/flood-monitoring/id/measures/1029TH-level-downstage-i-15_min-mASD",
          "value": 0.201
        },
        {
          "dateTime": "2024-05-01T10:15:00Z",
          "measure": "http://environment.data.gov.uk/flood-monitoring/id/measures/1029TH-level-downstage-i-15_min-mASD",
          "value": null
        },
        {
          "dateTime": "2024-05-01T10:45:00Z",
          "measure": "http://environment.data.gov.uk/flood-monitoring/id/measures/1029TH-level-downstage-i-15_min-mASD"
        },
        {
          "dateTime": "2024-05-01T10:00:00Z",
          "measure": { "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/1029TH-flow--i-15_min-m3_s" },
          "value": 1.92
        }
      ]
    }"#
}

/// A valid readings response for a station that reported nothing in the window.
#[cfg(test)]
pub(crate) fn fixture_empty_readings_json() -> &'static str {
    r#"{ "meta": { "limit": 500 }, "items": [] }"#
}
