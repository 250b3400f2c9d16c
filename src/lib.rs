/// flomon_dashboard: river/town/station flood-monitoring readings dashboard
/// backed by the Environment Agency real-time flood-monitoring API.
///
/// # Module structure
///
/// ```text
/// flomon_dashboard
/// ├── model       - shared data types (Station, Reading, Measure, MonitorError, …)
/// ├── config      - dashboard configuration loader (flomon.toml)
/// ├── logging     - structured console/file logging and failure classification
/// ├── catalog     - river → town → station resolution over the station catalog
/// ├── dashboard   - selection pipeline (fetch → filter → normalize)
/// ├── endpoint    - JSON HTTP API over the selection pipeline
/// ├── ingest
/// │   ├── client   - flood-monitoring API: URL construction + blocking fetches
/// │   ├── stations - station catalog / station detail parsing
/// │   ├── readings - readings response parsing
/// │   └── fixtures (test only) - representative API response payloads
/// └── analysis
///     └── normalize - organizes flat readings into per-measure, time-ordered tables
/// ```

/// Public modules
pub mod analysis;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod endpoint;
pub mod ingest;
pub mod logging;
pub mod model;
