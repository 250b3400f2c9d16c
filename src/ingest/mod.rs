//! Data ingestion from the Environment Agency flood-monitoring API.
//!
//! - `client`   - URL construction and blocking HTTP fetches
//! - `stations` - station catalog and station detail parsing
//! - `readings` - readings response parsing
//! - `fixtures` (test only) - representative API response payloads

pub mod client;
pub mod readings;
pub mod stations;

#[cfg(test)]
pub(crate) mod fixtures;
