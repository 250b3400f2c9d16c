//! Data shaping for the flood-monitoring dashboard.
//!
//! Submodules:
//! - `normalize` - turns flat ingest output into per-measure, time-ordered tables.

pub mod normalize;
