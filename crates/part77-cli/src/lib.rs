//! Part 77 CLI - runway table loading and result rendering for the
//! `part77` binary.
//!
//! - config: environment configuration and rules files
//! - coords: geodetic to local-feet projection
//! - input: CSV runway tables
//! - report: result sentences and JSON

pub mod config;
pub mod coords;
pub mod input;
pub mod report;

pub use config::{Config, Units};
pub use coords::degrees_to_feet;
pub use input::{load_runways, read_runways, InputError};

use part77_core::{Point3, SurfaceSet};

/// One lookup. The position sits at the origin of the runway frame and
/// both elevations are feet whatever units the result is printed in.
#[derive(Debug, Clone, Copy)]
pub struct Query {
    pub lat: f64,
    pub lon: f64,
    pub elevation_ft: f64,
    pub eae_ft: f64,
}

/// Classify `query` and render the result with the build limit in `units`.
pub fn answer_query(
    surfaces: &SurfaceSet,
    query: Query,
    units: Units,
    json: bool,
) -> serde_json::Result<String> {
    let result = surfaces.classify(Point3::new(0.0, 0.0, query.elevation_ft), query.eae_ft);
    if json {
        report::render_json(&result, units)
    } else {
        Ok(report::render_sentence(query.lat, query.lon, &result, units))
    }
}
