//! Regulatory constants shared by every runway category.

use serde::{Deserialize, Serialize};

/// Configuration for surface construction.
///
/// Defaults reproduce the Part 77 civil-airport values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceRules {
    /// Distance the primary surface extends past each end of a hard-surfaced runway (feet)
    pub primary_extension_ft: f64,
    /// Height of the horizontal surface above the established airport elevation (feet)
    pub horizontal_height_ft: f64,
    /// Horizontal run per foot of rise for the transitional surface
    pub transitional_slope_run: f64,
    /// Horizontal extent of the conical surface beyond the horizontal surface (feet)
    pub conical_width_ft: f64,
    /// Height gained across the conical surface (feet)
    pub conical_rise_ft: f64,
}

impl Default for SurfaceRules {
    fn default() -> Self {
        Self {
            primary_extension_ft: 200.0,
            horizontal_height_ft: 150.0,
            transitional_slope_run: 7.0,
            conical_width_ft: 4000.0,
            conical_rise_ft: 200.0,
        }
    }
}

impl SurfaceRules {
    /// Horizontal distance from the primary-surface edge at which the
    /// transitional surface reaches the horizontal-surface height.
    pub fn transitional_offset_ft(&self) -> f64 {
        distance_for_height(self.horizontal_height_ft, self.transitional_slope_run)
    }

    /// Height of the conical surface's outer edge above the airport elevation.
    pub fn conical_top_ft(&self) -> f64 {
        self.horizontal_height_ft + self.conical_rise_ft
    }
}

/// Offset needed to gain `height_ft` on a `1:slope_run` surface, measured
/// along the diagonal of the runway-aligned grid.
pub fn distance_for_height(height_ft: f64, slope_run: f64) -> f64 {
    height_ft * slope_run * std::f64::consts::SQRT_2
}
