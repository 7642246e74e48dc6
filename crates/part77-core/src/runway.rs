//! Runway data model and the regulatory dimension tables keyed by runway
//! and approach category.

use crate::geometry::Point2;
use serde::{Deserialize, Serialize};

/// Horizontal-surface radius for utility and visual runways, in feet.
pub const SMALL_HORIZONTAL_RADIUS_FT: f64 = 5_000.0;
/// Horizontal-surface radius for all other runways, in feet.
pub const LARGE_HORIZONTAL_RADIUS_FT: f64 = 10_000.0;

/// Classification of the runway as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunwayCategory {
    Utility,
    Visual,
    NonPrecisionInstrument,
    PrecisionInstrument,
}

impl RunwayCategory {
    /// Parses a category token such as `UTILITY` or `non_precision_instrument`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "utility" => Some(Self::Utility),
            "visual" => Some(Self::Visual),
            "non_precision_instrument" | "non_precision" | "npi" => {
                Some(Self::NonPrecisionInstrument)
            }
            "precision_instrument" | "precision" | "pi" => Some(Self::PrecisionInstrument),
            _ => None,
        }
    }
}

/// Type of approach flown to one end of a runway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproachCategory {
    Visual,
    NonPrecisionInstrument,
    PrecisionInstrument,
}

impl ApproachCategory {
    /// Parses an approach token such as `VISUAL` or `PRECISION_INSTRUMENT`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(' ', "_").as_str() {
            "visual" => Some(Self::Visual),
            "non_precision_instrument" | "non_precision" | "npi" => {
                Some(Self::NonPrecisionInstrument)
            }
            "precision_instrument" | "precision" | "pi" => Some(Self::PrecisionInstrument),
            _ => None,
        }
    }
}

/// One end of a runway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayEnd {
    pub name: String,
    pub point: Point2,
    pub approach: ApproachCategory,
    /// Visibility minimum in statute miles
    #[serde(default)]
    pub visibility_minimum_mi: f64,
}

impl RunwayEnd {
    /// Create an end with no published visibility minimum.
    pub fn new(name: impl Into<String>, point: Point2, approach: ApproachCategory) -> Self {
        Self {
            name: name.into(),
            point,
            approach,
            visibility_minimum_mi: 0.0,
        }
    }

    /// Set the visibility minimum in statute miles.
    pub fn with_visibility(mut self, visibility_minimum_mi: f64) -> Self {
        self.visibility_minimum_mi = visibility_minimum_mi;
        self
    }
}

/// A physical runway strip with its two ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runway {
    pub name: String,
    pub category: RunwayCategory,
    pub end1: RunwayEnd,
    pub end2: RunwayEnd,
    /// Paved or otherwise hard-surfaced
    #[serde(default)]
    pub special_surface: bool,
}

/// A value held once for each end of a runway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndPair<T> {
    pub end1: T,
    pub end2: T,
}

impl<T> EndPair<T> {
    pub fn get(&self, which: EndSelector) -> &T {
        match which {
            EndSelector::End1 => &self.end1,
            EndSelector::End2 => &self.end2,
        }
    }
}

/// Which end of a runway a per-end value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndSelector {
    End1,
    End2,
}

/// Inclined profile of an approach surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApproachProfile {
    /// One slope over the full length.
    Single { length_ft: f64, slope: f64 },
    /// Precision approaches: a steeper inner segment then a shallower one.
    Split {
        primary_length_ft: f64,
        secondary_length_ft: f64,
        primary_slope: f64,
        secondary_slope: f64,
    },
}

/// Dimensions of the approach surface at one runway end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApproachDimensions {
    pub approach: ApproachCategory,
    /// Width at the outer end, in feet. Zero when the tables are silent.
    pub width_ft: f64,
    pub profile: ApproachProfile,
}

impl ApproachDimensions {
    /// Horizontal length of the whole surface.
    pub fn total_length_ft(&self) -> f64 {
        match self.profile {
            ApproachProfile::Single { length_ft, .. } => length_ft,
            ApproachProfile::Split {
                primary_length_ft,
                secondary_length_ft,
                ..
            } => primary_length_ft + secondary_length_ft,
        }
    }

    /// Height gained above the inner edge at the outer end.
    pub fn total_rise_ft(&self) -> f64 {
        match self.profile {
            ApproachProfile::Single { length_ft, slope } => length_ft * slope,
            ApproachProfile::Split {
                primary_length_ft,
                secondary_length_ft,
                primary_slope,
                secondary_slope,
            } => primary_length_ft * primary_slope + secondary_length_ft * secondary_slope,
        }
    }
}

impl Runway {
    pub fn new(
        name: impl Into<String>,
        category: RunwayCategory,
        end1: RunwayEnd,
        end2: RunwayEnd,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            end1,
            end2,
            special_surface: false,
        }
    }

    /// Mark the runway as hard-surfaced.
    pub fn with_special_surface(mut self, special_surface: bool) -> Self {
        self.special_surface = special_surface;
        self
    }

    pub fn end(&self, which: EndSelector) -> &RunwayEnd {
        match which {
            EndSelector::End1 => &self.end1,
            EndSelector::End2 => &self.end2,
        }
    }

    pub fn length_ft(&self) -> f64 {
        self.end1.point.distance(self.end2.point)
    }

    /// The runway-wide visibility minimum: the lower of the two ends.
    pub fn visibility_minimum_mi(&self) -> f64 {
        self.end1
            .visibility_minimum_mi
            .min(self.end2.visibility_minimum_mi)
    }

    /// Width of the primary surface in feet. Zero means the regulation
    /// does not define a width for this combination.
    pub fn calc_primary_surface_width(&self) -> f64 {
        let visual_only = self.end1.approach == ApproachCategory::Visual
            && self.end2.approach == ApproachCategory::Visual;
        let has_non_precision = self.end1.approach == ApproachCategory::NonPrecisionInstrument
            || self.end2.approach == ApproachCategory::NonPrecisionInstrument;
        let visibility = self.visibility_minimum_mi();

        match self.category {
            RunwayCategory::Utility if visual_only => 250.0,
            RunwayCategory::Utility => 500.0,
            RunwayCategory::Visual if visual_only => 500.0,
            RunwayCategory::NonPrecisionInstrument if has_non_precision && visibility >= 0.75 => {
                1000.0
            }
            RunwayCategory::NonPrecisionInstrument if !has_non_precision && visibility > 0.75 => {
                500.0
            }
            RunwayCategory::PrecisionInstrument => 1000.0,
            _ => 0.0,
        }
    }

    /// Radius of the arcs swung from each primary-surface end to form the
    /// horizontal surface.
    pub fn calc_horizontal_surface_radius(&self) -> f64 {
        match self.category {
            RunwayCategory::Utility | RunwayCategory::Visual => SMALL_HORIZONTAL_RADIUS_FT,
            RunwayCategory::NonPrecisionInstrument | RunwayCategory::PrecisionInstrument => {
                LARGE_HORIZONTAL_RADIUS_FT
            }
        }
    }

    /// Approach-surface dimensions for both ends.
    pub fn calc_approach_dimensions(&self) -> EndPair<ApproachDimensions> {
        EndPair {
            end1: approach_dimensions(self.category, &self.end1),
            end2: approach_dimensions(self.category, &self.end2),
        }
    }
}

fn approach_dimensions(category: RunwayCategory, end: &RunwayEnd) -> ApproachDimensions {
    let utility = category == RunwayCategory::Utility;

    match end.approach {
        ApproachCategory::Visual => ApproachDimensions {
            approach: end.approach,
            width_ft: if utility { 1250.0 } else { 1500.0 },
            profile: ApproachProfile::Single {
                length_ft: 5000.0,
                slope: 1.0 / 20.0,
            },
        },
        ApproachCategory::NonPrecisionInstrument if utility => ApproachDimensions {
            approach: end.approach,
            width_ft: 2000.0,
            profile: ApproachProfile::Single {
                length_ft: 5000.0,
                slope: 1.0 / 20.0,
            },
        },
        ApproachCategory::NonPrecisionInstrument => {
            let visibility = end.visibility_minimum_mi;
            let width_ft = if visibility > 0.75 {
                3500.0
            } else if visibility == 0.75 {
                4000.0
            } else {
                0.0
            };
            ApproachDimensions {
                approach: end.approach,
                width_ft,
                profile: ApproachProfile::Single {
                    length_ft: 10_000.0,
                    slope: 1.0 / 34.0,
                },
            }
        }
        ApproachCategory::PrecisionInstrument => ApproachDimensions {
            approach: end.approach,
            width_ft: 16_000.0,
            profile: ApproachProfile::Split {
                primary_length_ft: 10_000.0,
                secondary_length_ft: 40_000.0,
                primary_slope: 1.0 / 50.0,
                secondary_slope: 1.0 / 40.0,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runway(category: RunwayCategory, a1: ApproachCategory, a2: ApproachCategory) -> Runway {
        Runway::new(
            "09/27",
            category,
            RunwayEnd::new("09", Point2::new(-1000.0, 0.0), a1),
            RunwayEnd::new("27", Point2::new(1000.0, 0.0), a2),
        )
    }

    fn with_visibility(mut runway: Runway, visibility: f64) -> Runway {
        runway.end1.visibility_minimum_mi = visibility;
        runway.end2.visibility_minimum_mi = visibility;
        runway
    }

    #[test]
    fn primary_width_table() {
        use ApproachCategory as A;
        use RunwayCategory as R;

        assert_eq!(runway(R::Utility, A::Visual, A::Visual).calc_primary_surface_width(), 250.0);
        assert_eq!(
            runway(R::Utility, A::Visual, A::NonPrecisionInstrument).calc_primary_surface_width(),
            500.0
        );
        assert_eq!(runway(R::Visual, A::Visual, A::Visual).calc_primary_surface_width(), 500.0);
        assert_eq!(
            runway(R::Visual, A::Visual, A::NonPrecisionInstrument).calc_primary_surface_width(),
            0.0
        );

        let npi = runway(R::NonPrecisionInstrument, A::NonPrecisionInstrument, A::Visual);
        assert_eq!(with_visibility(npi.clone(), 0.75).calc_primary_surface_width(), 1000.0);
        assert_eq!(with_visibility(npi.clone(), 1.0).calc_primary_surface_width(), 1000.0);
        assert_eq!(with_visibility(npi, 0.5).calc_primary_surface_width(), 0.0);

        let no_npi_end = runway(R::NonPrecisionInstrument, A::Visual, A::Visual);
        assert_eq!(with_visibility(no_npi_end.clone(), 1.0).calc_primary_surface_width(), 500.0);
        assert_eq!(with_visibility(no_npi_end, 0.75).calc_primary_surface_width(), 0.0);

        assert_eq!(
            runway(R::PrecisionInstrument, A::PrecisionInstrument, A::Visual)
                .calc_primary_surface_width(),
            1000.0
        );
    }

    #[test]
    fn runway_visibility_is_the_lower_end() {
        let mut rwy = runway(
            RunwayCategory::NonPrecisionInstrument,
            ApproachCategory::NonPrecisionInstrument,
            ApproachCategory::NonPrecisionInstrument,
        );
        rwy.end1.visibility_minimum_mi = 1.0;
        rwy.end2.visibility_minimum_mi = 0.5;
        assert_eq!(rwy.visibility_minimum_mi(), 0.5);
        assert_eq!(rwy.calc_primary_surface_width(), 0.0);
    }

    #[test]
    fn horizontal_radius_by_category() {
        use ApproachCategory as A;
        use RunwayCategory as R;

        assert_eq!(runway(R::Utility, A::Visual, A::Visual).calc_horizontal_surface_radius(), 5000.0);
        assert_eq!(runway(R::Visual, A::Visual, A::Visual).calc_horizontal_surface_radius(), 5000.0);
        assert_eq!(
            runway(R::NonPrecisionInstrument, A::Visual, A::Visual).calc_horizontal_surface_radius(),
            10_000.0
        );
        assert_eq!(
            runway(R::PrecisionInstrument, A::Visual, A::Visual).calc_horizontal_surface_radius(),
            10_000.0
        );
    }

    #[test]
    fn approach_tables_match_published_rises() {
        use ApproachCategory as A;
        use RunwayCategory as R;

        let dims = runway(R::Utility, A::Visual, A::NonPrecisionInstrument).calc_approach_dimensions();
        assert_eq!(dims.end1.width_ft, 1250.0);
        assert_eq!(dims.end1.total_length_ft(), 5000.0);
        assert!((dims.end1.total_rise_ft() - 250.0).abs() < 1e-9);
        assert_eq!(dims.end2.width_ft, 2000.0);
        assert!((dims.end2.total_rise_ft() - 250.0).abs() < 1e-9);

        let dims = runway(R::Visual, A::Visual, A::Visual).calc_approach_dimensions();
        assert_eq!(dims.end1.width_ft, 1500.0);
        assert_eq!(dims.end2.width_ft, 1500.0);

        let npi = runway(R::NonPrecisionInstrument, A::NonPrecisionInstrument, A::NonPrecisionInstrument);
        let dims = with_visibility(npi.clone(), 1.0).calc_approach_dimensions();
        assert_eq!(dims.end1.width_ft, 3500.0);
        assert_eq!(dims.end1.total_length_ft(), 10_000.0);
        assert!((dims.end1.total_rise_ft() - 10_000.0 / 34.0).abs() < 1e-9);
        let dims = with_visibility(npi.clone(), 0.75).calc_approach_dimensions();
        assert_eq!(dims.end2.width_ft, 4000.0);
        let dims = with_visibility(npi, 0.5).calc_approach_dimensions();
        assert_eq!(dims.end1.width_ft, 0.0);

        let dims = runway(R::PrecisionInstrument, A::PrecisionInstrument, A::Visual)
            .calc_approach_dimensions();
        assert_eq!(dims.end1.width_ft, 16_000.0);
        assert_eq!(dims.end1.total_length_ft(), 50_000.0);
        assert!((dims.end1.total_rise_ft() - (200.0 + 1000.0)).abs() < 1e-9);
        assert_eq!(dims.end2.width_ft, 1500.0);
    }

    #[test]
    fn category_tokens_parse() {
        assert_eq!(RunwayCategory::parse("UTILITY"), Some(RunwayCategory::Utility));
        assert_eq!(
            RunwayCategory::parse("non_precision_instrument"),
            Some(RunwayCategory::NonPrecisionInstrument)
        );
        assert_eq!(RunwayCategory::parse(" pi "), Some(RunwayCategory::PrecisionInstrument));
        assert_eq!(RunwayCategory::parse("grass"), None);
        assert_eq!(
            ApproachCategory::parse("PRECISION_INSTRUMENT"),
            Some(ApproachCategory::PrecisionInstrument)
        );
        assert_eq!(ApproachCategory::parse("NPI"), Some(ApproachCategory::NonPrecisionInstrument));
        assert_eq!(ApproachCategory::parse("circling"), None);
    }
}
