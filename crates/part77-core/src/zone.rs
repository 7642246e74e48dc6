//! Zone classification: which imaginary surface governs a position and the
//! highest permitted building elevation there.

use crate::error::SurfaceError;
use crate::geometry::{Point3, EPS_FT};
use crate::horizontal::{Circle, HorizontalSurface};
use crate::rules::SurfaceRules;
use crate::runway::{EndSelector, Runway};
use crate::surfaces::RunwaySurfaces;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Imaginary surface a position falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    #[serde(rename = "N/A")]
    NotApplicable,
    Primary,
    Horizontal,
    Conical,
    Transitional,
    Approach,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Zone::NotApplicable => "N/A",
            Zone::Primary => "Primary",
            Zone::Horizontal => "Horizontal",
            Zone::Conical => "Conical",
            Zone::Transitional => "Transitional",
            Zone::Approach => "Approach",
        };
        f.write_str(label)
    }
}

/// Outcome of classifying one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneResult {
    pub zone: Zone,
    /// Highest permitted elevation in feet, `None` when no surface applies.
    pub build_limit_ft: Option<f64>,
    /// Runway whose surface set the limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runway: Option<String>,
    /// Runway end, for approach surfaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl ZoneResult {
    pub fn not_applicable() -> Self {
        Self {
            zone: Zone::NotApplicable,
            build_limit_ft: None,
            runway: None,
            end: None,
        }
    }

    /// Replace the current zone when `limit` is strictly higher than the
    /// current build limit (or none is set yet).
    fn propose(&mut self, zone: Zone, limit: f64, runway: Option<&str>, end: Option<&str>) {
        if self.build_limit_ft.map_or(true, |current| limit > current) {
            *self = Self {
                zone,
                build_limit_ft: Some(limit),
                runway: runway.map(str::to_string),
                end: end.map(str::to_string),
            };
        }
    }
}

/// Every surface of an airport, built once and queried many times.
#[derive(Debug, Clone)]
pub struct SurfaceSet {
    rules: SurfaceRules,
    runways: Vec<RunwaySurfaces>,
    horizontal: HorizontalSurface,
}

impl SurfaceSet {
    pub fn build(runways: &[Runway], rules: SurfaceRules) -> Result<Self, SurfaceError> {
        let mut surfaces = Vec::with_capacity(runways.len());
        let mut circles = Vec::with_capacity(runways.len() * 2);

        for runway in runways {
            let built = RunwaySurfaces::build(runway, &rules)?;
            let ends = built.primary.ends;
            circles.push(Circle::new(ends.end1, built.horizontal_radius_ft));
            circles.push(Circle::new(ends.end2, built.horizontal_radius_ft));
            surfaces.push(built);
        }

        let horizontal = HorizontalSurface::build(&circles, &rules)?;

        tracing::info!(
            "Built imaginary surfaces for {} runways ({} outline edges)",
            surfaces.len(),
            horizontal.edges().len()
        );

        Ok(Self {
            rules,
            runways: surfaces,
            horizontal,
        })
    }

    pub fn runways(&self) -> &[RunwaySurfaces] {
        &self.runways
    }

    pub fn horizontal(&self) -> &HorizontalSurface {
        &self.horizontal
    }

    /// Classify `position` (local feet, z is elevation in feet) against an
    /// established airport elevation of `eae` feet.
    ///
    /// The primary surface wins outright. Otherwise each candidate surface
    /// replaces the current one only when its build limit is strictly higher.
    pub fn classify(&self, position: Point3, eae: f64) -> ZoneResult {
        let point = position.xy();

        if let Some(runway) = self.runways.iter().find(|r| r.primary.contains(point)) {
            return ZoneResult {
                zone: Zone::Primary,
                build_limit_ft: Some(eae),
                runway: Some(runway.name.clone()),
                end: None,
            };
        }

        let mut result = ZoneResult::not_applicable();
        let inside_horizontal = self.horizontal.contains(point);

        if inside_horizontal {
            result.propose(Zone::Horizontal, eae, None, None);

            for runway in &self.runways {
                for transitional in &runway.transitionals {
                    if let Some(height) = transitional.height_at(point) {
                        let limit = eae + height;
                        if position.z <= limit + EPS_FT {
                            result.propose(
                                Zone::Transitional,
                                limit,
                                Some(runway.name.as_str()),
                                None,
                            );
                        }
                    }
                }
            }
        }

        for runway in &self.runways {
            for which in [EndSelector::End1, EndSelector::End2] {
                let Some(approach) = runway.approaches.get(which) else {
                    continue;
                };
                if let Some(height) = approach.height_at(point) {
                    let limit = eae + height;
                    if position.z <= limit + EPS_FT {
                        result.propose(
                            Zone::Approach,
                            limit,
                            Some(runway.name.as_str()),
                            Some(runway.end_names.get(which).as_str()),
                        );
                    }
                }
            }
        }

        if !inside_horizontal && position.z >= eae + self.rules.horizontal_height_ft - EPS_FT {
            if let Some(height) = self.horizontal.conical_height_at(point) {
                let limit = eae + height;
                if position.z <= limit + EPS_FT {
                    result.propose(Zone::Conical, limit, None, None);
                }
            }
        }

        tracing::debug!(
            "Position ({:.1}, {:.1}, {:.1}) classified as {}",
            position.x,
            position.y,
            position.z,
            result.zone
        );
        result
    }
}

/// Build surfaces with the default rules and classify a single position.
pub fn classify(position: Point3, runways: &[Runway], eae: f64) -> Result<ZoneResult, SurfaceError> {
    Ok(SurfaceSet::build(runways, SurfaceRules::default())?.classify(position, eae))
}
