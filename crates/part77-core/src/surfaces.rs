//! Per-runway surface builders: primary, approach and transitional.
//!
//! Surface heights are stored relative to the established airport
//! elevation, so one build can be evaluated against any elevation.

use crate::error::SurfaceError;
use crate::geometry::{
    create_right_triangle, ensure_counter_clockwise, extend_points_in_both_directions,
    is_in_polygon, line_intersects_segment, Plane, Point2, Winding, EPS_FT,
};
use crate::rules::SurfaceRules;
use crate::runway::{ApproachDimensions, ApproachProfile, EndPair, EndSelector, Runway};

/// Side of the runway relative to its `end1 -> end2` heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Left and right corners of a surface edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corners {
    pub left: Point2,
    pub right: Point2,
}

impl Corners {
    pub fn on(&self, side: Side) -> Point2 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Reject runway records no surface can be built from.
pub fn validate_runway(runway: &Runway) -> Result<(), SurfaceError> {
    if runway.name.trim().is_empty() {
        return Err(SurfaceError::EmptyRunwayName);
    }
    if !runway.end1.point.is_finite() || !runway.end2.point.is_finite() {
        return Err(SurfaceError::NonFiniteCoordinate {
            runway: runway.name.clone(),
        });
    }
    if runway.length_ft() <= EPS_FT {
        return Err(SurfaceError::ZeroLengthRunway {
            runway: runway.name.clone(),
        });
    }
    Ok(())
}

fn degenerate(runway: &Runway, what: &'static str) -> SurfaceError {
    SurfaceError::DegenerateGeometry {
        runway: runway.name.clone(),
        what,
    }
}

/// Primary-surface endpoints: the runway ends, pushed outward along the
/// centerline when the runway is hard-surfaced.
pub fn primary_surface_ends(
    runway: &Runway,
    rules: &SurfaceRules,
) -> Result<EndPair<Point2>, SurfaceError> {
    let (p1, p2) = (runway.end1.point, runway.end2.point);
    if !runway.special_surface {
        return Ok(EndPair { end1: p1, end2: p2 });
    }
    let (end1, end2) = extend_points_in_both_directions(p1, p2, rules.primary_extension_ft)
        .ok_or_else(|| degenerate(runway, "primary surface extension"))?;
    Ok(EndPair { end1, end2 })
}

/// Rectangle centred on the runway; the absolute no-build footprint.
#[derive(Debug, Clone)]
pub struct PrimarySurface {
    pub ends: EndPair<Point2>,
    /// Unit vector from `end1` to `end2`
    pub heading: Point2,
    pub width_ft: f64,
    /// `None` when the width tables are silent for this runway
    pub corners: Option<EndPair<Corners>>,
    footprint: Vec<Point2>,
}

impl PrimarySurface {
    pub fn build(runway: &Runway, rules: &SurfaceRules) -> Result<Self, SurfaceError> {
        let ends = primary_surface_ends(runway, rules)?;
        let heading = (ends.end2 - ends.end1)
            .normalized()
            .ok_or_else(|| degenerate(runway, "primary surface heading"))?;
        let width_ft = runway.calc_primary_surface_width();

        if width_ft <= 0.0 {
            tracing::warn!(
                "Primary surface width undefined for runway {} ({:?}); only its horizontal surface applies",
                runway.name,
                runway.category
            );
            return Ok(Self {
                ends,
                heading,
                width_ft,
                corners: None,
                footprint: Vec::new(),
            });
        }

        let half = width_ft / 2.0;
        // Looking back from end2, the left-hand offset at end1 is the runway's right side.
        let (end1_right, end1_left) = create_right_triangle(ends.end2, ends.end1, half)
            .ok_or_else(|| degenerate(runway, "primary surface corners"))?;
        let (end2_left, end2_right) = create_right_triangle(ends.end1, ends.end2, half)
            .ok_or_else(|| degenerate(runway, "primary surface corners"))?;

        let footprint =
            ensure_counter_clockwise(vec![end1_right, end2_right, end2_left, end1_left]);

        Ok(Self {
            ends,
            heading,
            width_ft,
            corners: Some(EndPair {
                end1: Corners {
                    left: end1_left,
                    right: end1_right,
                },
                end2: Corners {
                    left: end2_left,
                    right: end2_right,
                },
            }),
            footprint,
        })
    }

    /// Counter-clockwise footprint, empty when no width is defined.
    pub fn footprint(&self) -> &[Point2] {
        &self.footprint
    }

    pub fn contains(&self, point: Point2) -> bool {
        !self.footprint.is_empty()
            && is_in_polygon(point, &self.footprint, Some(Winding::CounterClockwise))
    }

    /// Unit vector pointing away from the runway at the given end.
    pub fn outward(&self, which: EndSelector) -> Point2 {
        match which {
            EndSelector::End1 => -self.heading,
            EndSelector::End2 => self.heading,
        }
    }
}

#[derive(Debug, Clone)]
enum ApproachPlanes {
    Single(Plane),
    Split {
        primary_length_ft: f64,
        primary: Plane,
        secondary: Plane,
    },
}

/// Inclined trapezoid flaring outward from one end of the primary surface.
#[derive(Debug, Clone)]
pub struct ApproachSurface {
    pub end: EndSelector,
    pub dimensions: ApproachDimensions,
    /// Inner edge, shared with the primary surface
    pub inner: Corners,
    pub outer: Corners,
    origin: Point2,
    outward: Point2,
    planes: ApproachPlanes,
    footprint: Vec<Point2>,
}

impl ApproachSurface {
    /// Build the approach surface at `which` end. Returns `Ok(None)` when the
    /// tables give no width for the primary or approach surface.
    pub fn build(
        runway: &Runway,
        primary: &PrimarySurface,
        which: EndSelector,
        dimensions: ApproachDimensions,
    ) -> Result<Option<Self>, SurfaceError> {
        let Some(corners) = primary.corners.as_ref() else {
            return Ok(None);
        };
        if dimensions.width_ft <= 0.0 {
            tracing::warn!(
                "Approach width undefined for runway {} end {}; skipping its approach surface",
                runway.name,
                runway.end(which).name
            );
            return Ok(None);
        }

        let origin = *primary.ends.get(which);
        let outward = primary.outward(which);
        let inner = *corners.get(which);
        let far = origin + outward * dimensions.total_length_ft();

        let (far_a, far_b) = create_right_triangle(origin, far, dimensions.width_ft / 2.0)
            .ok_or_else(|| degenerate(runway, "approach surface corners"))?;
        // `far_a` is left of the outward direction, which is the runway's
        // left only at end2.
        let outer = match which {
            EndSelector::End1 => Corners {
                left: far_b,
                right: far_a,
            },
            EndSelector::End2 => Corners {
                left: far_a,
                right: far_b,
            },
        };

        let planes = match dimensions.profile {
            ApproachProfile::Single { length_ft, slope } => ApproachPlanes::Single(
                Plane::through(
                    inner.left.with_z(0.0),
                    inner.right.with_z(0.0),
                    far.with_z(length_ft * slope),
                )
                .ok_or_else(|| degenerate(runway, "approach surface plane"))?,
            ),
            ApproachProfile::Split {
                primary_length_ft,
                secondary_length_ft,
                primary_slope,
                secondary_slope,
            } => {
                let knee = origin + outward * primary_length_ft;
                let knee_height = primary_length_ft * primary_slope;
                let (knee_side, _) = create_right_triangle(origin, knee, dimensions.width_ft)
                    .ok_or_else(|| degenerate(runway, "approach surface plane"))?;

                let primary_plane = Plane::through(
                    inner.left.with_z(0.0),
                    inner.right.with_z(0.0),
                    knee.with_z(knee_height),
                )
                .ok_or_else(|| degenerate(runway, "approach surface plane"))?;
                let secondary_plane = Plane::through(
                    knee.with_z(knee_height),
                    knee_side.with_z(knee_height),
                    far.with_z(knee_height + secondary_length_ft * secondary_slope),
                )
                .ok_or_else(|| degenerate(runway, "approach surface plane"))?;

                ApproachPlanes::Split {
                    primary_length_ft,
                    primary: primary_plane,
                    secondary: secondary_plane,
                }
            }
        };

        let footprint =
            ensure_counter_clockwise(vec![inner.left, inner.right, outer.right, outer.left]);

        Ok(Some(Self {
            end: which,
            dimensions,
            inner,
            outer,
            origin,
            outward,
            planes,
            footprint,
        }))
    }

    pub fn footprint(&self) -> &[Point2] {
        &self.footprint
    }

    pub fn contains(&self, point: Point2) -> bool {
        is_in_polygon(point, &self.footprint, Some(Winding::CounterClockwise))
    }

    /// Distance of `point` from the inner edge, measured along the extended
    /// centerline.
    pub fn distance_along(&self, point: Point2) -> f64 {
        (point - self.origin).dot(self.outward)
    }

    /// Surface height above the airport elevation, when `point` lies over
    /// the footprint.
    pub fn height_at(&self, point: Point2) -> Option<f64> {
        if !self.contains(point) {
            return None;
        }
        let plane = match &self.planes {
            ApproachPlanes::Single(plane) => plane,
            ApproachPlanes::Split {
                primary_length_ft,
                primary,
                secondary,
            } => {
                if self.distance_along(point) <= *primary_length_ft {
                    primary
                } else {
                    secondary
                }
            }
        };
        Some(plane.z_at(point.x, point.y))
    }

    /// Lateral edge on one side, from the inner corner to the outer corner.
    pub fn lateral_edge(&self, side: Side) -> (Point2, Point2) {
        (self.inner.on(side), self.outer.on(side))
    }
}

/// Sloped strip between one side of the primary/approach surfaces and the
/// line where the slope reaches the horizontal-surface height.
#[derive(Debug, Clone)]
pub struct TransitionalSurface {
    pub side: Side,
    plane: Plane,
    footprint: Vec<Point2>,
}

impl TransitionalSurface {
    pub fn build(
        runway: &Runway,
        primary: &PrimarySurface,
        approaches: &EndPair<Option<ApproachSurface>>,
        side: Side,
        rules: &SurfaceRules,
    ) -> Result<Option<Self>, SurfaceError> {
        let Some(corners) = primary.corners.as_ref() else {
            return Ok(None);
        };

        let normal = match side {
            Side::Left => primary.heading.left_normal(),
            Side::Right => primary.heading.right_normal(),
        };
        let offset = primary.width_ft / 2.0 + rules.transitional_offset_ft();
        let outer_line = (
            primary.ends.end1 + normal * offset,
            primary.ends.end2 + normal * offset,
        );

        // Path from the primary corner at one end out to the outer line,
        // following that end's approach edge when there is one.
        let chain = |which: EndSelector| -> Vec<Point2> {
            let Some(approach) = approaches.get(which) else {
                return vec![*primary.ends.get(which) + normal * offset];
            };
            let (inner, outer) = approach.lateral_edge(side);
            match line_intersects_segment(outer_line.0, outer_line.1, inner, outer).as_slice() {
                [hit] => vec![*hit],
                _ => {
                    let lateral = (outer - primary.ends.end1).dot(normal);
                    vec![outer, outer + normal * (offset - lateral)]
                }
            }
        };

        let mut ring = vec![corners.end1.on(side)];
        ring.extend(chain(EndSelector::End1));
        ring.extend(chain(EndSelector::End2).into_iter().rev());
        ring.push(corners.end2.on(side));

        let plane = Plane::through(
            corners.end1.on(side).with_z(0.0),
            corners.end2.on(side).with_z(0.0),
            outer_line.0.with_z(rules.horizontal_height_ft),
        )
        .ok_or_else(|| degenerate(runway, "transitional surface plane"))?;

        Ok(Some(Self {
            side,
            plane,
            footprint: ensure_counter_clockwise(ring),
        }))
    }

    pub fn footprint(&self) -> &[Point2] {
        &self.footprint
    }

    pub fn contains(&self, point: Point2) -> bool {
        is_in_polygon(point, &self.footprint, Some(Winding::CounterClockwise))
    }

    /// Surface height above the airport elevation, when `point` lies over
    /// the footprint.
    pub fn height_at(&self, point: Point2) -> Option<f64> {
        self.contains(point)
            .then(|| self.plane.z_at(point.x, point.y))
    }
}

/// Every surface derived from a single runway.
#[derive(Debug, Clone)]
pub struct RunwaySurfaces {
    pub name: String,
    pub end_names: EndPair<String>,
    pub horizontal_radius_ft: f64,
    pub primary: PrimarySurface,
    pub approaches: EndPair<Option<ApproachSurface>>,
    pub transitionals: Vec<TransitionalSurface>,
}

impl RunwaySurfaces {
    pub fn build(runway: &Runway, rules: &SurfaceRules) -> Result<Self, SurfaceError> {
        validate_runway(runway)?;

        let primary = PrimarySurface::build(runway, rules)?;
        let dimensions = runway.calc_approach_dimensions();
        let approaches = EndPair {
            end1: ApproachSurface::build(runway, &primary, EndSelector::End1, dimensions.end1)?,
            end2: ApproachSurface::build(runway, &primary, EndSelector::End2, dimensions.end2)?,
        };

        let mut transitionals = Vec::with_capacity(2);
        for side in [Side::Left, Side::Right] {
            if let Some(surface) =
                TransitionalSurface::build(runway, &primary, &approaches, side, rules)?
            {
                transitionals.push(surface);
            }
        }

        tracing::debug!(
            "Built surfaces for runway {}: primary width {} ft, {} approach, {} transitional",
            runway.name,
            primary.width_ft,
            [&approaches.end1, &approaches.end2]
                .iter()
                .filter(|a| a.is_some())
                .count(),
            transitionals.len()
        );

        Ok(Self {
            name: runway.name.clone(),
            end_names: EndPair {
                end1: runway.end1.name.clone(),
                end2: runway.end2.name.clone(),
            },
            horizontal_radius_ft: runway.calc_horizontal_surface_radius(),
            primary,
            approaches,
            transitionals,
        })
    }
}
