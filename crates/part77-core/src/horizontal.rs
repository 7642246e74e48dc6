//! Horizontal-surface outline and the conical surface hung from it.
//!
//! The outline is the rounded convex hull of the circles swung from every
//! primary-surface end: straight tangent segments joined by arcs, walked
//! counter-clockwise.

use crate::error::SurfaceError;
use crate::geometry::{
    angle_of, angle_within, circle_in_circle, is_in_polygon, line_coefficients,
    line_intersects_circle, right_external_tangent, segments_cross, signed_distance_to_line,
    Cone, Plane, Point2, Winding, EPS_FT, TANGENCY_TOLERANCE_FT,
};
use crate::rules::SurfaceRules;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, point: Point2) -> bool {
        self.center.distance(point) <= self.radius + EPS_FT
    }
}

/// One piece of the horizontal-surface perimeter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Edge {
    Line {
        p1: Point2,
        p2: Point2,
    },
    /// Counter-clockwise arc of `sweep` radians starting at `start_angle`.
    Arc {
        center: Point2,
        radius: f64,
        start_angle: f64,
        sweep: f64,
    },
}

impl Edge {
    pub fn start_point(&self) -> Point2 {
        match *self {
            Edge::Line { p1, .. } => p1,
            Edge::Arc {
                center,
                radius,
                start_angle,
                ..
            } => point_on_circle(center, radius, start_angle),
        }
    }

    pub fn end_point(&self) -> Point2 {
        match *self {
            Edge::Line { p2, .. } => p2,
            Edge::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => point_on_circle(center, radius, start_angle + sweep),
        }
    }
}

fn point_on_circle(center: Point2, radius: f64, angle: f64) -> Point2 {
    center + Point2::new(angle.cos(), angle.sin()) * radius
}

/// Conical surface over one outline edge.
#[derive(Debug, Clone)]
enum ConicalPiece {
    /// Sloped strip outside a tangent segment.
    Wedge { p1: Point2, p2: Point2, plane: Plane },
    /// Annular sector outside an arc.
    Ring {
        center: Point2,
        radius: f64,
        start_angle: f64,
        sweep: f64,
        cone: Cone,
    },
}

#[derive(Debug, Clone, Copy)]
struct Tangent {
    from: usize,
    to: usize,
    p1: Point2,
    p2: Point2,
}

/// Closed horizontal-surface outline plus the conical pieces around it.
#[derive(Debug, Clone, Default)]
pub struct HorizontalSurface {
    circles: Vec<Circle>,
    edges: Vec<Edge>,
    /// Tangent-segment endpoints, counter-clockwise
    vertices: Vec<Point2>,
    conical: Vec<ConicalPiece>,
    conical_width_ft: f64,
}

impl HorizontalSurface {
    /// Walk the outline around `circles`. An empty input gives an empty
    /// surface that contains nothing.
    pub fn build(circles: &[Circle], rules: &SurfaceRules) -> Result<Self, SurfaceError> {
        let hull = outermost_circles(circles);

        let edges = match hull.len() {
            0 => Vec::new(),
            1 => vec![Edge::Arc {
                center: hull[0].center,
                radius: hull[0].radius,
                start_angle: 0.0,
                sweep: TAU,
            }],
            _ => outline_edges(&hull)?,
        };

        let mut vertices: Vec<Point2> = Vec::new();
        for edge in &edges {
            if let Edge::Line { p1, p2 } = *edge {
                for p in [p1, p2] {
                    if vertices.last().map_or(true, |last| !last.approx_eq(p)) {
                        vertices.push(p);
                    }
                }
            }
        }
        if vertices.len() > 1 && vertices[0].approx_eq(vertices[vertices.len() - 1]) {
            vertices.pop();
        }

        let conical = conical_pieces(&edges, rules);

        tracing::debug!(
            "Horizontal surface outline: {} circles, {} edges",
            hull.len(),
            edges.len()
        );

        Ok(Self {
            circles: hull,
            edges,
            vertices,
            conical,
            conical_width_ft: rules.conical_width_ft,
        })
    }

    /// Outline pieces in counter-clockwise order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Circles that contribute to the outline.
    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// True when `point` lies on or inside the outline.
    pub fn contains(&self, point: Point2) -> bool {
        if self.vertices.len() >= 3
            && is_in_polygon(point, &self.vertices, Some(Winding::CounterClockwise))
        {
            return true;
        }
        self.circles.iter().any(|circle| circle.contains(point))
    }

    /// Conical-surface height above the airport elevation at `point`, when
    /// `point` lies within the conical band outside the outline.
    pub fn conical_height_at(&self, point: Point2) -> Option<f64> {
        let width = self.conical_width_ft;
        self.conical.iter().find_map(|piece| match piece {
            ConicalPiece::Wedge { p1, p2, plane } => {
                let seg = *p2 - *p1;
                let t = (point - *p1).dot(seg) / seg.dot(seg);
                // outside of the outline is the right-hand side of each segment
                let outward = -signed_distance_to_line(*p1, *p2, point)?;
                let within = (-EPS_FT..=1.0 + EPS_FT).contains(&t)
                    && (-EPS_FT..=width + EPS_FT).contains(&outward);
                within.then(|| plane.z_at(point.x, point.y))
            }
            ConicalPiece::Ring {
                center,
                radius,
                start_angle,
                sweep,
                cone,
            } => {
                let d = center.distance(point);
                let within = (radius - EPS_FT..=radius + width + EPS_FT).contains(&d)
                    && angle_within(angle_of(*center, point), *start_angle, *sweep);
                within.then(|| cone.z_at(point.x, point.y))
            }
        })
    }
}

/// Drop circles lying inside another circle. Of two identical circles the
/// first one is kept.
fn outermost_circles(circles: &[Circle]) -> Vec<Circle> {
    circles
        .iter()
        .enumerate()
        .filter(|&(i, ci)| {
            !circles.iter().enumerate().any(|(j, cj)| {
                j != i
                    && circle_in_circle(ci.center, ci.radius, cj.center, cj.radius)
                    && (ci.radius < cj.radius - EPS_FT
                        || ((ci.radius - cj.radius).abs() <= EPS_FT && j < i))
            })
        })
        .map(|(_, c)| *c)
        .collect()
}

/// Tangent from `circles[from]` to `circles[to]` that keeps every circle on
/// its left and crosses no accepted segment.
fn valid_tangent(
    circles: &[Circle],
    from: usize,
    to: usize,
    accepted: &[Tangent],
) -> Option<Tangent> {
    let (c1, c2) = (circles[from], circles[to]);
    let (p1, p2) = right_external_tangent(c1.center, c1.radius, c2.center, c2.radius)?;

    if accepted
        .iter()
        .any(|t| segments_cross(p1, p2, t.p1, t.p2))
    {
        return None;
    }

    let (a, b, c) = line_coefficients(p1, p2)?;
    for (k, other) in circles.iter().enumerate() {
        if k == from || k == to {
            continue;
        }
        if let [h1, h2] = line_intersects_circle(a, b, c, other.center, other.radius).as_slice() {
            if h1.distance(*h2) > TANGENCY_TOLERANCE_FT {
                return None;
            }
        }
        if signed_distance_to_line(p1, p2, other.center)? < -EPS_FT {
            return None;
        }
    }

    Some(Tangent { from, to, p1, p2 })
}

fn outline_edges(circles: &[Circle]) -> Result<Vec<Edge>, SurfaceError> {
    let n = circles.len();
    let centroid = circles
        .iter()
        .fold(Point2::default(), |acc, c| acc + c.center)
        * (1.0 / n as f64);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| {
        let (ci, cj) = (circles[i].center, circles[j].center);
        angle_of(centroid, ci)
            .total_cmp(&angle_of(centroid, cj))
            .then(centroid.distance(ci).total_cmp(&centroid.distance(cj)))
    });

    // The circle reaching furthest south (then west) is always on the hull.
    let start = (0..n)
        .min_by(|&i, &j| {
            let (ci, cj) = (circles[order[i]], circles[order[j]]);
            (ci.center.y - ci.radius)
                .total_cmp(&(cj.center.y - cj.radius))
                .then(ci.center.x.total_cmp(&cj.center.x))
        })
        .unwrap_or(0);

    // A circle may appear on the outline more than once when a larger one
    // bulges past smaller neighbours on two sides. Each step leaves the
    // current circle by the valid tangent met first going counter-clockwise
    // from where the outline arrived, starting from the bottom of `start`.
    let mut tangents: Vec<Tangent> = Vec::new();
    let mut arrival = -FRAC_PI_2;
    let mut current = start;
    loop {
        let circle = circles[order[current]];
        let tolerance = EPS_FT / circle.radius.max(EPS_FT);

        let mut best: Option<(usize, Tangent, f64)> = None;
        for pos in (1..n).map(|k| (current + k) % n) {
            let (from, to) = (order[current], order[pos]);
            // only the closing tangent may repeat
            if tangents.iter().skip(1).any(|t| t.from == from && t.to == to) {
                continue;
            }
            let Some(tangent) = valid_tangent(circles, from, to, &tangents) else {
                continue;
            };
            let mut turn = (angle_of(circle.center, tangent.p1) - arrival).rem_euclid(TAU);
            if turn > TAU - tolerance {
                turn = 0.0;
            }
            // collinear candidates: the nearer circle comes first
            let better = match best {
                None => true,
                Some((_, held, held_turn)) => {
                    turn < held_turn - tolerance
                        || (turn <= held_turn + tolerance
                            && tangent.p1.distance(tangent.p2) < held.p1.distance(held.p2))
                }
            };
            if better {
                best = Some((pos, tangent, turn));
            }
        }

        let Some((pos, tangent, _)) = best else {
            return Err(SurfaceError::DegenerateOutline {
                circle: order[current],
            });
        };
        if tangents
            .first()
            .is_some_and(|first| first.from == tangent.from && first.to == tangent.to)
        {
            break;
        }
        tangents.push(tangent);
        if tangents.len() > 2 * n {
            return Err(SurfaceError::DegenerateOutline {
                circle: order[current],
            });
        }
        arrival = angle_of(circles[tangent.to].center, tangent.p2);
        current = pos;
    }

    let mut edges = Vec::with_capacity(tangents.len() * 2);
    for (idx, tangent) in tangents.iter().enumerate() {
        edges.push(Edge::Line {
            p1: tangent.p1,
            p2: tangent.p2,
        });

        let next = tangents[(idx + 1) % tangents.len()];
        debug_assert_eq!(next.from, tangent.to);
        if tangent.p2.approx_eq(next.p1) {
            continue;
        }
        let circle = circles[tangent.to];
        let start_angle = angle_of(circle.center, tangent.p2);
        let sweep = (angle_of(circle.center, next.p1) - start_angle).rem_euclid(TAU);
        edges.push(Edge::Arc {
            center: circle.center,
            radius: circle.radius,
            start_angle,
            sweep,
        });
    }

    Ok(edges)
}

fn conical_pieces(edges: &[Edge], rules: &SurfaceRules) -> Vec<ConicalPiece> {
    let width = rules.conical_width_ft;
    if width <= 0.0 {
        return Vec::new();
    }
    let base = rules.horizontal_height_ft;
    let top = rules.conical_top_ft();

    edges
        .iter()
        .filter_map(|edge| match *edge {
            Edge::Line { p1, p2 } => {
                let outward = (p2 - p1).normalized()?.right_normal();
                let plane = Plane::through(
                    p1.with_z(base),
                    p2.with_z(base),
                    (p1 + outward * width).with_z(top),
                )?;
                Some(ConicalPiece::Wedge { p1, p2, plane })
            }
            Edge::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                let slope = (top - base) / width;
                let apex = center.with_z(base - radius * slope);
                let cone = Cone::from_apex(apex, radius + width, top)?;
                Some(ConicalPiece::Ring {
                    center,
                    radius,
                    start_angle,
                    sweep,
                    cone,
                })
            }
        })
        .collect()
}
