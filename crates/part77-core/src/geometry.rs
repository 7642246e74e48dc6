//! Planar and spatial primitives used to construct imaginary surfaces.
//!
//! Coordinates are feet in a local planar frame (x east, y north, z up).
//! Functions here are stateless. Degenerate inputs (coincident points,
//! collinear triangles, zero radii) yield `None` or an empty result
//! instead of NaN.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::ops::{Add, Mul, Neg, Sub};

/// Tolerance for side-of-line and containment tests, in feet.
pub const EPS_FT: f64 = 1e-6;

/// Chords shorter than this count as tangential contact, in feet.
pub const TANGENCY_TOLERANCE_FT: f64 = 1e-2;

/// A point (or vector) in the local planar frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Point2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3D cross product. Positive when `other` is
    /// counter-clockwise from `self`.
    pub fn cross(self, other: Point2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Point2) -> f64 {
        (other - self).length()
    }

    /// Unit vector in the same direction, or `None` for a zero vector.
    pub fn normalized(self) -> Option<Point2> {
        let len = self.length();
        if len <= EPS_FT || !len.is_finite() {
            return None;
        }
        Some(Point2::new(self.x / len, self.y / len))
    }

    /// Rotated 90 degrees counter-clockwise.
    pub fn left_normal(self) -> Point2 {
        Point2::new(-self.y, self.x)
    }

    /// Rotated 90 degrees clockwise.
    pub fn right_normal(self) -> Point2 {
        Point2::new(self.y, -self.x)
    }

    pub fn with_z(self, z: f64) -> Point3 {
        Point3::new(self.x, self.y, z)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn approx_eq(self, other: Point2) -> bool {
        self.distance(other) <= EPS_FT
    }
}

impl Add for Point2 {
    type Output = Point2;

    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Point2;

    fn mul(self, rhs: f64) -> Point2 {
        Point2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point2 {
    type Output = Point2;

    fn neg(self) -> Point2 {
        Point2::new(-self.x, -self.y)
    }
}

/// A point in the local frame with elevation in feet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Projection onto the ground plane.
    pub fn xy(self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    fn minus(self, other: Point3) -> Point3 {
        Point3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    fn cross(self, other: Point3) -> Point3 {
        Point3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Polygon vertex ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}

/// True iff one circle lies wholly inside the other (touching internally
/// counts). A circle always contains itself.
pub fn circle_in_circle(c1: Point2, r1: f64, c2: Point2, r2: f64) -> bool {
    let d = c1.distance(c2);
    r1 + EPS_FT >= d + r2 || r2 + EPS_FT >= d + r1
}

/// Tangency points of the common external tangent lying to the right of
/// the directed line `c1 -> c2`.
///
/// The unit normal of the tangent line makes an angle `acos((r1 - r2) / d)`
/// with the centre line, measured towards its right-hand side. This picks
/// the same tangent as the usual case-split on which centre is higher or
/// further east and which radius is larger: each quadrant/radius case of
/// that table is one sign combination of `along` and `right_normal` here.
/// Returns `None` when the centres coincide or one circle contains the
/// other.
pub fn right_external_tangent(
    c1: Point2,
    r1: f64,
    c2: Point2,
    r2: f64,
) -> Option<(Point2, Point2)> {
    let delta = c2 - c1;
    let d = delta.length();
    if d <= EPS_FT || circle_in_circle(c1, r1, c2, r2) {
        return None;
    }

    let along = delta * (1.0 / d);
    let cos_phi = ((r1 - r2) / d).clamp(-1.0, 1.0);
    let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
    let normal = along * cos_phi + along.right_normal() * sin_phi;

    Some((c1 + normal * r1, c2 + normal * r2))
}

/// Intersections of the line `ax + by + c = 0` with a circle.
///
/// Vertical (`b == 0`) and horizontal (`a == 0`) lines are solved by direct
/// substitution; everything else goes through the quadratic formula. A
/// tangent line yields exactly one point.
pub fn line_intersects_circle(a: f64, b: f64, c: f64, center: Point2, r: f64) -> Vec<Point2> {
    if r < 0.0 || (a == 0.0 && b == 0.0) {
        return Vec::new();
    }

    // Work in circle-centred coordinates to keep magnitudes near `r`.
    let c0 = c + a * center.x + b * center.y;

    if b == 0.0 {
        let x = -c0 / a;
        return chord_offsets(r * r - x * x)
            .into_iter()
            .map(|y| center + Point2::new(x, y))
            .collect();
    }

    if a == 0.0 {
        let y = -c0 / b;
        return chord_offsets(r * r - y * y)
            .into_iter()
            .map(|x| center + Point2::new(x, y))
            .collect();
    }

    let norm = a.hypot(b);
    let (a, b, c0) = (a / norm, b / norm, c0 / norm);

    // (a^2 + b^2) x^2 + 2 a c0 x + (c0^2 - r^2 b^2) = 0 with a^2 + b^2 = 1
    let qa = 1.0;
    let qb = 2.0 * a * c0;
    let qc = c0 * c0 - r * r * b * b;
    let disc = qb * qb - 4.0 * qa * qc;

    let xs = if disc < -EPS_FT {
        Vec::new()
    } else if disc <= EPS_FT {
        vec![-qb / (2.0 * qa)]
    } else {
        let root = disc.sqrt();
        vec![(-qb + root) / (2.0 * qa), (-qb - root) / (2.0 * qa)]
    };

    xs.into_iter()
        .map(|x| center + Point2::new(x, (-c0 - a * x) / b))
        .collect()
}

fn chord_offsets(disc: f64) -> Vec<f64> {
    if disc < -EPS_FT {
        Vec::new()
    } else if disc <= EPS_FT {
        vec![0.0]
    } else {
        let half = disc.sqrt();
        vec![half, -half]
    }
}

/// Standard-form coefficients `(a, b, c)` of the line through two points.
pub fn line_coefficients(p1: Point2, p2: Point2) -> Option<(f64, f64, f64)> {
    if p1.approx_eq(p2) {
        return None;
    }
    if (p2.x - p1.x).abs() <= EPS_FT {
        return Some((1.0, 0.0, -p1.x));
    }
    if (p2.y - p1.y).abs() <= EPS_FT {
        return Some((0.0, 1.0, -p1.y));
    }
    let m = (p2.y - p1.y) / (p2.x - p1.x);
    Some((-m, 1.0, m * p1.x - p1.y))
}

/// Intersection of the infinite line through `a` and `b` with the segment
/// `c`-`d`. A segment lying on the line yields both of its endpoints.
pub fn line_intersects_segment(a: Point2, b: Point2, c: Point2, d: Point2) -> Vec<Point2> {
    let Some(dir) = (b - a).normalized() else {
        return Vec::new();
    };

    let side_c = dir.cross(c - a);
    let side_d = dir.cross(d - a);
    let on_c = side_c.abs() <= EPS_FT;
    let on_d = side_d.abs() <= EPS_FT;

    match (on_c, on_d) {
        (true, true) if c.approx_eq(d) => vec![c],
        (true, true) => vec![c, d],
        (true, false) => vec![c],
        (false, true) => vec![d],
        _ if side_c.signum() == side_d.signum() => Vec::new(),
        _ => {
            let t = side_c / (side_c - side_d);
            vec![c + (d - c) * t]
        }
    }
}

/// True when segments `a1-a2` and `b1-b2` cross at a single interior point.
/// Touching at endpoints or running collinear does not count.
pub fn segments_cross(a1: Point2, a2: Point2, b1: Point2, b2: Point2) -> bool {
    fn orient(p: Point2, q: Point2, r: Point2) -> f64 {
        let Some(dir) = (q - p).normalized() else {
            return 0.0;
        };
        dir.cross(r - p)
    }

    let o1 = orient(a1, a2, b1);
    let o2 = orient(a1, a2, b2);
    let o3 = orient(b1, b2, a1);
    let o4 = orient(b1, b2, a2);

    let a_crosses = (o1 > EPS_FT && o2 < -EPS_FT) || (o1 < -EPS_FT && o2 > EPS_FT);
    let b_crosses = (o3 > EPS_FT && o4 < -EPS_FT) || (o3 < -EPS_FT && o4 > EPS_FT);
    a_crosses && b_crosses
}

/// The two points at distance `w` from `b` that form a right angle at `b`
/// with leg `a-b`. The first lies to the left of `a -> b`.
pub fn create_right_triangle(a: Point2, b: Point2, w: f64) -> Option<(Point2, Point2)> {
    let normal = (b - a).normalized()?.left_normal();
    Some((b + normal * w, b - normal * w))
}

/// Moves both endpoints of segment `p1`-`p2` outward along its direction.
pub fn extend_points_in_both_directions(
    p1: Point2,
    p2: Point2,
    amount: f64,
) -> Option<(Point2, Point2)> {
    let dir = (p2 - p1).normalized()?;
    Some((p1 - dir * amount, p2 + dir * amount))
}

/// Signed distance of `q` from the directed line `p1 -> p2`. Positive on
/// the left.
pub fn signed_distance_to_line(p1: Point2, p2: Point2, q: Point2) -> Option<f64> {
    let dir = (p2 - p1).normalized()?;
    Some(dir.cross(q - p1))
}

/// Twice the signed area of a closed vertex ring (shoelace).
fn doubled_signed_area(vertices: &[Point2]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| vertices[i].cross(vertices[(i + 1) % n]))
        .sum()
}

/// Winding of a vertex ring, or `None` when it encloses no area.
pub fn polygon_winding(vertices: &[Point2]) -> Option<Winding> {
    if vertices.len() < 3 {
        return None;
    }
    let area = doubled_signed_area(vertices);
    if area > EPS_FT {
        Some(Winding::CounterClockwise)
    } else if area < -EPS_FT {
        Some(Winding::Clockwise)
    } else {
        None
    }
}

/// Reorders a vertex ring to counter-clockwise.
pub fn ensure_counter_clockwise(mut vertices: Vec<Point2>) -> Vec<Point2> {
    if polygon_winding(&vertices) == Some(Winding::Clockwise) {
        vertices.reverse();
    }
    vertices
}

/// Point-in-polygon by checking that `point` sits on the interior side of
/// every edge. Only valid for convex rings. The winding is inferred from
/// the signed area when not given. Boundary points count as inside.
pub fn is_in_polygon(point: Point2, vertices: &[Point2], winding: Option<Winding>) -> bool {
    let Some(winding) = winding.or_else(|| polygon_winding(vertices)) else {
        return false;
    };

    let n = vertices.len();
    for i in 0..n {
        let Some(side) = signed_distance_to_line(vertices[i], vertices[(i + 1) % n], point) else {
            // repeated vertex
            continue;
        };
        let outside = match winding {
            Winding::CounterClockwise => side < -EPS_FT,
            Winding::Clockwise => side > EPS_FT,
        };
        if outside {
            return false;
        }
    }
    true
}

/// Heading of `point` as seen from `center`, in `[0, 2pi)`.
pub fn angle_of(center: Point2, point: Point2) -> f64 {
    (point.y - center.y).atan2(point.x - center.x).rem_euclid(TAU)
}

/// True when `angle` lies on the counter-clockwise sweep starting at
/// `start`.
pub fn angle_within(angle: f64, start: f64, sweep: f64) -> bool {
    let rel = (angle - start).rem_euclid(TAU);
    rel <= sweep + 1e-12 || sweep >= TAU - 1e-12
}

/// Non-vertical plane expressed as `z = f(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    origin: Point3,
    normal: Point3,
}

impl Plane {
    /// Plane through three points, using the cross-product normal.
    /// Returns `None` for collinear points or a vertical plane.
    pub fn through(p1: Point3, p2: Point3, p3: Point3) -> Option<Plane> {
        let normal = p2.minus(p1).cross(p3.minus(p1));
        let len = normal.length();
        if len <= EPS_FT || normal.z.abs() <= len * 1e-12 {
            return None;
        }
        Some(Plane { origin: p1, normal })
    }

    pub fn z_at(&self, x: f64, y: f64) -> f64 {
        self.origin.z
            - (self.normal.x * (x - self.origin.x) + self.normal.y * (y - self.origin.y))
                / self.normal.z
    }
}

/// Upper surface of a right circular cone with a vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cone {
    apex: Point3,
    rise_per_ft: f64,
}

impl Cone {
    /// Cone with its tip at `apex` whose radius is `radius_at_height` at
    /// elevation `height`.
    pub fn from_apex(apex: Point3, radius_at_height: f64, height: f64) -> Option<Cone> {
        if !(radius_at_height > EPS_FT) || !height.is_finite() {
            return None;
        }
        Some(Cone {
            apex,
            rise_per_ft: (height - apex.z) / radius_at_height,
        })
    }

    pub fn z_at(&self, x: f64, y: f64) -> f64 {
        self.apex.z + self.rise_per_ft * self.apex.xy().distance(Point2::new(x, y))
    }
}
