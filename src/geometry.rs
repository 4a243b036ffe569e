//! Plane-geometry primitives shared by the shape and mask layers.
//!
//! Everything here works on plain `f64` pixel coordinates. The shape
//! variants in [`crate::model`] store their vertices as flat coordinate
//! lists and lean on this module for bounding-box extraction, coordinate
//! rounding and polygon analysis.

use serde::{Deserialize, Serialize};

/// Decimal digits kept by shape-coordinate rounding.
pub const COORDINATE_ROUNDING_DIGITS: u32 = 2;

/// Rounds a coordinate to [`COORDINATE_ROUNDING_DIGITS`] decimal digits.
///
/// Applied to every shape coordinate on construction. Geometry rebuilt
/// from stored points must tolerate the resulting <= 0.005 quantization.
#[inline]
pub fn round_coord(value: f64) -> f64 {
    let scale = 10f64.powi(COORDINATE_ROUNDING_DIGITS as i32);
    (value * scale).round() / scale
}

/// Rounds a flat coordinate list in place and returns it.
pub fn round_points(mut points: Vec<f64>) -> Vec<f64> {
    for p in &mut points {
        *p = round_coord(*p);
    }
    points
}

/// An axis-aligned bounding box in XYWH format.
///
/// This is the return shape of every `get_bbox` in the crate. It does NOT
/// enforce non-negative width/height; degenerate boxes (single points,
/// empty keypoint sets) are representable on purpose.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Bounds {
    /// Creates a bounding box from a top-left corner and dimensions.
    #[inline]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Creates a bounding box from min/max corner coordinates.
    #[inline]
    pub fn from_extremes(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Computes the tight bounding box of a point stream.
    ///
    /// Returns `None` for an empty stream: there is no meaningful box.
    pub fn of_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut extremes: Option<(f64, f64, f64, f64)> = None;
        for (x, y) in points {
            extremes = Some(match extremes {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        extremes.map(|(x0, y0, x1, y1)| Self::from_extremes(x0, y0, x1, y1))
    }

    /// Returns the maximum x coordinate (right edge).
    #[inline]
    pub fn x1(&self) -> f64 {
        self.x + self.w
    }

    /// Returns the maximum y coordinate (bottom edge).
    #[inline]
    pub fn y1(&self) -> f64 {
        self.y + self.h
    }

    /// Returns the area of the bounding box.
    #[inline]
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Returns the box as a `[x, y, w, h]` array.
    #[inline]
    pub fn as_xywh(&self) -> [f64; 4] {
        [self.x, self.y, self.w, self.h]
    }

    /// Returns true if all components are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }

    /// Intersection-over-union of two axis-aligned boxes.
    ///
    /// Returns -1.0 when the union area is zero, where IoU is undefined.
    /// Shape variants with orientation (rotated boxes, ellipses) reuse this
    /// on their axis-aligned extents; that approximation is part of the
    /// contract and is not upgraded to exact oriented overlap.
    pub fn iou(&self, other: &Bounds) -> f64 {
        let in_left = self.x.max(other.x);
        let in_top = self.y.max(other.y);
        let in_right = self.x1().min(other.x1());
        let in_bottom = self.y1().min(other.y1());

        let in_w = (in_right - in_left).max(0.0);
        let in_h = (in_bottom - in_top).max(0.0);
        let intersection = in_w * in_h;

        let union = self.area() + other.area() - intersection;
        if union == 0.0 {
            return -1.0;
        }
        intersection / union
    }
}

impl std::fmt::Debug for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bounds")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("w", &self.w)
            .field("h", &self.h)
            .finish()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// Signed shoelace area of a polygon given as coordinate pairs.
///
/// Counter-clockwise rings are positive. Only used for degeneracy checks;
/// the model's polygon areas are raster-based (see [`crate::raster`]).
pub fn shoelace_area(points: &[(f64, f64)]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..n {
        let (x0, y0) = points[i];
        let (x1, y1) = points[(i + 1) % n];
        acc += x0 * y1 - x1 * y0;
    }
    acc / 2.0
}

/// Checks that a ring is a valid simple polygon: at least 3 distinct
/// vertices, nonzero area, and no contact between non-adjacent edges.
///
/// Consecutive duplicate vertices are collapsed before the test, so rings
/// that merely repeat a vertex are not rejected for it.
pub fn is_valid_polygon(points: &[(f64, f64)]) -> bool {
    let ring = collapse_duplicates(points);
    let n = ring.len();
    if n < 3 {
        return false;
    }
    if shoelace_area(&ring) == 0.0 {
        return false;
    }

    for i in 0..n {
        for j in (i + 1)..n {
            // Adjacent edges share an endpoint by construction.
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let (a1, a2) = (ring[i], ring[(i + 1) % n]);
            let (b1, b2) = (ring[j], ring[(j + 1) % n]);
            if segments_intersect(a1, a2, b1, b2) {
                return false;
            }
        }
    }
    true
}

fn collapse_duplicates(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut ring: Vec<(f64, f64)> = Vec::with_capacity(points.len());
    for &p in points {
        if ring.last() != Some(&p) {
            ring.push(p);
        }
    }
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Cross product of (b - a) and (c - a); sign gives the turn direction.
#[inline]
fn orientation(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

#[inline]
fn within_segment_box(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> bool {
    p.0 >= a.0.min(b.0) && p.0 <= a.0.max(b.0) && p.1 >= a.1.min(b.1) && p.1 <= a.1.max(b.1)
}

/// Segment intersection test, counting endpoint contact as intersection.
fn segments_intersect(a1: (f64, f64), a2: (f64, f64), b1: (f64, f64), b2: (f64, f64)) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && within_segment_box(b1, b2, a1))
        || (d2 == 0.0 && within_segment_box(b1, b2, a2))
        || (d3 == 0.0 && within_segment_box(a1, a2, b1))
        || (d4 == 0.0 && within_segment_box(a1, a2, b2))
}
