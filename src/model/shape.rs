//! The 2-D shape annotation family and its geometry algorithms.
//!
//! Every shape stores its vertices as a flat `[x0, y0, x1, y1, ..]` list,
//! rounded to two decimal digits on construction. Variants differ in how
//! the list is interpreted: a polyline's waypoints, a polygon ring, a
//! box's corner pair, a rotated box's center/extent/angle, an ellipse's
//! enclosing rectangle, or a keypoint set.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::LabelkitError;
use crate::geometry::{round_points, Bounds};
use crate::model::meta::{impl_annotation_meta, AnnotationMeta};
use crate::raster;

/// Boundary samples used by [`Ellipse`] polygonization by default: one
/// vertex per half degree.
pub const DEFAULT_ELLIPSE_VERTICES: usize = 720;

/// Common contract of the 2-D shape variants.
pub trait Shape {
    /// The flat, rounded coordinate list.
    fn points(&self) -> &[f64];

    /// The category index, if assigned.
    fn label(&self) -> Option<u32>;

    /// Paint priority among overlapping shapes; higher wins.
    fn z_order(&self) -> i32;

    /// The shape's area in pixels.
    fn get_area(&self) -> f64;

    /// A closed-polygon approximation of the shape as a flat list.
    fn as_polygon(&self) -> Vec<f64>;

    /// The tight axis-aligned bounding box, or `None` when the shape has
    /// no points.
    fn get_bbox(&self) -> Option<Bounds> {
        Bounds::of_points(self.get_points())
    }

    /// The coordinate list as (x, y) pairs.
    fn get_points(&self) -> Vec<(f64, f64)> {
        let points = self.points();
        assert!(points.len() % 2 == 0, "flat point list must hold x/y pairs");
        points.iter().copied().tuples().collect()
    }
}

/// Implements the label and z-order builders shared by shapes and masks.
macro_rules! impl_layered_builders {
    ($($variant:ty),+ $(,)?) => {$(
        impl $variant {
            /// Sets the category index.
            pub fn with_label(mut self, label: u32) -> Self {
                self.label = Some(label);
                self
            }

            /// Sets the paint priority among overlapping annotations.
            pub fn with_z_order(mut self, z_order: i32) -> Self {
                self.z_order = z_order;
                self
            }
        }
    )+};
}

pub(crate) use impl_layered_builders;

macro_rules! impl_shape_accessors {
    ($($variant:ty),+ $(,)?) => {$(
        impl $variant {
            #[inline]
            fn shape_points(&self) -> &[f64] {
                &self.points
            }
        }
    )+};
}

impl_annotation_meta!(PolyLine, Polygon, Bbox, RotatedBbox, Ellipse, Points);
impl_layered_builders!(PolyLine, Polygon, Bbox, RotatedBbox, Ellipse, Points);
impl_shape_accessors!(PolyLine, Polygon, Bbox, RotatedBbox, Ellipse, Points);

/// An open sequence of connected line segments.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolyLine {
    #[serde(flatten)]
    pub meta: AnnotationMeta,
    pub points: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<u32>,
    #[serde(default)]
    pub z_order: i32,
}

impl PolyLine {
    /// Creates a polyline from a flat coordinate list.
    pub fn new(points: impl Into<Vec<f64>>) -> Self {
        Self {
            meta: AnnotationMeta::default(),
            points: round_points(points.into()),
            label: None,
            z_order: 0,
        }
    }
}

impl Shape for PolyLine {
    fn points(&self) -> &[f64] {
        self.shape_points()
    }

    fn label(&self) -> Option<u32> {
        self.label
    }

    fn z_order(&self) -> i32 {
        self.z_order
    }

    /// A polyline encloses nothing.
    fn get_area(&self) -> f64 {
        0.0
    }

    fn as_polygon(&self) -> Vec<f64> {
        self.points.clone()
    }
}

/// A closed polygon ring.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(flatten)]
    pub meta: AnnotationMeta,
    pub points: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<u32>,
    #[serde(default)]
    pub z_order: i32,
}

impl Polygon {
    /// Creates a polygon from a flat coordinate list.
    ///
    /// Fails unless the list holds at least 3 complete (x, y) pairs.
    /// Zero-area rings are accepted; they compare by exact point lists.
    pub fn new(points: impl Into<Vec<f64>>) -> Result<Self, LabelkitError> {
        let points = points.into();
        if points.len() % 2 != 0 || points.len() < 6 {
            return Err(LabelkitError::InvalidPolygon {
                coords: points.len(),
            });
        }
        Ok(Self {
            meta: AnnotationMeta::default(),
            points: round_points(points),
            label: None,
            z_order: 0,
        })
    }
}

impl Shape for Polygon {
    fn points(&self) -> &[f64] {
        self.shape_points()
    }

    fn label(&self) -> Option<u32> {
        self.label
    }

    fn z_order(&self) -> i32 {
        self.z_order
    }

    /// Pixel-count area over the polygon's bounding-box raster extent,
    /// kept consistent with mask areas rather than the shoelace formula.
    fn get_area(&self) -> f64 {
        raster::polygon_raster_area(&self.points)
    }

    fn as_polygon(&self) -> Vec<f64> {
        self.points.clone()
    }
}

impl PartialEq for Polygon {
    /// Geometric equality: metadata, label and z-order must match
    /// exactly; the rings are then compared as filled regions, so vertex
    /// order and count do not matter. If either ring is not a valid
    /// simple polygon the comparison falls back to the exact point lists.
    fn eq(&self, other: &Self) -> bool {
        if self.meta != other.meta || self.label != other.label || self.z_order != other.z_order {
            return false;
        }

        let self_ring = self.get_points();
        let other_ring = other.get_points();
        if !(crate::geometry::is_valid_polygon(&self_ring)
            && crate::geometry::is_valid_polygon(&other_ring))
        {
            return self.points == other.points;
        }
        raster::polygon_region_covered(&self.points, &other.points)
    }
}

/// An axis-aligned bounding box, stored as its corner pair
/// `[x0, y0, x1, y1]` and constructed from `(x, y, w, h)`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    #[serde(flatten)]
    pub meta: AnnotationMeta,
    pub points: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<u32>,
    #[serde(default)]
    pub z_order: i32,
}

impl Bbox {
    /// Creates a box from its top-left corner and dimensions.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            meta: AnnotationMeta::default(),
            points: round_points(vec![x, y, x + w, y + h]),
            label: None,
            z_order: 0,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.points[0]
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.points[1]
    }

    #[inline]
    pub fn w(&self) -> f64 {
        self.points[2] - self.points[0]
    }

    #[inline]
    pub fn h(&self) -> f64 {
        self.points[3] - self.points[1]
    }

    /// Bounding-box IoU against any other shape's axis-aligned extent.
    ///
    /// Returns -1.0 when the union area is zero or either shape has no
    /// bounding box.
    pub fn iou(&self, other: &impl Shape) -> f64 {
        shape_iou(self, other)
    }
}

impl Shape for Bbox {
    fn points(&self) -> &[f64] {
        self.shape_points()
    }

    fn label(&self) -> Option<u32> {
        self.label
    }

    fn z_order(&self) -> i32 {
        self.z_order
    }

    fn get_area(&self) -> f64 {
        self.w() * self.h()
    }

    fn get_bbox(&self) -> Option<Bounds> {
        Some(Bounds::new(self.x(), self.y(), self.w(), self.h()))
    }

    /// The four corners, clockwise from the top-left.
    fn as_polygon(&self) -> Vec<f64> {
        let [x, y, w, h] = [self.x(), self.y(), self.w(), self.h()];
        vec![x, y, x + w, y, x + w, y + h, x, y + h]
    }
}

/// An oriented bounding box, stored as `[cx, cy, w, h, r]` with the
/// rotation in degrees.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RotatedBbox {
    #[serde(flatten)]
    pub meta: AnnotationMeta,
    pub points: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<u32>,
    #[serde(default)]
    pub z_order: i32,
}

impl RotatedBbox {
    /// Creates a rotated box from its center, dimensions and rotation in
    /// degrees.
    pub fn new(cx: f64, cy: f64, w: f64, h: f64, r: f64) -> Self {
        Self {
            meta: AnnotationMeta::default(),
            points: round_points(vec![cx, cy, w, h, r]),
            label: None,
            z_order: 0,
        }
    }

    /// Reconstructs a rotated box from the 4 corners of a rectangle.
    ///
    /// The rotation comes from the vector between the first two corners,
    /// the center from the midpoint of opposite corners, and the
    /// dimensions from the two adjacent edge lengths.
    pub fn from_rectangle(corners: &[(f64, f64)]) -> Result<Self, LabelkitError> {
        if corners.len() != 4 {
            return Err(LabelkitError::InvalidRectangle {
                corners: corners.len(),
            });
        }

        let rotation = (corners[1].1 - corners[0].1).atan2(corners[1].0 - corners[0].0);

        let cx = (corners[0].0 + corners[2].0) / 2.0;
        let cy = (corners[0].1 + corners[2].1) / 2.0;

        let w = ((corners[1].0 - corners[0].0).powi(2) + (corners[1].1 - corners[0].1).powi(2))
            .sqrt();
        let h = ((corners[2].0 - corners[1].0).powi(2) + (corners[2].1 - corners[1].1).powi(2))
            .sqrt();

        Ok(Self::new(cx, cy, w, h, rotation.to_degrees()))
    }

    #[inline]
    pub fn cx(&self) -> f64 {
        self.points[0]
    }

    #[inline]
    pub fn cy(&self) -> f64 {
        self.points[1]
    }

    #[inline]
    pub fn w(&self) -> f64 {
        self.points[2]
    }

    #[inline]
    pub fn h(&self) -> f64 {
        self.points[3]
    }

    /// Rotation in degrees.
    #[inline]
    pub fn r(&self) -> f64 {
        self.points[4]
    }

    /// Returns the stored `[cx, cy, w, h, r]` representation.
    pub fn get_rotated_bbox(&self) -> [f64; 5] {
        [self.cx(), self.cy(), self.w(), self.h(), self.r()]
    }

    /// Bounding-box IoU against any other shape's axis-aligned extent;
    /// NOT an exact oriented overlap. Returns -1.0 when undefined.
    pub fn iou(&self, other: &impl Shape) -> f64 {
        shape_iou(self, other)
    }
}

impl Shape for RotatedBbox {
    fn points(&self) -> &[f64] {
        self.shape_points()
    }

    fn label(&self) -> Option<u32> {
        self.label
    }

    fn z_order(&self) -> i32 {
        self.z_order
    }

    fn get_area(&self) -> f64 {
        self.w() * self.h()
    }

    /// The axis-aligned box around the rotated corners.
    fn get_bbox(&self) -> Option<Bounds> {
        let polygon = self.as_polygon();
        Bounds::of_points(polygon.chunks_exact(2).map(|p| (p[0], p[1])))
    }

    /// The four rotated corners: offsets `(+-w/2, +-h/2)` rotated by `r`
    /// and translated to the center.
    fn as_polygon(&self) -> Vec<f64> {
        let angle = self.r().to_radians();
        let (sin, cos) = angle.sin_cos();
        let (hw, hh) = (self.w() / 2.0, self.h() / 2.0);

        let corners = [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)];
        let mut polygon = Vec::with_capacity(8);
        for (dx, dy) in corners {
            polygon.push(cos * dx - sin * dy + self.cx());
            polygon.push(sin * dx + cos * dy + self.cy());
        }
        polygon
    }
}

/// An ellipse, stored as the corners `[x1, y1, x2, y2]` of its enclosing
/// rectangle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    #[serde(flatten)]
    pub meta: AnnotationMeta,
    pub points: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<u32>,
    #[serde(default)]
    pub z_order: i32,
}

impl Ellipse {
    /// Creates an ellipse from the top-left and bottom-right corners of
    /// its enclosing rectangle.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            meta: AnnotationMeta::default(),
            points: round_points(vec![x1, y1, x2, y2]),
            label: None,
            z_order: 0,
        }
    }

    #[inline]
    pub fn x1(&self) -> f64 {
        self.points[0]
    }

    #[inline]
    pub fn y1(&self) -> f64 {
        self.points[1]
    }

    #[inline]
    pub fn x2(&self) -> f64 {
        self.points[2]
    }

    #[inline]
    pub fn y2(&self) -> f64 {
        self.points[3]
    }

    #[inline]
    pub fn w(&self) -> f64 {
        self.points[2] - self.points[0]
    }

    #[inline]
    pub fn h(&self) -> f64 {
        self.points[3] - self.points[1]
    }

    /// Center x coordinate.
    #[inline]
    pub fn cx(&self) -> f64 {
        0.5 * (self.points[0] + self.points[2])
    }

    /// Center y coordinate.
    #[inline]
    pub fn cy(&self) -> f64 {
        0.5 * (self.points[1] + self.points[3])
    }

    /// Samples `vertices` boundary points uniformly over the full turn,
    /// endpoint included, as a flat coordinate list.
    pub fn sample_polygon(&self, vertices: usize) -> Vec<f64> {
        let (a, b) = (0.5 * self.w(), 0.5 * self.h());
        let (cx, cy) = (self.cx(), self.cy());

        let mut polygon = Vec::with_capacity(vertices * 2);
        for i in 0..vertices {
            let theta = if vertices > 1 {
                std::f64::consts::TAU * i as f64 / (vertices - 1) as f64
            } else {
                0.0
            };
            polygon.push(cx + a * theta.cos());
            polygon.push(cy + b * theta.sin());
        }
        polygon
    }

    /// Samples boundary points as (x, y) pairs.
    pub fn sample_points(&self, vertices: usize) -> Vec<(f64, f64)> {
        self.sample_polygon(vertices)
            .into_iter()
            .tuples()
            .collect()
    }

    /// Bounding-box IoU against any other shape's axis-aligned extent;
    /// NOT an exact elliptical overlap. Returns -1.0 when undefined.
    pub fn iou(&self, other: &impl Shape) -> f64 {
        shape_iou(self, other)
    }
}

impl Shape for Ellipse {
    fn points(&self) -> &[f64] {
        self.shape_points()
    }

    fn label(&self) -> Option<u32> {
        self.label
    }

    fn z_order(&self) -> i32 {
        self.z_order
    }

    /// Area of the inscribed ellipse.
    fn get_area(&self) -> f64 {
        0.25 * std::f64::consts::PI * self.w() * self.h()
    }

    fn get_bbox(&self) -> Option<Bounds> {
        Some(Bounds::new(self.x1(), self.y1(), self.w(), self.h()))
    }

    fn as_polygon(&self) -> Vec<f64> {
        self.sample_polygon(DEFAULT_ELLIPSE_VERTICES)
    }
}

/// Visibility state of one keypoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// The point does not exist on this instance.
    Absent,
    /// The point exists but is occluded.
    Hidden,
    #[default]
    Visible,
}

/// An ordered set of keypoints, each with a visibility state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Points {
    #[serde(flatten)]
    pub meta: AnnotationMeta,
    pub points: Vec<f64>,
    pub visibility: Vec<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<u32>,
    #[serde(default)]
    pub z_order: i32,
}

impl Points {
    /// Creates a keypoint set with every point visible.
    pub fn new(points: impl Into<Vec<f64>>) -> Self {
        let points = round_points(points.into());
        assert!(points.len() % 2 == 0, "flat point list must hold x/y pairs");
        let visibility = vec![Visibility::Visible; points.len() / 2];
        Self {
            meta: AnnotationMeta::default(),
            points,
            visibility,
            label: None,
            z_order: 0,
        }
    }

    /// Replaces the visibility states.
    ///
    /// Fails unless there is exactly one state per point.
    pub fn with_visibility(
        mut self,
        visibility: Vec<Visibility>,
    ) -> Result<Self, LabelkitError> {
        if visibility.len() != self.points.len() / 2 {
            return Err(LabelkitError::VisibilityMismatch {
                visibility: visibility.len(),
                points: self.points.len() / 2,
            });
        }
        self.visibility = visibility;
        Ok(self)
    }
}

impl Shape for Points {
    fn points(&self) -> &[f64] {
        self.shape_points()
    }

    fn label(&self) -> Option<u32> {
        self.label
    }

    fn z_order(&self) -> i32 {
        self.z_order
    }

    /// Keypoints enclose nothing.
    fn get_area(&self) -> f64 {
        0.0
    }

    /// Bounding box of the non-absent points; a zero box at the origin
    /// when every point is absent.
    fn get_bbox(&self) -> Option<Bounds> {
        let present = self
            .get_points()
            .into_iter()
            .zip(&self.visibility)
            .filter(|(_, &v)| v != Visibility::Absent)
            .map(|(p, _)| p);
        Some(Bounds::of_points(present).unwrap_or_default())
    }

    fn as_polygon(&self) -> Vec<f64> {
        self.points.clone()
    }
}

/// Shared bbox-IoU plumbing for the oriented and axis-aligned variants.
fn shape_iou(a: &impl Shape, b: &impl Shape) -> f64 {
    match (a.get_bbox(), b.get_bbox()) {
        (Some(a), Some(b)) => a.iou(&b),
        _ => -1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, eps: f64) {
        assert!(
            (actual - expected).abs() <= eps,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_construction_rounds_and_is_deterministic() {
        let a = PolyLine::new(vec![1.0049, 2.005, 3.12345, 4.0]);
        let b = PolyLine::new(vec![1.0049, 2.005, 3.12345, 4.0]);
        assert_eq!(a.points, b.points);
        assert_eq!(a.points, vec![1.0, 2.01, 3.12, 4.0]);
    }

    #[test]
    fn test_bbox_scenario() {
        let bbox = Bbox::new(0.0, 4.0, 4.0, 8.0).with_label(2);
        assert_eq!(bbox.get_bbox().unwrap().as_xywh(), [0.0, 4.0, 4.0, 8.0]);
        assert_eq!(bbox.get_area(), 32.0);
        assert_eq!(
            bbox.as_polygon(),
            vec![0.0, 4.0, 4.0, 4.0, 4.0, 12.0, 0.0, 12.0]
        );
        assert_eq!(bbox.label, Some(2));
    }

    #[test]
    fn test_bbox_iou() {
        let a = Bbox::new(0.0, 0.0, 10.0, 10.0);
        let b = Bbox::new(5.0, 5.0, 10.0, 10.0);
        assert_close(a.iou(&b), 25.0 / 175.0, 1e-12);

        let degenerate = Bbox::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(degenerate.iou(&Bbox::new(5.0, 5.0, 0.0, 0.0)), -1.0);
    }

    #[test]
    fn test_rotated_bbox_polygon() {
        let rotated = RotatedBbox::new(2.0, 2.0, 2.0, 2.0, 45.0);
        let polygon = rotated.as_polygon();
        let expected = [
            2.0,
            2.0 - std::f64::consts::SQRT_2,
            2.0 + std::f64::consts::SQRT_2,
            2.0,
            2.0,
            2.0 + std::f64::consts::SQRT_2,
            2.0 - std::f64::consts::SQRT_2,
            2.0,
        ];
        for (actual, expected) in polygon.iter().zip(expected) {
            assert_close(*actual, expected, 1e-9);
        }
    }

    #[test]
    fn test_rotated_bbox_rectangle_roundtrip() {
        let original = RotatedBbox::new(10.0, 5.0, 8.0, 4.0, 30.0);
        let corners: Vec<(f64, f64)> = original
            .as_polygon()
            .chunks_exact(2)
            .map(|p| (p[0], p[1]))
            .collect();

        let rebuilt = RotatedBbox::from_rectangle(&corners).unwrap();
        // Corner coordinates are quantized to 2 decimals, so the recovered
        // parameters can drift by a few hundredths.
        for (actual, expected) in rebuilt
            .get_rotated_bbox()
            .into_iter()
            .zip(original.get_rotated_bbox())
        {
            assert_close(actual, expected, 0.05);
        }
    }

    #[test]
    fn test_rotated_bbox_rejects_bad_corner_count() {
        let err = RotatedBbox::from_rectangle(&[(0.0, 0.0), (1.0, 0.0)]).unwrap_err();
        assert!(matches!(
            err,
            LabelkitError::InvalidRectangle { corners: 2 }
        ));
    }

    #[test]
    fn test_ellipse_scenario() {
        let ellipse = Ellipse::new(0.0, 0.0, 4.0, 2.0);
        assert_close(ellipse.get_area(), std::f64::consts::PI * 2.0, 1e-9);
        assert_eq!(ellipse.get_bbox().unwrap().as_xywh(), [0.0, 0.0, 4.0, 2.0]);

        let sampled = ellipse.sample_points(4);
        assert_eq!(sampled.len(), 4);
        // Endpoint included: the sweep starts and ends at the same vertex.
        assert_close(sampled[0].0, 4.0, 1e-9);
        assert_close(sampled[0].1, 1.0, 1e-9);
        assert_close(sampled[3].0, sampled[0].0, 1e-9);
        assert_close(sampled[3].1, sampled[0].1, 1e-9);
    }

    #[test]
    fn test_polygon_requires_three_points() {
        assert!(Polygon::new(vec![0.0, 0.0, 1.0, 0.0]).is_err());
        assert!(Polygon::new(vec![0.0, 0.0, 1.0, 0.0, 1.0]).is_err());
        assert!(Polygon::new(vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0]).is_ok());
    }

    #[test]
    fn test_polygon_area_is_raster_based() {
        let polygon =
            Polygon::new(vec![0.0, 4.0, 4.0, 4.0, 4.0, 12.0, 0.0, 12.0]).unwrap();
        assert_eq!(polygon.get_area(), 32.0);
    }

    #[test]
    fn test_polygon_equality_ignores_vertex_order() {
        let forward = Polygon::new(vec![0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0]).unwrap();
        let reversed = Polygon::new(vec![0.0, 4.0, 4.0, 4.0, 4.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(forward, forward.clone());
        assert_eq!(forward, reversed);

        let shifted = Polygon::new(vec![1.0, 0.0, 5.0, 0.0, 5.0, 4.0, 1.0, 4.0]).unwrap();
        assert_ne!(forward, shifted);
    }

    #[test]
    fn test_polygon_equality_respects_metadata() {
        let plain = Polygon::new(vec![0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0]).unwrap();
        let labeled = plain.clone().with_label(3);
        assert_ne!(plain, labeled);
    }

    #[test]
    fn test_invalid_polygon_falls_back_to_point_equality() {
        // Degenerate ring: zero area, so the geometric path is skipped.
        let a = Polygon::new(vec![0.0, 0.0, 2.0, 0.0, 4.0, 0.0]).unwrap();
        let b = Polygon::new(vec![4.0, 0.0, 2.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_points_bbox_skips_absent() {
        let keypoints = Points::new(vec![1.0, 2.0, 8.0, 9.0, 3.0, 4.0])
            .with_visibility(vec![
                Visibility::Visible,
                Visibility::Absent,
                Visibility::Hidden,
            ])
            .unwrap();
        assert_eq!(keypoints.get_bbox().unwrap().as_xywh(), [1.0, 2.0, 2.0, 2.0]);
        assert_eq!(keypoints.get_area(), 0.0);
    }

    #[test]
    fn test_points_all_absent_bbox_is_zero() {
        let keypoints = Points::new(vec![5.0, 6.0])
            .with_visibility(vec![Visibility::Absent])
            .unwrap();
        assert_eq!(keypoints.get_bbox().unwrap().as_xywh(), [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_points_visibility_mismatch() {
        let err = Points::new(vec![1.0, 2.0, 3.0, 4.0])
            .with_visibility(vec![Visibility::Visible])
            .unwrap_err();
        assert!(matches!(
            err,
            LabelkitError::VisibilityMismatch {
                visibility: 1,
                points: 2
            }
        ));
    }

    #[test]
    fn test_polyline_geometry() {
        let line = PolyLine::new(vec![0.0, 0.0, 4.0, 0.0, 4.0, 3.0]);
        assert_eq!(line.get_area(), 0.0);
        assert_eq!(line.as_polygon(), line.points);
        assert_eq!(line.get_bbox().unwrap().as_xywh(), [0.0, 0.0, 4.0, 3.0]);

        let empty = PolyLine::new(Vec::new());
        assert!(empty.get_bbox().is_none());
    }

    #[test]
    fn test_metadata_builders() {
        let bbox = Bbox::new(0.0, 0.0, 1.0, 1.0)
            .with_id(5)
            .with_group(2)
            .with_object_id(9)
            .with_attribute("occluded", false);
        assert_eq!(bbox.meta().id, 5);
        assert_eq!(bbox.meta().group, 2);
        assert_eq!(bbox.meta().object_id, Some(9));
        assert_eq!(
            bbox.meta().attributes.get("occluded"),
            Some(&crate::model::AttrValue::Bool(false))
        );
    }
}
