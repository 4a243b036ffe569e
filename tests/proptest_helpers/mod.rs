#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Tolerance for values reconstructed from 2-decimal rounded coordinates.
/// Two independently rounded endpoints can each drift 0.005; the margin
/// sits above their sum to stay clear of float noise.
pub const EPS_ROUNDING: f64 = 0.015;

/// Tolerance for lengths and centers recovered through trigonometry from
/// rounded corners.
pub const EPS_RECONSTRUCTED: f64 = 0.05;

/// Tolerance for angles recovered from rounded corners; edges are kept
/// long enough that corner quantization stays well under this.
pub const EPS_DEGREES: f64 = 0.5;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// An (x, y, w, h) box with strictly positive dimensions.
pub fn arb_box_xywh() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (0.0..500.0f64, 0.0..500.0f64, 0.5..200.0f64, 0.5..200.0f64)
}

/// A (cx, cy, w, h, r) rotated box. Dimensions stay away from zero so
/// the angle recovered from rounded corners is stable.
pub fn arb_rotated_box() -> impl Strategy<Value = (f64, f64, f64, f64, f64)> {
    (
        50.0..450.0f64,
        50.0..450.0f64,
        5.0..100.0f64,
        5.0..100.0f64,
        -179.0..179.0f64,
    )
}

/// A non-degenerate triangle ring as a flat coordinate list.
pub fn arb_triangle() -> impl Strategy<Value = Vec<f64>> {
    (
        0.0..100.0f64,
        0.0..100.0f64,
        0.0..100.0f64,
        0.0..100.0f64,
        0.0..100.0f64,
        0.0..100.0f64,
    )
        .prop_filter(
            "triangle must not be degenerate",
            |&(ax, ay, bx, by, cx, cy)| {
                let doubled_area = (bx - ax) * (cy - ay) - (by - ay) * (cx - ax);
                doubled_area.abs() > 2.0
            },
        )
        .prop_filter(
            "triangle must stay a valid ring after coordinate rounding",
            |&(ax, ay, bx, by, cx, cy)| {
                let r = labelkit::geometry::round_coord;
                let ring = [(r(ax), r(ay)), (r(bx), r(by)), (r(cx), r(cy))];
                labelkit::geometry::is_valid_polygon(&ring)
            },
        )
        .prop_map(|(ax, ay, bx, by, cx, cy)| vec![ax, ay, bx, by, cx, cy])
}

/// Reverses the vertex order of a flat ring, keeping (x, y) pairs intact.
pub fn reverse_ring(points: &[f64]) -> Vec<f64> {
    let mut reversed: Vec<f64> = Vec::with_capacity(points.len());
    for pair in points.chunks_exact(2).rev() {
        reversed.extend_from_slice(pair);
    }
    reversed
}
