use proptest::prelude::*;

use labelkit::geometry::round_coord;
use labelkit::model::{Bbox, Ellipse, Polygon, RotatedBbox, Shape};

mod proptest_helpers;

use proptest_helpers::{
    arb_box_xywh, arb_rotated_box, arb_triangle, reverse_ring, EPS_DEGREES, EPS_RECONSTRUCTED,
    EPS_ROUNDING,
};

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn construction_rounding_is_deterministic(raw in prop::collection::vec(-1000.0..1000.0f64, 0..16)) {
        let padded = {
            // Keep pairs complete.
            let mut raw = raw;
            if raw.len() % 2 == 1 {
                raw.pop();
            }
            raw
        };

        let first = labelkit::model::PolyLine::new(padded.clone());
        let second = labelkit::model::PolyLine::new(padded.clone());

        prop_assert_eq!(&first.points, &second.points);
        let expected: Vec<f64> = padded.iter().map(|&v| round_coord(v)).collect();
        prop_assert_eq!(&first.points, &expected);
    }

    #[test]
    fn bbox_roundtrips_xywh((x, y, w, h) in arb_box_xywh()) {
        let bbox = Bbox::new(x, y, w, h);
        let bounds = bbox.get_bbox().unwrap();

        prop_assert!((bounds.x - x).abs() <= EPS_ROUNDING);
        prop_assert!((bounds.y - y).abs() <= EPS_ROUNDING);
        prop_assert!((bounds.w - w).abs() <= EPS_ROUNDING);
        prop_assert!((bounds.h - h).abs() <= EPS_ROUNDING);

        // Area agrees with the stored (rounded) dimensions exactly.
        prop_assert_eq!(bbox.get_area(), bbox.w() * bbox.h());
    }

    #[test]
    fn bbox_iou_is_symmetric_and_bounded(
        (ax, ay, aw, ah) in arb_box_xywh(),
        (bx, by, bw, bh) in arb_box_xywh(),
    ) {
        let a = Bbox::new(ax, ay, aw, ah);
        let b = Bbox::new(bx, by, bw, bh);

        let forward = a.iou(&b);
        let backward = b.iou(&a);
        prop_assert!((forward - backward).abs() < 1e-12);
        prop_assert!((0.0..=1.0).contains(&forward));

        // A box fully overlaps itself.
        prop_assert!((a.iou(&a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rotated_box_corner_roundtrip((cx, cy, w, h, r) in arb_rotated_box()) {
        let original = RotatedBbox::new(cx, cy, w, h, r);
        let corners: Vec<(f64, f64)> = original
            .as_polygon()
            .chunks_exact(2)
            .map(|p| (p[0], p[1]))
            .collect();
        let rebuilt = RotatedBbox::from_rectangle(&corners).unwrap();

        prop_assert!((rebuilt.cx() - original.cx()).abs() <= EPS_RECONSTRUCTED);
        prop_assert!((rebuilt.cy() - original.cy()).abs() <= EPS_RECONSTRUCTED);
        prop_assert!((rebuilt.w() - original.w()).abs() <= EPS_RECONSTRUCTED);
        prop_assert!((rebuilt.h() - original.h()).abs() <= EPS_RECONSTRUCTED);

        let angle_delta = (rebuilt.r() - original.r()).abs() % 360.0;
        let angle_delta = angle_delta.min(360.0 - angle_delta);
        prop_assert!(angle_delta <= EPS_DEGREES, "angle drifted by {}", angle_delta);
    }

    #[test]
    fn polygon_equality_is_reflexive_and_order_free(ring in arb_triangle()) {
        let polygon = Polygon::new(ring.clone()).unwrap();
        prop_assert_eq!(&polygon, &polygon.clone());

        let reversed = Polygon::new(reverse_ring(&ring)).unwrap();
        prop_assert_eq!(&polygon, &reversed);
    }

    #[test]
    fn polygon_area_never_exceeds_bbox(ring in arb_triangle()) {
        let polygon = Polygon::new(ring).unwrap();
        let bounds = polygon.get_bbox().unwrap();
        // Pixel counting can spill at most one row/column past the float box.
        let ceiling = (bounds.w + 1.0) * (bounds.h + 1.0);
        prop_assert!(polygon.get_area() <= ceiling);
    }

    #[test]
    fn ellipse_polygonization_sticks_to_its_box(
        (x, y, w, h) in arb_box_xywh(),
        vertices in 2usize..64,
    ) {
        let ellipse = Ellipse::new(x, y, x + w, y + h);
        let sampled = ellipse.sample_polygon(vertices);
        prop_assert_eq!(sampled.len(), vertices * 2);

        let bounds = ellipse.get_bbox().unwrap();
        for pair in sampled.chunks_exact(2) {
            prop_assert!(pair[0] >= bounds.x - 1e-9 && pair[0] <= bounds.x1() + 1e-9);
            prop_assert!(pair[1] >= bounds.y - 1e-9 && pair[1] <= bounds.y1() + 1e-9);
        }
    }
}
