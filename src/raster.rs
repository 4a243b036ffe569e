//! Raster utilities backing the mask engine and polygon areas.
//!
//! Binary masks are `ndarray` rasters in row-major (row, column) layout.
//! Index masks hold class or instance ids per pixel, with 0 reserved for
//! background throughout the crate.

use ndarray::{Array2, Array3};

use crate::categories::{Colormap, RgbColor};
use crate::geometry::Bounds;

/// A 2-D single-instance binary mask.
pub type BinaryMask = Array2<bool>;

/// A 2-D raster of class or instance indices; 0 is background.
pub type IndexMask = Array2<u32>;

/// Maps a binary mask to an index mask: covered pixels take `index`,
/// the rest take `ignore_index`.
pub fn make_index_mask(mask: &BinaryMask, index: u32, ignore_index: u32) -> IndexMask {
    mask.mapv(|covered| if covered { index } else { ignore_index })
}

/// Computes the tight bounding box of the covered pixels.
///
/// Width and height are max-minus-min of the covered pixel coordinates,
/// matching the shape-layer convention. Returns `None` for an all-false
/// mask.
pub fn find_mask_bbox(mask: &BinaryMask) -> Option<Bounds> {
    let mut extremes: Option<(usize, usize, usize, usize)> = None;
    for ((row, col), &covered) in mask.indexed_iter() {
        if !covered {
            continue;
        }
        extremes = Some(match extremes {
            None => (col, row, col, row),
            Some((x0, y0, x1, y1)) => (x0.min(col), y0.min(row), x1.max(col), y1.max(row)),
        });
    }
    extremes.map(|(x0, y0, x1, y1)| {
        Bounds::from_extremes(x0 as f64, y0 as f64, x1 as f64, y1 as f64)
    })
}

/// Scan-converts a polygon onto a `height` x `width` grid anchored at the
/// origin, using even-odd filling sampled at pixel centers.
///
/// Coordinates left of x=0 or above y=0 fall outside the grid and are
/// clipped, like the RLE-based rasterizer this mirrors.
pub fn rasterize_polygon(points: &[f64], width: usize, height: usize) -> BinaryMask {
    debug_assert!(points.len() % 2 == 0, "flat point list must pair up");

    let vertices: Vec<(f64, f64)> = points
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect();

    let mut mask = Array2::from_elem((height, width), false);
    if vertices.len() < 3 {
        return mask;
    }

    let mut crossings: Vec<f64> = Vec::with_capacity(vertices.len());
    for row in 0..height {
        let yc = row as f64 + 0.5;

        crossings.clear();
        for i in 0..vertices.len() {
            let (x0, y0) = vertices[i];
            let (x1, y1) = vertices[(i + 1) % vertices.len()];
            // Half-open edge span so shared vertices count once.
            if (y0 <= yc && yc < y1) || (y1 <= yc && yc < y0) {
                crossings.push(x0 + (yc - y0) * (x1 - x0) / (y1 - y0));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            let (enter, exit) = (span[0], span[1]);
            let first = (enter - 0.5).ceil().max(0.0) as usize;
            for col in first..width {
                let xc = col as f64 + 0.5;
                if xc >= exit {
                    break;
                }
                mask[(row, col)] = true;
            }
        }
    }
    mask
}

/// Pixel-count area of a polygon, rasterized over its own bounding-box
/// extent.
///
/// This is deliberately NOT the analytic shoelace area: mask areas are
/// pixel counts, and polygon areas stay on the same footing so the two are
/// comparable downstream.
pub fn polygon_raster_area(points: &[f64]) -> f64 {
    let Some(bounds) = Bounds::of_points(points.chunks_exact(2).map(|p| (p[0], p[1]))) else {
        return 0.0;
    };
    let width = bounds.x1().ceil().max(0.0) as usize;
    let height = bounds.y1().ceil().max(0.0) as usize;
    if width == 0 || height == 0 {
        return 0.0;
    }
    let mask = rasterize_polygon(points, width, height);
    mask.iter().filter(|&&covered| covered).count() as f64
}

/// Tests whether polygon `a`'s filled region is covered by polygon `b`'s
/// on the pixel grid spanning both extents.
///
/// This is the raster rendition of "area(a) equals area(a intersect b)":
/// with both regions quantized to the shared grid, coverage holds exactly
/// when no filled pixel of `a` is missing from `b`.
pub fn polygon_region_covered(a: &[f64], b: &[f64]) -> bool {
    let extent = |points: &[f64]| {
        Bounds::of_points(points.chunks_exact(2).map(|p| (p[0], p[1])))
            .map(|bounds| (bounds.x1().ceil().max(0.0), bounds.y1().ceil().max(0.0)))
            .unwrap_or((0.0, 0.0))
    };
    let (aw, ah) = extent(a);
    let (bw, bh) = extent(b);
    let width = aw.max(bw) as usize;
    let height = ah.max(bh) as usize;
    if width == 0 || height == 0 {
        return true;
    }

    let mask_a = rasterize_polygon(a, width, height);
    let mask_b = rasterize_polygon(b, width, height);
    mask_a
        .iter()
        .zip(mask_b.iter())
        .all(|(&in_a, &in_b)| !in_a || in_b)
}

/// Produces the deterministic default colormap.
///
/// Colors follow the VOC bit-shuffle palette. With `include_background`
/// the map covers ids `0..=size` with id 0 black; without it the map
/// covers ids `0..size` with the palette shifted past black.
pub fn generate_colormap(size: usize, include_background: bool) -> Colormap {
    if include_background {
        (0..=size as u32).map(|id| (id, palette_color(id))).collect()
    } else {
        (0..size as u32).map(|id| (id, palette_color(id + 1))).collect()
    }
}

/// Builds the color -> id reverse lookup. Duplicate colors resolve to the
/// highest id, matching plain map construction order.
pub fn invert_colormap(colormap: &Colormap) -> std::collections::BTreeMap<RgbColor, u32> {
    colormap.iter().map(|(&id, &color)| (color, id)).collect()
}

/// Applies a colormap to an index mask, producing an RGB raster of shape
/// (height, width, 3). Ids missing from the map paint black.
pub fn paint_mask(mask: &IndexMask, colormap: &Colormap) -> Array3<u8> {
    let (height, width) = mask.dim();
    let mut painted = Array3::zeros((height, width, 3));
    for ((row, col), &id) in mask.indexed_iter() {
        let (r, g, b) = colormap.get(&id).copied().unwrap_or((0, 0, 0));
        painted[(row, col, 0)] = r;
        painted[(row, col, 1)] = g;
        painted[(row, col, 2)] = b;
    }
    painted
}

/// VOC-style palette: spreads the three low bit-planes of the id across
/// the high bits of the color channels.
fn palette_color(mut id: u32) -> RgbColor {
    let (mut r, mut g, mut b) = (0u8, 0u8, 0u8);
    for shift in (0..8).rev() {
        r |= ((id & 1) as u8) << shift;
        g |= (((id >> 1) & 1) as u8) << shift;
        b |= (((id >> 2) & 1) as u8) << shift;
        id >>= 3;
    }
    (r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_make_index_mask() {
        let mask = array![[true, false], [false, true]];
        let index = make_index_mask(&mask, 7, 0);
        assert_eq!(index, array![[7u32, 0], [0, 7]]);

        let ignored = make_index_mask(&mask, 2, 9);
        assert_eq!(ignored, array![[2u32, 9], [9, 2]]);
    }

    #[test]
    fn test_find_mask_bbox() {
        let mask = array![
            [false, false, false, false],
            [false, true, true, false],
            [false, true, false, false],
        ];
        let bounds = find_mask_bbox(&mask).unwrap();
        assert_eq!(bounds.as_xywh(), [1.0, 1.0, 1.0, 1.0]);

        let empty = Array2::from_elem((3, 3), false);
        assert!(find_mask_bbox(&empty).is_none());
    }

    #[test]
    fn test_rasterize_rectangle() {
        // Rectangle x in [0, 4), y in [4, 12): 4 x 8 pixels.
        let points = [0.0, 4.0, 4.0, 4.0, 4.0, 12.0, 0.0, 12.0];
        let mask = rasterize_polygon(&points, 4, 12);
        assert_eq!(mask.iter().filter(|&&p| p).count(), 32);
        assert!(!mask[(3, 0)]);
        assert!(mask[(4, 0)]);
        assert!(mask[(11, 3)]);
    }

    #[test]
    fn test_polygon_raster_area_matches_box() {
        let points = [0.0, 4.0, 4.0, 4.0, 4.0, 12.0, 0.0, 12.0];
        assert_eq!(polygon_raster_area(&points), 32.0);
    }

    #[test]
    fn test_polygon_raster_area_triangle() {
        // Right triangle with legs 8 and 8 fills about half of its box.
        let points = [0.0, 0.0, 8.0, 0.0, 0.0, 8.0];
        let area = polygon_raster_area(&points);
        assert!((20.0..=40.0).contains(&area), "area was {area}");
    }

    #[test]
    fn test_polygon_region_covered() {
        let square = [0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0];
        let reversed = [0.0, 4.0, 4.0, 4.0, 4.0, 0.0, 0.0, 0.0];
        let shifted = [2.0, 0.0, 6.0, 0.0, 6.0, 4.0, 2.0, 4.0];

        assert!(polygon_region_covered(&square, &reversed));
        assert!(!polygon_region_covered(&square, &shifted));
    }

    #[test]
    fn test_generate_colormap_sizes() {
        let with_bg = generate_colormap(255, true);
        assert_eq!(with_bg.len(), 256);
        assert_eq!(with_bg[&0], (0, 0, 0));
        assert_eq!(with_bg[&1], (128, 0, 0));

        let without_bg = generate_colormap(3, false);
        assert_eq!(without_bg.len(), 3);
        assert_eq!(without_bg[&0], (128, 0, 0));
    }

    #[test]
    fn test_invert_colormap() {
        let colormap = generate_colormap(3, true);
        let inverse = invert_colormap(&colormap);
        assert_eq!(inverse[&(0, 0, 0)], 0);
        assert_eq!(inverse[&(128, 0, 0)], 1);
    }

    #[test]
    fn test_paint_mask() {
        let mask = array![[0u32, 1], [1, 5]];
        let colormap = generate_colormap(1, true);
        let painted = paint_mask(&mask, &colormap);
        assert_eq!(painted.dim(), (2, 2, 3));
        assert_eq!(painted[(0, 0, 0)], 0);
        assert_eq!(painted[(0, 1, 0)], 128);
        // Id 5 is not in the map and paints black.
        assert_eq!(painted[(1, 1, 0)], 0);
    }
}
