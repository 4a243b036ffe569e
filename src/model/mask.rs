//! Single-instance segmentation masks, raw or RLE-backed.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use ndarray::{Array2, Array3};

use crate::categories::Colormap;
use crate::geometry::Bounds;
use crate::model::meta::{impl_annotation_meta, AnnotationMeta};
use crate::model::shape::impl_layered_builders;
use crate::raster::{self, BinaryMask, IndexMask};

/// A value that is either held directly or produced on demand.
///
/// Producers run on every access and cache nothing; a caller that reads
/// the value repeatedly holds on to the result itself. Held values are
/// reference-counted, so cloning a deferred value never copies a raster.
pub enum Deferred<T> {
    Value(Arc<T>),
    Producer(Arc<dyn Fn() -> T + Send + Sync>),
}

impl<T> Deferred<T> {
    /// Wraps an already-materialized value.
    pub fn new(value: T) -> Self {
        Deferred::Value(Arc::new(value))
    }

    /// Wraps a producer invoked on each access.
    pub fn producer(produce: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Deferred::Producer(Arc::new(produce))
    }

    /// Returns the value, invoking the producer if there is one.
    pub fn get(&self) -> Cow<'_, T>
    where
        T: Clone,
    {
        match self {
            Deferred::Value(value) => Cow::Borrowed(value.as_ref()),
            Deferred::Producer(produce) => Cow::Owned(produce()),
        }
    }

    /// True when the value is produced on demand.
    pub fn is_lazy(&self) -> bool {
        matches!(self, Deferred::Producer(_))
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        match self {
            Deferred::Value(value) => Deferred::Value(Arc::clone(value)),
            Deferred::Producer(produce) => Deferred::Producer(Arc::clone(produce)),
        }
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deferred::Value(_) => f.write_str("Deferred::Value(..)"),
            Deferred::Producer(_) => f.write_str("Deferred::Producer(..)"),
        }
    }
}

impl<T> From<T> for Deferred<T> {
    fn from(value: T) -> Self {
        Deferred::new(value)
    }
}

/// A run-length encoded binary raster.
///
/// Runs are column-major and alternate background/foreground, starting
/// with a (possibly zero) background run, the layout used by COCO
/// uncompressed RLE.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rle {
    /// Raster dimensions as (height, width).
    pub size: (usize, usize),
    /// Alternating run lengths.
    pub counts: Vec<u32>,
}

impl Rle {
    /// Encodes a binary mask.
    pub fn encode(mask: &BinaryMask) -> Self {
        let (height, width) = mask.dim();
        let mut counts = Vec::new();
        let mut current = false;
        let mut run = 0u32;
        for col in 0..width {
            for row in 0..height {
                if mask[(row, col)] == current {
                    run += 1;
                } else {
                    counts.push(run);
                    current = !current;
                    run = 1;
                }
            }
        }
        counts.push(run);
        Self {
            size: (height, width),
            counts,
        }
    }

    /// Decodes into a binary mask.
    pub fn decode(&self) -> BinaryMask {
        let (height, width) = self.size;
        let mut mask = Array2::from_elem((height, width), false);
        let mut pos = 0usize;
        let mut value = false;
        for &count in &self.counts {
            if value {
                for p in pos..pos + count as usize {
                    mask[(p % height, p / height)] = true;
                }
            }
            pos += count as usize;
            value = !value;
        }
        mask
    }

    /// Covered-pixel count, straight off the run lengths.
    pub fn area(&self) -> usize {
        self.counts
            .iter()
            .skip(1)
            .step_by(2)
            .map(|&count| count as usize)
            .sum()
    }

    /// Tight bounding box of the covered pixels, without decoding.
    ///
    /// Uses the same max-minus-min width/height convention as
    /// [`raster::find_mask_bbox`]. Returns `None` when nothing is covered.
    pub fn bbox(&self) -> Option<Bounds> {
        let (height, _) = self.size;
        if height == 0 {
            return None;
        }

        let mut extremes: Option<(usize, usize, usize, usize)> = None;
        let mut pos = 0usize;
        let mut value = false;
        for &count in &self.counts {
            let count = count as usize;
            if value && count > 0 {
                let (start, end) = (pos, pos + count - 1);
                let (col0, row0) = (start / height, start % height);
                let (col1, row1) = (end / height, end % height);
                // A run crossing a column boundary spans full rows.
                let (rmin, rmax) = if col0 == col1 {
                    (row0, row1)
                } else {
                    (0, height - 1)
                };
                extremes = Some(match extremes {
                    None => (col0, rmin, col1, rmax),
                    Some((x0, y0, x1, y1)) => {
                        (x0.min(col0), y0.min(rmin), x1.max(col1), y1.max(rmax))
                    }
                });
            }
            pos += count;
            value = !value;
        }
        extremes.map(|(x0, y0, x1, y1)| {
            Bounds::from_extremes(x0 as f64, y0 as f64, x1 as f64, y1 as f64)
        })
    }
}

/// Where a mask's pixels come from.
#[derive(Clone, Debug)]
pub enum MaskSource {
    /// A binary raster, eager or produced on demand.
    Image(Deferred<BinaryMask>),
    /// A run-length encoding, decoded only when pixels are needed.
    Rle(Deferred<Rle>),
}

/// A 2-D single-instance binary segmentation mask.
///
/// An RLE-backed mask keeps its encoding and decodes on pixel access;
/// its area and bounding box come straight from the runs.
#[derive(Clone, Debug)]
pub struct Mask {
    pub meta: AnnotationMeta,
    source: MaskSource,
    pub label: Option<u32>,
    pub z_order: i32,
}

impl_annotation_meta!(Mask);
impl_layered_builders!(Mask);

impl Mask {
    /// Creates a mask from a binary raster or a raster producer.
    pub fn new(image: impl Into<Deferred<BinaryMask>>) -> Self {
        Self {
            meta: AnnotationMeta::default(),
            source: MaskSource::Image(image.into()),
            label: None,
            z_order: 0,
        }
    }

    /// Creates a mask from a run-length encoding or an encoding producer.
    pub fn from_rle(rle: impl Into<Deferred<Rle>>) -> Self {
        Self {
            meta: AnnotationMeta::default(),
            source: MaskSource::Rle(rle.into()),
            label: None,
            z_order: 0,
        }
    }

    /// The binary raster, decoding the RLE if that is the backing store.
    pub fn image(&self) -> Cow<'_, BinaryMask> {
        match &self.source {
            MaskSource::Image(image) => image.get(),
            MaskSource::Rle(rle) => Cow::Owned(rle.get().decode()),
        }
    }

    /// The run-length encoding, if this mask is RLE-backed.
    pub fn rle(&self) -> Option<Cow<'_, Rle>> {
        match &self.source {
            MaskSource::Image(_) => None,
            MaskSource::Rle(rle) => Some(rle.get()),
        }
    }

    /// True when pixels are stored run-length encoded.
    pub fn is_rle(&self) -> bool {
        matches!(self.source, MaskSource::Rle(_))
    }

    /// Produces a class index mask: covered pixels take `label_id` (the
    /// mask's own label when `None`, background 0 when neither is set),
    /// the rest take `ignore_index`.
    pub fn as_class_mask(&self, label_id: Option<u32>, ignore_index: u32) -> IndexMask {
        let index = label_id.or(self.label).unwrap_or(0);
        raster::make_index_mask(&self.image(), index, ignore_index)
    }

    /// Produces an instance index mask keyed by a caller-supplied id.
    pub fn as_instance_mask(&self, instance_id: u32, ignore_index: u32) -> IndexMask {
        raster::make_index_mask(&self.image(), instance_id, ignore_index)
    }

    /// Covered-pixel count; run-based for RLE masks.
    pub fn get_area(&self) -> usize {
        match &self.source {
            MaskSource::Image(image) => image.get().iter().filter(|&&covered| covered).count(),
            MaskSource::Rle(rle) => rle.get().area(),
        }
    }

    /// Tight bounding box of the covered pixels; run-based for RLE masks.
    pub fn get_bbox(&self) -> Option<Bounds> {
        match &self.source {
            MaskSource::Image(image) => raster::find_mask_bbox(&image.get()),
            MaskSource::Rle(rle) => rle.get().bbox(),
        }
    }

    /// Applies a colormap to the class mask, producing an RGB raster.
    pub fn paint(&self, colormap: &Colormap) -> Array3<u8> {
        raster::paint_mask(&self.as_class_mask(None, 0), colormap)
    }
}

impl PartialEq for Mask {
    /// Two RLE-backed masks compare by their encodings; any other pairing
    /// compares the decoded rasters.
    fn eq(&self, other: &Self) -> bool {
        if self.meta != other.meta || self.label != other.label || self.z_order != other.z_order {
            return false;
        }
        match (&self.source, &other.source) {
            (MaskSource::Rle(a), MaskSource::Rle(b)) => a.get() == b.get(),
            _ => *self.image() == *other.image(),
        }
    }
}
