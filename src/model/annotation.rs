//! The annotation tagged union and its non-geometric variants.

use ndarray::{Array1, ArrayD};
use serde::{Deserialize, Serialize};

use crate::categories::TableValue;
use crate::error::{LabelkitError, HASH_KEY_SIZE};
use crate::geometry::round_coord;
use crate::model::mask::Mask;
use crate::model::meta::{impl_annotation_meta, AnnotationMeta};
use crate::model::shape::{Bbox, Ellipse, Points, PolyLine, Polygon, RotatedBbox, Shape};
use std::collections::BTreeMap;

/// A raster embedded directly in an annotation, e.g. a depth map or a
/// high-resolution target image.
pub type ImageBuffer = ArrayD<f32>;

/// The variant tag of an annotation. Fixed per variant, never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Label,
    Mask,
    Points,
    Polygon,
    #[serde(rename = "polyline")]
    PolyLine,
    Bbox,
    Caption,
    #[serde(rename = "cuboid_3d")]
    Cuboid3d,
    SuperResolutionAnnotation,
    DepthAnnotation,
    Ellipse,
    HashKey,
    FeatureVector,
    Tabular,
    RotatedBbox,
}

impl std::fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AnnotationKind::Label => "label",
            AnnotationKind::Mask => "mask",
            AnnotationKind::Points => "points",
            AnnotationKind::Polygon => "polygon",
            AnnotationKind::PolyLine => "polyline",
            AnnotationKind::Bbox => "bbox",
            AnnotationKind::Caption => "caption",
            AnnotationKind::Cuboid3d => "cuboid_3d",
            AnnotationKind::SuperResolutionAnnotation => "super_resolution_annotation",
            AnnotationKind::DepthAnnotation => "depth_annotation",
            AnnotationKind::Ellipse => "ellipse",
            AnnotationKind::HashKey => "hash_key",
            AnnotationKind::FeatureVector => "feature_vector",
            AnnotationKind::Tabular => "tabular",
            AnnotationKind::RotatedBbox => "rotated_bbox",
        };
        f.write_str(name)
    }
}

/// A whole-item category assignment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Label {
    #[serde(flatten)]
    pub meta: AnnotationMeta,
    pub label: u32,
}

impl Label {
    /// Creates a label annotation for a category index.
    pub fn new(label: u32) -> Self {
        Self {
            meta: AnnotationMeta::default(),
            label,
        }
    }
}

/// Arbitrary text attached to an item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    #[serde(flatten)]
    pub meta: AnnotationMeta,
    pub caption: String,
}

impl Caption {
    /// Creates a caption annotation.
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            meta: AnnotationMeta::default(),
            caption: caption.into(),
        }
    }
}

/// A 3-D box as position, rotation and scale triples, each rounded to
/// two decimal digits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cuboid3d {
    #[serde(flatten)]
    pub meta: AnnotationMeta,
    /// position(3) + rotation(3) + scale(3).
    pub points: [f64; 9],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<u32>,
}

impl Cuboid3d {
    /// Creates a cuboid at a position with identity rotation and scale.
    pub fn new(position: [f64; 3]) -> Self {
        let mut points = [0.0; 9];
        points[6..9].copy_from_slice(&[1.0, 1.0, 1.0]);
        let mut cuboid = Self {
            meta: AnnotationMeta::default(),
            points,
            label: None,
        };
        cuboid.write_triple(0, position);
        cuboid
    }

    /// Sets the rotation triple.
    pub fn with_rotation(mut self, rotation: [f64; 3]) -> Self {
        self.write_triple(3, rotation);
        self
    }

    /// Sets the scale triple.
    pub fn with_scale(mut self, scale: [f64; 3]) -> Self {
        self.write_triple(6, scale);
        self
    }

    /// Sets the category index.
    pub fn with_label(mut self, label: u32) -> Self {
        self.label = Some(label);
        self
    }

    /// `[x, y, z]`
    pub fn position(&self) -> [f64; 3] {
        self.read_triple(0)
    }

    /// `[rx, ry, rz]`
    pub fn rotation(&self) -> [f64; 3] {
        self.read_triple(3)
    }

    /// `[sx, sy, sz]`
    pub fn scale(&self) -> [f64; 3] {
        self.read_triple(6)
    }

    fn write_triple(&mut self, offset: usize, values: [f64; 3]) {
        for (slot, value) in self.points[offset..offset + 3].iter_mut().zip(values) {
            *slot = round_coord(value);
        }
    }

    fn read_triple(&self, offset: usize) -> [f64; 3] {
        [
            self.points[offset],
            self.points[offset + 1],
            self.points[offset + 2],
        ]
    }
}

/// A fixed-width content hash of an item, used for deduplication and
/// similarity search.
#[derive(Clone, Debug, PartialEq)]
pub struct HashKey {
    pub meta: AnnotationMeta,
    pub hash: [u8; HASH_KEY_SIZE],
}

impl HashKey {
    /// Creates a hash key from exactly [`HASH_KEY_SIZE`] bytes.
    pub fn new(bytes: impl AsRef<[u8]>) -> Result<Self, LabelkitError> {
        let bytes = bytes.as_ref();
        let hash: [u8; HASH_KEY_SIZE] =
            bytes
                .try_into()
                .map_err(|_| LabelkitError::InvalidHashKey {
                    actual: bytes.len(),
                })?;
        Ok(Self {
            meta: AnnotationMeta::default(),
            hash,
        })
    }
}

/// An arbitrary-length numeric embedding of an item.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector {
    pub meta: AnnotationMeta,
    pub vector: Array1<f32>,
}

impl FeatureVector {
    /// Creates a feature vector annotation.
    pub fn new(vector: impl Into<Array1<f32>>) -> Self {
        Self {
            meta: AnnotationMeta::default(),
            vector: vector.into(),
        }
    }
}

/// A high-resolution counterpart image of an item.
#[derive(Clone, Debug, PartialEq)]
pub struct SuperResolutionAnnotation {
    pub meta: AnnotationMeta,
    pub image: ImageBuffer,
}

impl SuperResolutionAnnotation {
    pub fn new(image: ImageBuffer) -> Self {
        Self {
            meta: AnnotationMeta::default(),
            image,
        }
    }
}

/// A per-pixel depth image of an item.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthAnnotation {
    pub meta: AnnotationMeta,
    pub image: ImageBuffer,
}

impl DepthAnnotation {
    pub fn new(image: ImageBuffer) -> Self {
        Self {
            meta: AnnotationMeta::default(),
            image,
        }
    }
}

/// Values of the target columns of one tabular row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tabular {
    #[serde(flatten)]
    pub meta: AnnotationMeta,
    pub values: BTreeMap<String, TableValue>,
}

impl Tabular {
    /// Creates a tabular annotation from column values.
    pub fn new(values: impl IntoIterator<Item = (String, TableValue)>) -> Self {
        Self {
            meta: AnnotationMeta::default(),
            values: values.into_iter().collect(),
        }
    }
}

impl_annotation_meta!(
    Label,
    Caption,
    Cuboid3d,
    HashKey,
    FeatureVector,
    SuperResolutionAnnotation,
    DepthAnnotation,
    Tabular,
);

/// One labeled fact attached to a dataset item.
///
/// The closed set of variants a dataset can carry. Format adapters match
/// on this to dispatch their export logic; the
/// [`CompiledMask`](crate::model::CompiledMask) engine and the [`Shape`]
/// algorithms consume the payload types directly.
#[derive(Clone, Debug, PartialEq)]
pub enum Annotation {
    Label(Label),
    Mask(Mask),
    Points(Points),
    Polygon(Polygon),
    PolyLine(PolyLine),
    Bbox(Bbox),
    Caption(Caption),
    Cuboid3d(Cuboid3d),
    SuperResolution(SuperResolutionAnnotation),
    Depth(DepthAnnotation),
    Ellipse(Ellipse),
    HashKey(HashKey),
    FeatureVector(FeatureVector),
    Tabular(Tabular),
    RotatedBbox(RotatedBbox),
}

impl Annotation {
    /// The variant tag.
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Label(_) => AnnotationKind::Label,
            Annotation::Mask(_) => AnnotationKind::Mask,
            Annotation::Points(_) => AnnotationKind::Points,
            Annotation::Polygon(_) => AnnotationKind::Polygon,
            Annotation::PolyLine(_) => AnnotationKind::PolyLine,
            Annotation::Bbox(_) => AnnotationKind::Bbox,
            Annotation::Caption(_) => AnnotationKind::Caption,
            Annotation::Cuboid3d(_) => AnnotationKind::Cuboid3d,
            Annotation::SuperResolution(_) => AnnotationKind::SuperResolutionAnnotation,
            Annotation::Depth(_) => AnnotationKind::DepthAnnotation,
            Annotation::Ellipse(_) => AnnotationKind::Ellipse,
            Annotation::HashKey(_) => AnnotationKind::HashKey,
            Annotation::FeatureVector(_) => AnnotationKind::FeatureVector,
            Annotation::Tabular(_) => AnnotationKind::Tabular,
            Annotation::RotatedBbox(_) => AnnotationKind::RotatedBbox,
        }
    }

    /// The metadata shared by every variant.
    pub fn meta(&self) -> &AnnotationMeta {
        match self {
            Annotation::Label(a) => a.meta(),
            Annotation::Mask(a) => a.meta(),
            Annotation::Points(a) => a.meta(),
            Annotation::Polygon(a) => a.meta(),
            Annotation::PolyLine(a) => a.meta(),
            Annotation::Bbox(a) => a.meta(),
            Annotation::Caption(a) => a.meta(),
            Annotation::Cuboid3d(a) => a.meta(),
            Annotation::SuperResolution(a) => a.meta(),
            Annotation::Depth(a) => a.meta(),
            Annotation::Ellipse(a) => a.meta(),
            Annotation::HashKey(a) => a.meta(),
            Annotation::FeatureVector(a) => a.meta(),
            Annotation::Tabular(a) => a.meta(),
            Annotation::RotatedBbox(a) => a.meta(),
        }
    }

    /// The shape view, for the variants that have one.
    pub fn as_shape(&self) -> Option<&dyn Shape> {
        match self {
            Annotation::Points(s) => Some(s),
            Annotation::Polygon(s) => Some(s),
            Annotation::PolyLine(s) => Some(s),
            Annotation::Bbox(s) => Some(s),
            Annotation::Ellipse(s) => Some(s),
            Annotation::RotatedBbox(s) => Some(s),
            _ => None,
        }
    }
}

macro_rules! impl_from_variant {
    ($($payload:ty => $variant:ident),+ $(,)?) => {$(
        impl From<$payload> for Annotation {
            fn from(payload: $payload) -> Self {
                Annotation::$variant(payload)
            }
        }
    )+};
}

impl_from_variant!(
    Label => Label,
    Mask => Mask,
    Points => Points,
    Polygon => Polygon,
    PolyLine => PolyLine,
    Bbox => Bbox,
    Caption => Caption,
    Cuboid3d => Cuboid3d,
    SuperResolutionAnnotation => SuperResolution,
    DepthAnnotation => Depth,
    Ellipse => Ellipse,
    HashKey => HashKey,
    FeatureVector => FeatureVector,
    Tabular => Tabular,
    RotatedBbox => RotatedBbox,
);
