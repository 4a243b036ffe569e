//! The annotation data model.
//!
//! This module defines the canonical, format-agnostic representation of
//! annotations for multi-task datasets. Format readers construct these
//! values from their own on-disk layouts, and writers render them back
//! out; the model is the interchange shape in between.
//!
//! # Design Principles
//!
//! 1. **One tagged union**: the closed [`Annotation`] enum discriminates
//!    the variant family; shared metadata lives in one embedded
//!    [`AnnotationMeta`] struct rather than an inheritance chain.
//!
//! 2. **Values, not objects**: annotations are immutable by convention.
//!    "Modifying" one means building an overridden copy with the `with_*`
//!    builders or struct update syntax; originals are never touched.
//!
//! 3. **Eager validation**: constructors that can receive malformed input
//!    (polygons, keypoint visibility, hash keys) validate up front and
//!    return `Result`; nothing silently coerces invalid geometry.
//!
//! # Example
//!
//! ```
//! use labelkit::model::{Annotation, Bbox, Shape};
//!
//! let bbox = Bbox::new(10.0, 20.0, 90.0, 60.0)
//!     .with_label(1)
//!     .with_attribute("occluded", false);
//! assert_eq!(bbox.get_area(), 5400.0);
//!
//! let annotation = Annotation::from(bbox);
//! assert_eq!(annotation.kind().to_string(), "bbox");
//! ```

mod annotation;
mod compiled;
mod mask;
mod meta;
mod shape;

pub use annotation::{
    Annotation, AnnotationKind, Caption, Cuboid3d, DepthAnnotation, FeatureVector, HashKey,
    ImageBuffer, Label, SuperResolutionAnnotation, Tabular,
};
pub use compiled::CompiledMask;
pub use mask::{Deferred, Mask, MaskSource, Rle};
pub use meta::{AnnotationMeta, AttrValue, NO_GROUP};
pub use shape::{
    Bbox, Ellipse, Points, PolyLine, Polygon, RotatedBbox, Shape, Visibility,
    DEFAULT_ELLIPSE_VERTICES,
};
