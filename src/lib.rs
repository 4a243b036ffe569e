//! Labelkit: a typed annotation data model for multi-task datasets.
//!
//! Labelkit holds the in-memory shapes that dataset format converters
//! pass through each other: annotation variants for classification,
//! detection, segmentation, keypoints and tabular tasks, the registries
//! describing their categories, and the geometric/raster algorithms that
//! operate on them. Format readers, writers, dataset containers and CLIs
//! are external collaborators; they construct these values and query
//! them, and labelkit itself never touches the filesystem or network.
//!
//! # Modules
//!
//! - [`model`]: annotation variants (shapes, masks, labels, captions, ...)
//!   and their geometry
//! - [`categories`]: dataset-wide registries (labels, skeletons, colors,
//!   columns)
//! - [`geometry`]: bounding boxes, rounding and polygon analysis
//! - [`raster`]: index masks, polygon rasterization and colormaps
//! - [`error`]: error types for labelkit operations

pub mod categories;
pub mod error;
pub mod geometry;
pub mod model;
pub mod raster;

pub use error::LabelkitError;
