//! Dataset-wide category registries.
//!
//! Registries describe the universe of labels, keypoint skeletons, mask
//! colors and tabular columns that annotations refer to by index or name.
//! They are built once per dataset category set, then only queried.
//!
//! # Example
//!
//! ```
//! use labelkit::categories::LabelCategories;
//!
//! let labels = LabelCategories::from_iterable(["cat", "dog"]).unwrap();
//! let (index, category) = labels.find("dog").unwrap();
//! assert_eq!(index, 1);
//! assert_eq!(category.name, "dog");
//! assert!(labels.find("bird").is_none());
//! ```

mod label;
mod mask;
mod points;
mod tabular;

pub use label::{GroupType, LabelCategories, LabelCategory, LabelGroup};
pub use mask::{Colormap, MaskCategories, RgbColor};
pub use points::{PointsCategories, PointsCategory, SkeletonEntry};
pub use tabular::{ColumnDtype, TableValue, TabularCategories, TabularCategory};
