//! The mask registry: a colormap for segmentation classes.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::raster;

/// An (r, g, b) color triple.
pub type RgbColor = (u8, u8, u8);

/// The {class index -> color} mapping for segmentation masks.
pub type Colormap = BTreeMap<u32, RgbColor>;

/// Describes the color map used to paint segmentation masks.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MaskCategories {
    /// Annotation-type attribute names declared dataset-wide. Metadata
    /// only: not part of registry equality.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub attributes: BTreeSet<String>,
    pub colormap: Colormap,
    #[serde(skip)]
    inverse: OnceCell<BTreeMap<RgbColor, u32>>,
}

impl MaskCategories {
    /// Wraps an explicit colormap.
    pub fn new(colormap: Colormap) -> Self {
        Self {
            attributes: BTreeSet::new(),
            colormap,
            inverse: OnceCell::new(),
        }
    }

    /// Generates a registry with the deterministic default palette.
    ///
    /// With `include_background` the map holds `size + 1` entries and
    /// index 0 is black, the conventional background color.
    pub fn generate(size: usize, include_background: bool) -> Self {
        Self::new(raster::generate_colormap(size, include_background))
    }

    /// The {color -> class index} reverse lookup.
    ///
    /// Computed once per instance on first use and only invalidated by
    /// rebuilding the registry.
    pub fn inverse_colormap(&self) -> &BTreeMap<RgbColor, u32> {
        self.inverse
            .get_or_init(|| raster::invert_colormap(&self.colormap))
    }

    /// Returns the color of a class index.
    pub fn get(&self, index: u32) -> Option<RgbColor> {
        self.colormap.get(&index).copied()
    }

    /// True when the class index has a color.
    pub fn contains(&self, index: u32) -> bool {
        self.colormap.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.colormap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colormap.is_empty()
    }
}

impl PartialEq for MaskCategories {
    /// Colormaps compare entry-by-entry with exact color matches; the
    /// memoized reverse lookup and the dataset-wide attribute names are
    /// not part of the comparison.
    fn eq(&self, other: &Self) -> bool {
        self.colormap == other.colormap
    }
}
