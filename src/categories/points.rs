//! The keypoint registry: point names and skeleton joints per label.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Keypoint metadata of one label: point names and the skeleton edges
/// connecting them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsCategory {
    /// Names for the individual points, e.g. "eye" or "nose". These are
    /// not required to exist in the label registry.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Unordered pairs of connected point indices.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub joints: BTreeSet<(u32, u32)>,
}

/// Describes keypoint skeletons, keyed by label id.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PointsCategories {
    /// Annotation-type attribute names declared dataset-wide. Metadata
    /// only: not part of registry equality.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub attributes: BTreeSet<String>,
    pub items: BTreeMap<u32, PointsCategory>,
}

impl PointsCategories {
    /// Builds a registry from `(label id, point names)` or
    /// `(label id, point names, joints)` entries.
    pub fn from_iterable<I>(iterable: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SkeletonEntry>,
    {
        let mut categories = Self::default();
        for entry in iterable {
            let entry = entry.into();
            categories.add(entry.label_id, entry.labels, entry.joints);
        }
        categories
    }

    /// Registers the skeleton of a label, replacing any previous entry.
    ///
    /// Joints are de-duplicated as unordered index pairs: (1, 2) and
    /// (2, 1) are the same edge.
    pub fn add(
        &mut self,
        label_id: u32,
        labels: impl IntoIterator<Item = impl Into<String>>,
        joints: impl IntoIterator<Item = (u32, u32)>,
    ) {
        let category = PointsCategory {
            labels: labels.into_iter().map(Into::into).collect(),
            joints: joints.into_iter().map(normalize_joint).collect(),
        };
        self.items.insert(label_id, category);
    }

    /// Returns the skeleton of a label id.
    pub fn get(&self, label_id: u32) -> Option<&PointsCategory> {
        self.items.get(&label_id)
    }

    /// True when the label id has a skeleton.
    pub fn contains(&self, label_id: u32) -> bool {
        self.items.contains_key(&label_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl PartialEq for PointsCategories {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

/// One [`PointsCategories::from_iterable`] entry, convertible from bare
/// tuples.
pub struct SkeletonEntry {
    pub label_id: u32,
    pub labels: Vec<String>,
    pub joints: Vec<(u32, u32)>,
}

impl From<(u32, Vec<&str>)> for SkeletonEntry {
    fn from((label_id, labels): (u32, Vec<&str>)) -> Self {
        Self {
            label_id,
            labels: labels.into_iter().map(str::to_owned).collect(),
            joints: Vec::new(),
        }
    }
}

impl From<(u32, Vec<&str>, Vec<(u32, u32)>)> for SkeletonEntry {
    fn from((label_id, labels, joints): (u32, Vec<&str>, Vec<(u32, u32)>)) -> Self {
        Self {
            label_id,
            labels: labels.into_iter().map(str::to_owned).collect(),
            joints,
        }
    }
}

fn normalize_joint((a, b): (u32, u32)) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
