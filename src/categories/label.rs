//! The label registry: category names, hierarchy and label groups.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LabelkitError;

/// How the labels of a [`LabelGroup`] relate to each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    /// At most one label of the group may apply to an item.
    #[default]
    Exclusive,
    /// Any number of the group's labels may apply together.
    Inclusive,
    /// The group's labels are restricted from co-occurring with others.
    Restricted,
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GroupType::Exclusive => "exclusive",
            GroupType::Inclusive => "inclusive",
            GroupType::Restricted => "restricted",
        };
        f.write_str(name)
    }
}

impl FromStr for GroupType {
    type Err = LabelkitError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.to_ascii_lowercase().as_str() {
            "exclusive" => Ok(GroupType::Exclusive),
            "inclusive" => Ok(GroupType::Inclusive),
            "restricted" => Ok(GroupType::Restricted),
            other => Err(LabelkitError::UnknownGroupType(other.to_owned())),
        }
    }
}

/// One label category: a name, an optional parent name for hierarchies,
/// and the attribute names its annotations may carry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCategory {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub attributes: BTreeSet<String>,
}

impl LabelCategory {
    /// Creates a category with no parent and no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: String::new(),
            attributes: BTreeSet::new(),
        }
    }

    /// Sets the parent category name.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = parent.into();
        self
    }

    /// Sets the attribute names.
    pub fn with_attributes(
        mut self,
        attributes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }
}

impl From<&str> for LabelCategory {
    fn from(name: &str) -> Self {
        LabelCategory::new(name)
    }
}

impl From<String> for LabelCategory {
    fn from(name: String) -> Self {
        LabelCategory::new(name)
    }
}

impl From<(&str, &str)> for LabelCategory {
    fn from((name, parent): (&str, &str)) -> Self {
        LabelCategory::new(name).with_parent(parent)
    }
}

impl From<(&str, &str, Vec<&str>)> for LabelCategory {
    fn from((name, parent, attributes): (&str, &str, Vec<&str>)) -> Self {
        LabelCategory::new(name)
            .with_parent(parent)
            .with_attributes(attributes)
    }
}

/// A named cluster of label names with an exclusiveness tag.
///
/// Label names are not validated against the registry: groups may be
/// declared before their labels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelGroup {
    pub name: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub group_type: GroupType,
}

/// The ordered, name-indexed registry of label categories.
///
/// Names are unique; lookups go through an owned name-to-index map that
/// is rebuilt on bulk construction and updated on every `add`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "LabelCategoriesData")]
pub struct LabelCategories {
    /// Annotation-type attribute names declared dataset-wide. Metadata
    /// only: not part of registry equality.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub attributes: BTreeSet<String>,
    pub items: Vec<LabelCategory>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub label_groups: Vec<LabelGroup>,
    #[serde(skip)]
    indices: HashMap<String, usize>,
}

/// Serde shadow of [`LabelCategories`], used to rebuild the name index
/// after deserialization.
#[derive(Deserialize)]
struct LabelCategoriesData {
    #[serde(default)]
    attributes: BTreeSet<String>,
    #[serde(default)]
    items: Vec<LabelCategory>,
    #[serde(default)]
    label_groups: Vec<LabelGroup>,
}

impl From<LabelCategoriesData> for LabelCategories {
    fn from(data: LabelCategoriesData) -> Self {
        let mut categories = LabelCategories {
            attributes: data.attributes,
            items: data.items,
            label_groups: data.label_groups,
            indices: HashMap::new(),
        };
        categories.reindex();
        categories
    }
}

impl LabelCategories {
    /// Builds a registry from bare names or name tuples.
    ///
    /// Accepts anything convertible to a [`LabelCategory`]: `"name"`,
    /// `("name", "parent")` or `("name", "parent", vec!["attr"])`.
    pub fn from_iterable<I>(iterable: I) -> Result<Self, LabelkitError>
    where
        I: IntoIterator,
        I::Item: Into<LabelCategory>,
    {
        let mut categories = Self::default();
        for entry in iterable {
            categories.add_category(entry.into())?;
        }
        Ok(categories)
    }

    /// Appends a category by name and returns its index.
    ///
    /// Fails if the name is empty or already registered.
    pub fn add(&mut self, name: impl Into<String>) -> Result<usize, LabelkitError> {
        self.add_category(LabelCategory::new(name))
    }

    /// Appends a fully specified category and returns its index.
    pub fn add_category(&mut self, category: LabelCategory) -> Result<usize, LabelkitError> {
        if category.name.is_empty() {
            return Err(LabelkitError::EmptyName);
        }
        if self.indices.contains_key(&category.name) {
            return Err(LabelkitError::DuplicateName(category.name));
        }

        let index = self.items.len();
        self.indices.insert(category.name.clone(), index);
        self.items.push(category);
        Ok(index)
    }

    /// Records a named label group and returns its index.
    ///
    /// # Panics
    ///
    /// Panics on an empty group name; group names are a caller contract,
    /// not dataset input.
    pub fn add_label_group(
        &mut self,
        name: impl Into<String>,
        labels: impl IntoIterator<Item = impl Into<String>>,
        group_type: GroupType,
    ) -> usize {
        let name = name.into();
        assert!(!name.is_empty(), "label group name must not be empty");

        let index = self.label_groups.len();
        self.label_groups.push(LabelGroup {
            name,
            labels: labels.into_iter().map(Into::into).collect(),
            group_type,
        });
        index
    }

    /// Looks a category up by name.
    pub fn find(&self, name: &str) -> Option<(usize, &LabelCategory)> {
        self.indices
            .get(name)
            .map(|&index| (index, &self.items[index]))
    }

    /// Returns the category at an index.
    pub fn get(&self, index: usize) -> Option<&LabelCategory> {
        self.items.get(index)
    }

    /// True when a category with this name is registered.
    pub fn contains_name(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    /// True when the index refers to a registered category.
    pub fn contains_index(&self, index: usize) -> bool {
        index < self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabelCategory> {
        self.items.iter()
    }

    /// Rebuilds the name index from scratch.
    ///
    /// # Panics
    ///
    /// Panics on duplicate names: the item list was corrupted by direct
    /// mutation, which is an internal invariant breach.
    fn reindex(&mut self) {
        let mut indices = HashMap::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            let previous = indices.insert(item.name.clone(), index);
            assert!(previous.is_none(), "duplicate label name: {}", item.name);
        }
        self.indices = indices;
    }
}

impl PartialEq for LabelCategories {
    /// Registries are equal when their ordered items and label groups
    /// match; the dataset-wide attribute names and the derived index are
    /// not part of the comparison.
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items && self.label_groups == other.label_groups
    }
}

impl<'a> IntoIterator for &'a LabelCategories {
    type Item = &'a LabelCategory;
    type IntoIter = std::slice::Iter<'a, LabelCategory>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
