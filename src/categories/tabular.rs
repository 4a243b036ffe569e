//! The tabular registry: target column names, types and allowed values.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LabelkitError;

/// The scalar type of a tabular column.
///
/// A closed tag set in place of runtime type objects; equality of
/// categories compares this tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnDtype {
    Text,
    Integer,
    Real,
}

impl fmt::Display for ColumnDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnDtype::Text => "text",
            ColumnDtype::Integer => "integer",
            ColumnDtype::Real => "real",
        };
        f.write_str(name)
    }
}

/// One scalar cell value of a tabular annotation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableValue {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl TableValue {
    /// The column type this value belongs to.
    pub fn dtype(&self) -> ColumnDtype {
        match self {
            TableValue::Text(_) => ColumnDtype::Text,
            TableValue::Integer(_) => ColumnDtype::Integer,
            TableValue::Real(_) => ColumnDtype::Real,
        }
    }
}

impl From<&str> for TableValue {
    fn from(value: &str) -> Self {
        TableValue::Text(value.to_owned())
    }
}

impl From<String> for TableValue {
    fn from(value: String) -> Self {
        TableValue::Text(value)
    }
}

impl From<i64> for TableValue {
    fn from(value: i64) -> Self {
        TableValue::Integer(value)
    }
}

impl From<f64> for TableValue {
    fn from(value: f64) -> Self {
        TableValue::Real(value)
    }
}

/// One target column: a name, a scalar type, and optionally the label
/// values the column may take.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TabularCategory {
    pub name: String,
    pub dtype: ColumnDtype,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub labels: BTreeSet<String>,
}

impl TabularCategory {
    /// Creates a column with no allowed-value set.
    pub fn new(name: impl Into<String>, dtype: ColumnDtype) -> Self {
        Self {
            name: name.into(),
            dtype,
            labels: BTreeSet::new(),
        }
    }

    /// Sets the allowed label values.
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }
}

impl From<(&str, ColumnDtype)> for TabularCategory {
    fn from((name, dtype): (&str, ColumnDtype)) -> Self {
        TabularCategory::new(name, dtype)
    }
}

impl From<(&str, ColumnDtype, Vec<&str>)> for TabularCategory {
    fn from((name, dtype, labels): (&str, ColumnDtype, Vec<&str>)) -> Self {
        TabularCategory::new(name, dtype).with_labels(labels)
    }
}

/// The ordered, name-indexed registry of tabular target columns.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "TabularCategoriesData")]
pub struct TabularCategories {
    /// Annotation-type attribute names declared dataset-wide. Metadata
    /// only: not part of registry equality.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub attributes: BTreeSet<String>,
    pub items: Vec<TabularCategory>,
    #[serde(skip)]
    indices: HashMap<String, usize>,
}

/// Serde shadow of [`TabularCategories`], used to rebuild the name index
/// after deserialization.
#[derive(Deserialize)]
struct TabularCategoriesData {
    #[serde(default)]
    attributes: BTreeSet<String>,
    #[serde(default)]
    items: Vec<TabularCategory>,
}

impl From<TabularCategoriesData> for TabularCategories {
    fn from(data: TabularCategoriesData) -> Self {
        let mut categories = TabularCategories {
            attributes: data.attributes,
            items: data.items,
            indices: HashMap::new(),
        };
        categories.reindex();
        categories
    }
}

impl TabularCategories {
    /// Builds a registry from `(name, dtype)` or `(name, dtype, labels)`
    /// entries.
    pub fn from_iterable<I>(iterable: I) -> Result<Self, LabelkitError>
    where
        I: IntoIterator,
        I::Item: Into<TabularCategory>,
    {
        let mut categories = Self::default();
        for entry in iterable {
            categories.add_category(entry.into())?;
        }
        Ok(categories)
    }

    /// Appends a column by name and type and returns its index.
    ///
    /// Fails if the name is empty or already registered.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        dtype: ColumnDtype,
    ) -> Result<usize, LabelkitError> {
        self.add_category(TabularCategory::new(name, dtype))
    }

    /// Appends a fully specified column and returns its index.
    pub fn add_category(&mut self, category: TabularCategory) -> Result<usize, LabelkitError> {
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

    /// Looks a column up by name.
    pub fn find(&self, name: &str) -> Option<(usize, &TabularCategory)> {
        self.indices
            .get(name)
            .map(|&index| (index, &self.items[index]))
    }

    /// Returns the column at an index.
    pub fn get(&self, index: usize) -> Option<&TabularCategory> {
        self.items.get(index)
    }

    /// True when a column with this name is registered.
    pub fn contains_name(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TabularCategory> {
        self.items.iter()
    }

    /// Rebuilds the name index from scratch.
    ///
    /// # Panics
    ///
    /// Panics on duplicate names; the item list was corrupted by direct
    /// mutation.
    fn reindex(&mut self) {
        let mut indices = HashMap::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            let previous = indices.insert(item.name.clone(), index);
            assert!(previous.is_none(), "duplicate column name: {}", item.name);
        }
        self.indices = indices;
    }
}

impl PartialEq for TabularCategories {
    /// Columns compare by name, type tag and label set, in order.
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<'a> IntoIterator for &'a TabularCategories {
    type Item = &'a TabularCategory;
    type IntoIter = std::slice::Iter<'a, TabularCategory>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_find() {
        let mut categories = TabularCategories::default();
        assert_eq!(categories.add("age", ColumnDtype::Integer).unwrap(), 0);
        assert_eq!(categories.add("name", ColumnDtype::Text).unwrap(), 1);

        let (index, column) = categories.find("name").unwrap();
        assert_eq!(index, 1);
        assert_eq!(column.dtype, ColumnDtype::Text);
        assert!(categories.find("missing").is_none());
    }

    #[test]
    fn test_add_rejects_duplicates_and_empty_names() {
        let mut categories = TabularCategories::default();
        categories.add("age", ColumnDtype::Integer).unwrap();

        assert!(matches!(
            categories.add("age", ColumnDtype::Real).unwrap_err(),
            LabelkitError::DuplicateName(name) if name == "age"
        ));
        assert!(matches!(
            categories.add("", ColumnDtype::Text).unwrap_err(),
            LabelkitError::EmptyName
        ));
    }

    #[test]
    fn test_from_iterable_with_labels() {
        let categories = TabularCategories::from_iterable([
            ("rating", ColumnDtype::Integer, vec!["1", "2", "3"]),
            ("note", ColumnDtype::Text, vec![]),
        ])
        .unwrap();

        let (_, rating) = categories.find("rating").unwrap();
        assert_eq!(rating.labels.len(), 3);
        assert!(categories.contains_name("note"));
    }

    #[test]
    fn test_equality_compares_name_dtype_and_labels() {
        let a = TabularCategories::from_iterable([("score", ColumnDtype::Real)]).unwrap();
        let b = TabularCategories::from_iterable([("score", ColumnDtype::Real)]).unwrap();
        assert_eq!(a, b);

        let retyped = TabularCategories::from_iterable([("score", ColumnDtype::Integer)]).unwrap();
        assert_ne!(a, retyped);

        let relabeled = TabularCategories::from_iterable([(
            "score",
            ColumnDtype::Real,
            vec!["low", "high"],
        )])
        .unwrap();
        assert_ne!(a, relabeled);
    }

    #[test]
    fn test_table_value_dtypes() {
        assert_eq!(TableValue::from("x").dtype(), ColumnDtype::Text);
        assert_eq!(TableValue::from(3i64).dtype(), ColumnDtype::Integer);
        assert_eq!(TableValue::from(0.5).dtype(), ColumnDtype::Real);
    }
}
