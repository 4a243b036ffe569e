//! Metadata shared by every annotation variant.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Group id meaning "not grouped with anything".
pub const NO_GROUP: u64 = 0;

/// A simple attribute value.
///
/// Attribute values are restricted to scalar builtins so annotations stay
/// representable in every format an adapter may target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

/// The fields every annotation carries, embedded by composition in each
/// variant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationMeta {
    /// Identifier of the annotation. Not required to be unique within a
    /// dataset item or a dataset.
    #[serde(default)]
    pub id: u64,

    /// Arbitrary annotation-specific attributes. Established names exist
    /// for common ones, e.g. "occluded" (bool) and "visible" (bool).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttrValue>,

    /// Annotations with the same nonzero group describe parts of a single
    /// object. [`NO_GROUP`] means ungrouped.
    #[serde(default)]
    pub group: u64,

    /// Links instances of one real-world object across items, e.g. the
    /// same person over consecutive video frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<u64>,
}

/// Implements the metadata accessors and modify-by-copy builders for an
/// annotation variant. Every variant stores its metadata in a `meta`
/// field; originals are never mutated in place, a builder consumes its
/// receiver and returns the overridden copy.
macro_rules! impl_annotation_meta {
    ($($variant:ty),+ $(,)?) => {$(
        impl $variant {
            /// Returns the shared annotation metadata.
            #[inline]
            pub fn meta(&self) -> &$crate::model::AnnotationMeta {
                &self.meta
            }

            /// Sets the annotation id.
            pub fn with_id(mut self, id: u64) -> Self {
                self.meta.id = id;
                self
            }

            /// Sets the group id linking part annotations of one object.
            pub fn with_group(mut self, group: u64) -> Self {
                self.meta.group = group;
                self
            }

            /// Sets the cross-item object id.
            pub fn with_object_id(mut self, object_id: u64) -> Self {
                self.meta.object_id = Some(object_id);
                self
            }

            /// Adds an attribute to the annotation.
            pub fn with_attribute(
                mut self,
                key: impl Into<String>,
                value: impl Into<$crate::model::AttrValue>,
            ) -> Self {
                self.meta.attributes.insert(key.into(), value.into());
                self
            }
        }
    )+};
}

pub(crate) use impl_annotation_meta;
