use thiserror::Error;

/// The number of bytes in a [`HashKey`](crate::model::HashKey).
pub const HASH_KEY_SIZE: usize = 64;

/// The main error type for labelkit operations.
///
/// All validation happens eagerly at construction or registry-mutation
/// time; query-time misses are reported through `Option` returns instead.
#[derive(Debug, Error)]
pub enum LabelkitError {
    #[error("category name must not be empty")]
    EmptyName,

    #[error("duplicate category name: {0}")]
    DuplicateName(String),

    #[error("a polygon requires at least 3 points with an even coordinate count, got {coords} coordinates")]
    InvalidPolygon { coords: usize },

    #[error("visibility list has {visibility} entries for {points} points")]
    VisibilityMismatch { visibility: usize, points: usize },

    #[error("hash key must be exactly {HASH_KEY_SIZE} bytes, got {actual}")]
    InvalidHashKey { actual: usize },

    #[error("a rotated box is reconstructed from exactly 4 corners, got {corners}")]
    InvalidRectangle { corners: usize },

    #[error("unknown group type: {0}")]
    UnknownGroupType(String),
}
