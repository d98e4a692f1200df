//! Semantic column types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic type assigned to a column.
///
/// Declaration order is the inference priority order: numeric types are tried
/// before temporal ones, temporal before textual, and `Text` always succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Whole numbers, stored as Int64.
    Integer,
    /// Real numbers, stored as Float64.
    Float,
    /// Booleans from a fixed vocabulary.
    Boolean,
    /// Timestamps (naive, UTC for timezone-aware sources).
    Datetime,
    /// `HH:MM:SS` style text with a `_X_seconds` sibling.
    Duration,
    /// Low-cardinality text.
    Categorical,
    /// Free text; the fallback.
    Text,
}

impl ColumnKind {
    /// All kinds in inference priority order.
    pub const PRIORITY: [Self; 7] = [
        Self::Integer,
        Self::Float,
        Self::Boolean,
        Self::Datetime,
        Self::Duration,
        Self::Categorical,
        Self::Text,
    ];

    /// Returns true for `Integer` and `Float`.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Lowercase label used in schemas and logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Datetime => "datetime",
            Self::Duration => "duration",
            Self::Categorical => "categorical",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
