//! Field lists
//!
//! The ordered, named, leveled output of a query block - the common currency
//! passed between every stage of classification. Order is significant:
//! positional matching drives set-operation combination and wildcard
//! expansion. A field list is produced fresh by every query block and never
//! mutated after construction, only combined into new lists.

use crate::catalog::ColumnEntry;
use crate::level::MaskingLevel;
use serde::{Deserialize, Serialize};

/// PostgreSQL's name for an output column with no derivable name
pub const UNNAMED_COLUMN: &str = "?column?";

/// One named, leveled output position of a query block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Output column name
    pub name: String,
    /// Strictest masking level this column is entitled to
    pub masking_level: MaskingLevel,
}

impl Field {
    /// Create a new field
    pub fn new(name: &str, masking_level: MaskingLevel) -> Self {
        Self {
            name: name.to_string(),
            masking_level,
        }
    }

    /// Create a field with the placeholder name for opaque expressions
    pub fn unnamed(masking_level: MaskingLevel) -> Self {
        Self::new(UNNAMED_COLUMN, masking_level)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.masking_level)
    }
}

/// Ordered sequence of fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldList(Vec<Field>);

impl FieldList {
    /// Create an empty field list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a field list from a table's ordered column entries
    pub fn from_columns(columns: &[ColumnEntry]) -> Self {
        Self(
            columns
                .iter()
                .map(|c| Field::new(&c.name, c.masking_level))
                .collect(),
        )
    }

    /// Append a field
    pub fn push(&mut self, field: Field) {
        self.0.push(field);
    }

    /// Append every field of another list
    pub fn extend(&mut self, other: FieldList) {
        self.0.extend(other.0);
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field at a position
    pub fn get(&self, index: usize) -> Option<&Field> {
        self.0.get(index)
    }

    /// Iterate over fields in order
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.0.iter()
    }

    /// The fields as a slice
    pub fn fields(&self) -> &[Field] {
        &self.0
    }

    /// Rename fields positionally.
    ///
    /// Positions beyond the given names keep their existing names; levels are
    /// never touched. Used for explicit column lists on CTEs and table
    /// aliases.
    pub fn renamed(&self, names: &[String]) -> FieldList {
        Self(
            self.0
                .iter()
                .enumerate()
                .map(|(i, field)| match names.get(i) {
                    Some(name) => Field::new(name, field.masking_level),
                    None => field.clone(),
                })
                .collect(),
        )
    }

    /// Combine two lists positionally, keeping `self`'s names and taking the
    /// lattice combine of the levels at each position.
    ///
    /// Returns `None` when the lists differ in length; set-operation branches
    /// of unequal arity are a caller error, never a silent truncation.
    pub fn combined_with(&self, other: &FieldList) -> Option<FieldList> {
        if self.len() != other.len() {
            return None;
        }
        Some(Self(
            self.0
                .iter()
                .zip(other.0.iter())
                .map(|(a, b)| Field::new(&a.name, a.masking_level.combine(b.masking_level)))
                .collect(),
        ))
    }

    /// Fold every field's level into one
    pub fn combined_level(&self) -> MaskingLevel {
        self.0
            .iter()
            .fold(MaskingLevel::None, |acc, f| acc.combine(f.masking_level))
    }
}

impl From<Vec<Field>> for FieldList {
    fn from(fields: Vec<Field>) -> Self {
        Self(fields)
    }
}

impl IntoIterator for FieldList {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
#[path = "field_test.rs"]
mod tests;
