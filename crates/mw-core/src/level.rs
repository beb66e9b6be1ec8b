//! Masking level lattice
//!
//! A small totally ordered enumeration describing how strictly a value must
//! be obscured before it is surfaced to a consumer. Levels only ever increase
//! when combined, which is what makes recursive query resolution terminate.

use serde::{Deserialize, Serialize};

/// Number of distinct masking levels. Bounds fixpoint iteration in the
/// recursive CTE binder.
pub const LEVEL_COUNT: usize = 3;

/// Data-sensitivity classification for a single column or value
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MaskingLevel {
    /// No masking required
    #[default]
    None,
    /// Value must be partially obscured (e.g. truncated or redacted in part)
    Partial,
    /// Value must be fully obscured
    Full,
}

impl MaskingLevel {
    /// Combine two levels, keeping the stricter one.
    ///
    /// Associative, commutative, and idempotent; used to fold any number of
    /// contributing levels into one.
    pub fn combine(self, other: MaskingLevel) -> MaskingLevel {
        self.max(other)
    }

    /// Numeric rank within the lattice (0 = least strict)
    pub fn rank(self) -> u8 {
        match self {
            MaskingLevel::None => 0,
            MaskingLevel::Partial => 1,
            MaskingLevel::Full => 2,
        }
    }
}

impl std::fmt::Display for MaskingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaskingLevel::None => write!(f, "none"),
            MaskingLevel::Partial => write!(f, "partial"),
            MaskingLevel::Full => write!(f, "full"),
        }
    }
}

#[cfg(test)]
#[path = "level_test.rs"]
mod tests;
