//! Error types for the sift crate.
//!
//! Matching itself never fails: missing properties and type mismatches are
//! plain non-matches. Errors only arise when parsing filter configuration.

use thiserror::Error;

/// Errors that can occur when building filter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiftError {
    /// A property list contained an empty name (e.g. `"name,,email"`).
    #[error("empty property name at position {position} in property list")]
    EmptyPropertyName { position: usize },

    /// The same property was listed more than once.
    #[error("property '{name}' appears more than once in property list")]
    DuplicateProperty { name: String },
}

/// Result type for sift operations.
pub type Result<T> = std::result::Result<T, SiftError>;
