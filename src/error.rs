//! Error types.
//!
//! Validation failures are not errors in this sense: they are returned as
//! data inside a `ValidationResult`. The types here cover catalog integrity,
//! misuse of the derivation API and persistence failures.

use crate::category::Category;
use crate::ids::{PropertyId, TypeId};
use crate::stat::Stat;
use crate::validation::ValidationResult;
use thiserror::Error;

/// Format a cycle path as a readable string.
fn format_cycle_path(path: &[PropertyId]) -> String {
    if path.is_empty() {
        return String::from("(empty cycle)");
    }
    path.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Integrity violations in a catalog.
///
/// A catalog is fixed input to the engine, so these are reported by
/// `Catalog::check_integrity` at build or test time rather than during
/// validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Duplicate property id: {0}")]
    DuplicateProperty(PropertyId),

    #[error("Duplicate equipment type id: {0}")]
    DuplicateType(TypeId),

    /// A property lists itself in its own requires or excludes set.
    #[error("Property {0} references itself")]
    SelfReference(PropertyId),

    /// A property or type references a property id that is not in the catalog.
    #[error("{owner} references unknown property {missing}")]
    UnknownReference { owner: String, missing: PropertyId },

    #[error("Property {0} has a stacking limit of zero")]
    ZeroStacks(PropertyId),

    /// A modifier targets a stat outside the catalog's category, or its
    /// value kind does not match the stat.
    #[error("{owner} has a modifier on {stat} that is invalid for a {category} catalog")]
    InvalidModifier {
        owner: String,
        stat: Stat,
        category: Category,
    },

    /// The prerequisite graph contains a cycle.
    ///
    /// If A requires B and B requires A this contains `[A, B, A]`.
    #[error("Prerequisite cycle detected: {}", format_cycle_path(.path))]
    PrerequisiteCycle { path: Vec<PropertyId> },

    /// A property's transitive prerequisites conflict with its exclusions,
    /// so no build can ever select it legally.
    #[error("Property {property} can never be legal: it conflicts with its prerequisite {conflict}")]
    Unsatisfiable {
        property: PropertyId,
        conflict: PropertyId,
    },
}

/// Errors raised by the engine API itself.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForgeError {
    /// Attributes were requested for a build that does not pass validation.
    #[error("Build is not valid: {} error(s)", .0.errors.len())]
    InvalidBuild(ValidationResult),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Failures of the underlying key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur in repository operations.
///
/// Every repository operation returns these as values; a failed save means
/// "not persisted" and leaves the stored snapshot unchanged.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An import payload does not have the snapshot shape.
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// Stored data is not recognisable as a snapshot at all.
    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),

    #[error("Unsupported snapshot version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u64, supported: u64 },

    #[error("Repository lock poisoned")]
    Poisoned,
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_error_display() {
        let a = PropertyId::new("A");
        let b = PropertyId::new("B");
        let err = CatalogError::PrerequisiteCycle {
            path: vec![a.clone(), b, a],
        };
        assert_eq!(err.to_string(), "Prerequisite cycle detected: A -> B -> A");
    }

    #[test]
    fn test_empty_cycle_display() {
        let err = CatalogError::PrerequisiteCycle { path: vec![] };
        assert!(err.to_string().contains("(empty cycle)"));
    }

    #[test]
    fn test_unsupported_version_display() {
        let err = RepositoryError::UnsupportedVersion {
            found: 9,
            supported: 2,
        };
        let display = err.to_string();
        assert!(display.contains('9'));
        assert!(display.contains('2'));
    }
}
