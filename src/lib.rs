//! # gearforge - Rule-Based Equipment Build Validation
//!
//! An engine for custom equipment builds (weapons, armor, shields and spell
//! focuses) that provides:
//! - **Data-driven** rules: every cost, prerequisite, exclusion, stacking cap
//!   and scoping restriction lives in a per-category [`Catalog`]
//! - **Exhaustive** validation: one pass reports every violation, in a
//!   deterministic order
//! - **Total** derivation: attributes are only derived from a
//!   [`ValidatedBuild`], so derivation cannot fail
//! - **Versioned** persistence with snapshot export and import
//!
//! ## Core Concepts
//!
//! ### Build Pipeline
//!
//! ```text
//! [Build] → validate → [ValidatedBuild] → derive_attributes → [AttributeSet]
//!                              ↓
//!                       [BuildRepository]
//! ```
//!
//! 1. A **Build** is an equipment type plus a multiset of selected properties
//! 2. **Validation** checks it against the catalog of its category
//! 3. A **ValidatedBuild** can be derived into final attributes and saved
//!
//! ### Key Features
//!
//! - **Prerequisite Graph**: catalogs are checked for cycles and for
//!   properties that can never be legal
//! - **Budgets**: properties cost points, drawbacks give points back
//! - **Breakdowns**: every derived number lists its contributions
//! - **Migration**: stored data from older schema versions is upgraded on load
//!
//! ## Example
//!
//! ```rust
//! use gearforge::catalog::builtin;
//! use gearforge::repository::{BuildRepository, MemoryStore};
//! use gearforge::*;
//!
//! let catalog = builtin::weapons();
//! let build = Build::for_type(&catalog, "light-melee", "Stiletto")
//!     .unwrap()
//!     .with_properties(["piercing", "keen", "finesse"]);
//!
//! let result = validate(&build, &catalog);
//! assert!(result.is_valid);
//!
//! let validated = ValidatedBuild::new(&build, &catalog).unwrap();
//! let attrs = derive_attributes(&validated);
//! assert!(attrs.as_weapon().unwrap().damage_types.contains("piercing"));
//!
//! let repo = BuildRepository::new(MemoryStore::new());
//! repo.save_validated(&validated).unwrap();
//! assert_eq!(repo.list(Category::Weapon).unwrap().len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`ids`] - Interned identifiers
//! - [`category`] - Equipment categories and type traits
//! - [`stat`] - Stats and modifiers
//! - [`catalog`] - Property catalogs, integrity checking, reference data
//! - [`build`] - The build entity
//! - [`validation`] - Build validation
//! - [`derive`] - Derived attributes
//! - [`repository`] - Persistence, export and import
//! - [`error`] - Error types

pub mod build;
pub mod catalog;
pub mod category;
pub mod derive;
pub mod error;
pub mod ids;
pub mod repository;
pub mod stat;
pub mod validation;

// Re-export main types for convenience
pub use build::Build;
pub use catalog::{Catalog, CatalogBuilder, EquipmentType, Property, Scope};
pub use category::{Category, TypeTrait};
pub use ids::{BuildId, PropertyId, TypeId};
pub use stat::{Modifier, ModifierValue, Stat, StatKind};

pub use validation::{validate, Rule, ValidationError, ValidationResult};

pub use derive::{
    derive_attributes, derive_attributes_checked, derive_breakdown, AttributeSet,
    DefenseAttributes, SpellFocusAttributes, StatBreakdown, ValidatedBuild, WeaponAttributes,
};

pub use error::{CatalogError, ForgeError, RepositoryError, StoreError};
pub use repository::{BuildRepository, ImportSummary, RepositoryConfig, Snapshot};
