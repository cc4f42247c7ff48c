//! The build entity.
//!
//! A `Build` is what a player composes: a category, a chosen equipment type
//! and a multiset of selected property ids. It carries no legality
//! guarantees of its own; run it through [`crate::validate`] after every
//! change.

use crate::catalog::Catalog;
use crate::category::Category;
use crate::ids::{BuildId, PropertyId, TypeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A user-composed piece of equipment.
///
/// # Examples
///
/// ```rust
/// use gearforge::catalog::builtin;
/// use gearforge::{Build, PropertyId};
///
/// let catalog = builtin::weapons();
/// let mut build = Build::for_type(&catalog, "light-melee", "Stiletto").unwrap();
/// build.add_property("keen");
/// build.add_property("keen");
///
/// assert_eq!(build.count_of(&PropertyId::new("keen")), 2);
/// assert_eq!(build.max_points, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: BuildId,
    #[serde(default)]
    pub name: String,
    pub category: Category,
    /// The selected equipment type. `None` until the player picks one.
    #[serde(default, rename = "type")]
    pub type_id: Option<TypeId>,
    /// Selected property instances. Order does not affect legality.
    #[serde(default)]
    pub selected_properties: Vec<PropertyId>,
    /// Cached total cost, refreshed whenever a validated build is saved.
    #[serde(default)]
    pub points_spent: i32,
    #[serde(default)]
    pub max_points: i32,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Build {
    /// Create an empty build with no type selected yet.
    pub fn new(category: Category, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: BuildId::generate(),
            name: name.into(),
            category,
            type_id: None,
            selected_properties: Vec::new(),
            points_spent: 0,
            max_points: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a build of a catalog type, taking the type's budget.
    ///
    /// Returns `None` if the catalog has no such type.
    pub fn for_type(
        catalog: &Catalog,
        type_id: impl Into<TypeId>,
        name: impl Into<String>,
    ) -> Option<Self> {
        let type_id = type_id.into();
        let ty = catalog.equipment_type(&type_id)?;
        let mut build = Self::new(catalog.category(), name);
        build.max_points = ty.max_points;
        build.type_id = Some(type_id);
        Some(build)
    }

    pub fn with_id(mut self, id: impl Into<BuildId>) -> Self {
        self.id = id.into();
        self
    }

    /// Add the given property instances to the selection.
    pub fn with_properties<I, P>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PropertyId>,
    {
        self.selected_properties
            .extend(ids.into_iter().map(Into::into));
        self
    }

    /// Add one instance of a property.
    pub fn add_property(&mut self, id: impl Into<PropertyId>) {
        self.selected_properties.push(id.into());
    }

    /// Remove one instance of a property. Returns `false` if none was selected.
    pub fn remove_property(&mut self, id: &PropertyId) -> bool {
        match self.selected_properties.iter().rposition(|p| p == id) {
            Some(pos) => {
                self.selected_properties.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Number of selected instances of `id`.
    pub fn count_of(&self, id: &PropertyId) -> usize {
        self.selected_properties.iter().filter(|p| *p == id).count()
    }

    /// Distinct selected ids in order of first selection.
    pub fn distinct_properties(&self) -> Vec<PropertyId> {
        let mut seen = HashSet::new();
        self.selected_properties
            .iter()
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect()
    }
}
