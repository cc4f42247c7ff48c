//! Catalog model.
//!
//! A `Catalog` holds the equipment types and properties of one category.
//! It is immutable once built and is passed explicitly to the validation
//! engine and the attribute calculator, so synthetic catalogs can be used in
//! tests just as easily as the reference ones in [`builtin`].
//!
//! Lookups on unknown ids return `None` rather than failing: a stored build
//! may reference a property that existed in an older catalog version, and
//! that must surface as a validation error, not a crash.

pub mod builtin;
pub mod graph;
mod integrity;

use crate::category::{Category, TypeTrait};
use crate::ids::{PropertyId, TypeId};
use crate::stat::{Modifier, Stat};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Eligibility restriction of a property over equipment type traits.
///
/// An empty `only_on` admits every type; otherwise the type must carry at
/// least one of the listed traits. A type carrying any trait in `not_on` is
/// never admitted.
///
/// # Examples
///
/// ```rust
/// use gearforge::{Scope, TypeTrait};
/// use std::collections::BTreeSet;
///
/// let light_only = Scope::only_on([TypeTrait::Light]);
/// let light: BTreeSet<_> = [TypeTrait::Light].into_iter().collect();
/// let heavy: BTreeSet<_> = [TypeTrait::Heavy].into_iter().collect();
///
/// assert!(light_only.admits(&light));
/// assert!(!light_only.admits(&heavy));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub only_on: BTreeSet<TypeTrait>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub not_on: BTreeSet<TypeTrait>,
}

impl Scope {
    /// A scope admitting only types with at least one of `traits`.
    pub fn only_on(traits: impl IntoIterator<Item = TypeTrait>) -> Self {
        Self {
            only_on: traits.into_iter().collect(),
            not_on: BTreeSet::new(),
        }
    }

    /// A scope rejecting types with any of `traits`.
    pub fn not_on(traits: impl IntoIterator<Item = TypeTrait>) -> Self {
        Self {
            only_on: BTreeSet::new(),
            not_on: traits.into_iter().collect(),
        }
    }

    /// Whether this scope places no restriction at all.
    pub fn is_unrestricted(&self) -> bool {
        self.only_on.is_empty() && self.not_on.is_empty()
    }

    /// Whether a type carrying `traits` is admitted.
    pub fn admits(&self, traits: &BTreeSet<TypeTrait>) -> bool {
        let required = self.only_on.is_empty() || self.only_on.iter().any(|t| traits.contains(t));
        let forbidden = self.not_on.iter().any(|t| traits.contains(t));
        required && !forbidden
    }
}

fn join_traits(traits: &BTreeSet<TypeTrait>) -> String {
    traits
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.only_on.is_empty(), self.not_on.is_empty()) {
            (true, true) => f.write_str("any type"),
            (false, true) => write!(f, "{} types only", join_traits(&self.only_on)),
            (true, false) => write!(f, "types that are not {}", join_traits(&self.not_on)),
            (false, false) => write!(
                f,
                "{} types that are not {}",
                join_traits(&self.only_on),
                join_traits(&self.not_on)
            ),
        }
    }
}

fn default_max_stacks() -> u32 {
    1
}

fn is_one(n: &u32) -> bool {
    *n == 1
}

/// A selectable modifier with a point cost and legality rules.
///
/// Built with a small fluent API:
///
/// ```rust
/// use gearforge::{Property, PropertyId, Stat, TypeTrait};
///
/// let keen = Property::new("keen", 2)
///     .named("Keen")
///     .requires(["balanced"])
///     .excludes(["crude"])
///     .max_stacks(2)
///     .only_on([TypeTrait::Melee])
///     .modifies_amount(Stat::AttackBonus, 1);
///
/// assert_eq!(keen.cost, 2);
/// assert_eq!(keen.max_stacks, 2);
/// assert!(keen.requires.contains(&PropertyId::new("balanced")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    #[serde(default)]
    pub name: String,
    /// Point cost; negative for drawbacks that return points.
    pub cost: i32,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub requires: BTreeSet<PropertyId>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub excludes: BTreeSet<PropertyId>,
    #[serde(default = "default_max_stacks", skip_serializing_if = "is_one")]
    pub max_stacks: u32,
    #[serde(default, skip_serializing_if = "Scope::is_unrestricted")]
    pub scope: Scope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifies: Option<Modifier>,
    /// Advisory partners: selecting this property without any of these
    /// produces a warning.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub pairs_with: BTreeSet<PropertyId>,
}

impl Property {
    /// Create an unrestricted, non-stacking property.
    pub fn new(id: impl Into<PropertyId>, cost: i32) -> Self {
        let id = id.into();
        Self {
            name: id.as_str().to_string(),
            id,
            cost,
            requires: BTreeSet::new(),
            excludes: BTreeSet::new(),
            max_stacks: 1,
            scope: Scope::default(),
            modifies: None,
            pairs_with: BTreeSet::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn requires<I, P>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PropertyId>,
    {
        self.requires.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn excludes<I, P>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PropertyId>,
    {
        self.excludes.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn pairs_with<I, P>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PropertyId>,
    {
        self.pairs_with.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn max_stacks(mut self, max_stacks: u32) -> Self {
        self.max_stacks = max_stacks;
        self
    }

    pub fn only_on(mut self, traits: impl IntoIterator<Item = TypeTrait>) -> Self {
        self.scope.only_on.extend(traits);
        self
    }

    pub fn not_on(mut self, traits: impl IntoIterator<Item = TypeTrait>) -> Self {
        self.scope.not_on.extend(traits);
        self
    }

    pub fn modifies(mut self, modifier: Modifier) -> Self {
        self.modifies = Some(modifier);
        self
    }

    pub fn modifies_amount(self, stat: Stat, amount: i32) -> Self {
        self.modifies(Modifier::amount(stat, amount))
    }

    pub fn modifies_flag(self, stat: Stat) -> Self {
        self.modifies(Modifier::flag(stat))
    }

    pub fn modifies_tag(self, stat: Stat, tag: impl Into<String>) -> Self {
        self.modifies(Modifier::tag(stat, tag))
    }
}

/// One subtype within a category, e.g. light armor or a two-handed focus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentType {
    pub id: TypeId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub traits: BTreeSet<TypeTrait>,
    /// Point budget for builds of this type.
    pub max_points: i32,
    /// Base attributes, expressed as modifiers applied before any property.
    #[serde(default)]
    pub base: Vec<Modifier>,
    /// Properties this type carries inherently, at no cost.
    #[serde(default)]
    pub granted: Vec<PropertyId>,
}

impl EquipmentType {
    pub fn new(id: impl Into<TypeId>, max_points: i32) -> Self {
        let id = id.into();
        Self {
            name: id.as_str().to_string(),
            id,
            traits: BTreeSet::new(),
            max_points,
            base: Vec::new(),
            granted: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_traits(mut self, traits: impl IntoIterator<Item = TypeTrait>) -> Self {
        self.traits.extend(traits);
        self
    }

    pub fn with_base(mut self, modifier: Modifier) -> Self {
        self.base.push(modifier);
        self
    }

    pub fn granting(mut self, id: impl Into<PropertyId>) -> Self {
        self.granted.push(id.into());
        self
    }

    /// Whether this type carries `id` inherently.
    pub fn grants(&self, id: &PropertyId) -> bool {
        self.granted.contains(id)
    }
}

/// Serialized form of a catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDefinition {
    category: Category,
    #[serde(default)]
    types: Vec<EquipmentType>,
    #[serde(default)]
    properties: Vec<Property>,
}

/// The equipment types and properties of one category.
///
/// # Examples
///
/// ```rust
/// use gearforge::{Catalog, Category, EquipmentType, Property, PropertyId};
///
/// let catalog = Catalog::builder(Category::Weapon)
///     .with_type(EquipmentType::new("dagger", 4))
///     .with_property(Property::new("keen", 1))
///     .build();
///
/// assert!(catalog.property(&PropertyId::new("keen")).is_some());
/// assert!(catalog.property(&PropertyId::new("retired")).is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "CatalogDefinition", into = "CatalogDefinition")]
pub struct Catalog {
    category: Category,
    types: Vec<EquipmentType>,
    properties: Vec<Property>,
    type_index: HashMap<TypeId, usize>,
    property_index: HashMap<PropertyId, usize>,
    duplicate_types: Vec<TypeId>,
    duplicate_properties: Vec<PropertyId>,
}

impl Catalog {
    /// Start building a catalog for `category`.
    pub fn builder(category: Category) -> CatalogBuilder {
        CatalogBuilder {
            category,
            types: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Look up a property by id.
    pub fn property(&self, id: &PropertyId) -> Option<&Property> {
        self.property_index.get(id).map(|&i| &self.properties[i])
    }

    /// Look up an equipment type by id.
    pub fn equipment_type(&self, id: &TypeId) -> Option<&EquipmentType> {
        self.type_index.get(id).map(|&i| &self.types[i])
    }

    /// Properties whose scope admits the given type, in catalog order.
    ///
    /// Returns an empty list for an unknown type.
    pub fn properties_for(&self, type_id: &TypeId) -> Vec<&Property> {
        match self.equipment_type(type_id) {
            Some(ty) => self
                .properties
                .iter()
                .filter(|p| p.scope.admits(&ty.traits))
                .collect(),
            None => Vec::new(),
        }
    }

    /// All properties, in catalog order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// All equipment types, in catalog order.
    pub fn types(&self) -> &[EquipmentType] {
        &self.types
    }

    /// Check the catalog's internal consistency.
    ///
    /// Returns the first problem found. Checks run in this order: duplicate
    /// ids, per-property references and modifiers, granted properties and
    /// base modifiers of types, prerequisite cycles, then properties that can
    /// never be legal.
    pub fn check_integrity(&self) -> Result<(), crate::error::CatalogError> {
        integrity::check(self)
    }

    /// Every integrity problem in the catalog, in check order.
    pub fn integrity_report(&self) -> Vec<crate::error::CatalogError> {
        integrity::report(self)
    }
}

/// Builder for [`Catalog`].
pub struct CatalogBuilder {
    category: Category,
    types: Vec<EquipmentType>,
    properties: Vec<Property>,
}

impl CatalogBuilder {
    pub fn with_type(mut self, ty: EquipmentType) -> Self {
        self.types.push(ty);
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_properties(mut self, properties: impl IntoIterator<Item = Property>) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Finish the catalog.
    ///
    /// Duplicate ids do not fail the build; the first occurrence wins for
    /// lookups and the duplicates are reported by `check_integrity`.
    pub fn build(self) -> Catalog {
        let mut type_index = HashMap::new();
        let mut duplicate_types = Vec::new();
        for (i, ty) in self.types.iter().enumerate() {
            if type_index.contains_key(&ty.id) {
                duplicate_types.push(ty.id.clone());
            } else {
                type_index.insert(ty.id.clone(), i);
            }
        }

        let mut property_index = HashMap::new();
        let mut duplicate_properties = Vec::new();
        for (i, property) in self.properties.iter().enumerate() {
            if property_index.contains_key(&property.id) {
                duplicate_properties.push(property.id.clone());
            } else {
                property_index.insert(property.id.clone(), i);
            }
        }

        Catalog {
            category: self.category,
            types: self.types,
            properties: self.properties,
            type_index,
            property_index,
            duplicate_types,
            duplicate_properties,
        }
    }
}

impl From<CatalogDefinition> for Catalog {
    fn from(def: CatalogDefinition) -> Self {
        CatalogBuilder {
            category: def.category,
            types: def.types,
            properties: def.properties,
        }
        .build()
    }
}

impl From<Catalog> for CatalogDefinition {
    fn from(catalog: Catalog) -> Self {
        CatalogDefinition {
            category: catalog.category,
            types: catalog.types,
            properties: catalog.properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armor_catalog() -> Catalog {
        Catalog::builder(Category::Armor)
            .with_type(EquipmentType::new("leather", 4).with_traits([TypeTrait::Light]))
            .with_type(EquipmentType::new("plate", 6).with_traits([TypeTrait::Heavy]))
            .with_property(Property::new("supple", 1).only_on([TypeTrait::Light]))
            .with_property(Property::new("reinforced", 2).not_on([TypeTrait::Light]))
            .with_property(Property::new("etched", 1))
            .build()
    }

    #[test]
    fn test_unknown_lookups_return_none() {
        let catalog = armor_catalog();
        assert!(catalog.property(&"missing".into()).is_none());
        assert!(catalog.equipment_type(&"missing".into()).is_none());
        assert!(catalog.properties_for(&"missing".into()).is_empty());
    }

    #[test]
    fn test_properties_for_respects_scope() {
        let catalog = armor_catalog();
        let light: Vec<_> = catalog
            .properties_for(&"leather".into())
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(light, vec!["supple", "etched"]);

        let heavy: Vec<_> = catalog
            .properties_for(&"plate".into())
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(heavy, vec!["reinforced", "etched"]);
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let catalog = Catalog::builder(Category::Weapon)
            .with_property(Property::new("keen", 1))
            .with_property(Property::new("keen", 5))
            .build();
        assert_eq!(catalog.property(&"keen".into()).map(|p| p.cost), Some(1));
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::default().to_string(), "any type");
        assert_eq!(
            Scope::only_on([TypeTrait::Light, TypeTrait::Medium]).to_string(),
            "light or medium types only"
        );
        assert_eq!(
            Scope::not_on([TypeTrait::Heavy]).to_string(),
            "types that are not heavy"
        );
    }

    #[test]
    fn test_property_defaults_when_deserialized() {
        let property: Property = serde_json::from_str(r#"{"id": "keen", "cost": 2}"#).unwrap();
        assert_eq!(property.max_stacks, 1);
        assert!(property.requires.is_empty());
        assert!(property.scope.is_unrestricted());
    }

    #[test]
    fn test_catalog_json_round_trip_keeps_lookups() {
        let catalog = armor_catalog();
        let json = serde_json::to_string(&catalog).unwrap();
        let back: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back.category(), Category::Armor);
        assert_eq!(back.types().len(), 2);
        assert!(back.property(&"supple".into()).is_some());
    }
}
