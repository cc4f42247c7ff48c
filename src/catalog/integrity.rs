//! Catalog integrity checks.
//!
//! Checks run in this order: duplicate ids, per-property reference and
//! modifier checks (catalog order), per-type checks (catalog order),
//! prerequisite cycles, and finally unsatisfiable properties. The last check
//! only runs on an acyclic graph.

use crate::catalog::graph::RequirementGraph;
use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::ids::PropertyId;
use crate::stat::Modifier;
use std::collections::BTreeSet;

pub(super) fn check(catalog: &Catalog) -> Result<(), CatalogError> {
    match report(catalog).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

pub(super) fn report(catalog: &Catalog) -> Vec<CatalogError> {
    let mut errors = Vec::new();

    errors.extend(
        catalog
            .duplicate_types
            .iter()
            .cloned()
            .map(CatalogError::DuplicateType),
    );
    errors.extend(
        catalog
            .duplicate_properties
            .iter()
            .cloned()
            .map(CatalogError::DuplicateProperty),
    );

    for property in catalog.properties() {
        let owner = format!("property {}", property.id);

        if property.requires.contains(&property.id) || property.excludes.contains(&property.id) {
            errors.push(CatalogError::SelfReference(property.id.clone()));
        }

        let references = property
            .requires
            .iter()
            .chain(&property.excludes)
            .chain(&property.pairs_with);
        for reference in references {
            if catalog.property(reference).is_none() {
                errors.push(CatalogError::UnknownReference {
                    owner: owner.clone(),
                    missing: reference.clone(),
                });
            }
        }

        if property.max_stacks == 0 {
            errors.push(CatalogError::ZeroStacks(property.id.clone()));
        }

        if let Some(modifier) = &property.modifies {
            check_modifier(catalog, &owner, modifier, &mut errors);
        }
    }

    for ty in catalog.types() {
        let owner = format!("type {}", ty.id);
        for granted in &ty.granted {
            if catalog.property(granted).is_none() {
                errors.push(CatalogError::UnknownReference {
                    owner: owner.clone(),
                    missing: granted.clone(),
                });
            }
        }
        for modifier in &ty.base {
            check_modifier(catalog, &owner, modifier, &mut errors);
        }
    }

    let graph = RequirementGraph::from_catalog(catalog);
    match graph.detect_cycles() {
        Err(cycle) => errors.push(cycle),
        Ok(()) => errors.extend(unsatisfiable(catalog, &graph)),
    }

    errors
}

fn check_modifier(
    catalog: &Catalog,
    owner: &str,
    modifier: &Modifier,
    errors: &mut Vec<CatalogError>,
) {
    if !modifier.stat.applies_to(catalog.category()) || !modifier.is_well_formed() {
        errors.push(CatalogError::InvalidModifier {
            owner: owner.to_string(),
            stat: modifier.stat,
            category: catalog.category(),
        });
    }
}

/// Properties that can never be legal because selecting them forces the
/// selection of two properties that exclude each other.
fn unsatisfiable(catalog: &Catalog, graph: &RequirementGraph) -> Vec<CatalogError> {
    let mut errors = Vec::new();

    for property in catalog.properties() {
        let mut forced: BTreeSet<PropertyId> =
            graph.prerequisite_closure(&property.id).into_iter().collect();
        forced.insert(property.id.clone());

        let conflict = forced.iter().find_map(|id| {
            catalog.property(id).and_then(|p| {
                p.excludes
                    .iter()
                    .find(|excluded| forced.contains(*excluded))
                    .cloned()
            })
        });

        if let Some(conflict) = conflict {
            errors.push(CatalogError::Unsatisfiable {
                property: property.id.clone(),
                conflict,
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use crate::catalog::{Catalog, EquipmentType, Property};
    use crate::category::Category;
    use crate::error::CatalogError;
    use crate::stat::{Modifier, Stat};

    #[test]
    fn test_clean_catalog_passes() {
        let catalog = Catalog::builder(Category::Weapon)
            .with_type(EquipmentType::new("dagger", 4).granting("light-grip"))
            .with_property(Property::new("light-grip", 0))
            .with_property(Property::new("keen", 1).requires(["light-grip"]))
            .build();
        assert_eq!(catalog.check_integrity(), Ok(()));
    }

    #[test]
    fn test_self_reference_reported() {
        let catalog = Catalog::builder(Category::Weapon)
            .with_property(Property::new("keen", 1).excludes(["keen"]))
            .build();
        assert!(catalog
            .integrity_report()
            .contains(&CatalogError::SelfReference("keen".into())));
    }

    #[test]
    fn test_dangling_reference_reported() {
        let catalog = Catalog::builder(Category::Armor)
            .with_property(Property::new("padded", 1).requires(["quilted"]))
            .build();
        assert_eq!(
            catalog.check_integrity(),
            Err(CatalogError::UnknownReference {
                owner: "property padded".into(),
                missing: "quilted".into(),
            })
        );
    }

    #[test]
    fn test_cross_category_modifier_reported() {
        let catalog = Catalog::builder(Category::Shield)
            .with_property(Property::new("barbed", 1).modifies_amount(Stat::DamageBonus, 1))
            .build();
        assert!(matches!(
            catalog.check_integrity(),
            Err(CatalogError::InvalidModifier { stat: Stat::DamageBonus, .. })
        ));
    }

    #[test]
    fn test_mismatched_value_kind_reported() {
        let catalog = Catalog::builder(Category::Armor)
            .with_type(EquipmentType::new("hide", 4).with_base(Modifier::flag(Stat::DefenseBonus)))
            .build();
        assert!(matches!(
            catalog.check_integrity(),
            Err(CatalogError::InvalidModifier { .. })
        ));
    }

    #[test]
    fn test_zero_stacks_reported() {
        let catalog = Catalog::builder(Category::Weapon)
            .with_property(Property::new("keen", 1).max_stacks(0))
            .build();
        assert_eq!(catalog.check_integrity(), Err(CatalogError::ZeroStacks("keen".into())));
    }

    #[test]
    fn test_unsatisfiable_through_prerequisite_chain() {
        // heavy-edge -> weighted -> crude, but heavy-edge excludes crude.
        let catalog = Catalog::builder(Category::Weapon)
            .with_property(Property::new("crude", -1))
            .with_property(Property::new("weighted", 1).requires(["crude"]))
            .with_property(
                Property::new("heavy-edge", 2)
                    .requires(["weighted"])
                    .excludes(["crude"]),
            )
            .build();
        assert_eq!(
            catalog.check_integrity(),
            Err(CatalogError::Unsatisfiable {
                property: "heavy-edge".into(),
                conflict: "crude".into(),
            })
        );
    }

    #[test]
    fn test_duplicates_reported_first() {
        let catalog = Catalog::builder(Category::Weapon)
            .with_property(Property::new("keen", 1).excludes(["keen"]))
            .with_property(Property::new("keen", 1))
            .build();
        assert_eq!(
            catalog.check_integrity(),
            Err(CatalogError::DuplicateProperty("keen".into()))
        );
    }
}
