//! Property-based tests over the reference catalogs.
//!
//! Tests invariants:
//! - Budget is monotone: costly additions never cure an overrun, drawbacks
//!   never raise spending or break a budget that held
//! - A valid build never exceeds a stacking cap
//! - Exclusions are symmetric and reported once per pair
//! - A valid build carries the prerequisites of everything it selects
//! - Validation is idempotent and ignores selection order
//! - Every valid build derives attributes of its own category

use gearforge::catalog::builtin;
use gearforge::*;
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::{BTreeSet, HashSet};

const UNKNOWN: &str = "not-in-any-catalog";

// ============================================================================
// Strategies
// ============================================================================

/// A category, a type pick and a list of property picks. One pick past the
/// end of the property list stands for an unknown id.
fn arb_selection() -> impl Strategy<Value = (usize, Index, Vec<Index>)> {
    (
        0usize..Category::ALL.len(),
        any::<Index>(),
        prop::collection::vec(any::<Index>(), 0..10),
    )
}

fn compose((category, type_pick, picks): &(usize, Index, Vec<Index>)) -> (Catalog, Build) {
    let catalog = builtin::for_category(Category::ALL[*category]);
    let ty = type_pick.get(catalog.types()).id.clone();
    let properties = catalog.properties();
    let ids: Vec<PropertyId> = picks
        .iter()
        .map(|pick| match properties.get(pick.index(properties.len() + 1)) {
            Some(p) => p.id.clone(),
            None => PropertyId::new(UNKNOWN),
        })
        .collect();
    let build = Build::for_type(&catalog, ty, "prop")
        .unwrap_or_else(|| Build::new(catalog.category(), "prop"))
        .with_properties(ids);
    (catalog, build)
}

fn present_ids(build: &Build, catalog: &Catalog) -> HashSet<PropertyId> {
    let mut present: HashSet<PropertyId> = build
        .selected_properties
        .iter()
        .filter(|id| catalog.property(id).is_some())
        .cloned()
        .collect();
    if let Some(ty) = build.type_id.as_ref().and_then(|id| catalog.equipment_type(id)) {
        present.extend(ty.granted.iter().cloned());
    }
    present
}

fn error_set(result: &ValidationResult) -> BTreeSet<String> {
    result
        .errors
        .iter()
        .map(|e| format!("{:?}:{}", e.rule, e.message))
        .collect()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: adding a non-negative-cost property never cures a budget overrun
    #[test]
    fn prop_budget_is_monotone(selection in arb_selection(), extra in any::<Index>()) {
        let (catalog, build) = compose(&selection);
        let before = validate(&build, &catalog);

        let costly: Vec<&Property> = catalog.properties().iter().filter(|p| p.cost >= 0).collect();
        prop_assume!(!costly.is_empty());
        let added = extra.get(&costly);
        let mut grown = build.clone();
        grown.add_property(added.id.clone());
        let after = validate(&grown, &catalog);

        prop_assert_eq!(after.points_spent, before.points_spent + added.cost);
        if before.has_rule(Rule::Budget) {
            prop_assert!(after.has_rule(Rule::Budget));
        }
    }

    /// Property: adding a drawback never raises spending or breaks the budget
    #[test]
    fn prop_drawback_never_raises_spending(selection in arb_selection(), extra in any::<Index>()) {
        let (catalog, build) = compose(&selection);
        let before = validate(&build, &catalog);

        let drawbacks: Vec<&Property> = catalog.properties().iter().filter(|p| p.cost < 0).collect();
        prop_assume!(!drawbacks.is_empty());
        let added = extra.get(&drawbacks);
        let mut grown = build.clone();
        grown.add_property(added.id.clone());
        let after = validate(&grown, &catalog);

        prop_assert!(after.points_spent <= before.points_spent);
        prop_assert_eq!(after.points_spent, before.points_spent + added.cost);
        if !before.has_rule(Rule::Budget) {
            prop_assert!(!after.has_rule(Rule::Budget));
        }
    }

    /// Property: a valid build respects every stacking cap
    #[test]
    fn prop_stacking_bound(selection in arb_selection()) {
        let (catalog, build) = compose(&selection);
        let result = validate(&build, &catalog);
        if result.is_valid {
            for id in build.distinct_properties() {
                let property = catalog.property(&id).unwrap();
                prop_assert!(build.count_of(&id) <= property.max_stacks as usize);
            }
        }
    }

    /// Property: one exclusion error per conflicting unordered pair
    #[test]
    fn prop_exclusion_symmetry(selection in arb_selection()) {
        let (catalog, build) = compose(&selection);
        prop_assume!(build.type_id.is_some());
        let result = validate(&build, &catalog);
        let present = present_ids(&build, &catalog);

        let mut pairs: BTreeSet<(PropertyId, PropertyId)> = BTreeSet::new();
        for id in &present {
            let property = catalog.property(id).unwrap();
            for other in property.excludes.iter().filter(|o| present.contains(*o)) {
                let pair = if id <= other { (id.clone(), other.clone()) } else { (other.clone(), id.clone()) };
                pairs.insert(pair);
            }
        }

        prop_assert_eq!(result.errors_for_rule(Rule::Exclusion).count(), pairs.len());
    }

    /// Property: a valid build includes the prerequisites of every selection
    #[test]
    fn prop_prerequisite_closure(selection in arb_selection()) {
        let (catalog, build) = compose(&selection);
        let result = validate(&build, &catalog);
        if result.is_valid {
            let present = present_ids(&build, &catalog);
            for id in build.distinct_properties() {
                for required in &catalog.property(&id).unwrap().requires {
                    prop_assert!(present.contains(required), "{} lacks {}", id, required);
                }
            }
        }
    }

    /// Property: validating is pure and order-insensitive
    #[test]
    fn prop_validation_is_idempotent(selection in arb_selection()) {
        let (catalog, build) = compose(&selection);
        let first = validate(&build, &catalog);
        let second = validate(&build, &catalog);
        prop_assert_eq!(&first, &second);

        let mut reversed = build.clone();
        reversed.selected_properties.reverse();
        let third = validate(&reversed, &catalog);
        prop_assert_eq!(first.is_valid, third.is_valid);
        prop_assert_eq!(first.points_spent, third.points_spent);
        prop_assert_eq!(
            first.errors.iter().map(|e| e.rule).collect::<BTreeSet<_>>(),
            third.errors.iter().map(|e| e.rule).collect::<BTreeSet<_>>()
        );
        if first.errors_for_rule(Rule::Exclusion).count() == 0 {
            prop_assert_eq!(error_set(&first), error_set(&third));
        }
    }

    /// Property: derivation succeeds exactly for valid builds
    #[test]
    fn prop_derivation_is_total(selection in arb_selection()) {
        let (catalog, build) = compose(&selection);
        let result = validate(&build, &catalog);
        match derive_attributes_checked(&build, &catalog) {
            Ok(attributes) => {
                prop_assert!(result.is_valid);
                prop_assert_eq!(attributes.category(), build.category);
            }
            Err(ForgeError::InvalidBuild(reported)) => {
                prop_assert!(!result.is_valid);
                prop_assert_eq!(reported, result);
            }
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }
}
