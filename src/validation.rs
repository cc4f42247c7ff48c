//! Build validation.
//!
//! [`validate`] checks a proposed build against the catalog of its category
//! and reports every violated rule in one pass. Constraint checks (scoping,
//! stacking, prerequisites, exclusions, budget) are written once and apply to
//! all four categories alike.
//!
//! Validation is pure and deterministic. Errors appear in check order and,
//! within a check, in the order the properties were first selected.

use crate::build::Build;
use crate::catalog::{Catalog, EquipmentType, Property};
use crate::ids::PropertyId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// The rule a validation error reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    /// The catalog belongs to a different category than the build.
    CategoryMismatch,
    /// No equipment type has been chosen.
    MissingType,
    /// The chosen type is not in the catalog.
    UnknownType,
    /// A selected property is not in the catalog.
    UnknownProperty,
    /// A property is not eligible for the chosen type.
    Scope,
    /// A property is selected more times than it may stack.
    Stacking,
    /// A property's prerequisite is not selected.
    MissingPrerequisite,
    /// Two mutually exclusive properties are both present.
    Exclusion,
    /// Total cost exceeds the budget.
    Budget,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::CategoryMismatch => "category mismatch",
            Rule::MissingType => "missing type",
            Rule::UnknownType => "unknown type",
            Rule::UnknownProperty => "unknown property",
            Rule::Scope => "scope",
            Rule::Stacking => "stacking",
            Rule::MissingPrerequisite => "missing prerequisite",
            Rule::Exclusion => "exclusion",
            Rule::Budget => "budget",
        };
        f.write_str(name)
    }
}

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// The property the error is about, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<PropertyId>,
    pub rule: Rule,
    pub message: String,
}

impl ValidationError {
    fn general(rule: Rule, message: String) -> Self {
        Self {
            property_id: None,
            rule,
            message,
        }
    }

    fn property(id: &PropertyId, rule: Rule, message: String) -> Self {
        Self {
            property_id: Some(id.clone()),
            rule,
            message,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of validating a build.
///
/// # Examples
///
/// ```rust
/// use gearforge::catalog::builtin;
/// use gearforge::{validate, Build, Rule};
///
/// let catalog = builtin::weapons();
/// let build = Build::for_type(&catalog, "light-melee", "Knife")
///     .unwrap()
///     .with_properties(["slashing", "piercing"]);
///
/// let result = validate(&build, &catalog);
/// assert!(!result.is_valid);
/// assert_eq!(result.errors.len(), 1);
/// assert_eq!(result.errors[0].rule, Rule::Exclusion);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
    /// Total cost of the recognised selected instances.
    pub points_spent: i32,
}

impl ValidationResult {
    fn finish(errors: Vec<ValidationError>, warnings: Vec<String>, points_spent: i32) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            points_spent,
        }
    }

    /// Errors reported on a given rule.
    pub fn errors_for_rule(&self, rule: Rule) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |e| e.rule == rule)
    }

    /// Errors attributed to a given property.
    pub fn errors_for_property<'a>(
        &'a self,
        id: &'a PropertyId,
    ) -> impl Iterator<Item = &'a ValidationError> {
        self.errors
            .iter()
            .filter(move |e| e.property_id.as_ref() == Some(id))
    }

    pub fn has_rule(&self, rule: Rule) -> bool {
        self.errors_for_rule(rule).next().is_some()
    }
}

fn points(n: i32) -> &'static str {
    if n == 1 || n == -1 {
        "point"
    } else {
        "points"
    }
}

fn join_ids<'a>(ids: impl IntoIterator<Item = &'a PropertyId>, sep: &str) -> String {
    ids.into_iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Validate a build against the catalog of its category.
///
/// Every violated rule is reported; nothing short-circuits except the
/// structural checks on category and type, without which nothing else can
/// be checked.
pub fn validate(build: &Build, catalog: &Catalog) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if catalog.category() != build.category {
        errors.push(ValidationError::general(
            Rule::CategoryMismatch,
            format!(
                "A {} build cannot be checked against the {} catalog",
                build.category,
                catalog.category()
            ),
        ));
        return ValidationResult::finish(errors, warnings, 0);
    }

    let ty = match &build.type_id {
        None => {
            errors.push(ValidationError::general(
                Rule::MissingType,
                format!("Choose a {} type before adding properties", build.category),
            ));
            return ValidationResult::finish(errors, warnings, 0);
        }
        Some(type_id) => match catalog.equipment_type(type_id) {
            Some(ty) => ty,
            None => {
                errors.push(ValidationError::general(
                    Rule::UnknownType,
                    format!("Unknown {} type: {}", build.category, type_id),
                ));
                return ValidationResult::finish(errors, warnings, 0);
            }
        },
    };

    // Resolve instances; unknown ids are reported once and otherwise ignored.
    let mut selected: Vec<&Property> = Vec::new();
    let mut counts: HashMap<&PropertyId, u32> = HashMap::new();
    let mut unknown: HashSet<&PropertyId> = HashSet::new();
    let mut points_spent = 0i32;

    for id in &build.selected_properties {
        match catalog.property(id) {
            Some(property) => {
                let count = counts.entry(&property.id).or_insert(0);
                if *count == 0 {
                    selected.push(property);
                }
                *count += 1;
                points_spent = points_spent.saturating_add(property.cost);
            }
            None => {
                if unknown.insert(id) {
                    errors.push(ValidationError::property(
                        id,
                        Rule::UnknownProperty,
                        format!("Unknown property: {}", id),
                    ));
                }
            }
        }
    }

    // Granted properties count as present for prerequisites and exclusions.
    let granted: Vec<&Property> = ty
        .granted
        .iter()
        .filter(|id| !counts.contains_key(id))
        .filter_map(|id| catalog.property(id))
        .collect();
    let present: HashSet<&PropertyId> = selected
        .iter()
        .chain(granted.iter())
        .map(|p| &p.id)
        .collect();

    check_scope(&selected, ty, &mut errors);
    check_stacking(&selected, &counts, &mut errors);
    check_prerequisites(&selected, &present, &mut errors);
    check_exclusions(&selected, &granted, &present, &mut errors);

    if points_spent > build.max_points {
        errors.push(ValidationError::general(
            Rule::Budget,
            format!(
                "Spent {} {} but the budget is {}",
                points_spent,
                points(points_spent),
                build.max_points
            ),
        ));
    }

    collect_warnings(build, &selected, &present, ty, &mut warnings);

    ValidationResult::finish(errors, warnings, points_spent)
}

fn check_scope(selected: &[&Property], ty: &EquipmentType, errors: &mut Vec<ValidationError>) {
    for property in selected {
        if !property.scope.admits(&ty.traits) {
            errors.push(ValidationError::property(
                &property.id,
                Rule::Scope,
                format!(
                    "{} cannot be applied to {}: allowed on {}",
                    property.name, ty.name, property.scope
                ),
            ));
        }
    }
}

fn check_stacking(
    selected: &[&Property],
    counts: &HashMap<&PropertyId, u32>,
    errors: &mut Vec<ValidationError>,
) {
    for property in selected {
        let count = counts.get(&property.id).copied().unwrap_or(0);
        if count > property.max_stacks {
            errors.push(ValidationError::property(
                &property.id,
                Rule::Stacking,
                format!(
                    "{} is selected {} times but stacks at most {}",
                    property.name, count, property.max_stacks
                ),
            ));
        }
    }
}

fn check_prerequisites(
    selected: &[&Property],
    present: &HashSet<&PropertyId>,
    errors: &mut Vec<ValidationError>,
) {
    for property in selected {
        for prerequisite in &property.requires {
            if !present.contains(prerequisite) {
                errors.push(ValidationError::property(
                    &property.id,
                    Rule::MissingPrerequisite,
                    format!("{} requires {}", property.name, prerequisite),
                ));
            }
        }
    }
}

fn check_exclusions(
    selected: &[&Property],
    granted: &[&Property],
    present: &HashSet<&PropertyId>,
    errors: &mut Vec<ValidationError>,
) {
    let mut reported: HashSet<(&PropertyId, &PropertyId)> = HashSet::new();

    for property in selected.iter().chain(granted) {
        for excluded in &property.excludes {
            if !present.contains(excluded) {
                continue;
            }
            let key = if property.id <= *excluded {
                (&property.id, excluded)
            } else {
                (excluded, &property.id)
            };
            if reported.insert(key) {
                errors.push(ValidationError::property(
                    &property.id,
                    Rule::Exclusion,
                    format!("{} cannot be combined with {}", property.name, excluded),
                ));
            }
        }
    }
}

fn collect_warnings(
    build: &Build,
    selected: &[&Property],
    present: &HashSet<&PropertyId>,
    ty: &EquipmentType,
    warnings: &mut Vec<String>,
) {
    for property in selected {
        if !property.pairs_with.is_empty()
            && !property.pairs_with.iter().any(|p| present.contains(p))
        {
            warnings.push(format!(
                "{} is usually paired with {}",
                property.name,
                join_ids(&property.pairs_with, " or ")
            ));
        }
    }

    for property in selected {
        if ty.grants(&property.id) {
            warnings.push(format!(
                "{} is already granted by {}; selecting it again costs {} {}",
                property.name,
                ty.name,
                property.cost,
                points(property.cost)
            ));
        }
    }

    if build.max_points != ty.max_points {
        warnings.push(format!(
            "Budget of {} differs from the standard {} for {}",
            build.max_points, ty.max_points, ty.name
        ));
    }
}

/// Distinct properties that a build's selection leaves unsatisfied, with the
/// prerequisites each one is missing. Useful for "what do I still need"
/// hints in a UI; does not affect validation.
pub fn missing_prerequisites(build: &Build, catalog: &Catalog) -> Vec<(PropertyId, BTreeSet<PropertyId>)> {
    let granted: Vec<PropertyId> = build
        .type_id
        .as_ref()
        .and_then(|id| catalog.equipment_type(id))
        .map(|ty| ty.granted.clone())
        .unwrap_or_default();
    let present: HashSet<&PropertyId> = build
        .selected_properties
        .iter()
        .chain(granted.iter())
        .collect();

    build
        .distinct_properties()
        .into_iter()
        .filter_map(|id| {
            let property = catalog.property(&id)?;
            let missing: BTreeSet<PropertyId> = property
                .requires
                .iter()
                .filter(|r| !present.contains(r))
                .cloned()
                .collect();
            (!missing.is_empty()).then_some((id, missing))
        })
        .collect()
}
