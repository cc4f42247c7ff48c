//! Derived attribute calculation.
//!
//! Attributes are only derived for builds that pass validation. The
//! [`ValidatedBuild`] handle can only be obtained through validation, which
//! makes [`derive_attributes`] total: it cannot fail.
//!
//! Derivation folds modifiers in three layers: the type's base profile, the
//! properties the type grants, then every selected instance (a property
//! stacked twice applies twice). All modifiers are additive, flag-setting or
//! tag-adding, so the fold is commutative.

mod attributes;

pub use attributes::{
    AttributeSet, DefenseAttributes, SpellFocusAttributes, StatBreakdown, WeaponAttributes,
};

use crate::build::Build;
use crate::catalog::{Catalog, EquipmentType};
use crate::category::Category;
use crate::error::ForgeError;
use crate::stat::{Modifier, ModifierValue, Stat};
use crate::validation::{validate, ValidationResult};
use std::collections::{BTreeMap, BTreeSet};

/// A build that has passed validation against a specific catalog.
///
/// # Examples
///
/// ```rust
/// use gearforge::catalog::builtin;
/// use gearforge::{derive_attributes, Build, ValidatedBuild};
///
/// let catalog = builtin::weapons();
/// let build = Build::for_type(&catalog, "heavy-melee", "Greataxe")
///     .unwrap()
///     .with_properties(["slashing", "brutal"]);
///
/// let validated = ValidatedBuild::new(&build, &catalog).unwrap();
/// let weapon = derive_attributes(&validated);
/// let weapon = weapon.as_weapon().unwrap();
///
/// assert_eq!(weapon.damage_die, 10); // d8 base, +2 from brutal
/// assert_eq!(weapon.damage_bonus, 1); // granted two-handed grip
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedBuild<'a> {
    build: &'a Build,
    catalog: &'a Catalog,
    equipment_type: &'a EquipmentType,
    result: ValidationResult,
}

impl<'a> ValidatedBuild<'a> {
    /// Validate `build` and wrap it if it is legal.
    ///
    /// Fails with [`ForgeError::InvalidBuild`] carrying the full validation
    /// result otherwise.
    pub fn new(build: &'a Build, catalog: &'a Catalog) -> Result<Self, ForgeError> {
        let result = validate(build, catalog);
        if !result.is_valid {
            return Err(ForgeError::InvalidBuild(result));
        }
        let equipment_type = match build
            .type_id
            .as_ref()
            .and_then(|id| catalog.equipment_type(id))
        {
            Some(ty) => ty,
            None => return Err(ForgeError::InvalidBuild(result)),
        };
        Ok(Self {
            build,
            catalog,
            equipment_type,
            result,
        })
    }

    pub fn build(&self) -> &'a Build {
        self.build
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn equipment_type(&self) -> &'a EquipmentType {
        self.equipment_type
    }

    pub fn points_spent(&self) -> i32 {
        self.result.points_spent
    }

    /// Advisory warnings raised during validation.
    pub fn warnings(&self) -> &[String] {
        &self.result.warnings
    }
}

/// Accumulated modifier effects, before shaping by category.
#[derive(Debug, Default)]
struct Tally {
    numeric: BTreeMap<Stat, StatBreakdown>,
    flags: BTreeSet<Stat>,
    tags: BTreeMap<Stat, BTreeSet<String>>,
}

impl Tally {
    fn apply(&mut self, source: &str, modifier: &Modifier) {
        match &modifier.value {
            ModifierValue::Amount(amount) => self
                .numeric
                .entry(modifier.stat)
                .or_insert_with(|| StatBreakdown::new(modifier.stat))
                .add_source(source, *amount),
            ModifierValue::Enable => {
                self.flags.insert(modifier.stat);
            }
            ModifierValue::Tag(tag) => {
                self.tags
                    .entry(modifier.stat)
                    .or_default()
                    .insert(tag.clone());
            }
        }
    }

    fn number(&self, stat: Stat) -> i32 {
        self.numeric.get(&stat).map(|b| b.value).unwrap_or(0)
    }

    fn flag(&self, stat: Stat) -> bool {
        self.flags.contains(&stat)
    }

    fn tags(&self, stat: Stat) -> BTreeSet<String> {
        self.tags.get(&stat).cloned().unwrap_or_default()
    }

    fn into_attributes(self, category: Category) -> AttributeSet {
        match category {
            Category::Weapon => AttributeSet::Weapon(WeaponAttributes {
                damage_die: self.number(Stat::DamageDie),
                damage_bonus: self.number(Stat::DamageBonus),
                attack_bonus: self.number(Stat::AttackBonus),
                range: self.number(Stat::Range),
                reach: self.number(Stat::Reach),
                damage_types: self.tags(Stat::DamageType),
                traits: self.tags(Stat::Traits),
            }),
            Category::Armor => AttributeSet::Armor(self.defense()),
            Category::Shield => AttributeSet::Shield(self.defense()),
            Category::SpellFocus => AttributeSet::SpellFocus(SpellFocusAttributes {
                spell_check_bonus: self.number(Stat::SpellCheckBonus),
                spell_attack_bonus: self.number(Stat::SpellAttackBonus),
                spell_damage_bonus: self.number(Stat::SpellDamageBonus),
                range_bonus: self.number(Stat::RangeBonus),
                traits: self.tags(Stat::Traits),
            }),
        }
    }

    fn defense(&self) -> DefenseAttributes {
        DefenseAttributes {
            defense_bonus: self.number(Stat::DefenseBonus),
            speed_penalty: self.number(Stat::SpeedPenalty),
            disadvantage: self.flag(Stat::Disadvantage),
            damage_reduction: self.flag(Stat::DamageReduction),
            traits: self.tags(Stat::Traits),
        }
    }
}

fn tally(validated: &ValidatedBuild<'_>) -> Tally {
    let build = validated.build;
    let catalog = validated.catalog;
    let ty = validated.equipment_type;
    let mut tally = Tally::default();

    let base_source = format!("{} base", ty.name);
    for modifier in &ty.base {
        tally.apply(&base_source, modifier);
    }

    let granted = ty
        .granted
        .iter()
        .filter(|id| !build.selected_properties.contains(*id))
        .filter_map(|id| catalog.property(id));
    for property in granted {
        if let Some(modifier) = &property.modifies {
            tally.apply(&format!("{} (granted)", property.name), modifier);
        }
    }

    for id in &build.selected_properties {
        let Some(property) = catalog.property(id) else {
            continue;
        };
        if let Some(modifier) = &property.modifies {
            tally.apply(&property.name, modifier);
        }
    }

    tally
}

/// Derive the final attributes of a validated build.
pub fn derive_attributes(validated: &ValidatedBuild<'_>) -> AttributeSet {
    tally(validated).into_attributes(validated.build.category)
}

/// Per-stat contributions of every numeric stat touched by the build, in
/// stat order.
pub fn derive_breakdown(validated: &ValidatedBuild<'_>) -> Vec<StatBreakdown> {
    tally(validated).numeric.into_values().collect()
}

/// Validate, then derive.
///
/// Fails fast with [`ForgeError::InvalidBuild`] on an illegal build.
pub fn derive_attributes_checked(
    build: &Build,
    catalog: &Catalog,
) -> Result<AttributeSet, ForgeError> {
    let validated = ValidatedBuild::new(build, catalog)?;
    Ok(derive_attributes(&validated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin;
    use crate::catalog::Property;

    #[test]
    fn test_invalid_build_is_refused() {
        let catalog = builtin::armor();
        let build = Build::for_type(&catalog, "light-armor", "x")
            .unwrap()
            .with_properties(["reinforced"]);
        match derive_attributes_checked(&build, &catalog) {
            Err(ForgeError::InvalidBuild(result)) => assert!(!result.errors.is_empty()),
            other => panic!("expected InvalidBuild, got {:?}", other),
        }
    }

    #[test]
    fn test_stacks_apply_once_per_instance() {
        let catalog = builtin::spell_focuses();
        let build = Build::for_type(&catalog, "staff", "x")
            .unwrap()
            .with_properties(["attuned", "attuned", "potent"]);
        let attrs = derive_attributes_checked(&build, &catalog).unwrap();
        let focus = attrs.as_spell_focus().unwrap();
        assert_eq!(focus.spell_check_bonus, 3); // 1 base + 2 attuned
        assert_eq!(focus.spell_damage_bonus, 2); // channeling + potent
        assert_eq!(focus.range_bonus, 10);
    }

    #[test]
    fn test_flags_and_negative_amounts() {
        let catalog = builtin::armor();
        let build = Build::for_type(&catalog, "heavy-armor", "x")
            .unwrap()
            .with_properties(["reinforced", "hardened", "heavyweight"]);
        let attrs = derive_attributes_checked(&build, &catalog).unwrap();
        let armor = attrs.as_defense().unwrap();
        assert_eq!(armor.defense_bonus, 6);
        assert_eq!(armor.speed_penalty, 15);
        assert!(armor.disadvantage);
        assert!(armor.damage_reduction);
    }

    #[test]
    fn test_breakdown_lists_every_contribution() {
        let catalog = builtin::weapons();
        let build = Build::for_type(&catalog, "light-melee", "x")
            .unwrap()
            .with_properties(["keen", "keen"]);
        let validated = ValidatedBuild::new(&build, &catalog).unwrap();
        let breakdown = derive_breakdown(&validated);
        let attack = breakdown
            .iter()
            .find(|b| b.stat == Stat::AttackBonus)
            .unwrap();
        assert_eq!(attack.value, 2);
        assert_eq!(attack.sources.len(), 2);
    }

    #[test]
    fn test_property_without_modifier_changes_nothing() {
        let catalog = Catalog::builder(Category::Shield)
            .with_type(crate::catalog::EquipmentType::new("plain", 2))
            .with_property(Property::new("painted", 1))
            .build();
        let build = Build::for_type(&catalog, "plain", "x")
            .unwrap()
            .with_properties(["painted"]);
        let attrs = derive_attributes_checked(&build, &catalog).unwrap();
        assert_eq!(attrs, AttributeSet::Shield(DefenseAttributes::default()));
    }
}
