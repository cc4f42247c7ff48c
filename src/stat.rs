//! Stats and modifiers.
//!
//! A `Modifier` is the single additive effect a property (or an equipment
//! type's base profile) has on the final attributes of a build. Modifiers
//! are commutative by construction: numeric amounts are summed, flags are
//! set, and tags are unioned, so application order never matters.

use crate::category::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How values of a stat combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    /// Integer amounts, summed.
    Numeric,
    /// Boolean flag, set by any `Enable`.
    Flag,
    /// Enumerated set-valued attribute, unioned.
    Tag,
}

/// A named attribute of a finished piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stat {
    // Weapon
    DamageDie,
    DamageBonus,
    AttackBonus,
    Range,
    Reach,
    DamageType,
    // Armor and shield
    DefenseBonus,
    SpeedPenalty,
    Disadvantage,
    DamageReduction,
    // Spell focus
    SpellCheckBonus,
    SpellAttackBonus,
    SpellDamageBonus,
    RangeBonus,
    // Any category
    Traits,
}

impl Stat {
    /// The way values of this stat combine.
    pub fn kind(self) -> StatKind {
        match self {
            Stat::DamageType | Stat::Traits => StatKind::Tag,
            Stat::Disadvantage | Stat::DamageReduction => StatKind::Flag,
            _ => StatKind::Numeric,
        }
    }

    /// Whether this stat is part of the attribute shape of `category`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gearforge::{Category, Stat};
    ///
    /// assert!(Stat::DamageDie.applies_to(Category::Weapon));
    /// assert!(!Stat::DamageDie.applies_to(Category::Armor));
    /// assert!(Stat::Traits.applies_to(Category::SpellFocus));
    /// ```
    pub fn applies_to(self, category: Category) -> bool {
        match self {
            Stat::DamageDie
            | Stat::DamageBonus
            | Stat::AttackBonus
            | Stat::Range
            | Stat::Reach
            | Stat::DamageType => category == Category::Weapon,
            Stat::DefenseBonus | Stat::SpeedPenalty | Stat::Disadvantage | Stat::DamageReduction => {
                matches!(category, Category::Armor | Category::Shield)
            }
            Stat::SpellCheckBonus
            | Stat::SpellAttackBonus
            | Stat::SpellDamageBonus
            | Stat::RangeBonus => category == Category::SpellFocus,
            Stat::Traits => true,
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stat::DamageDie => "damage die",
            Stat::DamageBonus => "damage bonus",
            Stat::AttackBonus => "attack bonus",
            Stat::Range => "range",
            Stat::Reach => "reach",
            Stat::DamageType => "damage type",
            Stat::DefenseBonus => "defense bonus",
            Stat::SpeedPenalty => "speed penalty",
            Stat::Disadvantage => "disadvantage",
            Stat::DamageReduction => "damage reduction",
            Stat::SpellCheckBonus => "spell check bonus",
            Stat::SpellAttackBonus => "spell attack bonus",
            Stat::SpellDamageBonus => "spell damage bonus",
            Stat::RangeBonus => "range bonus",
            Stat::Traits => "traits",
        };
        f.write_str(name)
    }
}

/// The value carried by a modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModifierValue {
    /// Added to a numeric stat.
    Amount(i32),
    /// Sets a flag stat.
    Enable,
    /// Added to a set-valued stat.
    Tag(String),
}

impl ModifierValue {
    /// The stat kind this value is meant for.
    pub fn kind(&self) -> StatKind {
        match self {
            ModifierValue::Amount(_) => StatKind::Numeric,
            ModifierValue::Enable => StatKind::Flag,
            ModifierValue::Tag(_) => StatKind::Tag,
        }
    }
}

/// A single additive effect on one stat.
///
/// # Examples
///
/// ```rust
/// use gearforge::{Modifier, Stat};
///
/// let keen = Modifier::amount(Stat::AttackBonus, 1);
/// assert!(keen.is_well_formed());
///
/// let mismatched = Modifier::flag(Stat::AttackBonus);
/// assert!(!mismatched.is_well_formed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub stat: Stat,
    pub value: ModifierValue,
}

impl Modifier {
    /// A numeric modifier.
    pub fn amount(stat: Stat, amount: i32) -> Self {
        Self {
            stat,
            value: ModifierValue::Amount(amount),
        }
    }

    /// A flag modifier.
    pub fn flag(stat: Stat) -> Self {
        Self {
            stat,
            value: ModifierValue::Enable,
        }
    }

    /// A tag modifier.
    pub fn tag(stat: Stat, tag: impl Into<String>) -> Self {
        Self {
            stat,
            value: ModifierValue::Tag(tag.into()),
        }
    }

    /// Whether the value kind matches the stat kind.
    pub fn is_well_formed(&self) -> bool {
        self.value.kind() == self.stat.kind()
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            ModifierValue::Amount(n) => write!(f, "{} {:+}", self.stat, n),
            ModifierValue::Enable => write!(f, "{}", self.stat),
            ModifierValue::Tag(tag) => write!(f, "{}: {}", self.stat, tag),
        }
    }
}
