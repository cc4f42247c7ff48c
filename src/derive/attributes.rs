//! Derived attribute shapes.
//!
//! Each category derives a differently shaped attribute set. Numeric stats
//! additionally keep a `StatBreakdown` listing every contribution, for
//! tooltips and debugging.

use crate::category::Category;
use crate::stat::Stat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A derived numeric stat with its contributions.
///
/// # Examples
///
/// ```rust
/// use gearforge::derive::StatBreakdown;
/// use gearforge::Stat;
///
/// let mut attack = StatBreakdown::new(Stat::AttackBonus);
/// attack.add_source("Keen", 1);
/// attack.add_source("Keen", 1);
/// attack.add_source("Crude", -1);
///
/// assert_eq!(attack.value, 1);
/// assert_eq!(attack.sources.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBreakdown {
    pub stat: Stat,
    /// Sum of all contributions.
    pub value: i32,
    /// Each entry is `(source_description, amount)`, in application order.
    pub sources: Vec<(String, i32)>,
}

impl StatBreakdown {
    pub fn new(stat: Stat) -> Self {
        Self {
            stat,
            value: 0,
            sources: Vec::new(),
        }
    }

    /// Record a contribution and add it to the total.
    pub fn add_source(&mut self, description: impl Into<String>, amount: i32) {
        self.value = self.value.saturating_add(amount);
        self.sources.push((description.into(), amount));
    }
}

/// Final attributes of a weapon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponAttributes {
    /// Sides of the damage die.
    pub damage_die: i32,
    pub damage_bonus: i32,
    pub attack_bonus: i32,
    /// Range in feet; zero for weapons that cannot be used at range.
    pub range: i32,
    pub reach: i32,
    pub damage_types: BTreeSet<String>,
    pub traits: BTreeSet<String>,
}

/// Final attributes of armor or a shield.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefenseAttributes {
    pub defense_bonus: i32,
    pub speed_penalty: i32,
    pub disadvantage: bool,
    pub damage_reduction: bool,
    pub traits: BTreeSet<String>,
}

/// Final attributes of a spell focus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellFocusAttributes {
    pub spell_check_bonus: i32,
    pub spell_attack_bonus: i32,
    pub spell_damage_bonus: i32,
    /// Added to the range of spells cast through the focus, in feet.
    pub range_bonus: i32,
    pub traits: BTreeSet<String>,
}

/// Category-shaped final attributes of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum AttributeSet {
    Weapon(WeaponAttributes),
    Armor(DefenseAttributes),
    Shield(DefenseAttributes),
    SpellFocus(SpellFocusAttributes),
}

impl AttributeSet {
    pub fn category(&self) -> Category {
        match self {
            AttributeSet::Weapon(_) => Category::Weapon,
            AttributeSet::Armor(_) => Category::Armor,
            AttributeSet::Shield(_) => Category::Shield,
            AttributeSet::SpellFocus(_) => Category::SpellFocus,
        }
    }

    pub fn as_weapon(&self) -> Option<&WeaponAttributes> {
        match self {
            AttributeSet::Weapon(w) => Some(w),
            _ => None,
        }
    }

    /// Defense attributes of armor or a shield.
    pub fn as_defense(&self) -> Option<&DefenseAttributes> {
        match self {
            AttributeSet::Armor(d) | AttributeSet::Shield(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_spell_focus(&self) -> Option<&SpellFocusAttributes> {
        match self {
            AttributeSet::SpellFocus(s) => Some(s),
            _ => None,
        }
    }
}

fn write_traits(f: &mut fmt::Formatter<'_>, traits: &BTreeSet<String>) -> fmt::Result {
    if !traits.is_empty() {
        let joined: Vec<&str> = traits.iter().map(String::as_str).collect();
        write!(f, " [{}]", joined.join(", "))?;
    }
    Ok(())
}

impl fmt::Display for WeaponAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.damage_die)?;
        if self.damage_bonus != 0 {
            write!(f, "{:+}", self.damage_bonus)?;
        }
        if !self.damage_types.is_empty() {
            let joined: Vec<&str> = self.damage_types.iter().map(String::as_str).collect();
            write!(f, " {}", joined.join("/"))?;
        }
        write!(f, ", {:+} to hit", self.attack_bonus)?;
        if self.reach > 0 {
            write!(f, ", reach {} ft", self.reach)?;
        }
        if self.range > 0 {
            write!(f, ", range {} ft", self.range)?;
        }
        write_traits(f, &self.traits)
    }
}

impl fmt::Display for DefenseAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+} defense", self.defense_bonus)?;
        if self.speed_penalty != 0 {
            write!(f, ", -{} ft speed", self.speed_penalty)?;
        }
        if self.disadvantage {
            f.write_str(", disadvantage")?;
        }
        if self.damage_reduction {
            f.write_str(", damage reduction")?;
        }
        write_traits(f, &self.traits)
    }
}

impl fmt::Display for SpellFocusAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:+} spell check, {:+} spell attack, {:+} spell damage",
            self.spell_check_bonus, self.spell_attack_bonus, self.spell_damage_bonus
        )?;
        if self.range_bonus != 0 {
            write!(f, ", {:+} ft range", self.range_bonus)?;
        }
        write_traits(f, &self.traits)
    }
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeSet::Weapon(w) => w.fmt(f),
            AttributeSet::Armor(d) | AttributeSet::Shield(d) => d.fmt(f),
            AttributeSet::SpellFocus(s) => s.fmt(f),
        }
    }
}
