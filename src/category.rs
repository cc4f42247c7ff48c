//! Equipment categories and type traits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of equipment categories.
///
/// Every catalog, build and snapshot collection belongs to exactly one
/// category. The four categories share the validation algorithm and differ
/// only in which stats their modifiers may target and in the shape of the
/// derived attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Weapon,
    Armor,
    Shield,
    SpellFocus,
}

impl Category {
    /// All categories, in snapshot order.
    pub const ALL: [Category; 4] = [
        Category::Weapon,
        Category::Armor,
        Category::Shield,
        Category::SpellFocus,
    ];

    /// The key under which this category's builds are stored in a snapshot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gearforge::Category;
    ///
    /// assert_eq!(Category::Weapon.collection_key(), "weapons");
    /// assert_eq!(Category::SpellFocus.collection_key(), "spellFocuses");
    /// ```
    pub fn collection_key(self) -> &'static str {
        match self {
            Category::Weapon => "weapons",
            Category::Armor => "armor",
            Category::Shield => "shields",
            Category::SpellFocus => "spellFocuses",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Weapon => "weapon",
            Category::Armor => "armor",
            Category::Shield => "shield",
            Category::SpellFocus => "spell focus",
        };
        f.write_str(name)
    }
}

/// Subtype marker carried by an equipment type.
///
/// Scoping predicates on properties are expressed in terms of these traits,
/// e.g. a property that is only legal on light armor is scoped to
/// `TypeTrait::Light`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeTrait {
    Light,
    Medium,
    Heavy,
    Melee,
    Ranged,
    Thrown,
    OneHanded,
    TwoHanded,
    Versatile,
}

impl fmt::Display for TypeTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTrait::Light => "light",
            TypeTrait::Medium => "medium",
            TypeTrait::Heavy => "heavy",
            TypeTrait::Melee => "melee",
            TypeTrait::Ranged => "ranged",
            TypeTrait::Thrown => "thrown",
            TypeTrait::OneHanded => "one-handed",
            TypeTrait::TwoHanded => "two-handed",
            TypeTrait::Versatile => "versatile",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_keys_are_distinct() {
        let keys: std::collections::BTreeSet<_> =
            Category::ALL.iter().map(|c| c.collection_key()).collect();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_category_serde_matches_camel_case() {
        let json = serde_json::to_string(&Category::SpellFocus).unwrap();
        assert_eq!(json, "\"spellFocus\"");
    }

    #[test]
    fn test_trait_display() {
        assert_eq!(TypeTrait::TwoHanded.to_string(), "two-handed");
    }
}
