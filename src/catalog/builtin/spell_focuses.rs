use crate::catalog::{Catalog, EquipmentType, Property};
use crate::category::{Category, TypeTrait};
use crate::stat::{Modifier, Stat};

/// Reference spell focus catalog.
///
/// Two-handed foci carry a larger budget than one-handed ones.
pub fn spell_focuses() -> Catalog {
    Catalog::builder(Category::SpellFocus)
        .with_type(
            EquipmentType::new("wand", 3)
                .named("Wand")
                .with_traits([TypeTrait::Light, TypeTrait::OneHanded])
                .with_base(Modifier::amount(Stat::SpellAttackBonus, 1)),
        )
        .with_type(
            EquipmentType::new("orb", 3)
                .named("Orb")
                .with_traits([TypeTrait::OneHanded])
                .with_base(Modifier::amount(Stat::SpellCheckBonus, 1)),
        )
        .with_type(
            EquipmentType::new("staff", 5)
                .named("Staff")
                .with_traits([TypeTrait::TwoHanded])
                .with_base(Modifier::amount(Stat::SpellCheckBonus, 1))
                .with_base(Modifier::amount(Stat::RangeBonus, 10))
                .granting("channeling"),
        )
        .with_property(
            Property::new("channeling", 0)
                .named("Channeling")
                .only_on([TypeTrait::TwoHanded])
                .modifies_amount(Stat::SpellDamageBonus, 1),
        )
        .with_property(
            Property::new("attuned", 1)
                .named("Attuned")
                .max_stacks(3)
                .modifies_amount(Stat::SpellCheckBonus, 1),
        )
        .with_property(
            Property::new("precise", 1)
                .named("Precise")
                .max_stacks(2)
                .modifies_amount(Stat::SpellAttackBonus, 1),
        )
        .with_property(
            Property::new("potent", 2)
                .named("Potent")
                .max_stacks(2)
                .requires(["attuned"])
                .modifies_amount(Stat::SpellDamageBonus, 1),
        )
        .with_property(
            Property::new("far-reaching", 1)
                .named("Far-Reaching")
                .max_stacks(2)
                .modifies_amount(Stat::RangeBonus, 30),
        )
        .with_property(
            Property::new("fire-bound", 1)
                .named("Fire-Bound")
                .excludes(["frost-bound"])
                .modifies_tag(Stat::Traits, "fire"),
        )
        .with_property(
            Property::new("frost-bound", 1)
                .named("Frost-Bound")
                .excludes(["fire-bound"])
                .modifies_tag(Stat::Traits, "frost"),
        )
        .with_property(
            Property::new("twin-focus", 1)
                .named("Twin Focus")
                .only_on([TypeTrait::OneHanded])
                .pairs_with(["mirrored"])
                .modifies_tag(Stat::Traits, "twin"),
        )
        .with_property(
            Property::new("mirrored", 1)
                .named("Mirrored")
                .only_on([TypeTrait::OneHanded])
                .modifies_tag(Stat::Traits, "mirrored"),
        )
        .with_property(
            Property::new("stable", 1)
                .named("Stable")
                .excludes(["volatile"])
                .modifies_tag(Stat::Traits, "stable"),
        )
        .with_property(
            Property::new("volatile", -1)
                .named("Volatile")
                .modifies_amount(Stat::SpellCheckBonus, -1),
        )
        .build()
}
