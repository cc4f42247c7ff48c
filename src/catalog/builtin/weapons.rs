use crate::catalog::{Catalog, EquipmentType, Property};
use crate::category::{Category, TypeTrait};
use crate::stat::{Modifier, Stat};

/// Reference weapon catalog.
pub fn weapons() -> Catalog {
    Catalog::builder(Category::Weapon)
        .with_type(
            EquipmentType::new("light-melee", 3)
                .named("Light Melee Weapon")
                .with_traits([TypeTrait::Light, TypeTrait::Melee, TypeTrait::OneHanded])
                .with_base(Modifier::amount(Stat::DamageDie, 4))
                .with_base(Modifier::amount(Stat::Reach, 5)),
        )
        .with_type(
            EquipmentType::new("versatile-melee", 4)
                .named("Versatile Melee Weapon")
                .with_traits([TypeTrait::Melee, TypeTrait::OneHanded, TypeTrait::Versatile])
                .with_base(Modifier::amount(Stat::DamageDie, 6))
                .with_base(Modifier::amount(Stat::Reach, 5)),
        )
        .with_type(
            EquipmentType::new("heavy-melee", 5)
                .named("Heavy Melee Weapon")
                .with_traits([TypeTrait::Heavy, TypeTrait::Melee, TypeTrait::TwoHanded])
                .with_base(Modifier::amount(Stat::DamageDie, 8))
                .with_base(Modifier::amount(Stat::Reach, 5))
                .granting("two-handed-grip"),
        )
        .with_type(
            EquipmentType::new("thrown", 3)
                .named("Thrown Weapon")
                .with_traits([TypeTrait::Light, TypeTrait::Thrown, TypeTrait::OneHanded])
                .with_base(Modifier::amount(Stat::DamageDie, 4))
                .with_base(Modifier::amount(Stat::Range, 20)),
        )
        .with_type(
            EquipmentType::new("ranged", 4)
                .named("Ranged Weapon")
                .with_traits([TypeTrait::Ranged, TypeTrait::TwoHanded])
                .with_base(Modifier::amount(Stat::DamageDie, 6))
                .with_base(Modifier::amount(Stat::Range, 80))
                .granting("ammunition"),
        )
        .with_property(
            Property::new("two-handed-grip", 0)
                .named("Two-Handed Grip")
                .only_on([TypeTrait::TwoHanded])
                .modifies_amount(Stat::DamageBonus, 1),
        )
        .with_property(
            Property::new("ammunition", 0)
                .named("Ammunition")
                .only_on([TypeTrait::Ranged])
                .modifies_tag(Stat::Traits, "ammunition"),
        )
        .with_property(
            Property::new("slashing", 0)
                .named("Slashing")
                .excludes(["piercing", "bludgeoning"])
                .modifies_tag(Stat::DamageType, "slashing"),
        )
        .with_property(
            Property::new("piercing", 0)
                .named("Piercing")
                .excludes(["slashing", "bludgeoning"])
                .modifies_tag(Stat::DamageType, "piercing"),
        )
        .with_property(
            Property::new("bludgeoning", 0)
                .named("Bludgeoning")
                .excludes(["slashing", "piercing"])
                .modifies_tag(Stat::DamageType, "bludgeoning"),
        )
        .with_property(
            Property::new("finesse", 1)
                .named("Finesse")
                .not_on([TypeTrait::Heavy])
                .modifies_tag(Stat::Traits, "finesse"),
        )
        .with_property(
            Property::new("keen", 1)
                .named("Keen")
                .max_stacks(2)
                .excludes(["crude"])
                .modifies_amount(Stat::AttackBonus, 1),
        )
        .with_property(
            Property::new("brutal", 2)
                .named("Brutal")
                .max_stacks(2)
                .only_on([TypeTrait::Melee])
                .modifies_amount(Stat::DamageDie, 2),
        )
        .with_property(
            Property::new("reach", 1)
                .named("Reach")
                .only_on([TypeTrait::Melee])
                .not_on([TypeTrait::Light])
                .modifies_amount(Stat::Reach, 5),
        )
        .with_property(
            Property::new("long-range", 1)
                .named("Long Range")
                .max_stacks(3)
                .only_on([TypeTrait::Ranged, TypeTrait::Thrown])
                .modifies_amount(Stat::Range, 30),
        )
        .with_property(
            Property::new("paired", 1)
                .named("Paired")
                .only_on([TypeTrait::Light])
                .pairs_with(["off-hand-balance"])
                .modifies_tag(Stat::Traits, "paired"),
        )
        .with_property(
            Property::new("off-hand-balance", 1)
                .named("Off-Hand Balance")
                .only_on([TypeTrait::Light])
                .modifies_tag(Stat::Traits, "off-hand"),
        )
        .with_property(
            Property::new("runed", 1)
                .named("Runed")
                .modifies_tag(Stat::Traits, "runed"),
        )
        .with_property(
            Property::new("flaming", 2)
                .named("Flaming")
                .requires(["runed"])
                .modifies_tag(Stat::DamageType, "fire"),
        )
        .with_property(
            Property::new("crude", -1)
                .named("Crude")
                .modifies_amount(Stat::AttackBonus, -1),
        )
        .with_property(
            Property::new("unwieldy", -1)
                .named("Unwieldy")
                .not_on([TypeTrait::Light])
                .modifies_tag(Stat::Traits, "unwieldy"),
        )
        .build()
}
