use crate::catalog::{Catalog, EquipmentType, Property};
use crate::category::{Category, TypeTrait};
use crate::stat::{Modifier, Stat};

/// Reference armor catalog.
pub fn armor() -> Catalog {
    Catalog::builder(Category::Armor)
        .with_type(
            EquipmentType::new("light-armor", 3)
                .named("Light Armor")
                .with_traits([TypeTrait::Light])
                .with_base(Modifier::amount(Stat::DefenseBonus, 1)),
        )
        .with_type(
            EquipmentType::new("medium-armor", 4)
                .named("Medium Armor")
                .with_traits([TypeTrait::Medium])
                .with_base(Modifier::amount(Stat::DefenseBonus, 3)),
        )
        .with_type(
            EquipmentType::new("heavy-armor", 5)
                .named("Heavy Armor")
                .with_traits([TypeTrait::Heavy])
                .with_base(Modifier::amount(Stat::DefenseBonus, 5))
                .with_base(Modifier::amount(Stat::SpeedPenalty, 10))
                .with_base(Modifier::flag(Stat::Disadvantage)),
        )
        .with_property(
            Property::new("reinforced", 2)
                .named("Reinforced")
                .max_stacks(2)
                .not_on([TypeTrait::Light])
                .modifies_amount(Stat::DefenseBonus, 1),
        )
        .with_property(
            Property::new("hardened", 2)
                .named("Hardened")
                .only_on([TypeTrait::Heavy])
                .requires(["reinforced"])
                .modifies_flag(Stat::DamageReduction),
        )
        .with_property(
            Property::new("supple", 1)
                .named("Supple")
                .only_on([TypeTrait::Light])
                .modifies_tag(Stat::Traits, "supple"),
        )
        .with_property(
            Property::new("padded", 1)
                .named("Padded")
                .not_on([TypeTrait::Heavy])
                .modifies_amount(Stat::DefenseBonus, 1),
        )
        .with_property(
            Property::new("lightweight", 2)
                .named("Lightweight")
                .not_on([TypeTrait::Light])
                .excludes(["heavyweight"])
                .modifies_amount(Stat::SpeedPenalty, -5),
        )
        .with_property(
            Property::new("heavyweight", -1)
                .named("Heavyweight")
                .modifies_amount(Stat::SpeedPenalty, 5),
        )
        .with_property(
            Property::new("silent", 1)
                .named("Silent")
                .excludes(["noisy"])
                .modifies_tag(Stat::Traits, "silent"),
        )
        .with_property(
            Property::new("noisy", -1)
                .named("Noisy")
                .not_on([TypeTrait::Heavy])
                .modifies_flag(Stat::Disadvantage),
        )
        .with_property(
            Property::new("climate-lined", 1)
                .named("Climate-Lined")
                .modifies_tag(Stat::Traits, "climate-lined"),
        )
        .build()
}
