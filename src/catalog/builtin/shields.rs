use crate::catalog::{Catalog, EquipmentType, Property};
use crate::category::{Category, TypeTrait};
use crate::stat::{Modifier, Stat};

/// Reference shield catalog.
pub fn shields() -> Catalog {
    Catalog::builder(Category::Shield)
        .with_type(
            EquipmentType::new("buckler", 2)
                .named("Buckler")
                .with_traits([TypeTrait::Light, TypeTrait::OneHanded])
                .with_base(Modifier::amount(Stat::DefenseBonus, 1)),
        )
        .with_type(
            EquipmentType::new("standard-shield", 3)
                .named("Standard Shield")
                .with_traits([TypeTrait::Medium, TypeTrait::OneHanded])
                .with_base(Modifier::amount(Stat::DefenseBonus, 2)),
        )
        .with_type(
            EquipmentType::new("tower-shield", 4)
                .named("Tower Shield")
                .with_traits([TypeTrait::Heavy, TypeTrait::OneHanded])
                .with_base(Modifier::amount(Stat::DefenseBonus, 4))
                .with_base(Modifier::amount(Stat::SpeedPenalty, 5))
                .with_base(Modifier::flag(Stat::Disadvantage))
                .granting("cover"),
        )
        .with_property(
            Property::new("cover", 0)
                .named("Cover")
                .only_on([TypeTrait::Heavy])
                .modifies_tag(Stat::Traits, "cover"),
        )
        .with_property(
            Property::new("reinforced-rim", 1)
                .named("Reinforced Rim")
                .max_stacks(2)
                .not_on([TypeTrait::Light])
                .modifies_amount(Stat::DefenseBonus, 1),
        )
        .with_property(
            Property::new("deflecting", 2)
                .named("Deflecting")
                .requires(["reinforced-rim"])
                .modifies_flag(Stat::DamageReduction),
        )
        .with_property(
            Property::new("parrying", 1)
                .named("Parrying")
                .only_on([TypeTrait::Light])
                .excludes(["cumbersome"])
                .modifies_amount(Stat::DefenseBonus, 1),
        )
        .with_property(
            Property::new("spiked", 1)
                .named("Spiked")
                .modifies_tag(Stat::Traits, "spiked"),
        )
        .with_property(
            Property::new("strapped", 1)
                .named("Strapped")
                .only_on([TypeTrait::OneHanded])
                .modifies_tag(Stat::Traits, "strapped"),
        )
        .with_property(
            Property::new("cumbersome", -1)
                .named("Cumbersome")
                .not_on([TypeTrait::Light])
                .modifies_amount(Stat::SpeedPenalty, 5),
        )
        .build()
}
