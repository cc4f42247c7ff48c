//! Forge example: composing and validating a build step by step
//!
//! This example demonstrates:
//! - Picking a type from a reference catalog
//! - Watching validation errors appear and disappear
//! - Deriving final attributes with a per-stat breakdown

use gearforge::catalog::builtin;
use gearforge::*;

fn show(build: &Build, catalog: &Catalog) -> ValidationResult {
    let result = validate(build, catalog);
    println!(
        "  {} point(s) of {} | {}",
        result.points_spent,
        build.max_points,
        if result.is_valid { "legal" } else { "illegal" }
    );
    for error in &result.errors {
        println!("    error [{:?}]: {}", error.rule, error);
    }
    for warning in &result.warnings {
        println!("    warning: {}", warning);
    }
    result
}

fn main() -> Result<(), ForgeError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let catalog = builtin::weapons();
    catalog.check_integrity()?;

    println!("Available on a heavy melee weapon:");
    for property in catalog.properties_for(&TypeId::new("heavy-melee")) {
        println!("  - {} ({} pt)", property.name, property.cost);
    }

    let Some(mut build) = Build::for_type(&catalog, "heavy-melee", "Headsman's Axe") else {
        return Ok(());
    };

    println!("\nSelecting slashing and brutal twice:");
    build.add_property("slashing");
    build.add_property("brutal");
    build.add_property("brutal");
    show(&build, &catalog);

    println!("\nAdding flaming without runes:");
    build.add_property("flaming");
    show(&build, &catalog);

    println!("\nTrading one brutal for runed, and taking the unwieldy drawback:");
    build.remove_property(&PropertyId::new("brutal"));
    build.add_property("runed");
    build.add_property("unwieldy");
    show(&build, &catalog);

    let validated = ValidatedBuild::new(&build, &catalog)?;
    println!("\n=== {} ===", build.name);
    println!("{}", derive_attributes(&validated));

    println!("\nBreakdown:");
    for stat in derive_breakdown(&validated) {
        println!("  {}: {}", stat.stat, stat.value);
        for (source, amount) in &stat.sources {
            println!("    {:+} from {}", amount, source);
        }
    }

    Ok(())
}
