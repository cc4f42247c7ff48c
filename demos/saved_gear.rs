//! Saved gear example: persisting builds and moving them between stores
//!
//! This example demonstrates:
//! - Saving validated builds to a file-backed repository
//! - Exporting the whole collection as one snapshot
//! - Importing it into a fresh in-memory repository
//!
//! Run with `RUST_LOG=gearforge=debug` to see repository logging.

use gearforge::catalog::builtin;
use gearforge::repository::{FileStore, MemoryStore};
use gearforge::*;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let dir = std::env::temp_dir().join("gearforge-demo");
    let repo = BuildRepository::new(FileStore::new(&dir));

    let wishlist: [(Category, &str, &str, &[&str]); 3] = [
        (Category::Armor, "medium-armor", "Scout's Mail", &["reinforced", "silent", "climate-lined"]),
        (Category::Shield, "buckler", "Duelist's Guard", &["parrying", "spiked"]),
        (Category::SpellFocus, "staff", "Emberstaff", &["attuned", "potent", "fire-bound", "volatile"]),
    ];

    for (category, type_id, name, properties) in wishlist {
        let catalog = builtin::for_category(category);
        let Some(build) = Build::for_type(&catalog, type_id, name) else {
            continue;
        };
        let build = build.with_properties(properties.iter().copied());

        match ValidatedBuild::new(&build, &catalog) {
            Ok(validated) => {
                let saved = repo.save_validated(&validated)?;
                println!("Saved {} ({} pts): {}", saved.name, saved.points_spent, derive_attributes(&validated));
            }
            Err(ForgeError::InvalidBuild(result)) => {
                println!("Rejected {}:", name);
                for error in &result.errors {
                    println!("  - {}", error);
                }
            }
            Err(other) => return Err(other.into()),
        }
    }

    println!("\nStored in {}", dir.display());
    let exported = repo.export_snapshot()?;
    println!("Exported snapshot:\n{}", exported);

    let copy = BuildRepository::new(MemoryStore::new());
    let summary = copy.import_snapshot(&exported)?;
    println!("\nImported {} build(s) into memory:", summary.total());
    for (category, count) in &summary.counts {
        println!("  {}: {}", category, count);
    }

    Ok(())
}
