use gearforge::catalog::builtin;
use gearforge::repository::{BuildRepository, FileStore, MemoryStore, Store};
use gearforge::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const KEY: &str = "gearforge.builds";

/// One validated build per category.
fn populated_repo() -> BuildRepository<MemoryStore> {
    let repo = BuildRepository::new(MemoryStore::new());
    let gear: [(Category, &str, &[&str]); 4] = [
        (Category::Weapon, "versatile-melee", &["slashing", "keen"]),
        (Category::Armor, "light-armor", &["supple", "silent"]),
        (Category::Shield, "buckler", &["parrying"]),
        (Category::SpellFocus, "staff", &["attuned", "attuned", "fire-bound"]),
    ];
    for (category, type_id, properties) in gear {
        let catalog = builtin::for_category(category);
        let build = Build::for_type(&catalog, type_id, type_id)
            .unwrap()
            .with_properties(properties.iter().copied());
        let validated = ValidatedBuild::new(&build, &catalog).unwrap();
        repo.save_validated(&validated).unwrap();
    }
    repo
}

#[test]
fn test_save_get_delete() {
    let repo = BuildRepository::new(MemoryStore::new());
    let catalog = builtin::armor();
    let build = Build::for_type(&catalog, "heavy-armor", "Plate").unwrap();
    let id = build.id.clone();

    let saved = repo.save(build).unwrap();
    assert_eq!(saved.created_at, saved.updated_at);

    let fetched = repo.get(Category::Armor, &id).unwrap().unwrap();
    assert_eq!(fetched, saved);
    assert!(repo.get(Category::Weapon, &id).unwrap().is_none());

    assert!(repo.delete(Category::Armor, &id).unwrap());
    assert!(repo.get(Category::Armor, &id).unwrap().is_none());
    assert!(!repo.delete(Category::Armor, &id).unwrap());
}

#[test]
fn test_save_validated_caches_points() {
    let repo = BuildRepository::new(MemoryStore::new());
    let catalog = builtin::weapons();
    let build = Build::for_type(&catalog, "light-melee", "Dirk")
        .unwrap()
        .with_properties(["piercing", "keen", "keen", "crude"]);
    assert_eq!(build.points_spent, 0);

    // keen excludes crude, so fix the build first
    assert!(ValidatedBuild::new(&build, &catalog).is_err());
    let mut build = build;
    build.remove_property(&PropertyId::new("crude"));

    let validated = ValidatedBuild::new(&build, &catalog).unwrap();
    let saved = repo.save_validated(&validated).unwrap();
    assert_eq!(saved.points_spent, 2);
    assert_eq!(repo.list(Category::Weapon).unwrap()[0].points_spent, 2);
}

#[test]
fn test_export_import_round_trip() {
    let repo = populated_repo();
    let exported = repo.export_snapshot().unwrap();

    let other = BuildRepository::new(MemoryStore::new());
    let summary = other.import_snapshot(&exported).unwrap();
    assert_eq!(summary.total(), 4);
    for category in Category::ALL {
        assert_eq!(summary.count(category), 1);
    }

    assert_eq!(other.snapshot().unwrap(), repo.snapshot().unwrap());
    assert_eq!(other.export_snapshot().unwrap(), exported);
}

#[test]
fn test_rejected_import_leaves_store_untouched() {
    let repo = populated_repo();
    let before = repo.snapshot().unwrap();

    let bad_payloads = [
        "not json".to_string(),
        "[]".to_string(),
        json!({"weapons": [], "armor": [], "shields": [], "spellFocuses": []}).to_string(),
        json!({"version": 2, "weapons": [], "armor": [], "shields": []}).to_string(),
        json!({"version": 2, "weapons": [{"bogus": true}], "armor": [], "shields": [], "spellFocuses": []})
            .to_string(),
        json!({"version": 9, "weapons": [], "armor": [], "shields": [], "spellFocuses": []}).to_string(),
        json!({"version": 1, "weapons": [], "armor": [], "shields": []}).to_string(),
    ];

    for payload in &bad_payloads {
        assert!(repo.import_snapshot(payload).is_err(), "accepted {}", payload);
        assert_eq!(repo.snapshot().unwrap(), before);
    }

    match repo.import_snapshot(&bad_payloads[5]) {
        Err(RepositoryError::UnsupportedVersion { found, supported }) => {
            assert_eq!((found, supported), (9, 2));
        }
        other => panic!("expected UnsupportedVersion, got {:?}", other),
    }
}

#[test]
fn test_import_replaces_every_category() {
    let repo = populated_repo();
    let empty = json!({"version": 2, "weapons": [], "armor": [], "shields": [], "spellFocuses": []});

    let summary = repo.import_snapshot(&empty.to_string()).unwrap();
    assert_eq!(summary.total(), 0);
    for category in Category::ALL {
        assert!(repo.list(category).unwrap().is_empty());
    }
}

#[test]
fn test_offline_store_fails_without_data_loss() {
    let repo = populated_repo();
    let before = repo.snapshot().unwrap();

    repo.store().set_available(false);
    assert!(matches!(
        repo.save(Build::new(Category::Shield, "lost")),
        Err(RepositoryError::Store(_))
    ));
    assert!(repo.list(Category::Weapon).is_err());

    repo.store().set_available(true);
    assert_eq!(repo.snapshot().unwrap(), before);
}

#[test]
fn test_loads_version_one_data() {
    let store = MemoryStore::new();
    let legacy = json!({
        "weapons": [{
            "id": "old-sword",
            "name": "Old Sword",
            "category": "weapon",
            "type": "versatile-melee",
            "properties": ["slashing", "keen"],
            "maxPoints": 4
        }],
        "armor": [
            {"id": "vest", "name": "Vest", "category": "armor", "type": "light-armor", "properties": []},
            {"name": "missing id"}
        ]
    });
    store.write(KEY, &legacy.to_string()).unwrap();

    let repo = BuildRepository::new(store);
    let weapons = repo.list(Category::Weapon).unwrap();
    assert_eq!(weapons.len(), 1);
    assert_eq!(weapons[0].selected_properties.len(), 2);
    assert_eq!(repo.list(Category::Armor).unwrap().len(), 1);
    assert!(repo.list(Category::SpellFocus).unwrap().is_empty());

    let catalog = builtin::weapons();
    assert!(validate(&weapons[0], &catalog).is_valid);

    // The next write stores the current schema.
    repo.delete(Category::Armor, &BuildId::new("vest")).unwrap();
    let stored: Value = serde_json::from_str(&repo.store().read(KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored["version"], 2);
    assert_eq!(stored["weapons"][0]["selectedProperties"], json!(["slashing", "keen"]));
}

#[test]
fn test_file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let repo = BuildRepository::new(FileStore::new(dir.path()));
        let catalog = builtin::spell_focuses();
        let build = Build::for_type(&catalog, "orb", "Glass Orb")
            .unwrap()
            .with_properties(["precise", "stable"]);
        repo.save(build).unwrap().id
    };

    let repo = BuildRepository::new(FileStore::new(dir.path()));
    let loaded = repo.get(Category::SpellFocus, &id).unwrap().unwrap();
    assert_eq!(loaded.name, "Glass Orb");
    assert!(dir.path().join(format!("{}.json", KEY)).exists());
}

#[test]
fn test_concurrent_saves_are_all_kept() {
    use std::sync::Arc;
    use std::thread;

    let repo = Arc::new(BuildRepository::new(MemoryStore::new()));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                let build = Build::new(Category::Shield, format!("shield {}", i));
                repo.save(build).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(repo.list(Category::Shield).unwrap().len(), 8);
}

#[test]
fn test_repositories_sharing_a_directory_lose_no_saves() {
    use std::sync::Arc;
    use std::thread;

    let dir = tempfile::tempdir().unwrap();
    let first = Arc::new(BuildRepository::new(FileStore::new(dir.path())));
    let second = Arc::new(BuildRepository::new(FileStore::new(dir.path())));

    let handles: Vec<_> = (0..40)
        .map(|i| {
            let repo = if i % 2 == 0 { Arc::clone(&first) } else { Arc::clone(&second) };
            thread::spawn(move || {
                repo.save(Build::new(Category::Shield, format!("shield {}", i)))
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(first.list(Category::Shield).unwrap().len(), 40);
    assert_eq!(second.list(Category::Shield).unwrap().len(), 40);
}

#[test]
fn test_old_export_without_spell_focuses_is_rejected() {
    let repo = populated_repo();
    let before = repo.snapshot().unwrap();

    let legacy = json!({"version": 1, "weapons": [], "armor": [], "shields": []});
    match repo.import_snapshot(&legacy.to_string()) {
        Err(RepositoryError::MalformedSnapshot(msg)) => assert!(msg.contains("spellFocuses")),
        other => panic!("expected MalformedSnapshot, got {:?}", other),
    }
    assert_eq!(repo.snapshot().unwrap(), before);
}

#[test]
fn test_clear_then_import_restores() {
    let repo = populated_repo();
    let exported = repo.export_snapshot().unwrap();

    repo.clear().unwrap();
    assert!(repo.list(Category::Weapon).unwrap().is_empty());

    repo.import_snapshot(&exported).unwrap();
    assert_eq!(repo.export_snapshot().unwrap(), exported);
}
