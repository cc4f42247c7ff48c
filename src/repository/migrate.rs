//! Snapshot schema migration.
//!
//! Stored snapshots carry a `version` field. Older data is upgraded one
//! version at a time on the raw JSON value before it is deserialized, so
//! the typed `Snapshot` only ever has to understand the current shape.
//!
//! Version history:
//!
//! - **1** (or no `version` field): builds kept their selection under
//!   `properties`; there was no `spellFocuses` collection.
//! - **2**: selection stored under `selectedProperties`; all four
//!   collections present.

use crate::category::Category;
use crate::error::{RepositoryError, RepositoryResult};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// The schema version written by this crate.
pub const CURRENT_VERSION: u64 = 2;

/// Version assumed for data without a `version` field.
const UNVERSIONED: u64 = 1;

type Step = fn(&mut Map<String, Value>);

/// Migration steps, keyed by the version they upgrade from.
const STEPS: &[(u64, Step)] = &[(1, v1_to_v2)];

/// Read the schema version of a raw snapshot object.
pub fn version_of(object: &Map<String, Value>) -> RepositoryResult<u64> {
    match object.get("version") {
        None | Some(Value::Null) => Ok(UNVERSIONED),
        Some(v) => v.as_u64().ok_or_else(|| {
            RepositoryError::Corrupt(format!("version must be a non-negative integer, found {}", v))
        }),
    }
}

/// Upgrade a raw snapshot to [`CURRENT_VERSION`].
///
/// Collections that are missing are left for the loader to default; the
/// migration only reshapes what is there.
///
/// # Examples
///
/// ```rust
/// use gearforge::repository::migrate::{migrate, CURRENT_VERSION};
/// use serde_json::json;
///
/// let old = json!({
///     "version": 1,
///     "weapons": [{"id": "w1", "category": "weapon", "properties": ["keen"]}],
///     "armor": [],
///     "shields": []
/// });
///
/// let upgraded = migrate(old).unwrap();
/// assert_eq!(upgraded["version"], CURRENT_VERSION);
/// assert_eq!(upgraded["weapons"][0]["selectedProperties"][0], "keen");
/// assert_eq!(upgraded["spellFocuses"], json!([]));
/// ```
pub fn migrate(value: Value) -> RepositoryResult<Value> {
    let Value::Object(mut object) = value else {
        return Err(RepositoryError::Corrupt(
            "snapshot must be a JSON object".into(),
        ));
    };

    let version = version_of(&object)?;
    if version > CURRENT_VERSION {
        return Err(RepositoryError::UnsupportedVersion {
            found: version,
            supported: CURRENT_VERSION,
        });
    }
    if version == CURRENT_VERSION {
        return Ok(Value::Object(object));
    }

    for (step_from, step) in STEPS {
        if version <= *step_from {
            step(&mut object);
            debug!(from = *step_from, "applied snapshot migration step");
        }
    }
    object.insert("version".into(), Value::from(CURRENT_VERSION));
    info!(from = version, to = CURRENT_VERSION, "migrated stored snapshot");

    Ok(Value::Object(object))
}

fn v1_to_v2(object: &mut Map<String, Value>) {
    for category in Category::ALL {
        let Some(Value::Array(builds)) = object.get_mut(category.collection_key()) else {
            continue;
        };
        for build in builds.iter_mut() {
            let Value::Object(fields) = build else {
                continue;
            };
            if !fields.contains_key("selectedProperties") {
                if let Some(selection) = fields.remove("properties") {
                    fields.insert("selectedProperties".into(), selection);
                }
            }
        }
    }

    object
        .entry(Category::SpellFocus.collection_key())
        .or_insert_with(|| Value::Array(Vec::new()));
}
