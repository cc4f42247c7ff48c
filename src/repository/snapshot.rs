//! The persisted snapshot.
//!
//! A snapshot is the whole persisted state: a schema version and one build
//! collection per category. It is read in two modes:
//!
//! - **stored** data is loaded leniently: missing or damaged collections
//!   become empty and unreadable individual builds are skipped, so old or
//!   partially written state never prevents the repository from opening;
//! - **imported** data is checked strictly: anything that is not exactly
//!   the snapshot shape is rejected before it can replace the store.

use crate::build::Build;
use crate::category::Category;
use crate::error::{RepositoryError, RepositoryResult};
use crate::ids::BuildId;
use crate::repository::migrate::{self, CURRENT_VERSION};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Full persisted state across all four categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u64,
    #[serde(default)]
    pub weapons: Vec<Build>,
    #[serde(default)]
    pub armor: Vec<Build>,
    #[serde(default)]
    pub shields: Vec<Build>,
    #[serde(default)]
    pub spell_focuses: Vec<Build>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            weapons: Vec::new(),
            armor: Vec::new(),
            shields: Vec::new(),
            spell_focuses: Vec::new(),
        }
    }
}

impl Snapshot {
    /// The builds of one category.
    pub fn collection(&self, category: Category) -> &[Build] {
        match category {
            Category::Weapon => &self.weapons,
            Category::Armor => &self.armor,
            Category::Shield => &self.shields,
            Category::SpellFocus => &self.spell_focuses,
        }
    }

    pub fn collection_mut(&mut self, category: Category) -> &mut Vec<Build> {
        match category {
            Category::Weapon => &mut self.weapons,
            Category::Armor => &mut self.armor,
            Category::Shield => &mut self.shields,
            Category::SpellFocus => &mut self.spell_focuses,
        }
    }

    /// Number of builds per category.
    pub fn counts(&self) -> BTreeMap<Category, usize> {
        Category::ALL
            .iter()
            .map(|&c| (c, self.collection(c).len()))
            .collect()
    }

    /// Load stored data leniently.
    ///
    /// Fails only when the data is not a JSON object at all, or was written
    /// by a newer schema version.
    pub fn from_stored(text: &str) -> RepositoryResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| RepositoryError::Corrupt(format!("stored snapshot is not JSON: {}", e)))?;
        let Value::Object(mut object) = migrate::migrate(value)? else {
            return Err(RepositoryError::Corrupt("snapshot must be a JSON object".into()));
        };

        let mut snapshot = Snapshot::default();
        for category in Category::ALL {
            let key = category.collection_key();
            let builds = match object.remove(key) {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items,
                Some(other) => {
                    warn!(collection = key, found = %type_name(&other), "stored collection is not an array; treating as empty");
                    Vec::new()
                }
            };
            let collection = snapshot.collection_mut(category);
            for (index, item) in builds.into_iter().enumerate() {
                match serde_json::from_value::<Build>(item) {
                    Ok(build) => collection.push(build),
                    Err(e) => {
                        warn!(collection = key, index, error = %e, "skipping unreadable stored build");
                    }
                }
            }
        }
        Ok(snapshot)
    }

    /// Parse and structurally check an import payload.
    ///
    /// The payload must be an object with a `version` and all four
    /// collections, each an array of builds whose category matches the
    /// collection and whose ids are unique within it. The shape is checked
    /// as sent, before any migration, so an old export that lacks a
    /// collection is rejected rather than padded. Payloads from an older
    /// schema version are then migrated build by build. Build contents are
    /// not re-validated against a catalog.
    pub fn from_import(text: &str) -> RepositoryResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| RepositoryError::MalformedSnapshot(format!("not valid JSON: {}", e)))?;

        let Value::Object(object) = &value else {
            return Err(RepositoryError::MalformedSnapshot(format!(
                "expected an object, found {}",
                type_name(&value)
            )));
        };
        match object.get("version") {
            Some(v) if v.is_u64() => {}
            Some(v) => {
                return Err(RepositoryError::MalformedSnapshot(format!(
                    "version must be a non-negative integer, found {}",
                    v
                )))
            }
            None => {
                return Err(RepositoryError::MalformedSnapshot(
                    "missing version".into(),
                ))
            }
        }

        for category in Category::ALL {
            collection_items(object, category)?;
        }

        let Value::Object(object) = migrate::migrate(value)? else {
            return Err(RepositoryError::MalformedSnapshot("expected an object".into()));
        };

        let mut snapshot = Snapshot::default();
        for category in Category::ALL {
            *snapshot.collection_mut(category) = strict_collection(&object, category)?;
        }
        Ok(snapshot)
    }
}

fn collection_items(object: &Map<String, Value>, category: Category) -> RepositoryResult<&Vec<Value>> {
    let key = category.collection_key();
    match object.get(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(RepositoryError::MalformedSnapshot(format!(
            "{} must be an array, found {}",
            key,
            type_name(other)
        ))),
        None => Err(RepositoryError::MalformedSnapshot(format!(
            "missing collection {}",
            key
        ))),
    }
}

fn strict_collection(object: &Map<String, Value>, category: Category) -> RepositoryResult<Vec<Build>> {
    let key = category.collection_key();
    let items = collection_items(object, category)?;

    let mut seen: HashSet<BuildId> = HashSet::new();
    let mut builds = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let build = Build::deserialize(item)
            .map_err(|e| RepositoryError::MalformedSnapshot(format!("{}[{}]: {}", key, index, e)))?;
        if build.category != category {
            return Err(RepositoryError::MalformedSnapshot(format!(
                "{}[{}] is a {} build",
                key, index, build.category
            )));
        }
        if !seen.insert(build.id.clone()) {
            return Err(RepositoryError::MalformedSnapshot(format!(
                "{}[{}] repeats build id {}",
                key, index, build.id
            )));
        }
        builds.push(build);
    }
    Ok(builds)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
