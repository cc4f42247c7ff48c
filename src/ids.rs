//! Identifier types.
//!
//! Properties, equipment types and builds are all referred to by interned
//! string identifiers. Each identifier wraps an `Arc<str>` so clones are
//! cheap and comparison is by content.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Create a new identifier from a string slice.
            pub fn new(s: &str) -> Self {
                Self(Arc::from(s))
            }

            /// Get the string representation of this identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                self.0.as_ref().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Ok($name::from(s))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(Arc::from(s))
            }
        }

        impl From<&$name> for $name {
            fn from(id: &$name) -> Self {
                id.clone()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

interned_id!(
    /// Identifier of a property, unique within its category's catalog.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gearforge::PropertyId;
    ///
    /// let keen = PropertyId::new("keen");
    /// let keen2: PropertyId = "keen".into();
    /// assert_eq!(keen, keen2);
    /// assert_eq!(keen.as_str(), "keen");
    /// ```
    PropertyId
);

interned_id!(
    /// Identifier of an equipment type within a category.
    TypeId
);

interned_id!(
    /// Identifier of a saved build.
    BuildId
);

impl BuildId {
    /// Generate a fresh random build identifier.
    pub fn generate() -> Self {
        Self::from(uuid::Uuid::new_v4().to_string())
    }
}
