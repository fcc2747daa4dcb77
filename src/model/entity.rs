//! Entity representation.
//!
//! An entity is a named box in the diagram. The layout engine only ever
//! reads the name; every other attribute is opaque and passes through the
//! pipeline untouched.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an entity.
///
/// Entity names are unique within one diagram, so the name is the identity.
/// The wrapper keeps every name concern in one place: ordering (the
/// lexicographic seed inside freshly-assigned layers), hashing for the
/// lookup tables, and bare-`&str` ergonomics at the public surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Create an id from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id, returning the owned name.
    pub fn into_string(self) -> String {
        self.0
    }
}

// Lets plain string slices address maps keyed by EntityId; this is what
// makes `Classification::layer_of` take a bare `&str`. Sound because the
// derived Hash delegates to the inner string.
impl std::borrow::Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for EntityId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EntityId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EntityId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// An entity in the diagram.
///
/// Carries the identifying name plus an ordered set of opaque attributes
/// (display name, styling, field lists serialized by the caller, ...).
/// The layout engine reads only [`Entity::name`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique name for this entity.
    pub name: EntityId,

    /// Opaque attributes, preserved in insertion order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
}

impl Entity {
    /// Create a new entity with the given name.
    pub fn new(name: impl Into<EntityId>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Set an attribute, replacing any previous value for the key.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Get an attribute value by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_creation() {
        let entity = Entity::new("users");
        assert_eq!(entity.name.as_str(), "users");
        assert!(entity.attributes.is_empty());
    }

    #[test]
    fn test_attributes_pass_through() {
        let mut entity = Entity::new("users");
        entity.set_attribute("color", "blue");
        entity.set_attribute("icon", "person");

        assert_eq!(entity.attribute("color"), Some("blue"));
        assert_eq!(entity.attribute("icon"), Some("person"));
        assert_eq!(entity.attribute("missing"), None);
    }

    #[test]
    fn test_entity_id_ordering() {
        let a = EntityId::new("a");
        let b = EntityId::new("b");
        let a2 = EntityId::new("a");

        assert!(a < b);
        assert_eq!(a, a2);
    }

    #[test]
    fn test_entity_id_compares_against_bare_strings() {
        let id = EntityId::new("users");
        assert_eq!(id, "users");
        assert_eq!(id.as_ref(), "users");
        assert_eq!(id.into_string(), "users");
    }
}
