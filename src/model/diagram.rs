//! Diagram container.
//!
//! The `Diagram` struct holds entities and relationships and provides
//! methods for querying and manipulating the graph structure before layout.

use super::{Entity, EntityId, Relationship};
use crate::layout::{Classification, LayerClassifier};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A diagram containing entities and directed relationships.
///
/// Maintains:
/// - An insertion-ordered set of entities
/// - A list of relationships in declaration order
/// - The set of lone entities (entities with no relationships), tracked
///   separately because the layout places them in a trailing layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagram {
    /// All entities, indexed by name. IndexMap preserves declaration order.
    #[serde(with = "indexmap::map::serde_seq")]
    entities: IndexMap<EntityId, Entity>,

    /// All relationships, in declaration order.
    relationships: Vec<Relationship>,

    /// Entities that appear in no relationship.
    lone_entities: IndexSet<EntityId>,
}

impl Diagram {
    /// Create a new empty diagram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a diagram with pre-allocated capacity.
    pub fn with_capacity(entity_capacity: usize, relationship_capacity: usize) -> Self {
        Self {
            entities: IndexMap::with_capacity(entity_capacity),
            relationships: Vec::with_capacity(relationship_capacity),
            lone_entities: IndexSet::new(),
        }
    }

    // =========================================================================
    // Entity operations
    // =========================================================================

    /// Add an entity to the diagram.
    ///
    /// If an entity with the same name already exists, this is a no-op.
    pub fn add_entity(&mut self, entity: Entity) {
        let name = entity.name.clone();
        let is_new = !self.entities.contains_key(&name);
        self.entities.entry(name.clone()).or_insert(entity);
        if is_new && !self.has_relationship_for(&name) {
            self.lone_entities.insert(name);
        }
    }

    /// Add an entity by name, creating it if it doesn't exist.
    pub fn add_entity_by_name(&mut self, name: impl Into<EntityId>) -> &Entity {
        let name = name.into();
        if !self.entities.contains_key(&name) && !self.has_relationship_for(&name) {
            self.lone_entities.insert(name.clone());
        }
        self.entities
            .entry(name.clone())
            .or_insert_with(|| Entity::new(name))
    }

    /// Get an entity by name.
    pub fn get_entity(&self, name: &EntityId) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Get an entity mutably by name.
    pub fn get_entity_mut(&mut self, name: &EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(name)
    }

    /// Check if an entity exists in the diagram.
    pub fn contains_entity(&self, name: &EntityId) -> bool {
        self.entities.contains_key(name)
    }

    /// Get the number of entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Iterate over all entities in declaration order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Iterate over all entity names in declaration order.
    pub fn entity_names(&self) -> impl Iterator<Item = &EntityId> {
        self.entities.keys()
    }

    /// Get the lone entities (entities with no relationships).
    pub fn lone_entities(&self) -> &IndexSet<EntityId> {
        &self.lone_entities
    }

    // =========================================================================
    // Relationship operations
    // =========================================================================

    /// Add a relationship to the diagram.
    ///
    /// Both endpoint entities are created if they don't already exist.
    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.entities
            .entry(relationship.from.clone())
            .or_insert_with(|| Entity::new(relationship.from.clone()));
        self.entities
            .entry(relationship.to.clone())
            .or_insert_with(|| Entity::new(relationship.to.clone()));

        self.lone_entities.shift_remove(&relationship.from);
        self.lone_entities.shift_remove(&relationship.to);

        self.relationships.push(relationship);
    }

    /// Get the number of relationships.
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Iterate over all relationships in declaration order.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    /// Get relationships as a slice.
    pub fn relationships_slice(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Remove exact duplicate relationships (same endpoints, same
    /// orientation, same label), keeping the first occurrence of each.
    ///
    /// Returns the number of duplicates removed. Note that the layout
    /// engine coalesces duplicates itself, so this is a convenience for
    /// callers that want a clean relationship list, not a prerequisite.
    pub fn deduplicate_relationships(&mut self) -> usize {
        let original_count = self.relationships.len();
        let mut seen = HashSet::new();
        self.relationships.retain(|rel| {
            seen.insert((rel.from.clone(), rel.to.clone(), rel.label.clone()))
        });
        original_count - self.relationships.len()
    }

    // =========================================================================
    // Query operations
    // =========================================================================

    /// Get the degree of an entity (number of incident relationships).
    pub fn degree(&self, name: &EntityId) -> usize {
        self.relationships
            .iter()
            .filter(|rel| &rel.from == name || &rel.to == name)
            .count()
    }

    /// Get the neighbors of an entity, in either relationship direction.
    pub fn neighbors(&self, name: &EntityId) -> HashSet<&EntityId> {
        self.relationships
            .iter()
            .filter_map(|rel| {
                if &rel.from == name {
                    Some(&rel.to)
                } else if &rel.to == name {
                    Some(&rel.from)
                } else {
                    None
                }
            })
            .collect()
    }

    fn has_relationship_for(&self, name: &EntityId) -> bool {
        self.relationships
            .iter()
            .any(|rel| &rel.from == name || &rel.to == name)
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Classify this diagram's entities into layers using the default
    /// classifier configuration.
    pub fn classify(&self) -> Classification {
        let entities: Vec<Entity> = self.entities.values().cloned().collect();
        LayerClassifier::new().classify(&entities, &self.relationships)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagram_creation() {
        let diagram = Diagram::new();
        assert_eq!(diagram.entity_count(), 0);
        assert_eq!(diagram.relationship_count(), 0);
    }

    #[test]
    fn test_add_relationship_creates_entities() {
        let mut diagram = Diagram::new();
        diagram.add_relationship(Relationship::new("users", "orders"));

        assert_eq!(diagram.entity_count(), 2);
        assert_eq!(diagram.relationship_count(), 1);
        assert!(diagram.contains_entity(&EntityId::new("users")));
        assert!(diagram.contains_entity(&EntityId::new("orders")));
    }

    #[test]
    fn test_degree() {
        let mut diagram = Diagram::new();
        diagram.add_relationship(Relationship::new("a", "b"));
        diagram.add_relationship(Relationship::new("a", "c"));
        diagram.add_relationship(Relationship::new("b", "c"));

        assert_eq!(diagram.degree(&EntityId::new("a")), 2);
        assert_eq!(diagram.degree(&EntityId::new("b")), 2);
        assert_eq!(diagram.degree(&EntityId::new("c")), 2);
    }

    #[test]
    fn test_neighbors() {
        let mut diagram = Diagram::new();
        diagram.add_relationship(Relationship::new("a", "b"));
        diagram.add_relationship(Relationship::new("c", "a"));

        let neighbors = diagram.neighbors(&EntityId::new("a"));
        assert_eq!(neighbors.len(), 2);
        assert!(neighbors.contains(&EntityId::new("b")));
        assert!(neighbors.contains(&EntityId::new("c")));
    }

    #[test]
    fn test_lone_entity_tracking() {
        let mut diagram = Diagram::new();
        diagram.add_entity(Entity::new("floating"));
        diagram.add_relationship(Relationship::new("a", "b"));

        assert_eq!(diagram.entity_count(), 3);
        assert!(diagram.lone_entities().contains(&EntityId::new("floating")));
        assert!(!diagram.lone_entities().contains(&EntityId::new("a")));
    }

    #[test]
    fn test_lone_entity_cleared_by_relationship() {
        let mut diagram = Diagram::new();
        diagram.add_entity(Entity::new("a"));
        assert!(diagram.lone_entities().contains(&EntityId::new("a")));

        diagram.add_relationship(Relationship::new("a", "b"));
        assert!(diagram.lone_entities().is_empty());
    }

    #[test]
    fn test_deduplicate_relationships() {
        let mut diagram = Diagram::new();
        diagram.add_relationship(Relationship::new("a", "b"));
        diagram.add_relationship(Relationship::new("a", "b"));
        diagram.add_relationship(Relationship::new("b", "a"));

        let removed = diagram.deduplicate_relationships();
        // Exact duplicate removed; the reversed orientation is a distinct record.
        assert_eq!(removed, 1);
        assert_eq!(diagram.relationship_count(), 2);
    }
}
