//! Classification result.
//!
//! The layered partition handed to downstream collaborators: an ordered
//! layer sequence (horizontal index grows left to right, position within a
//! layer is the vertical order top to bottom) plus a per-entity layer
//! lookup covering every input entity exactly once.

use crate::model::EntityId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A layered partition of the input entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Ordered layers; each layer is an ordered sequence of entity names.
    layers: Vec<Vec<EntityId>>,

    /// Layer index per entity, in layer-then-position order.
    #[serde(with = "indexmap::map::serde_seq")]
    index: IndexMap<EntityId, usize>,
}

impl Classification {
    /// Build a classification from a layer sequence, deriving the lookup.
    pub fn from_layers(layers: Vec<Vec<EntityId>>) -> Self {
        let mut index = IndexMap::new();
        for (layer_index, layer) in layers.iter().enumerate() {
            for entity in layer {
                index.insert(entity.clone(), layer_index);
            }
        }
        Self { layers, index }
    }

    /// The ordered layer sequence.
    pub fn layers(&self) -> &[Vec<EntityId>] {
        &self.layers
    }

    /// One layer's entities, top to bottom.
    pub fn layer(&self, index: usize) -> Option<&[EntityId]> {
        self.layers.get(index).map(Vec::as_slice)
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Total number of classified entities.
    pub fn entity_count(&self) -> usize {
        self.index.len()
    }

    /// The layer index of an entity, if it was part of the input.
    pub fn layer_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// The full entity -> layer lookup, in layer-then-position order.
    pub fn index(&self) -> &IndexMap<EntityId, usize> {
        &self.index
    }

    /// Whether the classification holds no entities.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<EntityId> {
        names.iter().map(|&name| EntityId::new(name)).collect()
    }

    #[test]
    fn test_from_layers_builds_lookup() {
        let classification =
            Classification::from_layers(vec![ids(&["a"]), ids(&["b", "c"]), ids(&["d"])]);

        assert_eq!(classification.layer_count(), 3);
        assert_eq!(classification.entity_count(), 4);
        assert_eq!(classification.layer_of("a"), Some(0));
        assert_eq!(classification.layer_of("b"), Some(1));
        assert_eq!(classification.layer_of("c"), Some(1));
        assert_eq!(classification.layer_of("d"), Some(2));
        assert_eq!(classification.layer_of("ghost"), None);
    }

    #[test]
    fn test_empty_classification() {
        let classification = Classification::from_layers(Vec::new());
        assert!(classification.is_empty());
        assert_eq!(classification.layer_count(), 0);
        assert_eq!(classification.entity_count(), 0);
    }
}
