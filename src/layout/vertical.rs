//! Source-aware vertical ordering (Phase D).
//!
//! Reorders entities within each layer so that entities sharing a
//! previous-layer source sit next to each other, forming source chains
//! that make provenance visible. The layer partition itself is untouched.
//!
//! Layers are fixed right to left. The rightmost layer is ordered by
//! processing-order rank. Every other layer is grouped by key successor:
//! an entity joins the group of its lowest-ranked direct successor in the
//! next layer, groups follow their key successor's position in the
//! already-fixed next layer, and entities inside a group are ordered by
//! their own rank. Entities with no successor in the next layer trail the
//! layer in rank order.

use super::preprocess::NormalizedGraph;
use super::table::EntityIx;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Reorder each layer's entities into source chains.
///
/// `order` is the entity processing order from
/// [`preprocess::processing_order`](super::preprocess::processing_order).
pub fn order_by_source(
    mut layers: Vec<Vec<EntityIx>>,
    graph: &NormalizedGraph,
    order: &[EntityIx],
) -> Vec<Vec<EntityIx>> {
    if layers.is_empty() {
        return layers;
    }

    let mut rank = vec![usize::MAX; graph.entity_count()];
    for (position, &entity) in order.iter().enumerate() {
        rank[entity.index()] = position;
    }
    let successors = graph.successors();

    // Rightmost layer first; it anchors the chains.
    let last = layers.len() - 1;
    layers[last].sort_by_key(|entity| rank[entity.index()]);

    for k in (0..last).rev() {
        let next_position: HashMap<EntityIx, usize> = layers[k + 1]
            .iter()
            .enumerate()
            .map(|(position, &entity)| (entity, position))
            .collect();

        let mut groups: IndexMap<EntityIx, Vec<EntityIx>> = IndexMap::new();
        let mut pivots: Vec<EntityIx> = Vec::new();

        for &entity in &layers[k] {
            let key = successors[entity.index()]
                .iter()
                .filter(|successor| next_position.contains_key(*successor))
                .min_by_key(|successor| rank[successor.index()])
                .copied();
            match key {
                Some(successor) => groups.entry(successor).or_default().push(entity),
                None => pivots.push(entity),
            }
        }

        let mut keys: Vec<EntityIx> = groups.keys().copied().collect();
        keys.sort_by_key(|key| next_position[key]);

        let mut reordered = Vec::with_capacity(layers[k].len());
        for key in keys {
            let mut members = groups.shift_remove(&key).unwrap_or_default();
            members.sort_by_key(|entity| rank[entity.index()]);
            reordered.extend(members);
        }
        pivots.sort_by_key(|entity| rank[entity.index()]);
        reordered.extend(pivots);

        layers[k] = reordered;
    }

    layers
}
