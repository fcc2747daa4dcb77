//! Horizontal layer assignment (Phase C).
//!
//! Places every connected entity on the integer layer axis, consistent with
//! the longest-path distances, relative to a centrality-chosen reference
//! entity at layer 0.
//!
//! ## Reference selection
//!
//! Cascade, first non-tie wins:
//! 1. highest connection count
//! 2. highest neighbor mass (sum of adjacent entities' connection counts)
//! 3. first appearance in the canonical edges
//!
//! ## Placement
//!
//! Distance records are replayed in descending combined-connection order
//! (an efficiency heuristic, not a correctness requirement) for up to |V|²
//! passes. Each record `(l, r, d)` can place an unplaced endpoint relative
//! to a placed one, or shift `r` rightward to restore
//! `layer(r) >= layer(l) + d`. A stalled pass with entities still unplaced
//! force-places the remainder at layer 0 and lets subsequent passes
//! propagate; the pass cap bounds cyclic inputs whose constraints can never
//! all be met. Finally layers are normalized so the minimum is 0 and
//! grouped into the layer sequence, each group seeded in lexicographic
//! order for the vertical orderer.

use super::preprocess::NormalizedGraph;
use super::table::EntityIx;
use super::traits::{DistanceMap, DistanceRecord};
use log::debug;
use std::collections::BTreeMap;

/// Pick the reference entity for layer 0.
///
/// Returns `None` on a graph with no entities.
pub fn choose_reference(graph: &NormalizedGraph) -> Option<EntityIx> {
    let mut best: Option<(EntityIx, u32, u32)> = None;

    // Index order is first-appearance order, so iterating ascending makes
    // the first candidate win all remaining ties.
    for ix in (0..graph.entity_count()).map(EntityIx::new) {
        let connections = graph.connection_count(ix);
        let mass = graph.neighbor_mass(ix);
        let better = match best {
            None => true,
            Some((_, best_connections, best_mass)) => {
                connections > best_connections
                    || (connections == best_connections && mass > best_mass)
            }
        };
        if better {
            best = Some((ix, connections, mass));
        }
    }

    best.map(|(ix, connections, mass)| {
        debug!(
            "reference entity: {} ({} connections, neighbor mass {})",
            graph.table.name(ix),
            connections,
            mass
        );
        ix
    })
}

/// Assign every connected entity to a layer.
///
/// Returns the layer sequence in ascending layer order; each layer's
/// entities are sorted lexicographically as the deterministic seed for the
/// vertical ordering phase. Empty when the graph has no entities.
pub fn assign_layers(graph: &NormalizedGraph, distances: &DistanceMap) -> Vec<Vec<EntityIx>> {
    let entity_count = graph.entity_count();
    let Some(reference) = choose_reference(graph) else {
        return Vec::new();
    };

    let records = sorted_records(graph, distances);

    let mut layer: Vec<Option<i64>> = vec![None; entity_count];
    layer[reference.index()] = Some(0);
    let mut placed = 1usize;

    let pass_cap = entity_count * entity_count;
    let mut pass = 0;
    while pass < pass_cap {
        pass += 1;
        let mut progress = false;

        for record in &records {
            let l = record.source.index();
            let r = record.reference.index();
            let d = record.distance as i64;
            match (layer[l], layer[r]) {
                (Some(left), None) => {
                    layer[r] = Some(left + d);
                    placed += 1;
                    progress = true;
                }
                (None, Some(right)) => {
                    layer[l] = Some(right - d);
                    placed += 1;
                    progress = true;
                }
                (Some(left), Some(right)) if right < left + d => {
                    // Shift right to restore layer consistency.
                    layer[r] = Some(left + d);
                    progress = true;
                }
                _ => {}
            }
        }

        if !progress {
            if placed == entity_count {
                break;
            }
            // Stalled with entities unplaced: conflicting or unreachable
            // constraints (cycles, disconnected components). Pin the
            // remainder at layer 0 and keep iterating so the consistency
            // rule can propagate from them.
            for slot in layer.iter_mut().filter(|slot| slot.is_none()) {
                *slot = Some(0);
                placed += 1;
            }
        }
    }
    debug!("layer placement settled after {} passes", pass);

    normalize_and_group(graph, &layer)
}

/// Flatten the distance map and sort records by descending combined
/// connection count of the endpoints (stable, so the flatten order breaks
/// ties).
fn sorted_records(graph: &NormalizedGraph, distances: &DistanceMap) -> Vec<DistanceRecord> {
    let combined = |record: &DistanceRecord| {
        graph.connection_count(record.source) + graph.connection_count(record.reference)
    };
    let mut records = distances.records();
    records.sort_by(|a, b| combined(b).cmp(&combined(a)));
    records
}

/// Shift layers so the minimum is 0, then group by layer value into the
/// ascending layer sequence.
fn normalize_and_group(graph: &NormalizedGraph, layer: &[Option<i64>]) -> Vec<Vec<EntityIx>> {
    let minimum = layer.iter().flatten().min().copied().unwrap_or(0);
    if minimum < 0 {
        debug!("normalizing layers by {}", -minimum);
    }

    let mut groups: BTreeMap<i64, Vec<EntityIx>> = BTreeMap::new();
    for (ix, slot) in layer.iter().enumerate() {
        if let Some(value) = slot {
            groups
                .entry(value - minimum)
                .or_default()
                .push(EntityIx::new(ix));
        }
    }

    if log::log_enabled!(log::Level::Debug) {
        for (value, group) in &groups {
            let names: Vec<&str> = group
                .iter()
                .map(|&ix| graph.table.name(ix).as_str())
                .collect();
            debug!("layer {}: {}", value, names.join(", "));
        }
    }

    groups
        .into_values()
        .map(|mut group| {
            group.sort_by(|&a, &b| graph.table.name(a).cmp(graph.table.name(b)));
            group
        })
        .collect()
}
