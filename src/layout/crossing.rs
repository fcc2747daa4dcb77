//! Barycenter crossing minimization (Phase E).
//!
//! Iterated two-direction sweep over the layer sequence. The forward pass
//! sorts each layer by the mean position of its direct predecessors in the
//! previous layer; the backward pass symmetrically by successors in the
//! next layer. Entities with no neighbor in the adjacent layer sort last
//! (barycenter +∞), and all sorts are stable so prior positions survive
//! ties. The best layer sequence seen across iterations is returned, so
//! the result is never worse than the input. This is a heuristic: it
//! reduces crossings, it does not minimize them globally.

use super::preprocess::NormalizedGraph;
use super::table::EntityIx;
use log::debug;
use std::collections::HashMap;

/// Default number of sweep iterations.
pub const DEFAULT_SWEEP_ITERATIONS: usize = 4;

/// Refine the vertical order of each layer to reduce edge crossings.
///
/// Runs up to `iterations` forward+backward sweeps, tracking the best
/// (fewest-crossings) sequence seen, and stops early once a sweep reaches
/// zero crossings.
pub fn minimize(
    layers: Vec<Vec<EntityIx>>,
    graph: &NormalizedGraph,
    iterations: usize,
) -> Vec<Vec<EntityIx>> {
    if layers.len() < 2 {
        return layers;
    }

    let predecessors = graph.predecessors();
    let successors = graph.successors();

    let mut current = layers;
    let mut best = current.clone();
    let mut best_count = count_crossings(&best, graph);
    if best_count == 0 {
        return best;
    }

    for iteration in 0..iterations {
        // Forward: settle each layer against the one to its left.
        for k in 1..current.len() {
            sort_by_barycenter(&mut current, k, k - 1, &predecessors);
        }
        // Backward: settle each layer against the one to its right.
        for k in (0..current.len() - 1).rev() {
            sort_by_barycenter(&mut current, k, k + 1, &successors);
        }

        let count = count_crossings(&current, graph);
        if count < best_count {
            debug!(
                "sweep {} reduced crossings {} -> {}",
                iteration + 1,
                best_count,
                count
            );
            best = current.clone();
            best_count = count;
        }
        if count == 0 {
            break;
        }
    }

    best
}

/// Stable-sort `layers[target]` by the mean position, in `layers[anchor]`,
/// of each entity's neighbors from `neighbor_lists` that sit in the anchor
/// layer. Entities with no such neighbor get +∞ and sink to the bottom.
fn sort_by_barycenter(
    layers: &mut [Vec<EntityIx>],
    target: usize,
    anchor: usize,
    neighbor_lists: &[Vec<EntityIx>],
) {
    let anchor_position: HashMap<EntityIx, usize> = layers[anchor]
        .iter()
        .enumerate()
        .map(|(position, &entity)| (entity, position))
        .collect();

    let mut keyed: Vec<(f64, EntityIx)> = layers[target]
        .iter()
        .map(|&entity| {
            let mut sum = 0.0;
            let mut count = 0usize;
            for neighbor in &neighbor_lists[entity.index()] {
                if let Some(&position) = anchor_position.get(neighbor) {
                    sum += position as f64;
                    count += 1;
                }
            }
            let barycenter = if count == 0 {
                f64::INFINITY
            } else {
                sum / count as f64
            };
            (barycenter, entity)
        })
        .collect();

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    layers[target] = keyed.into_iter().map(|(_, entity)| entity).collect();
}

/// Count the total crossings over every adjacent layer pair.
///
/// Two edges spanning the same pair of adjacent layers cross when their
/// endpoint orders disagree. Edges spanning more than one layer are not
/// counted. The pairwise test is O(E²) per layer pair; target layer widths
/// are small.
pub fn count_crossings(layers: &[Vec<EntityIx>], graph: &NormalizedGraph) -> usize {
    let mut placement: HashMap<EntityIx, (usize, usize)> = HashMap::new();
    for (layer_index, layer) in layers.iter().enumerate() {
        for (position, &entity) in layer.iter().enumerate() {
            placement.insert(entity, (layer_index, position));
        }
    }

    let mut total = 0;
    for k in 0..layers.len().saturating_sub(1) {
        // Edge endpoints as (position in layer k, position in layer k+1),
        // regardless of which way the stored orientation points.
        let mut spans: Vec<(usize, usize)> = Vec::new();
        for edge in &graph.edges {
            let (Some(&left), Some(&right)) =
                (placement.get(&edge.left), placement.get(&edge.right))
            else {
                continue;
            };
            if left.0 == k && right.0 == k + 1 {
                spans.push((left.1, right.1));
            } else if right.0 == k && left.0 == k + 1 {
                spans.push((right.1, left.1));
            }
        }

        for i in 0..spans.len() {
            for j in (i + 1)..spans.len() {
                let (a, b) = spans[i];
                let (c, d) = spans[j];
                if a == c || b == d {
                    continue; // shared endpoint, never a crossing
                }
                if (a < c) != (b < d) {
                    total += 1;
                }
            }
        }
    }
    total
}
