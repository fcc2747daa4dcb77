//! Progressive longest-path distance computation (Phase B).
//!
//! Computes, for each pair `(source, reference)`, the number of edges on
//! the longest directed path from `source` to `reference`, by introducing
//! one reference entity at a time along the processing order and letting
//! every new atomic distance cascade through the already-known records.
//!
//! ## Algorithm
//!
//! 1. Precompute each entity's direct-predecessor cluster (one O(E) pass)
//! 2. Walk the processing order. For the entity `r` being introduced:
//!    a. every `l` in `cluster(r)` gets the atomic record `d(l, r) = 1`
//!    b. every reference `p` already stored under `r` is inherited:
//!       `d(l, p) = 1 + d(r, p)`, applied as a maximizing update
//! 3. A maximizing update that inserts or raises a record propagates along
//!    the dependents index: every holder `y` of `d(y, x)` is offered
//!    `d(y, p) = d(y, x) + d'`
//!
//! Propagation runs on an explicit work list guarded by a visited set keyed
//! on `(entity, reference, value)` triples, so cyclic inputs converge: a
//! revisit is either a no-op or an already-known value. Two additional
//! guards keep cycles from manufacturing distances no simple path can
//! witness: self-referential records (`x == p`) are never stored, and no
//! record may exceed `entity_count - 1` edges. Neither guard can fire on an
//! acyclic input.

use super::preprocess::NormalizedGraph;
use super::table::EntityIx;
use super::traits::{DistanceEngine, DistanceMap};
use indexmap::IndexSet;
use std::collections::HashSet;

/// Progressive cluster expansion engine. The default distance engine.
#[derive(Debug, Clone, Default)]
pub struct ProgressiveEngine;

impl ProgressiveEngine {
    /// Create a new progressive engine.
    pub fn new() -> Self {
        Self
    }
}

impl DistanceEngine for ProgressiveEngine {
    fn distances(&self, graph: &NormalizedGraph, order: &[EntityIx]) -> DistanceMap {
        let entity_count = graph.entity_count();
        if entity_count == 0 {
            return DistanceMap::default();
        }

        let clusters = graph.predecessors();
        let mut propagation = Propagation {
            distances: DistanceMap::with_entities(entity_count),
            dependents: vec![IndexSet::new(); entity_count],
            ceiling: (entity_count - 1) as u32,
        };

        for &reference in order {
            // Prior references stored under the entity being introduced;
            // snapshot before the cluster loop mutates the map.
            let inherited: Vec<(EntityIx, u32)> =
                propagation.distances.references(reference).collect();

            for &left in &clusters[reference.index()] {
                propagation.apply_max(left, reference, 1);
                for &(prior, via) in &inherited {
                    propagation.apply_max(left, prior, 1 + via);
                }
            }
        }

        propagation.distances
    }

    fn name(&self) -> &'static str {
        "progressive cluster expansion"
    }
}

/// Mutable engine state: the distance store, the reverse dependents index,
/// and the simple-path length ceiling.
struct Propagation {
    distances: DistanceMap,
    /// `dependents[x]` holds every entity whose records include `x` as a
    /// reference. Entries are only ever added; maximizing updates never
    /// invalidate them.
    dependents: Vec<IndexSet<EntityIx>>,
    ceiling: u32,
}

impl Propagation {
    /// Apply a maximizing update to `d(source, reference)` and cascade the
    /// consequences through the dependents index.
    fn apply_max(&mut self, source: EntityIx, reference: EntityIx, value: u32) {
        let mut visited: HashSet<(EntityIx, EntityIx, u32)> = HashSet::new();
        let mut work = vec![(source, reference, value)];

        while let Some((x, p, d)) = work.pop() {
            if x == p || d > self.ceiling {
                continue;
            }
            if !visited.insert((x, p, d)) {
                continue;
            }
            match self.distances.get(x, p) {
                Some(current) if current >= d => continue,
                Some(_) => {
                    self.distances.insert(x, p, d);
                }
                None => {
                    self.distances.insert(x, p, d);
                    self.dependents[p.index()].insert(x);
                }
            }
            // Holders of a distance to x now reach p through it.
            for &y in &self.dependents[x.index()] {
                if let Some(to_x) = self.distances.get(y, x) {
                    work.push((y, p, to_x + d));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::preprocess::{normalize, processing_order};
    use crate::model::Relationship;

    fn rel(from: &str, to: &str) -> Relationship {
        Relationship::new(from, to)
    }

    fn run(relationships: &[Relationship]) -> (NormalizedGraph, DistanceMap) {
        let graph = normalize(relationships);
        let order = processing_order(&graph);
        let distances = ProgressiveEngine::new().distances(&graph, &order);
        (graph, distances)
    }

    fn d(graph: &NormalizedGraph, map: &DistanceMap, from: &str, to: &str) -> Option<u32> {
        let from = graph.table.lookup(&from.into())?;
        let to = graph.table.lookup(&to.into())?;
        map.get(from, to)
    }

    #[test]
    fn test_atomic_distances() {
        let (graph, map) = run(&[rel("a", "b"), rel("b", "c")]);

        assert_eq!(d(&graph, &map, "a", "b"), Some(1));
        assert_eq!(d(&graph, &map, "b", "c"), Some(1));
    }

    #[test]
    fn test_transitive_chain() {
        let (graph, map) = run(&[rel("a", "b"), rel("b", "c"), rel("c", "d")]);

        assert_eq!(d(&graph, &map, "a", "c"), Some(2));
        assert_eq!(d(&graph, &map, "a", "d"), Some(3));
        assert_eq!(d(&graph, &map, "b", "d"), Some(2));
    }

    #[test]
    fn test_longest_path_wins_over_direct_edge() {
        // a -> d directly, and a -> b -> c -> d.
        let (graph, map) = run(&[rel("a", "d"), rel("a", "b"), rel("b", "c"), rel("c", "d")]);

        assert_eq!(d(&graph, &map, "a", "d"), Some(3));
    }

    #[test]
    fn test_three_way_max() {
        let (graph, map) = run(&[
            rel("x", "y"),
            rel("x", "a"),
            rel("a", "y"),
            rel("x", "b"),
            rel("b", "c"),
            rel("c", "y"),
        ]);

        assert_eq!(d(&graph, &map, "x", "y"), Some(3));
        assert_eq!(d(&graph, &map, "b", "y"), Some(2));
    }

    #[test]
    fn test_no_record_without_path() {
        let (graph, map) = run(&[rel("a", "b"), rel("c", "d")]);

        assert_eq!(d(&graph, &map, "a", "c"), None);
        assert_eq!(d(&graph, &map, "a", "d"), None);
        assert_eq!(d(&graph, &map, "b", "a"), None);
    }

    #[test]
    fn test_cycle_terminates_without_self_distances() {
        let (graph, map) = run(&[rel("a", "b"), rel("b", "c"), rel("c", "a")]);

        for (ix, _) in graph.table.iter() {
            assert_eq!(map.get(ix, ix), None);
        }
        // Atomic records survive the cycle.
        assert_eq!(d(&graph, &map, "a", "b"), Some(1));
        assert_eq!(d(&graph, &map, "b", "c"), Some(1));
        assert_eq!(d(&graph, &map, "c", "a"), Some(1));
    }

    #[test]
    fn test_cycle_distances_stay_under_ceiling() {
        let (_graph, map) = run(&[
            rel("a", "b"),
            rel("b", "c"),
            rel("c", "d"),
            rel("d", "a"),
        ]);

        for record in map.records() {
            assert!(record.distance <= 3);
        }
    }

    #[test]
    fn test_diamond_converges_on_revisit() {
        let (graph, map) = run(&[rel("a", "b"), rel("a", "c"), rel("b", "d"), rel("c", "d")]);

        assert_eq!(d(&graph, &map, "a", "d"), Some(2));
        assert_eq!(map.record_count(), 5);
    }
}
