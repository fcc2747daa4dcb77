//! Distance engine contract.
//!
//! Both longest-path engines produce the same artifact: a two-level store of
//! `(source, reference) -> distance` records asserting the number of edges
//! on the longest directed path from `source` to `reference`. The trait is
//! the seam that lets the classifier swap engines.

use super::preprocess::NormalizedGraph;
use super::table::EntityIx;
use indexmap::IndexMap;

/// A single longest-path assertion: the longest directed path from
/// `source` to `reference` has exactly `distance` edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceRecord {
    pub source: EntityIx,
    pub reference: EntityIx,
    pub distance: u32,
}

/// Two-level `source -> (reference -> distance)` store.
///
/// Records exist only where a directed path exists. Per-source maps keep
/// insertion order, which downstream phases rely on for deterministic
/// tie-breaking.
#[derive(Debug, Clone, Default)]
pub struct DistanceMap {
    by_source: Vec<IndexMap<EntityIx, u32>>,
}

impl DistanceMap {
    /// Create a map covering `entity_count` interned entities.
    pub fn with_entities(entity_count: usize) -> Self {
        Self {
            by_source: vec![IndexMap::new(); entity_count],
        }
    }

    /// Get the stored distance from `source` to `reference`.
    pub fn get(&self, source: EntityIx, reference: EntityIx) -> Option<u32> {
        self.by_source[source.index()].get(&reference).copied()
    }

    /// Insert or overwrite a distance. Returns `true` if the
    /// `(source, reference)` pair was not present before.
    pub fn insert(&mut self, source: EntityIx, reference: EntityIx, distance: u32) -> bool {
        self.by_source[source.index()]
            .insert(reference, distance)
            .is_none()
    }

    /// Iterate the references stored under `source`, in insertion order.
    pub fn references(&self, source: EntityIx) -> impl Iterator<Item = (EntityIx, u32)> + '_ {
        self.by_source[source.index()]
            .iter()
            .map(|(&reference, &distance)| (reference, distance))
    }

    /// Total number of stored records.
    pub fn record_count(&self) -> usize {
        self.by_source.iter().map(IndexMap::len).sum()
    }

    /// Whether no records are stored.
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    /// Flatten into a record list: sources in index order, references in
    /// insertion order within each source.
    pub fn records(&self) -> Vec<DistanceRecord> {
        let mut records = Vec::with_capacity(self.record_count());
        for (source_ix, references) in self.by_source.iter().enumerate() {
            let source = EntityIx::new(source_ix);
            for (&reference, &distance) in references {
                records.push(DistanceRecord {
                    source,
                    reference,
                    distance,
                });
            }
        }
        records
    }
}

/// A longest-path distance engine.
///
/// Implementations must be total: any graph, including one with cycles,
/// yields a well-formed map. Disconnected pairs simply have no record.
pub trait DistanceEngine {
    /// Compute longest-path distances for the normalized graph.
    ///
    /// `order` is the entity processing order from
    /// [`preprocess::processing_order`](super::preprocess::processing_order);
    /// engines that don't need it may ignore it.
    fn distances(&self, graph: &NormalizedGraph, order: &[EntityIx]) -> DistanceMap;

    /// Human-readable name for this engine.
    fn name(&self) -> &'static str;
}
