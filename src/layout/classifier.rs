//! Layer classification orchestrator (Phase F).
//!
//! Wires the five phases together behind a single `classify` call and
//! handles the entities the pipeline never sees: anything that appears in
//! no canonical edge is appended to one trailing layer, in input order.

use super::crossing::{self, DEFAULT_SWEEP_ITERATIONS};
use super::horizontal;
use super::longest_path::ProgressiveEngine;
use super::preprocess;
use super::result::Classification;
use super::traits::DistanceEngine;
use super::vertical;
use crate::model::{Entity, EntityId, Relationship};
use indexmap::IndexSet;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counters describing one classification run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyStats {
    /// Entities covered by the classification (declared + edge endpoints).
    pub entities: usize,
    /// Relationships consumed, duplicates and self-loops included.
    pub relationships: usize,
    /// Longest-path records the distance engine produced.
    pub distance_records: usize,
}

/// The layer classifier.
///
/// Total for every finite input: duplicate relations are coalesced,
/// self-loops dropped, cycles absorbed, and isolated entities placed in a
/// trailing layer. Two runs over the same canonical relation set produce
/// identical output.
pub struct LayerClassifier {
    sweep_iterations: usize,
    engine: Box<dyn DistanceEngine>,
}

impl Default for LayerClassifier {
    fn default() -> Self {
        Self {
            sweep_iterations: DEFAULT_SWEEP_ITERATIONS,
            engine: Box::new(ProgressiveEngine::new()),
        }
    }
}

impl fmt::Debug for LayerClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerClassifier")
            .field("sweep_iterations", &self.sweep_iterations)
            .field("engine", &self.engine.name())
            .finish()
    }
}

impl LayerClassifier {
    /// Create a classifier with the default configuration: the progressive
    /// distance engine and four crossing sweeps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the crossing-minimization sweep budget.
    pub fn with_sweep_iterations(mut self, iterations: usize) -> Self {
        self.sweep_iterations = iterations;
        self
    }

    /// Swap in a different distance engine.
    pub fn with_engine(mut self, engine: Box<dyn DistanceEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// Classify entities into layers.
    pub fn classify(&self, entities: &[Entity], relationships: &[Relationship]) -> Classification {
        self.classify_with_stats(entities, relationships).0
    }

    /// Classify entities into layers, also returning run counters.
    pub fn classify_with_stats(
        &self,
        entities: &[Entity],
        relationships: &[Relationship],
    ) -> (Classification, ClassifyStats) {
        let graph = preprocess::normalize(relationships);
        let order = preprocess::processing_order(&graph);
        let distances = self.engine.distances(&graph, &order);
        debug!(
            "{}: {} entities, {} canonical edges, {} distance records",
            self.engine.name(),
            graph.entity_count(),
            graph.edges.len(),
            distances.record_count()
        );

        let placed = horizontal::assign_layers(&graph, &distances);
        let placed = vertical::order_by_source(placed, &graph, &order);
        let placed = crossing::minimize(placed, &graph, self.sweep_iterations);

        let mut layers: Vec<Vec<EntityId>> = placed
            .into_iter()
            .map(|layer| {
                layer
                    .into_iter()
                    .map(|ix| graph.table.name(ix).clone())
                    .collect()
            })
            .collect();

        // Everything the canonical edges never touched goes to one trailing
        // layer: declared entities first, then endpoints that only ever
        // appeared in dropped relations.
        let mut isolated: IndexSet<EntityId> = IndexSet::new();
        for entity in entities {
            if !graph.table.contains(&entity.name) {
                isolated.insert(entity.name.clone());
            }
        }
        for relationship in relationships {
            for name in [&relationship.from, &relationship.to] {
                if !graph.table.contains(name) {
                    isolated.insert(name.clone());
                }
            }
        }
        if !isolated.is_empty() {
            layers.push(isolated.into_iter().collect());
        }

        let classification = Classification::from_layers(layers);
        let stats = ClassifyStats {
            entities: classification.entity_count(),
            relationships: relationships.len(),
            distance_records: distances.record_count(),
        };
        (classification, stats)
    }
}
