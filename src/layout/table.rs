//! Dense entity interning.
//!
//! The pipeline's inner loops run on small integer indices rather than
//! string names. Indices are assigned on first sight, so the index order is
//! the first-appearance order in the canonical edge sequence — the order
//! every later tie-breaker refers back to.

use crate::model::EntityId;
use indexmap::IndexMap;
use std::fmt;

/// Dense index of an entity within one classification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityIx(u32);

impl EntityIx {
    /// Create an index from a usize position.
    pub fn new(ix: usize) -> Self {
        Self(ix as u32)
    }

    /// The index as a usize, for direct slot addressing.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityIx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bidirectional name ⇄ index table.
///
/// Interning is append-only: an entity keeps the index it was assigned on
/// first sight for the lifetime of the table.
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    index_of: IndexMap<EntityId, EntityIx>,
}

impl EntityTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a name, returning its index. Assigns the next free index on
    /// first sight; idempotent afterwards.
    pub fn intern(&mut self, name: &EntityId) -> EntityIx {
        if let Some(&ix) = self.index_of.get(name) {
            return ix;
        }
        let ix = EntityIx::new(self.index_of.len());
        self.index_of.insert(name.clone(), ix);
        ix
    }

    /// Look up the index of a name, if it has been interned.
    pub fn lookup(&self, name: &EntityId) -> Option<EntityIx> {
        self.index_of.get(name).copied()
    }

    /// Check whether a name has been interned.
    pub fn contains(&self, name: &EntityId) -> bool {
        self.index_of.contains_key(name)
    }

    /// Get the name behind an index.
    ///
    /// # Panics
    /// Panics if the index was not produced by this table.
    pub fn name(&self, ix: EntityIx) -> &EntityId {
        self.index_of
            .get_index(ix.index())
            .map(|(name, _)| name)
            .expect("EntityIx out of range for this table")
    }

    /// Number of interned entities.
    pub fn len(&self) -> usize {
        self.index_of.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.index_of.is_empty()
    }

    /// Iterate over `(index, name)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityIx, &EntityId)> {
        self.index_of.iter().map(|(name, &ix)| (ix, name))
    }
}
