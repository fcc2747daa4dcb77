//! Relationship (directed relation) representation.
//!
//! A relationship `from -> to` states that `from` depends on `to` and that
//! `to` belongs on the right side of `from` in the final layout.

use super::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed relation between two entities.
///
/// Orientation convention: `from` is placed to the left of `to`; the final
/// layer map satisfies `layer(from) < layer(to)` unless a cycle or a
/// consistency shift forces otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    /// Name of the left (depending) entity.
    pub from: EntityId,

    /// Name of the right (depended-on) entity.
    pub to: EntityId,

    /// Optional label (e.g. a cardinality annotation). Opaque to the layout
    /// engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Relationship {
    /// Create a new relationship.
    pub fn new(from: impl Into<EntityId>, to: impl Into<EntityId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: None,
        }
    }

    /// Create a new relationship with a label.
    pub fn with_label(
        from: impl Into<EntityId>,
        to: impl Into<EntityId>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: Some(label.into()),
        }
    }

    /// Check if this is a self-loop (both endpoints are the same entity).
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Check if this relationship joins the same unordered pair as another,
    /// in either orientation.
    pub fn is_same_pair(&self, other: &Relationship) -> bool {
        (self.from == other.from && self.to == other.to)
            || (self.from == other.to && self.to == other.from)
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} -> {} [{}]", self.from, self.to, label),
            None => write!(f, "{} -> {}", self.from, self.to),
        }
    }
}
