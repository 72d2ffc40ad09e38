#![deny(missing_docs)]

//! # Property Cache
//!
//! Identity-keyed memoization of compiled properties. Keys are arena `NodeId`s, so
//! two structurally equal schemas never share an entry. One cache belongs to one
//! graph; drop or [`clear`](PropertyCache::clear) it together with the document.

use crate::oas::graph::NodeId;
use crate::oas::property::OAProperty;
use std::collections::HashMap;

/// Compiled properties keyed by schema node identity.
#[derive(Debug, Clone, Default)]
pub struct PropertyCache {
    entries: HashMap<NodeId, OAProperty>,
}

impl PropertyCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached property for a node.
    pub fn get(&self, id: NodeId) -> Option<&OAProperty> {
        self.entries.get(&id)
    }

    /// Stores the compiled property of a node.
    pub fn insert(&mut self, id: NodeId, property: OAProperty) {
        self.entries.insert(id, property);
    }

    /// Number of cached nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
