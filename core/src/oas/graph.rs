#![deny(missing_docs)]

//! # Schema Graph
//!
//! Arena representation of a JSON document in which every JSON object is a node
//! with a stable identity (`NodeId`).
//!
//! `serde_json::Value` is a tree: it cannot express two parents sharing one child,
//! nor a child pointing back at an ancestor. Dereferencing `$ref` needs both, so the
//! engine works over this arena instead. Identity comparisons (cycle detection,
//! memoization) use `NodeId`, never structural equality.

use crate::oas::ref_utils::decode_pointer_segment;
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use tracing::debug;

/// Surrogate identity of one JSON object inside a [`SchemaGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// An edge to a node.
///
/// `origin` records the `$ref` that produced the edge when the dereferencer
/// replaced a reference object with its target. Identity is always `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    /// Target node.
    pub id: NodeId,
    /// The `$ref` string this edge was dereferenced from, if any.
    pub origin: Option<String>,
}

impl NodeRef {
    /// A plain (non-dereferenced) edge.
    pub fn new(id: NodeId) -> Self {
        Self { id, origin: None }
    }

    /// An edge produced by following `origin`.
    pub fn dereferenced(id: NodeId, origin: impl Into<String>) -> Self {
        Self {
            id,
            origin: Some(origin.into()),
        }
    }
}

/// A JSON value whose object members live in the arena.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number.
    Number(Number),
    /// JSON string.
    String(String),
    /// JSON array; elements are stored inline.
    Array(Vec<Slot>),
    /// JSON object, stored as a node.
    Node(NodeRef),
}

impl Slot {
    /// Returns the node identity if this slot is an object.
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Slot::Node(r) => Some(r.id),
            _ => None,
        }
    }

    /// Returns the string content, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Slot::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean content, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Slot::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the array elements, if any.
    pub fn as_array(&self) -> Option<&[Slot]> {
        match self {
            Slot::Array(items) => Some(items),
            _ => None,
        }
    }

    /// `true` for JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Slot::Null)
    }
}

/// One JSON object. Key order follows the source document.
pub type Node = IndexMap<String, Slot>;

/// Arena of JSON object nodes.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    nodes: Vec<Node>,
}

impl SchemaGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when no node has been allocated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Moves a JSON value into the arena. Every object becomes a fresh node.
    pub fn insert(&mut self, value: Value) -> Slot {
        match value {
            Value::Null => Slot::Null,
            Value::Bool(b) => Slot::Bool(b),
            Value::Number(n) => Slot::Number(n),
            Value::String(s) => Slot::String(s),
            Value::Array(items) => Slot::Array(items.into_iter().map(|v| self.insert(v)).collect()),
            Value::Object(map) => {
                let mut node = Node::with_capacity(map.len());
                for (key, value) in map {
                    let slot = self.insert(value);
                    node.insert(key, slot);
                }
                Slot::Node(NodeRef::new(self.add_node(node)))
            }
        }
    }

    /// Allocates a node and returns its identity.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Borrows a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Mutably borrows a node.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Looks up a member of a node.
    pub fn get(&self, id: NodeId, key: &str) -> Option<&Slot> {
        self.node(id)?.get(key)
    }

    /// Iterates every node identity in allocation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Resolves a JSON Pointer (optionally `#`-prefixed) relative to `start`.
    pub fn resolve_pointer<'a>(&'a self, start: &'a Slot, pointer: &str) -> Option<&'a Slot> {
        let pointer = pointer.strip_prefix('#').unwrap_or(pointer);
        if pointer.is_empty() {
            return Some(start);
        }
        let rest = pointer.strip_prefix('/')?;

        let mut current = start;
        for raw in rest.split('/') {
            let segment = decode_pointer_segment(raw);
            current = match current {
                Slot::Node(r) => self.get(r.id, &segment)?,
                Slot::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Converts a slot back into a `serde_json::Value`.
    ///
    /// A node reached again while it is still being materialized is replaced by
    /// an empty object.
    pub fn to_value(&self, slot: &Slot) -> Value {
        let mut stack = Vec::new();
        self.materialize(slot, &mut stack)
    }

    fn materialize(&self, slot: &Slot, stack: &mut Vec<NodeId>) -> Value {
        match slot {
            Slot::Null => Value::Null,
            Slot::Bool(b) => Value::Bool(*b),
            Slot::Number(n) => Value::Number(n.clone()),
            Slot::String(s) => Value::String(s.clone()),
            Slot::Array(items) => {
                Value::Array(items.iter().map(|s| self.materialize(s, stack)).collect())
            }
            Slot::Node(r) => {
                if stack.contains(&r.id) {
                    debug!(node = r.id.index(), "cycle while materializing value, using empty object");
                    return Value::Object(Map::new());
                }
                let Some(node) = self.node(r.id) else {
                    return Value::Null;
                };
                stack.push(r.id);
                let map = node
                    .iter()
                    .map(|(k, v)| (k.clone(), self.materialize(v, stack)))
                    .collect::<Map<String, Value>>();
                stack.pop();
                Value::Object(map)
            }
        }
    }
}
