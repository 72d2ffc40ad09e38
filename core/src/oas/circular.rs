#![deny(missing_docs)]

//! # Circular Reference Resolver
//!
//! Walks a dereferenced schema graph depth-first and cuts every edge that points back
//! at a node on the current ancestor chain. The cut edge is replaced, in place, by a
//! terminal marker node:
//!
//! ```json
//! { "type": "object", "circularReference": "/root/properties/parent" }
//! ```
//!
//! The path lists the frame keys from the root down to the repeated ancestor.
//! Identity is the arena `NodeId`; structurally equal but distinct nodes are never
//! considered circular, and a node shared by two siblings (a DAG) is not a cycle.

use crate::oas::graph::{Node, NodeId, NodeRef, SchemaGraph, Slot};
use std::collections::HashSet;
use tracing::debug;

/// Key of the root frame in marker paths.
pub const ROOT_FRAME_KEY: &str = "root";

/// Member holding the marker path.
pub const CIRCULAR_REFERENCE_KEY: &str = "circularReference";

/// One entry of the ancestor chain.
#[derive(Debug, Clone)]
struct Frame {
    key: String,
    node: NodeId,
}

/// Depth-first walk state: the ancestor chain plus every node whose subtree is done.
struct Walk<'g> {
    graph: &'g mut SchemaGraph,
    chain: Vec<Frame>,
    finished: HashSet<NodeId>,
    max_depth: usize,
}

/// Replaces self-referential subtrees reachable from `root` with circular markers.
///
/// The graph is mutated in place and `root` is returned. Each node is walked once;
/// a shared node met again after its subtree is finished cannot close a cycle and is
/// skipped. Running the resolver again on its own output changes nothing.
pub fn resolve_circular_references(
    graph: &mut SchemaGraph,
    root: NodeId,
    max_depth: usize,
) -> NodeId {
    let mut walk = Walk {
        graph,
        chain: vec![Frame {
            key: ROOT_FRAME_KEY.to_string(),
            node: root,
        }],
        finished: HashSet::new(),
        max_depth,
    };
    walk.node();
    root
}

/// Returns `true` if the node is a marker produced by the resolver.
pub fn is_circular_marker(graph: &SchemaGraph, id: NodeId) -> bool {
    graph
        .get(id, CIRCULAR_REFERENCE_KEY)
        .and_then(Slot::as_str)
        .is_some()
}

impl Walk<'_> {
    fn node(&mut self) {
        let Some(current) = self.chain.last().map(|f| f.node) else {
            return;
        };
        if self.chain.len() > self.max_depth {
            debug!(node = current.index(), depth = self.chain.len(), "resolver depth guard reached");
            return;
        }
        let Some(keys) = self
            .graph
            .node(current)
            .map(|node| node.keys().cloned().collect::<Vec<_>>())
        else {
            return;
        };

        for key in keys {
            let Some(slot) = self.graph.get(current, &key).cloned() else {
                continue;
            };
            if let Some(replacement) = self.slot(&key, &slot) {
                if let Some(node) = self.graph.node_mut(current) {
                    node.insert(key, replacement);
                }
            }
        }
        self.finished.insert(current);
    }

    /// Visits one member value. Returns a replacement when something below it was cut.
    fn slot(&mut self, key: &str, slot: &Slot) -> Option<Slot> {
        match slot {
            Slot::Node(edge) => {
                if let Some(pos) = self.chain.iter().rposition(|frame| frame.node == edge.id) {
                    let path = marker_path(&self.chain[..=pos]);
                    debug!(%path, node = edge.id.index(), "circular reference cut");
                    return Some(Slot::Node(NodeRef::new(add_marker(self.graph, path))));
                }
                if self.finished.contains(&edge.id) {
                    return None;
                }
                self.chain.push(Frame {
                    key: key.to_string(),
                    node: edge.id,
                });
                self.node();
                self.chain.pop();
                None
            }
            Slot::Array(items) => {
                let mut changed = false;
                let mut rebuilt = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let item_key = format!("{}/{}", key, index);
                    match self.slot(&item_key, item) {
                        Some(replacement) => {
                            changed = true;
                            rebuilt.push(replacement);
                        }
                        None => rebuilt.push(item.clone()),
                    }
                }
                changed.then_some(Slot::Array(rebuilt))
            }
            _ => None,
        }
    }
}

fn marker_path(frames: &[Frame]) -> String {
    let mut path = String::new();
    for frame in frames {
        path.push('/');
        path.push_str(&frame.key);
    }
    path
}

fn add_marker(graph: &mut SchemaGraph, path: String) -> NodeId {
    let mut marker = Node::new();
    marker.insert("type".to_string(), Slot::String("object".to_string()));
    marker.insert(CIRCULAR_REFERENCE_KEY.to_string(), Slot::String(path));
    graph.add_node(marker)
}

/// Builds a graph from `value`, then sets `member` on the node at `from` to an edge
/// pointing at the node at `to`.
#[cfg(test)]
pub(crate) fn graph_with_link(
    value: serde_json::Value,
    from: &str,
    member: &str,
    to: &str,
) -> (SchemaGraph, NodeId) {
    let mut graph = SchemaGraph::new();
    let root = graph.insert(value);
    let target = graph.resolve_pointer(&root, to).and_then(Slot::as_node).unwrap();
    let holder = graph.resolve_pointer(&root, from).and_then(Slot::as_node).unwrap();
    graph
        .node_mut(holder)
        .unwrap()
        .insert(member.to_string(), Slot::Node(NodeRef::dereferenced(target, "#/fixture")));
    (graph, root.as_node().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_self_property_cycles_to_root() {
        let (mut graph, root) = graph_with_link(
            json!({ "type": "object", "properties": {} }),
            "/properties",
            "self",
            "",
        );

        resolve_circular_references(&mut graph, root, 64);

        let root_slot = Slot::Node(NodeRef::new(root));
        let marker = graph.resolve_pointer(&root_slot, "/properties/self").unwrap();
        assert_eq!(
            graph.to_value(marker),
            json!({ "type": "object", "circularReference": "/root" })
        );
    }

    #[test]
    fn test_cycle_through_array_member() {
        let (mut graph, root) = graph_with_link(
            json!({
                "properties": {
                    "node": { "oneOf": [ { "properties": {} } ] }
                }
            }),
            "/properties/node/oneOf/0/properties",
            "next",
            "/properties/node",
        );

        resolve_circular_references(&mut graph, root, 64);

        let root_slot = Slot::Node(NodeRef::new(root));
        let marker = graph
            .resolve_pointer(&root_slot, "/properties/node/oneOf/0/properties/next")
            .unwrap();
        assert_eq!(
            graph.to_value(marker)["circularReference"],
            json!("/root/properties/node")
        );
    }

    #[test]
    fn test_shared_and_identical_branches_are_not_circular() {
        let mut graph = SchemaGraph::new();
        let root = graph.insert(json!({
            "properties": {
                "a": { "type": "string" },
                "b": { "type": "string" },
                "c": {}
            }
        }));
        let root_id = root.as_node().unwrap();
        let shared = graph.resolve_pointer(&root, "/properties/a").and_then(Slot::as_node).unwrap();
        let props = graph.resolve_pointer(&root, "/properties").and_then(Slot::as_node).unwrap();
        graph
            .node_mut(props)
            .unwrap()
            .insert("c".to_string(), Slot::Node(NodeRef::new(shared)));
        let before = graph.to_value(&root);
        let nodes_before = graph.len();

        resolve_circular_references(&mut graph, root_id, 64);

        assert_eq!(graph.len(), nodes_before);
        assert_eq!(graph.to_value(&root), before);
    }

    /// `S0 .. S{depth}`, each with `properties.a` and `properties.b` pointing at the next.
    fn doubly_shared_chain(depth: usize) -> (SchemaGraph, Vec<NodeId>) {
        let mut graph = SchemaGraph::new();
        let mut schemas: Vec<NodeId> = Vec::with_capacity(depth + 1);
        let mut next: Option<NodeId> = None;
        for _ in 0..=depth {
            let mut properties = Node::new();
            if let Some(next) = next {
                properties.insert("a".to_string(), Slot::Node(NodeRef::new(next)));
                properties.insert("b".to_string(), Slot::Node(NodeRef::new(next)));
            }
            let properties = graph.add_node(properties);
            let mut schema = Node::new();
            schema.insert("type".to_string(), Slot::String("object".to_string()));
            schema.insert("properties".to_string(), Slot::Node(NodeRef::new(properties)));
            let id = graph.add_node(schema);
            schemas.insert(0, id);
            next = Some(id);
        }
        (graph, schemas)
    }

    #[test]
    fn test_deeply_shared_nodes_are_walked_once() {
        let (mut graph, schemas) = doubly_shared_chain(64);
        let nodes_before = graph.len();

        resolve_circular_references(&mut graph, schemas[0], 256);

        assert_eq!(graph.len(), nodes_before);
    }

    #[test]
    fn test_cycle_below_shared_nodes_is_cut_once() {
        let (mut graph, schemas) = doubly_shared_chain(48);
        let last = *schemas.last().unwrap();
        let last_props = graph.get(last, "properties").and_then(Slot::as_node).unwrap();
        graph
            .node_mut(last_props)
            .unwrap()
            .insert("back".to_string(), Slot::Node(NodeRef::new(schemas[46])));
        let nodes_before = graph.len();

        resolve_circular_references(&mut graph, schemas[0], 256);

        assert_eq!(graph.len(), nodes_before + 1);
        let marker = graph.get(last_props, "back").and_then(Slot::as_node).unwrap();
        assert!(is_circular_marker(&graph, marker));
        let path = graph.get(marker, CIRCULAR_REFERENCE_KEY).and_then(Slot::as_str).unwrap();
        assert!(path.starts_with("/root/properties/a/properties/a"));
        assert!(path.ends_with("/properties/a"));
    }

    #[test]
    fn test_resolver_is_idempotent() {
        let (mut graph, root) = graph_with_link(
            json!({ "properties": { "children": { "items": {} } } }),
            "/properties/children",
            "items",
            "",
        );

        resolve_circular_references(&mut graph, root, 64);
        let root_slot = Slot::Node(NodeRef::new(root));
        let first = graph.to_value(&root_slot);
        let nodes_after_first = graph.len();

        resolve_circular_references(&mut graph, root, 64);

        assert_eq!(graph.to_value(&root_slot), first);
        assert_eq!(graph.len(), nodes_after_first);
        assert!(is_circular_marker(
            &graph,
            graph
                .resolve_pointer(&root_slot, "/properties/children/items")
                .and_then(Slot::as_node)
                .unwrap()
        ));
    }
}
