//! Annotation and validation keywords captured on every compiled node.

use crate::oas::example::select_example;
use crate::oas::graph::{NodeId, NodeRef, SchemaGraph, Slot};
use crate::oas::property::OAProperty;
use indexmap::IndexMap;

/// Validation keywords copied verbatim into `OAProperty::constraints`.
pub const CONSTRAINT_KEYS: [&str; 14] = [
    "format",
    "pattern",
    "multipleOf",
    "uniqueItems",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "minLength",
    "maxLength",
    "minItems",
    "maxItems",
    "minProperties",
    "maxProperties",
];

/// Fills the branch-independent members of `prop` from the schema node `id`.
pub(crate) fn apply_base_metadata(
    graph: &SchemaGraph,
    id: NodeId,
    prop: &mut OAProperty,
    override_key: &str,
) {
    let Some(node) = graph.node(id) else {
        return;
    };

    prop.title = node.get("title").and_then(Slot::as_str).map(str::to_string);
    prop.description = node
        .get("description")
        .and_then(Slot::as_str)
        .map(str::to_string);
    prop.default_value = node.get("default").map(|v| graph.to_value(v));
    prop.docs = node.get("externalDocs").map(|v| graph.to_value(v));
    prop.nullable = node.get("nullable").and_then(Slot::as_bool);
    prop.examples = select_example(graph, &Slot::Node(NodeRef::new(id)), override_key)
        .map(|example| vec![example]);

    let mut constraints = IndexMap::new();
    for key in CONSTRAINT_KEYS {
        if let Some(value) = node.get(key) {
            constraints.insert(key.to_string(), graph.to_value(value));
        }
    }
    if !constraints.is_empty() {
        prop.constraints = Some(constraints);
    }

    for (key, value) in node {
        if key.starts_with("x-") {
            prop.meta.extra.insert(key.clone(), graph.to_value(value));
        }
    }
}
