#![deny(missing_docs)]

//! # Example Selection
//!
//! Resolves the effective example of a parameter, media-type entry or schema node.
//!
//! Precedence, first non-null wins:
//! 1. the vendor override member (see [`EngineConfig::example_override_key`](crate::EngineConfig))
//! 2. `example`
//! 3. `examples` (named-examples map or plain array)
//! 4. `schema.example`
//! 5. `schema.examples`
//! 6. `subexample` / `subexamples` (array-item examples)

use crate::oas::graph::{NodeId, SchemaGraph, Slot};
use serde_json::{json, Value};

/// Members that mark an object as an OpenAPI Example Object.
const EXAMPLE_OBJECT_KEYS: [&str; 5] = ["value", "summary", "description", "externalValue", "$ref"];

/// Returns the effective example of `target`, if any.
pub fn select_example(graph: &SchemaGraph, target: &Slot, override_key: &str) -> Option<Value> {
    let id = target.as_node()?;

    direct_example(graph, id, override_key)
        .or_else(|| direct_example(graph, id, "example"))
        .or_else(|| examples_entry(graph, graph.get(id, "examples")?))
        .or_else(|| {
            let schema = graph.get(id, "schema")?.as_node()?;
            direct_example(graph, schema, "example")
        })
        .or_else(|| {
            let schema = graph.get(id, "schema")?.as_node()?;
            examples_entry(graph, graph.get(schema, "examples")?)
        })
        .or_else(|| direct_example(graph, id, "subexample"))
        .or_else(|| examples_entry(graph, graph.get(id, "subexamples")?))
}

/// `true` if the slot is an object carrying any Example Object member.
pub fn is_example_object(graph: &SchemaGraph, slot: &Slot) -> bool {
    slot.as_node()
        .and_then(|id| graph.node(id))
        .is_some_and(|node| EXAMPLE_OBJECT_KEYS.iter().any(|k| node.contains_key(*k)))
}

fn direct_example(graph: &SchemaGraph, id: NodeId, key: &str) -> Option<Value> {
    let slot = graph.get(id, key)?;
    non_null(graph.to_value(slot))
}

/// Picks the first entry of an `examples` member.
///
/// Maps only count when at least one value is an Example Object; any other map is
/// not an examples collection and yields nothing.
fn examples_entry(graph: &SchemaGraph, examples: &Slot) -> Option<Value> {
    match examples {
        Slot::Array(items) => {
            let first = items.first()?;
            let unwrapped = is_example_object(graph, first)
                .then(|| example_object_value(graph, first))
                .flatten();
            unwrapped.or_else(|| non_null(graph.to_value(first)))
        }
        Slot::Node(edge) => {
            let node = graph.node(edge.id)?;
            if !node.values().any(|v| is_example_object(graph, v)) {
                return None;
            }
            let (_, first) = node.first()?;
            example_object_value(graph, first)
        }
        _ => None,
    }
}

/// Effective value of an Example Object: `value`, else `{"$ref"}`, else `externalValue`.
fn example_object_value(graph: &SchemaGraph, entry: &Slot) -> Option<Value> {
    let id = entry.as_node()?;
    if let Some(value) = graph.get(id, "value").and_then(|v| non_null(graph.to_value(v))) {
        return Some(value);
    }
    if let Some(reference) = graph.get(id, "$ref").and_then(Slot::as_str) {
        return Some(json!({ "$ref": reference }));
    }
    graph
        .get(id, "externalValue")
        .and_then(|v| non_null(graph.to_value(v)))
}

fn non_null(value: Value) -> Option<Value> {
    (!value.is_null()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const OVERRIDE: &str = "x-playground-example";

    fn select(value: Value) -> Option<Value> {
        let mut graph = SchemaGraph::new();
        let slot = graph.insert(value);
        select_example(&graph, &slot, OVERRIDE)
    }

    #[test]
    fn test_override_beats_example() {
        let picked = select(json!({
            "example": "plain",
            "x-playground-example": "override"
        }));
        assert_eq!(picked, Some(json!("override")));
    }

    #[test]
    fn test_null_example_is_skipped() {
        let picked = select(json!({ "example": null, "examples": ["second"] }));
        assert_eq!(picked, Some(json!("second")));
    }

    #[test]
    fn test_named_examples_map_takes_first_entry() {
        let picked = select(json!({
            "examples": {
                "minimal": { "summary": "Minimal", "value": { "id": 1 } },
                "full": { "value": { "id": 2, "name": "x" } }
            }
        }));
        assert_eq!(picked, Some(json!({ "id": 1 })));
    }

    #[test]
    fn test_named_example_ref_and_external_value() {
        assert_eq!(
            select(json!({ "examples": { "a": { "$ref": "#/components/examples/A" } } })),
            Some(json!({ "$ref": "#/components/examples/A" }))
        );
        assert_eq!(
            select(json!({ "examples": { "a": { "externalValue": "https://example.com/a.json" } } })),
            Some(json!("https://example.com/a.json"))
        );
        assert_eq!(select(json!({ "examples": { "a": { "summary": "empty" } } })), None);
    }

    #[test]
    fn test_plain_map_is_not_an_examples_collection() {
        assert_eq!(select(json!({ "examples": { "a": 1, "b": 2 } })), None);
    }

    #[test]
    fn test_array_of_example_objects_is_unwrapped() {
        let picked = select(json!({ "examples": [ { "value": 42 }, { "value": 7 } ] }));
        assert_eq!(picked, Some(json!(42)));
    }

    #[test]
    fn test_plain_array_example_with_description_member() {
        let picked = select(json!({ "examples": [ { "id": 1, "description": "a widget" } ] }));
        assert_eq!(picked, Some(json!({ "id": 1, "description": "a widget" })));
    }

    #[test]
    fn test_schema_fallbacks() {
        assert_eq!(
            select(json!({ "name": "limit", "in": "query", "schema": { "type": "integer", "example": 25 } })),
            Some(json!(25))
        );
        assert_eq!(
            select(json!({ "schema": { "examples": [10, 20] } })),
            Some(json!(10))
        );
    }

    #[test]
    fn test_subexamples_are_last() {
        assert_eq!(select(json!({ "subexample": "item" })), Some(json!("item")));
        assert_eq!(select(json!({ "subexamples": ["a", "b"] })), Some(json!("a")));
        assert_eq!(
            select(json!({ "example": "own", "subexamples": ["a"] })),
            Some(json!("own"))
        );
    }

    #[test]
    fn test_nothing_declared() {
        assert_eq!(select(json!({ "type": "string" })), None);
        assert_eq!(select(json!("not an object")), None);
    }
}
