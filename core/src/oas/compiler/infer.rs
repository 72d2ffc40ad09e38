//! Type inference for schemas that omit or under-specify `type`.

use crate::oas::circular::is_circular_marker;
use crate::oas::graph::{NodeId, SchemaGraph, Slot};

/// Types listed in `type`, as a string or an array of strings, without duplicates.
pub(crate) fn declared_types(graph: &SchemaGraph, id: NodeId) -> Vec<String> {
    match graph.get(id, "type") {
        Some(Slot::String(t)) => vec![t.clone()],
        Some(Slot::Array(items)) => {
            let mut types = Vec::new();
            for t in items.iter().filter_map(Slot::as_str) {
                push_unique(&mut types, t);
            }
            types
        }
        _ => Vec::new(),
    }
}

/// Declared types, or the types implied by the schema's structure.
///
/// `properties` / `additionalProperties` imply `object`, `items` / `prefixItems`
/// imply `array`, `const` implies the runtime type of its value and `enum` the
/// types scanned from its values.
pub(crate) fn inferred_types(graph: &SchemaGraph, id: NodeId) -> Vec<String> {
    let declared = declared_types(graph, id);
    if !declared.is_empty() {
        return declared;
    }
    let Some(node) = graph.node(id) else {
        return Vec::new();
    };

    if node.contains_key("properties") || node.contains_key("additionalProperties") {
        return vec!["object".to_string()];
    }
    if node.contains_key("items") || node.contains_key("prefixItems") {
        return vec!["array".to_string()];
    }
    if let Some(value) = node.get("const") {
        return vec![runtime_type(value).to_string()];
    }
    if let Some(values) = node.get("enum").and_then(Slot::as_array) {
        return enum_types(values);
    }
    Vec::new()
}

/// Kind of the items of an array schema: the first non-null inferred type.
pub(crate) fn item_kind(graph: &SchemaGraph, items: NodeId) -> Option<String> {
    if is_circular_marker(graph, items) {
        return Some("object".to_string());
    }
    let types = inferred_types(graph, items);
    types
        .iter()
        .find(|t| t.as_str() != "null")
        .or_else(|| types.first())
        .cloned()
}

/// Runtime type name of a literal value.
///
/// Numbers are reported as `number` regardless of integrality.
pub(crate) fn runtime_type(value: &Slot) -> &'static str {
    match value {
        Slot::Null => "null",
        Slot::Bool(_) => "boolean",
        Slot::Number(_) => "number",
        Slot::String(_) => "string",
        Slot::Array(_) => "array",
        Slot::Node(_) => "object",
    }
}

/// Scans `enum` values for their types, in first-seen order.
///
/// Numbers count as `integer` when integral, `number` otherwise; `integer` is
/// dropped once any non-integral number is seen. Falls back to `string`.
pub(crate) fn enum_types(values: &[Slot]) -> Vec<String> {
    let mut types = Vec::new();
    for value in values {
        let name = match value {
            Slot::Number(n) => {
                let integral = n.is_i64()
                    || n.is_u64()
                    || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0);
                if integral {
                    "integer"
                } else {
                    "number"
                }
            }
            other => runtime_type(other),
        };
        push_unique(&mut types, name);
    }

    if types.iter().any(|t| t == "number") {
        types.retain(|t| t != "integer");
    }
    if types.is_empty() {
        types.push("string".to_string());
    }
    types
}

fn push_unique(types: &mut Vec<String>, name: &str) {
    if !types.iter().any(|t| t == name) {
        types.push(name.to_string());
    }
}
