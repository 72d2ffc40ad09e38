#![deny(missing_docs)]

//! # OpenAPI Document
//!
//! Loads an OpenAPI document into a [`SchemaGraph`] and prepares it for compilation:
//!
//! 1. every `{"$ref": ...}` object that points into this document is replaced by an
//!    edge to its target (sibling keys next to `$ref` are ignored);
//! 2. `allOf` compositions are flattened in place;
//! 3. cycles are cut by the circular reference resolver.
//!
//! Queries address nodes with JSON Pointers relative to the document root and
//! share one identity-keyed [`PropertyCache`].

use crate::config::EngineConfig;
use crate::error::{AppError, AppResult};
use crate::oas::cache::PropertyCache;
use crate::oas::circular::resolve_circular_references;
use crate::oas::compiler::PropertyCompiler;
use crate::oas::example::select_example;
use crate::oas::graph::{Node, NodeId, NodeRef, SchemaGraph, Slot};
use crate::oas::property::OAProperty;
use crate::oas::ref_utils::{decode_pointer_segment, normalize_ref_to_local};
use crate::oas::synth::{synthesize_json, ExampleFormat};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// A loaded, dereferenced and cycle-free OpenAPI document.
#[derive(Debug, Clone)]
pub struct OpenApiDocument {
    graph: SchemaGraph,
    root: Slot,
    config: EngineConfig,
    cache: PropertyCache,
}

impl OpenApiDocument {
    /// Parses a YAML (or JSON) document.
    pub fn from_yaml_str(content: &str, config: EngineConfig) -> AppResult<Self> {
        let value: Value = serde_yaml::from_str(content)
            .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI YAML: {}", e)))?;
        Ok(Self::from_value(value, config))
    }

    /// Parses a JSON document.
    pub fn from_json_str(content: &str, config: EngineConfig) -> AppResult<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI JSON: {}", e)))?;
        Ok(Self::from_value(value, config))
    }

    /// Reads a document from disk; `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_path(path: &Path, config: EngineConfig) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content, config)
        } else {
            Self::from_yaml_str(&content, config)
        }
    }

    /// Prepares an already parsed document.
    pub fn from_value(value: Value, config: EngineConfig) -> Self {
        let mut graph = SchemaGraph::new();
        let root = graph.insert(value);

        if let Some(root_id) = root.as_node() {
            let self_uri = graph
                .get(root_id, "$self")
                .and_then(Slot::as_str)
                .map(str::to_string);
            dereference(&mut graph, &root, self_uri.as_deref(), config.max_ref_hops);
            flatten_all_of_nodes(&mut graph);
            resolve_circular_references(&mut graph, root_id, config.max_resolve_depth);
        }

        Self {
            graph,
            root,
            config,
            cache: PropertyCache::new(),
        }
    }

    /// The prepared graph.
    pub fn graph(&self) -> &SchemaGraph {
        &self.graph
    }

    /// The document root.
    pub fn root(&self) -> &Slot {
        &self.root
    }

    /// The configuration the document was loaded with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of compiled nodes currently memoized.
    pub fn cached_properties(&self) -> usize {
        self.cache.len()
    }

    /// Looks up a value by JSON Pointer (`""`, `"#"` and `"#/..."` forms accepted).
    pub fn slot_at(&self, pointer: &str) -> Option<&Slot> {
        self.graph.resolve_pointer(&self.root, pointer)
    }

    /// Materializes the value at `pointer` as JSON.
    pub fn value_at(&self, pointer: &str) -> Option<Value> {
        self.slot_at(pointer).map(|slot| self.graph.to_value(slot))
    }

    /// Compiles the schema at `pointer`.
    pub fn property_at(&mut self, pointer: &str) -> Option<OAProperty> {
        let slot = self.graph.resolve_pointer(&self.root, pointer)?;
        let mut compiler = PropertyCompiler::with_cache(&self.graph, &self.config, &mut self.cache);
        Some(compiler.compile(slot))
    }

    /// Compiles the children list of the schema at `pointer`.
    pub fn properties_at(&mut self, pointer: &str) -> Option<Vec<OAProperty>> {
        self.property_at(pointer)
            .map(|prop| prop.properties.unwrap_or_default())
    }

    /// The declared example of the parameter, media entry or schema at `pointer`.
    pub fn example_at(&self, pointer: &str) -> Option<Value> {
        let slot = self.slot_at(pointer)?;
        select_example(&self.graph, slot, &self.config.example_override_key)
    }

    /// Synthesizes a JSON example for the schema at `pointer`.
    pub fn json_example_at(&mut self, pointer: &str, use_example: bool) -> Option<Value> {
        let prop = self.property_at(pointer)?;
        Some(synthesize_json(&prop, use_example, &self.config))
    }

    /// Synthesizes an XML example for the schema at `pointer`.
    pub fn xml_example_at(&mut self, pointer: &str, use_example: bool) -> Option<String> {
        self.example_in_format(pointer, use_example, ExampleFormat::Xml)
    }

    /// Synthesizes a form-urlencoded example for the schema at `pointer`.
    pub fn form_example_at(&mut self, pointer: &str, use_example: bool) -> Option<String> {
        self.example_in_format(pointer, use_example, ExampleFormat::Form)
    }

    /// Synthesizes an example for the schema at `pointer` and serializes it.
    pub fn example_in_format(
        &mut self,
        pointer: &str,
        use_example: bool,
        format: ExampleFormat,
    ) -> Option<String> {
        let value = self.json_example_at(pointer, use_example)?;
        Some(format.render(&value, &self.config))
    }

    /// Default request body for a media-type entry (an object with `schema`).
    ///
    /// With `use_example`, the entry's declared example wins. Otherwise, or when
    /// nothing is declared, the example is synthesized from `schema`. Targets
    /// without `schema` are treated as schemas themselves.
    pub fn media_example_at(&mut self, pointer: &str, use_example: bool) -> Option<Value> {
        let id = self.slot_at(pointer)?.as_node();
        let has_schema = id.is_some_and(|id| self.graph.get(id, "schema").is_some());
        if !has_schema {
            return self.json_example_at(pointer, use_example);
        }

        if use_example {
            if let Some(example) = self.example_at(pointer) {
                return Some(example);
            }
        }
        let schema_pointer = format!("{}/schema", pointer.trim_end_matches('/'));
        self.json_example_at(&schema_pointer, use_example)
    }
}

/// Replaces reference objects reachable as member values with edges to their targets.
fn dereference(graph: &mut SchemaGraph, root: &Slot, self_uri: Option<&str>, max_hops: usize) {
    let ids: Vec<NodeId> = graph.node_ids().collect();
    for id in ids {
        let Some(keys) = graph.node(id).map(|node| node.keys().cloned().collect::<Vec<_>>()) else {
            continue;
        };
        for key in keys {
            let Some(slot) = graph.get(id, &key) else {
                continue;
            };
            if let Some(replacement) = dereference_slot(graph, root, slot, self_uri, max_hops) {
                if let Some(node) = graph.node_mut(id) {
                    node.insert(key, replacement);
                }
            }
        }
    }
}

fn dereference_slot(
    graph: &SchemaGraph,
    root: &Slot,
    slot: &Slot,
    self_uri: Option<&str>,
    max_hops: usize,
) -> Option<Slot> {
    match slot {
        Slot::Node(edge) => {
            let reference = ref_of(graph, edge.id)?;
            Some(follow_reference(graph, root, reference, self_uri, max_hops))
        }
        Slot::Array(items) => {
            let mut changed = false;
            let rebuilt = items
                .iter()
                .map(|item| match dereference_slot(graph, root, item, self_uri, max_hops) {
                    Some(replacement) => {
                        changed = true;
                        replacement
                    }
                    None => item.clone(),
                })
                .collect();
            changed.then_some(Slot::Array(rebuilt))
        }
        _ => None,
    }
}

/// `$ref` string of a reference object.
fn ref_of(graph: &SchemaGraph, id: NodeId) -> Option<&str> {
    graph.get(id, "$ref").and_then(Slot::as_str)
}

/// Resolves a reference, following chains of reference objects.
///
/// Unresolvable references (external, missing target, or more than `max_hops`
/// references followed) resolve to `null`.
fn follow_reference(
    graph: &SchemaGraph,
    root: &Slot,
    reference: &str,
    self_uri: Option<&str>,
    max_hops: usize,
) -> Slot {
    let mut hops = max_hops;
    match resolve_reference(graph, root, reference, self_uri, &mut hops) {
        Ok(Slot::Node(edge)) => Slot::Node(NodeRef::dereferenced(edge.id, reference)),
        Ok(other) => other.clone(),
        Err(reason) => {
            warn!(%reference, reason, "unresolvable reference");
            Slot::Null
        }
    }
}

/// Final non-reference target of `reference`. Every reference followed, including
/// those met mid-pointer, spends one hop.
fn resolve_reference<'a>(
    graph: &'a SchemaGraph,
    root: &'a Slot,
    reference: &str,
    self_uri: Option<&str>,
    hops: &mut usize,
) -> Result<&'a Slot, &'static str> {
    if *hops == 0 {
        return Err("reference chain too long");
    }
    *hops -= 1;
    let pointer = normalize_ref_to_local(reference, self_uri).ok_or("not local to this document")?;
    let target = resolve_pointer_through_refs(graph, root, &pointer, self_uri, hops)?;
    match target.as_node().and_then(|id| ref_of(graph, id)) {
        Some(next) => resolve_reference(graph, root, next, self_uri, hops),
        None => Ok(target),
    }
}

/// Walks `pointer` from `root`, following reference objects that sit on the path.
fn resolve_pointer_through_refs<'a>(
    graph: &'a SchemaGraph,
    root: &'a Slot,
    pointer: &str,
    self_uri: Option<&str>,
    hops: &mut usize,
) -> Result<&'a Slot, &'static str> {
    let pointer = pointer.strip_prefix('#').unwrap_or(pointer);
    if pointer.is_empty() {
        return Ok(root);
    }
    let rest = pointer.strip_prefix('/').ok_or("malformed pointer")?;

    let mut current = root;
    for raw in rest.split('/') {
        if let Some(next) = current.as_node().and_then(|id| ref_of(graph, id)) {
            current = resolve_reference(graph, root, next, self_uri, hops)?;
        }
        let segment = decode_pointer_segment(raw);
        current = match current {
            Slot::Node(edge) => graph.get(edge.id, &segment),
            Slot::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
            _ => None,
        }
        .ok_or("target not found")?;
    }
    Ok(current)
}

fn flatten_all_of_nodes(graph: &mut SchemaGraph) {
    let ids: Vec<NodeId> = graph.node_ids().collect();
    let mut in_progress = Vec::new();
    for id in ids {
        flatten_all_of(graph, id, &mut in_progress);
    }
}

/// Merges the `allOf` members of a node into the node itself.
///
/// Members are flattened first. Properties merge in member order with later
/// members overriding, then the node's own properties. `required` lists are
/// unioned. For every other key the node's own value wins, then the first member
/// declaring it.
fn flatten_all_of(graph: &mut SchemaGraph, id: NodeId, in_progress: &mut Vec<NodeId>) {
    if in_progress.contains(&id) {
        debug!(node = id.index(), "self-referential allOf skipped");
        return;
    }
    let Some(members) = graph
        .get(id, "allOf")
        .and_then(Slot::as_array)
        .map(|members| members.iter().filter_map(Slot::as_node).collect::<Vec<_>>())
    else {
        return;
    };

    in_progress.push(id);
    for member in &members {
        flatten_all_of(graph, *member, in_progress);
    }
    in_progress.pop();

    let Some(own) = graph.node(id).cloned() else {
        return;
    };
    let member_nodes: Vec<Node> = members
        .iter()
        .filter(|member| **member != id && !in_progress.contains(member))
        .filter_map(|member| graph.node(*member).cloned())
        .collect();

    let mut merged = Node::new();
    let mut properties = Node::new();
    let mut has_properties = false;
    let mut required: Vec<String> = Vec::new();

    for source in member_nodes.iter().chain(std::iter::once(&own)) {
        if let Some(props) = source
            .get("properties")
            .and_then(Slot::as_node)
            .and_then(|p| graph.node(p))
        {
            has_properties = true;
            for (name, schema) in props {
                properties.insert(name.clone(), schema.clone());
            }
        }
        for name in source
            .get("required")
            .and_then(Slot::as_array)
            .unwrap_or_default()
            .iter()
            .filter_map(Slot::as_str)
        {
            if !required.iter().any(|r| r == name) {
                required.push(name.to_string());
            }
        }
    }

    for source in std::iter::once(&own).chain(member_nodes.iter()) {
        for (key, value) in source {
            if !matches!(key.as_str(), "allOf" | "properties" | "required") && !merged.contains_key(key) {
                merged.insert(key.clone(), value.clone());
            }
        }
    }

    if has_properties {
        let props_id = graph.add_node(properties);
        merged.insert("properties".to_string(), Slot::Node(NodeRef::new(props_id)));
    }
    if !required.is_empty() {
        merged.insert(
            "required".to_string(),
            Slot::Array(required.into_iter().map(Slot::String).collect()),
        );
    }
    if let Some(node) = graph.node_mut(id) {
        *node = merged;
    }
}
