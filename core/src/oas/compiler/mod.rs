#![deny(missing_docs)]

//! # Property Model Compiler
//!
//! Turns a dereferenced, circular-marked schema node into an [`OAProperty`] tree.
//!
//! Branches, in priority order:
//! 1. empty schema (or a non-object such as `null`/`true`) ⇒ no types
//! 2. circular marker ⇒ terminal `object` node
//! 3. `oneOf` / 4. `anyOf` ⇒ union node whose children are the variants
//! 5. `const` ⇒ constant node
//! 6. `enum` ⇒ declared or scanned types
//! 7. array (declared or implied by `items` / `prefixItems`)
//! 8. object (declared or implied by `properties` / `additionalProperties`)
//!
//! Base metadata (see [`metadata`]) is captured for every non-circular node.
//! The compiler never fails: unknown shapes degrade to permissive defaults.

pub mod infer;
pub mod metadata;

use crate::config::EngineConfig;
use crate::oas::cache::PropertyCache;
use crate::oas::circular::{is_circular_marker, CIRCULAR_REFERENCE_KEY};
use crate::oas::compiler::infer::{declared_types, enum_types, inferred_types, item_kind, runtime_type};
use crate::oas::compiler::metadata::apply_base_metadata;
use crate::oas::example::select_example;
use crate::oas::graph::{NodeId, SchemaGraph, Slot};
use crate::oas::property::OAProperty;
use tracing::{debug, trace};

/// Name given to the synthetic `additionalProperties` child.
pub const ADDITIONAL_PROPERTIES_NAME: &str = "additionalProperties";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnionKind {
    OneOf,
    AnyOf,
}

impl UnionKind {
    fn keyword(self) -> &'static str {
        match self {
            UnionKind::OneOf => "oneOf",
            UnionKind::AnyOf => "anyOf",
        }
    }

    fn tag_union(self, prop: &mut OAProperty) {
        match self {
            UnionKind::OneOf => prop.meta.is_one_of = true,
            UnionKind::AnyOf => prop.meta.is_any_of = true,
        }
    }

    fn tag_variant(self, prop: &mut OAProperty) {
        match self {
            UnionKind::OneOf => prop.meta.is_one_of_item = true,
            UnionKind::AnyOf => prop.meta.is_any_of_item = true,
        }
    }

    fn of(graph: &SchemaGraph, id: NodeId) -> Option<(UnionKind, &[Slot])> {
        [UnionKind::OneOf, UnionKind::AnyOf].into_iter().find_map(|kind| {
            graph
                .get(id, kind.keyword())
                .and_then(Slot::as_array)
                .map(|variants| (kind, variants))
        })
    }
}

/// Compiles schema nodes of one graph, optionally memoizing by node identity.
pub struct PropertyCompiler<'a> {
    graph: &'a SchemaGraph,
    config: &'a EngineConfig,
    cache: Option<&'a mut PropertyCache>,
    stack: Vec<NodeId>,
    guard_hits: usize,
}

impl<'a> PropertyCompiler<'a> {
    /// A compiler without memoization.
    pub fn new(graph: &'a SchemaGraph, config: &'a EngineConfig) -> Self {
        Self {
            graph,
            config,
            cache: None,
            stack: Vec::new(),
            guard_hits: 0,
        }
    }

    /// A compiler that reads and fills `cache`.
    pub fn with_cache(
        graph: &'a SchemaGraph,
        config: &'a EngineConfig,
        cache: &'a mut PropertyCache,
    ) -> Self {
        Self {
            cache: Some(cache),
            ..Self::new(graph, config)
        }
    }

    /// Compiles one schema slot.
    pub fn compile(&mut self, slot: &Slot) -> OAProperty {
        let Slot::Node(edge) = slot else {
            return OAProperty::default();
        };
        let id = edge.id;

        if self.stack.contains(&id) || self.stack.len() >= self.config.max_depth {
            self.guard_hits += 1;
            let target = edge.origin.as_deref().unwrap_or("#");
            debug!(node = id.index(), %target, depth = self.stack.len(), "compiler guard reached");
            return circular_property(target);
        }

        if let Some(hit) = self.cache.as_deref().and_then(|cache| cache.get(id)) {
            trace!(node = id.index(), "property cache hit");
            return hit.clone();
        }

        let hits_before = self.guard_hits;
        self.stack.push(id);
        let prop = self.compile_node(id);
        self.stack.pop();

        // Results shaped by the guard depend on the ancestors and must not be reused.
        if self.guard_hits == hits_before {
            if let Some(cache) = self.cache.as_deref_mut() {
                cache.insert(id, prop.clone());
            }
        }
        prop
    }

    /// Compiles the children list of a schema: object properties, union
    /// variants or tuple positions.
    pub fn compile_children(&mut self, slot: &Slot) -> Vec<OAProperty> {
        self.compile(slot).properties.unwrap_or_default()
    }

    fn compile_node(&mut self, id: NodeId) -> OAProperty {
        let graph = self.graph;
        let Some(node) = graph.node(id) else {
            return OAProperty::default();
        };
        if node.is_empty() {
            return OAProperty::default();
        }
        if let Some(path) = node.get(CIRCULAR_REFERENCE_KEY).and_then(Slot::as_str) {
            return circular_property(path);
        }

        let mut prop = OAProperty::default();
        apply_base_metadata(graph, id, &mut prop, &self.config.example_override_key);

        if let Some((kind, variants)) = UnionKind::of(graph, id) {
            let (children, types) = self.compile_variants(variants, kind);
            prop.types = types;
            prop.properties = Some(children);
            kind.tag_union(&mut prop);
        } else if let Some(value) = node.get("const") {
            let declared = declared_types(graph, id);
            prop.types = if declared.is_empty() {
                vec![runtime_type(value).to_string()]
            } else {
                declared
            };
            prop.examples = Some(vec![graph.to_value(value)]);
            prop.meta.is_constant = true;
        } else if let Some(values) = node.get("enum").and_then(Slot::as_array) {
            let declared = declared_types(graph, id);
            prop.types = if declared.is_empty() {
                enum_types(values)
            } else {
                declared
            };
            prop.enum_values = Some(values.iter().map(|v| graph.to_value(v)).collect());
        } else {
            prop.types = inferred_types(graph, id);
            if prop.types.iter().any(|t| t == "array") {
                self.fill_array(id, &mut prop);
            } else if prop.types.iter().any(|t| t == "object") {
                let children = self.object_children(id);
                prop.properties = (!children.is_empty()).then_some(children);
            }
        }
        prop
    }

    fn compile_variants(&mut self, variants: &[Slot], kind: UnionKind) -> (Vec<OAProperty>, Vec<String>) {
        let mut children = Vec::with_capacity(variants.len());
        let mut types: Vec<String> = Vec::new();
        for variant in variants {
            let mut child = self.compile(variant);
            kind.tag_variant(&mut child);
            for t in &child.types {
                if !types.contains(t) {
                    types.push(t.clone());
                }
            }
            children.push(child);
        }
        (children, types)
    }

    fn fill_array(&mut self, id: NodeId, prop: &mut OAProperty) {
        let graph = self.graph;
        let items = graph.get(id, "items");

        if let Some(prefix_items) = graph.get(id, "prefixItems").and_then(Slot::as_array) {
            let mut children = Vec::with_capacity(prefix_items.len() + 1);
            for (index, item) in prefix_items.iter().enumerate() {
                let mut child = self.compile(item);
                child.meta.is_prefix_item = true;
                child.meta.prefix_item_index = Some(index);
                children.push(child);
            }
            // `items: false` closes the tuple; only a schema describes further elements.
            if let Some(items) = items.filter(|slot| slot.as_node().is_some()) {
                let mut additional = self.compile(items);
                additional.meta.is_additional_items = true;
                children.push(additional);
                prop.subtype = None;
            }
            prop.properties = Some(children);
            prop.meta.has_prefix_items = true;
            return;
        }

        let Some(items) = items else {
            return;
        };
        let Some(items_id) = items.as_node() else {
            return;
        };

        if is_circular_marker(graph, items_id) {
            prop.subtype = Some("object".to_string());
            prop.properties = Some(vec![self.compile(items)]);
            return;
        }

        if let Some((kind, variants)) = UnionKind::of(graph, items_id) {
            self.stack.push(items_id);
            let (children, _) = self.compile_variants(variants, kind);
            self.stack.pop();
            prop.properties = Some(children);
            prop.meta.has_union_items = true;
            kind.tag_union(prop);
            return;
        }

        match item_kind(graph, items_id).as_deref() {
            Some("object") => {
                prop.subtype = Some("object".to_string());
                self.stack.push(items_id);
                let children = self.object_children(items_id);
                self.stack.pop();
                prop.properties = (!children.is_empty()).then_some(children);
            }
            Some("array") => {
                prop.subtype = Some("array".to_string());
                prop.properties = Some(vec![self.compile(items)]);
            }
            Some(scalar) => {
                prop.subtype = Some(scalar.to_string());
                prop.subexamples = select_example(graph, items, &self.config.example_override_key)
                    .map(|example| vec![example]);
            }
            None => {}
        }
    }

    /// One entry per declared property, then the synthetic `additionalProperties`.
    fn object_children(&mut self, id: NodeId) -> Vec<OAProperty> {
        let graph = self.graph;
        let required: Vec<&str> = graph
            .get(id, "required")
            .and_then(Slot::as_array)
            .map(|names| names.iter().filter_map(Slot::as_str).collect())
            .unwrap_or_default();

        let mut children = Vec::new();
        if let Some(properties) = graph
            .get(id, "properties")
            .and_then(Slot::as_node)
            .and_then(|props| graph.node(props))
        {
            for (name, schema) in properties {
                let mut child = self.compile(schema);
                child.name = name.clone();
                child.required = required.contains(&name.as_str());
                children.push(child);
            }
        }

        let additional = match graph.get(id, "additionalProperties") {
            Some(Slot::Bool(true)) => Some(OAProperty::with_types(["string"])),
            Some(schema) if schema.as_node().is_some() => Some(self.compile(schema)),
            _ => None,
        };
        if let Some(mut additional) = additional {
            additional.name = ADDITIONAL_PROPERTIES_NAME.to_string();
            additional.meta.is_additional_properties = true;
            children.push(additional);
        }
        children
    }
}

/// Terminal node standing in for a cyclic subtree.
pub fn circular_property(path: &str) -> OAProperty {
    let mut prop = OAProperty::with_types(["object"]);
    prop.description = Some(format!("Circular reference to {}", path));
    prop.meta.is_circular_reference = true;
    prop
}

/// Compiles a schema slot without memoization.
pub fn compile_schema(graph: &SchemaGraph, slot: &Slot, config: &EngineConfig) -> OAProperty {
    PropertyCompiler::new(graph, config).compile(slot)
}

/// Compiles the children list of a schema slot without memoization.
pub fn compile_children(graph: &SchemaGraph, slot: &Slot, config: &EngineConfig) -> Vec<OAProperty> {
    PropertyCompiler::new(graph, config).compile_children(slot)
}
