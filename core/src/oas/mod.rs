#![deny(missing_docs)]

//! # OpenAPI Schema Engine
//!
//! - **graph**: arena of JSON object nodes with stable identities.
//! - **document**: loading, `$ref` dereferencing and `allOf` flattening.
//! - **circular**: cutting cycles into terminal marker nodes.
//! - **compiler**: schema nodes to [`OAProperty`] trees.
//! - **example**: declared example selection.
//! - **synth**: example synthesis (JSON, XML, form-urlencoded).

pub mod cache;
pub mod circular;
pub mod compiler;
pub mod document;
pub mod example;
pub mod graph;
pub mod property;
pub(crate) mod ref_utils;
pub mod synth;

pub use cache::PropertyCache;
pub use circular::{is_circular_marker, resolve_circular_references};
pub use compiler::{circular_property, compile_children, compile_schema, PropertyCompiler};
pub use document::OpenApiDocument;
pub use example::{is_example_object, select_example};
pub use graph::{Node, NodeId, NodeRef, SchemaGraph, Slot};
pub use property::{OAProperty, PropertyMeta, CIRCULAR_PLACEHOLDER};
pub use synth::{default_for_type, synthesize, synthesize_json, to_json_string, ExampleFormat};
