#![deny(missing_docs)]

//! # OAS Docs Core
//!
//! Schema resolution and example synthesis for OpenAPI documents.
//!
//! A document is loaded into an identity-preserving graph, dereferenced, cut free
//! of cycles, compiled into [`OAProperty`] trees and turned into example payloads.
//! Nothing in this crate fetches remote documents or performs I/O beyond reading
//! local files handed to it.

/// Shared error types.
pub mod error;

/// Engine configuration.
pub mod config;

/// OpenAPI schema graph, compiler and synthesizer.
pub mod oas;

pub use config::EngineConfig;
pub use error::{AppError, AppResult};
pub use oas::{
    compile_children, compile_schema, default_for_type, resolve_circular_references,
    select_example, synthesize, synthesize_json, to_json_string, ExampleFormat, NodeId,
    OAProperty, OpenApiDocument, PropertyCache, PropertyMeta, SchemaGraph, Slot,
    CIRCULAR_PLACEHOLDER,
};
