#![deny(missing_docs)]

//! # Engine Configuration
//!
//! Tunables shared by the resolver, compiler and synthesizer.
//! Every field has a default so a partial YAML file is enough.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for schema compilation and example synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum nesting depth walked by the compiler and the synthesizer.
    pub max_depth: usize,
    /// Vendor extension consulted before `example` / `examples`.
    pub example_override_key: String,
    /// Name of the element wrapping XML examples.
    pub xml_root: String,
    /// Name of the element used for each XML array entry.
    pub xml_item: String,
    /// Spaces per XML indentation level.
    pub xml_indent: usize,
    /// Maximum number of `$ref` hops followed when dereferencing a chain.
    pub max_ref_hops: usize,
    /// Maximum ancestor-chain length walked by the circular reference resolver.
    /// Counts every JSON object from the document root, not only schemas.
    pub max_resolve_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            example_override_key: "x-playground-example".to_string(),
            xml_root: "root".to_string(),
            xml_item: "item".to_string(),
            xml_indent: 2,
            max_ref_hops: 64,
            max_resolve_depth: 256,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from YAML (JSON is accepted as well).
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| AppError::Parse(format!("Failed to parse engine config: {}", e)))
    }

    /// Reads and parses a configuration file.
    pub fn from_yaml_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}
