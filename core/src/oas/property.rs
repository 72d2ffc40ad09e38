#![deny(missing_docs)]

//! # Property Model
//!
//! `OAProperty` is the compiled, cycle-free description of one schema node that the
//! rendering layer walks and the synthesizer turns into example values.
//!
//! The serialized form uses camelCase keys and omits absent members, so the JSON
//! emitted by the CLI reads like the schema it came from.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Text produced for circular nodes and for anything beyond the depth guard.
pub const CIRCULAR_PLACEHOLDER: &str = "[Circular Reference]";

/// Compiled representation of one schema node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OAProperty {
    /// Property name; empty for root, array-item and union-variant nodes.
    pub name: String,
    /// JSON Schema type names in declaration order.
    pub types: Vec<String>,
    /// Set by the parent from its `required` list.
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    /// Object children, union variants, tuple positions or the single array item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<OAProperty>>,
    /// Item kind of an array node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Declared `enum` values.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Effective example values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,
    /// Example of a single array item (scalar arrays only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subexamples: Option<Vec<Value>>,
    /// Declared `default`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Validation keywords copied verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<IndexMap<String, Value>>,
    /// Declared `externalDocs`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<Value>,
    /// Declared `title`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Declared `description`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// OpenAPI 3.0 `nullable`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// Structural flags.
    #[serde(skip_serializing_if = "PropertyMeta::is_empty")]
    pub meta: PropertyMeta,
}

/// Flag bag describing how a node relates to its parent and its children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyMeta {
    /// Node is a `oneOf` union.
    #[serde(skip_serializing_if = "is_false")]
    pub is_one_of: bool,
    /// Node is a variant of a `oneOf` union.
    #[serde(skip_serializing_if = "is_false")]
    pub is_one_of_item: bool,
    /// Node is an `anyOf` union.
    #[serde(skip_serializing_if = "is_false")]
    pub is_any_of: bool,
    /// Node is a variant of an `anyOf` union.
    #[serde(skip_serializing_if = "is_false")]
    pub is_any_of_item: bool,
    /// Node declares `const`.
    #[serde(skip_serializing_if = "is_false")]
    pub is_constant: bool,
    /// Node replaces a cyclic subtree.
    #[serde(skip_serializing_if = "is_false")]
    pub is_circular_reference: bool,
    /// Synthetic entry describing `additionalProperties`.
    #[serde(skip_serializing_if = "is_false")]
    pub is_additional_properties: bool,
    /// Entry describing array elements after the `prefixItems` tuple.
    #[serde(skip_serializing_if = "is_false")]
    pub is_additional_items: bool,
    /// Entry describing one `prefixItems` position.
    #[serde(skip_serializing_if = "is_false")]
    pub is_prefix_item: bool,
    /// Position within `prefixItems`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_item_index: Option<usize>,
    /// Array node whose children are `prefixItems` positions.
    #[serde(skip_serializing_if = "is_false")]
    pub has_prefix_items: bool,
    /// Array node whose children are the variants of its `items` union.
    #[serde(skip_serializing_if = "is_false")]
    pub has_union_items: bool,
    /// Vendor extensions (`x-*`).
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, Value>,
}

impl PropertyMeta {
    /// `true` when no flag is set and no extension was collected.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl OAProperty {
    /// A node carrying only type names.
    pub fn with_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// `true` for `oneOf` / `anyOf` nodes.
    pub fn is_union(&self) -> bool {
        self.meta.is_one_of || self.meta.is_any_of
    }

    /// The type driving default values: the first non-`null` type, else `null`.
    pub fn primary_type(&self) -> Option<&str> {
        self.types
            .iter()
            .map(String::as_str)
            .find(|t| *t != "null")
            .or_else(|| self.types.first().map(String::as_str))
    }

    /// Looks up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&OAProperty> {
        self.properties.as_deref()?.iter().find(|p| p.name == name)
    }

    /// First effective example, if any.
    pub fn first_example(&self) -> Option<&Value> {
        self.examples.as_deref()?.first()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
