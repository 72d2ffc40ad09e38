#![deny(missing_docs)]

//! # Value Synthesizer
//!
//! Produces concrete example values from compiled [`OAProperty`] trees.
//!
//! JSON is the canonical output; [`xml`] and [`form`] serialize the JSON result.
//! Unions always synthesize their first variant, so output is deterministic.

pub mod form;
pub mod xml;

use crate::config::EngineConfig;
use crate::oas::property::{OAProperty, CIRCULAR_PLACEHOLDER};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Textual serialization of a synthesized example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExampleFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// XML wrapped in the configured root element.
    Xml,
    /// `application/x-www-form-urlencoded`.
    Form,
}

impl ExampleFormat {
    /// Serializes an example value in this format.
    pub fn render(self, value: &Value, config: &EngineConfig) -> String {
        match self {
            ExampleFormat::Json => to_json_string(value),
            ExampleFormat::Xml => xml::to_xml_string(value, config),
            ExampleFormat::Form => form::to_form_urlencoded(value),
        }
    }
}

/// Default value for a JSON Schema type name; `null` for unknown names.
pub fn default_for_type(type_name: &str) -> Value {
    match type_name {
        "string" => json!("string"),
        "number" | "integer" => json!(0),
        "float" => json!(0.0),
        "boolean" => json!(true),
        "array" => json!([]),
        "object" => json!({}),
        _ => Value::Null,
    }
}

/// Synthesizes an example for `prop`.
///
/// With `use_example`, declared examples win over generated values. Nesting
/// deeper than `config.max_depth` collapses to the circular placeholder.
pub fn synthesize_json(prop: &OAProperty, use_example: bool, config: &EngineConfig) -> Value {
    Synthesizer {
        use_example,
        max_depth: config.max_depth,
    }
    .value(prop, 0)
}

/// Synthesizes and serializes in one step.
pub fn synthesize(
    prop: &OAProperty,
    use_example: bool,
    format: ExampleFormat,
    config: &EngineConfig,
) -> String {
    format.render(&synthesize_json(prop, use_example, config), config)
}

/// Pretty JSON text; `{}` if serialization fails.
pub fn to_json_string(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| {
        debug!(error = %err, "json serialization failed, using empty object");
        "{}".to_string()
    })
}

struct Synthesizer {
    use_example: bool,
    max_depth: usize,
}

impl Synthesizer {
    fn value(&self, prop: &OAProperty, depth: usize) -> Value {
        if depth > self.max_depth || prop.meta.is_circular_reference {
            return json!(CIRCULAR_PLACEHOLDER);
        }

        if prop.meta.is_constant {
            return match prop.first_example() {
                Some(example) if self.use_example => example.clone(),
                _ => self.type_default(prop),
            };
        }

        if self.use_example {
            if let Some(example) = prop.first_example() {
                return example.clone();
            }
        }

        if prop.meta.has_union_items {
            return Value::Array(self.first_variant(prop, depth).into_iter().collect());
        }
        if prop.is_union() {
            return self
                .first_variant(prop, depth)
                .unwrap_or_else(|| self.type_default(prop));
        }

        match prop.primary_type() {
            Some("array") => self.array(prop, depth),
            Some("object") => match prop.properties.as_deref() {
                Some(children) => self.object(children, depth),
                None => json!({}),
            },
            _ => self.type_default(prop),
        }
    }

    fn first_variant(&self, prop: &OAProperty, depth: usize) -> Option<Value> {
        let variant = prop.properties.as_deref()?.first()?;
        Some(self.value(variant, depth + 1))
    }

    fn array(&self, prop: &OAProperty, depth: usize) -> Value {
        let children = prop.properties.as_deref().unwrap_or_default();

        if prop.meta.has_prefix_items {
            return Value::Array(children.iter().map(|c| self.value(c, depth + 1)).collect());
        }

        let single_circular = matches!(children, [only] if only.meta.is_circular_reference);
        if prop.subtype.as_deref() == Some("array") || single_circular {
            return Value::Array(children.iter().take(1).map(|c| self.value(c, depth + 1)).collect());
        }

        match prop.subtype.as_deref() {
            Some("object") => json!([self.object(children, depth + 1)]),
            Some(scalar) => {
                let item = prop
                    .subexamples
                    .as_deref()
                    .and_then(<[Value]>::first)
                    .filter(|_| self.use_example)
                    .cloned()
                    .unwrap_or_else(|| default_for_type(scalar));
                json!([item])
            }
            None => json!([]),
        }
    }

    fn object(&self, children: &[OAProperty], depth: usize) -> Value {
        let map = children
            .iter()
            .map(|child| (child.name.clone(), self.value(child, depth + 1)))
            .collect::<Map<String, Value>>();
        Value::Object(map)
    }

    fn type_default(&self, prop: &OAProperty) -> Value {
        prop.primary_type().map(default_for_type).unwrap_or(Value::Null)
    }
}
