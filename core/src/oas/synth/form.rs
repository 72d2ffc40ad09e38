//! `application/x-www-form-urlencoded` rendering of synthesized JSON examples.

use serde_json::Value;
use url::form_urlencoded;

/// Flattens a JSON object into form fields and URL-encodes them.
///
/// Nested objects use `parent[child]` keys, arrays of primitives repeat
/// `parent[]`, arrays of containers use `parent[index]`. `null` encodes as an
/// empty value. A non-object root yields an empty body.
pub fn to_form_urlencoded(value: &Value) -> String {
    let Value::Object(map) = value else {
        return String::new();
    };

    let mut fields = Vec::new();
    for (key, child) in map {
        flatten_field(key, child, &mut fields);
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, field) in &fields {
        serializer.append_pair(key, field);
    }
    serializer.finish()
}

fn flatten_field(key: &str, value: &Value, fields: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (child_key, child) in map {
                flatten_field(&format!("{}[{}]", key, child_key), child, fields);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if item.is_object() || item.is_array() {
                    flatten_field(&format!("{}[{}]", key, index), item, fields);
                } else {
                    flatten_field(&format!("{}[]", key), item, fields);
                }
            }
        }
        Value::Null => fields.push((key.to_string(), String::new())),
        Value::String(text) => fields.push((key.to_string(), text.clone())),
        scalar => fields.push((key.to_string(), scalar.to_string())),
    }
}
