//! XML rendering of synthesized JSON examples.
//!
//! Objects become nested elements and arrays repeated item elements, all inside
//! the configured root element. `null` and empty containers become empty elements.

use crate::config::EngineConfig;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use regex::Regex;
use serde_json::Value;
use std::error::Error;
use std::io::Write;
use std::sync::OnceLock;
use tracing::debug;

/// Serializes `value` as indented XML; an empty string if writing fails.
pub fn to_xml_string(value: &Value, config: &EngineConfig) -> String {
    match write_document(value, config) {
        Ok(xml) => collapse_blank_lines(&xml),
        Err(err) => {
            debug!(error = %err, "xml serialization failed, using empty body");
            String::new()
        }
    }
}

/// Replaces characters not allowed in an element name with `_`.
///
/// Names must not start with a digit, `-` or `.`; such names get a `_` prefix.
pub fn sanitize_element_name(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized
        .chars()
        .next()
        .is_none_or(|c| c.is_ascii_digit() || c == '-' || c == '.')
    {
        sanitized.insert(0, '_');
    }
    sanitized
}

fn write_document(value: &Value, config: &EngineConfig) -> Result<String, Box<dyn Error>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', config.xml_indent);
    let root = sanitize_element_name(&config.xml_root);
    write_element(&mut writer, &root, value, config)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &Value,
    config: &EngineConfig,
) -> Result<(), Box<dyn Error>> {
    match value {
        Value::Null => {
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        Value::Array(items) if items.is_empty() => {
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        Value::Object(map) if map.is_empty() => {
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        Value::Array(items) => {
            let item_name = sanitize_element_name(&config.xml_item);
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            for item in items {
                write_element(writer, &item_name, item, config)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Value::Object(map) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            for (key, child) in map {
                write_element(writer, &sanitize_element_name(key), child, config)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Value::String(text) => write_text(writer, name, text)?,
        scalar => write_text(writer, name, &scalar.to_string())?,
    }
    Ok(())
}

fn write_text<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<(), Box<dyn Error>> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Drops whitespace-only lines between markup. Text content escapes `<` and `>`,
/// so blank lines inside example strings are left alone.
fn collapse_blank_lines(xml: &str) -> String {
    static BLANK_LINES: OnceLock<Regex> = OnceLock::new();
    let blank_lines = BLANK_LINES
        .get_or_init(|| Regex::new(r">\n(?:[ \t]*\n)+([ \t]*<)").expect("Invalid regex"));
    blank_lines.replace_all(xml, ">\n${1}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_object_array_and_null() {
        let xml = to_xml_string(
            &json!({ "name": "x", "tags": ["a", "b"], "meta": null }),
            &EngineConfig::default(),
        );
        assert_eq!(
            xml,
            "<root>\n  <name>x</name>\n  <tags>\n    <item>a</item>\n    <item>b</item>\n  </tags>\n  <meta/>\n</root>"
        );
    }

    #[test]
    fn test_configured_names_and_escaping() {
        let config = EngineConfig {
            xml_root: "payload".to_string(),
            xml_item: "entry".to_string(),
            ..EngineConfig::default()
        };
        let xml = to_xml_string(&json!([1, "a<b"]), &config);
        assert_eq!(xml, "<payload>\n  <entry>1</entry>\n  <entry>a&lt;b</entry>\n</payload>");
    }

    #[test]
    fn test_sanitize_element_name() {
        assert_eq!(sanitize_element_name("user name"), "user_name");
        assert_eq!(sanitize_element_name("1st"), "_1st");
        assert_eq!(sanitize_element_name("@type"), "_type");
        assert_eq!(sanitize_element_name(""), "_");
        assert_eq!(sanitize_element_name("a.b-c"), "a.b-c");
    }

    #[test]
    fn test_no_blank_lines() {
        let xml = to_xml_string(&json!({ "a": { "b": { "c": [] } } }), &EngineConfig::default());
        assert!(!xml.contains("\n\n"));
        assert!(xml.contains("<c/>"));
    }

    #[test]
    fn test_blank_lines_in_text_are_kept() {
        let xml = to_xml_string(&json!({ "note": "a\n\nb" }), &EngineConfig::default());
        assert_eq!(xml, "<root>\n  <note>a\n\nb</note>\n</root>");
    }

    #[test]
    fn test_collapse_only_touches_markup_lines() {
        assert_eq!(
            collapse_blank_lines("<a>\n\n  \n  <b>x\n\ny</b>\n</a>"),
            "<a>\n  <b>x\n\ny</b>\n</a>"
        );
    }
}
