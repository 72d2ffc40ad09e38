use oas_docs_core::oas::graph::{NodeRef, SchemaGraph, Slot};
use oas_docs_core::{
    compile_schema, resolve_circular_references, synthesize_json, EngineConfig, ExampleFormat,
    OpenApiDocument, CIRCULAR_PLACEHOLDER,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const PETSTORE: &str = r#"
openapi: 3.1.0
info:
  title: Pets
  version: 1.0.0
paths:
  /pets:
    post:
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/NewPet'
          application/x-www-form-urlencoded:
            schema:
              $ref: '#/components/schemas/NewPet'
      responses:
        '200':
          content:
            application/json:
              examples:
                rex:
                  summary: A dog
                  value:
                    id: 7
                    name: Rex
              schema:
                $ref: '#/components/schemas/Pet'
components:
  schemas:
    NewPet:
      type: object
      required: [name]
      properties:
        name:
          type: string
          example: Rex
        tags:
          type: array
          items:
            type: string
    Pet:
      allOf:
        - $ref: '#/components/schemas/NewPet'
        - type: object
          required: [id]
          properties:
            id:
              type: integer
              format: int64
            owner:
              $ref: '#/components/schemas/Owner'
    Owner:
      type: object
      properties:
        name:
          type: string
        pets:
          type: array
          items:
            $ref: '#/components/schemas/Pet'
"#;

fn compile_and_synthesize(schema: Value, use_example: bool) -> Value {
    let config = EngineConfig::default();
    let mut graph = SchemaGraph::new();
    let slot = graph.insert(schema);
    synthesize_json(&compile_schema(&graph, &slot, &config), use_example, &config)
}

fn petstore() -> OpenApiDocument {
    OpenApiDocument::from_yaml_str(PETSTORE, EngineConfig::default()).unwrap()
}

#[test]
fn scenario_array_of_objects() {
    let config = EngineConfig::default();
    let mut graph = SchemaGraph::new();
    let slot = graph.insert(json!({
        "type": "array",
        "items": { "type": "object", "properties": { "user": { "type": "string" } } }
    }));

    let prop = compile_schema(&graph, &slot, &config);
    assert_eq!(prop.types, vec!["array"]);
    assert_eq!(prop.subtype.as_deref(), Some("object"));
    assert_eq!(
        synthesize_json(&prop, false, &config),
        json!([{ "user": "string" }])
    );
}

#[test]
fn scenario_self_reference() {
    let config = EngineConfig::default();
    let mut graph = SchemaGraph::new();
    let root = graph.insert(json!({ "type": "object", "properties": {} }));
    let root_id = root.as_node().unwrap();
    let props = graph.get(root_id, "properties").and_then(Slot::as_node).unwrap();
    graph
        .node_mut(props)
        .unwrap()
        .insert("self".to_string(), Slot::Node(NodeRef::new(root_id)));

    resolve_circular_references(&mut graph, root_id, config.max_resolve_depth);
    let prop = compile_schema(&graph, &root, &config);

    assert!(prop.child("self").unwrap().meta.is_circular_reference);
    assert_eq!(
        synthesize_json(&prop, false, &config),
        json!({ "self": CIRCULAR_PLACEHOLDER })
    );
}

#[test]
fn scenario_constant() {
    let config = EngineConfig::default();
    let mut graph = SchemaGraph::new();
    let slot = graph.insert(json!({ "const": "foo" }));
    let prop = compile_schema(&graph, &slot, &config);

    assert!(prop.meta.is_constant);
    assert_eq!(prop.examples, Some(vec![json!("foo")]));
    assert_eq!(synthesize_json(&prop, true, &config), json!("foo"));
    assert_eq!(synthesize_json(&prop, false, &config), json!("string"));
}

#[test]
fn scenario_tuple() {
    let value = compile_and_synthesize(
        json!({ "type": "array", "prefixItems": [ { "type": "string" }, { "type": "number" } ] }),
        false,
    );
    assert_eq!(value, json!(["string", 0]));
}

#[test]
fn scenario_additional_properties_only() {
    let value = compile_and_synthesize(
        json!({ "type": "object", "additionalProperties": { "type": "string" } }),
        false,
    );
    assert_eq!(value, json!({ "additionalProperties": "string" }));
}

#[test]
fn example_round_trip() {
    let examples = [
        json!("text"),
        json!(42),
        json!({ "nested": [1, 2] }),
        json!([true, false]),
    ];
    for example in examples {
        let value = compile_and_synthesize(json!({ "type": "string", "example": example.clone() }), true);
        assert_eq!(value, example);
    }
}

#[test]
fn nested_leaf_examples_are_reproduced() {
    let schema = json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "example": "Rex" },
            "age": { "type": "integer", "example": 7 },
            "tags": { "type": "array", "items": { "type": "string", "example": "good" } },
            "address": {
                "type": "object",
                "properties": { "city": { "type": "string", "example": "Oslo" } }
            },
            "pets": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": { "id": { "type": "integer", "example": 3 } }
                }
            },
            "contact": {
                "oneOf": [
                    { "type": "string", "example": "rex@example.com" },
                    { "type": "integer", "example": 5 }
                ]
            },
            "ids": {
                "type": "array",
                "items": { "anyOf": [ { "type": "integer", "example": 9 }, { "type": "string" } ] }
            }
        }
    });

    assert_eq!(
        compile_and_synthesize(schema.clone(), true),
        json!({
            "name": "Rex",
            "age": 7,
            "tags": ["good"],
            "address": { "city": "Oslo" },
            "pets": [{ "id": 3 }],
            "contact": "rex@example.com",
            "ids": [9]
        })
    );
    assert_eq!(
        compile_and_synthesize(schema, false),
        json!({
            "name": "string",
            "age": 0,
            "tags": ["string"],
            "address": { "city": "string" },
            "pets": [{ "id": 0 }],
            "contact": "string",
            "ids": [0]
        })
    );
}

#[test]
fn required_flags_match_declaration() {
    let config = EngineConfig::default();
    let mut graph = SchemaGraph::new();
    let slot = graph.insert(json!({
        "required": ["b"],
        "properties": { "a": {}, "b": {}, "c": {} }
    }));
    let children = compile_schema(&graph, &slot, &config).properties.unwrap();

    let flags: Vec<(&str, bool)> = children.iter().map(|c| (c.name.as_str(), c.required)).collect();
    assert_eq!(flags, vec![("a", false), ("b", true), ("c", false)]);
}

#[test]
fn unions_pick_first_variant() {
    for keyword in ["oneOf", "anyOf"] {
        let value = compile_and_synthesize(
            json!({ keyword: [ { "type": "integer" }, { "type": "string" }, { "type": "boolean" } ] }),
            false,
        );
        assert_eq!(value, json!(0));
    }
}

#[test]
fn structurally_equal_siblings_are_not_circular() {
    let value = compile_and_synthesize(
        json!({
            "properties": {
                "home": { "properties": { "city": { "type": "string" } } },
                "work": { "properties": { "city": { "type": "string" } } }
            }
        }),
        false,
    );
    assert_eq!(
        value,
        json!({ "home": { "city": "string" }, "work": { "city": "string" } })
    );
}

#[test]
fn document_cycle_through_all_of_and_arrays() {
    let mut doc = petstore();
    let pet = doc.json_example_at("/components/schemas/Pet", false).unwrap();

    assert_eq!(
        pet,
        json!({
            "name": "string",
            "tags": ["string"],
            "id": 0,
            "owner": { "name": "string", "pets": [CIRCULAR_PLACEHOLDER] }
        })
    );

    let required: Vec<String> = doc
        .properties_at("/components/schemas/Pet")
        .unwrap()
        .into_iter()
        .filter(|p| p.required)
        .map(|p| p.name)
        .collect();
    assert_eq!(required, vec!["name", "id"]);
}

#[test]
fn document_media_examples() {
    let mut doc = petstore();
    let response = "/paths/~1pets/post/responses/200/content/application~1json";
    let request = "/paths/~1pets/post/requestBody/content/application~1json";
    let form = "/paths/~1pets/post/requestBody/content/application~1x-www-form-urlencoded/schema";

    assert_eq!(
        doc.media_example_at(response, true),
        Some(json!({ "id": 7, "name": "Rex" }))
    );
    assert_eq!(
        doc.media_example_at(request, true),
        Some(json!({ "name": "Rex", "tags": ["string"] }))
    );
    assert_eq!(
        doc.form_example_at(form, false),
        Some("name=string&tags%5B%5D=string".to_string())
    );
    assert_eq!(
        doc.example_in_format(form, false, ExampleFormat::Xml),
        Some("<root>\n  <name>string</name>\n  <tags>\n    <item>string</item>\n  </tags>\n</root>".to_string())
    );
}

#[test]
fn document_preparation_is_deterministic() {
    let mut first = petstore();
    let mut second = petstore();
    let pointer = "/components/schemas/Owner";

    assert_eq!(first.property_at(pointer), second.property_at(pointer));
    assert_eq!(first.property_at(pointer), second.property_at(pointer));
}
