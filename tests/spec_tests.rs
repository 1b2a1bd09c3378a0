//! Spec loading: descriptors, type naming, and rejected documents

mod common;

use common::temp_files;
use http::Method;
use stubrouter::spec::{load_spec, load_spec_str, SpecFormat};
use stubrouter::validator::SpecIssues;

#[test]
fn test_sample_spec_descriptors() {
    let (descriptors, slug) = load_spec("doc/openapi.yaml").unwrap();
    assert_eq!(slug, "pet_store_fake_outer");
    assert_eq!(descriptors.len(), 4);

    let d = descriptors
        .iter()
        .find(|d| d.handler_name.as_ref() == "fake_outer_string")
        .unwrap();
    assert_eq!(d.method, Method::POST);
    assert_eq!(d.path_pattern.as_ref(), "/fake/outer/string");
    assert_eq!(d.full_path(), "/fake/outer/string");
    assert_eq!(d.request_type(), Some("OuterString"));
    assert_eq!(d.response_type(), Some("OuterString"));
    assert_eq!(d.response.status, 200);
    let body = d.request_body.as_ref().unwrap();
    assert_eq!(body.content_type, "*/*");
    assert!(!body.required);
    assert_eq!(body.schema.as_ref().unwrap()["type"], "string");
}

#[test]
fn test_composite_schema_refs_expanded() {
    let (descriptors, _) = load_spec("doc/openapi.yaml").unwrap();
    let d = descriptors
        .iter()
        .find(|d| d.handler_name.as_ref() == "fake_outer_composite")
        .unwrap();
    let schema = d.response.schema.as_ref().unwrap();
    assert_eq!(schema["properties"]["my_number"]["type"], "number");
    assert_eq!(schema["properties"]["my_boolean"]["type"], "boolean");
}

const INLINE_SPEC: &str = r#"
openapi: 3.0.3
info: { title: Widgets, version: "1" }
servers:
  - url: http://localhost:8080/api/v1
paths:
  /widgets:
    post:
      operationId: createWidget
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: object
              properties:
                name: { type: string }
      responses:
        '201':
          description: created
          content:
            application/json:
              schema:
                type: object
                properties:
                  id: { type: integer }
  /gadgets/{id}:
    put:
      operationId: putGadget
      parameters:
        - { name: id, in: path, required: true, schema: { type: string } }
      requestBody:
        content:
          application/json:
            schema:
              title: Gadget
              type: object
              properties:
                size: { type: integer }
      responses:
        '204':
          description: done
components:
  schemas:
    CreateWidgetBody:
      type: string
"#;

#[test]
fn test_inline_type_naming() {
    let (descriptors, slug) = load_spec_str(INLINE_SPEC, SpecFormat::Yaml).unwrap();
    assert_eq!(slug, "widgets");

    let create = descriptors
        .iter()
        .find(|d| d.handler_name.as_ref() == "createWidget")
        .unwrap();
    // Component `CreateWidgetBody` already exists, so the inline body is renamed.
    assert_eq!(create.request_type(), Some("CreateWidgetBody_1"));
    assert!(create.request_body.as_ref().unwrap().required);
    assert_eq!(create.response.status, 201);
    assert_eq!(create.response_type(), Some("CreateWidget201"));
    assert_eq!(create.full_path(), "/api/v1/widgets");

    let put = descriptors
        .iter()
        .find(|d| d.handler_name.as_ref() == "putGadget")
        .unwrap();
    assert_eq!(put.request_type(), Some("Gadget"));
    assert_eq!(put.response.status, 204);
    assert_eq!(put.response_type(), None);
}

#[test]
fn test_request_body_component_ref_resolved() {
    let spec = r#"
openapi: 3.0.3
info: { title: Notes, version: "1" }
paths:
  /notes:
    post:
      operationId: addNote
      requestBody:
        $ref: '#/components/requestBodies/NoteBody'
      responses: { '204': { description: stored } }
components:
  schemas:
    Note:
      type: object
      properties:
        text: { type: string }
  requestBodies:
    NoteBody:
      required: true
      content:
        application/json:
          schema:
            $ref: '#/components/schemas/Note'
"#;
    let (descriptors, _) = load_spec_str(spec, SpecFormat::Yaml).unwrap();
    let body = descriptors[0].request_body.as_ref().unwrap();
    assert_eq!(body.type_name, "Note");
    assert!(body.required);
    assert_eq!(body.content_type, "application/json");
    assert_eq!(body.schema.as_ref().unwrap()["properties"]["text"]["type"], "string");
}

#[test]
fn test_json_file_loads() {
    let path = temp_files::create_temp_json(
        r#"{"openapi":"3.0.3","info":{"title":"Tiny","version":"1"},
            "paths":{"/ping":{"get":{"operationId":"ping",
            "responses":{"200":{"description":"ok","content":{"application/json":
            {"schema":{"type":"string"}}}}}}}}}"#,
    );
    let (descriptors, slug) = load_spec(&path).unwrap();
    temp_files::cleanup_temp_files(&[path]);
    assert_eq!(slug, "tiny");
    assert_eq!(descriptors[0].response_type(), Some("String"));
    assert_eq!(descriptors[0].request_type(), None);
}

#[test]
fn test_duplicate_handler_rejected() {
    let spec = r#"
openapi: 3.0.3
info: { title: Dup, version: "1" }
paths:
  /a:
    get:
      x-handler-a: same
      responses: { '200': { description: ok } }
  /b:
    get:
      x-handler-b: same
      responses: { '200': { description: ok } }
"#;
    let err = load_spec_str(spec, SpecFormat::Yaml).unwrap_err();
    let issues = err.downcast_ref::<SpecIssues>().unwrap();
    assert_eq!(issues.0.len(), 1);
    assert_eq!(issues.0[0].kind, "DuplicateHandler");
}

#[test]
fn test_same_route_with_renamed_param_rejected() {
    let spec = r#"
openapi: 3.0.3
info: { title: Pets, version: "1" }
paths:
  /pets/{id}:
    get:
      operationId: getPet
      responses: { '200': { description: ok } }
  /pets/{petId}:
    get:
      operationId: get_pet
      responses: { '200': { description: ok } }
    delete:
      operationId: delete_pet
      responses: { '204': { description: gone } }
"#;
    let err = load_spec_str(spec, SpecFormat::Yaml).unwrap_err();
    let issues = err.downcast_ref::<SpecIssues>().unwrap();
    assert_eq!(issues.0.len(), 1);
    assert_eq!(issues.0[0].kind, "DuplicateOperation");
    assert!(issues.0[0].location.starts_with("/pets/{petId}"));
}

#[test]
fn test_missing_handler_rejected() {
    let spec = r#"
openapi: 3.0.3
info: { title: Anon, version: "1" }
paths:
  /a:
    get:
      responses: { '200': { description: ok } }
  /b:
    post:
      responses: { '200': { description: ok } }
"#;
    let err = load_spec_str(spec, SpecFormat::Yaml).unwrap_err();
    let issues = err.downcast_ref::<SpecIssues>().unwrap();
    assert_eq!(issues.0.len(), 2);
    assert!(issues.0.iter().all(|i| i.kind == "MissingHandler"));
    assert!(err.to_string().contains("2 issue(s) found"));
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(load_spec("does/not/exist.yaml").is_err());
}
