use oas_canvas_core::model::{NodeShape, OperationParameter};
use oas_canvas_core::{emit, import_document, parse_document, DocumentFormat, EntityStore};
use pretty_assertions::assert_eq;
use serde_json::Value;

const PETSTORE: &str = r#"
openapi: 3.0.0
info:
  title: Pet Store
  version: 1.0.0
servers:
  - url: https://pets.example.com
tags:
  - name: pets
    description: Everything about pets
paths:
  /pets:
    parameters:
      - $ref: '#/components/parameters/Trace'
    get:
      operationId: listPets
      tags: [pets]
      parameters:
        - name: limit
          in: query
          required: false
          schema:
            type: integer
            minimum: 1
            maximum: 100
      responses:
        '200':
          description: Success
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/PetList'
    post:
      operationId: createPet
      tags: [pets]
      requestBody:
        $ref: '#/components/requestBodies/NewPet'
      responses:
        '201':
          description: Created
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Pet'
        '400':
          $ref: '#/components/responses/BadRequest'
  /pets/{id}:
    get:
      description: Fetch one pet
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: string
            format: uuid
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Pet'
        default:
          description: Unexpected error
    delete:
      operationId: deletePet
      responses:
        '200':
          description: Success
components:
  schemas:
    Pet:
      type: object
      description: A pet
      properties:
        id:
          type: string
          format: uuid
        name:
          type: string
          description: Display name
        weight:
          type: number
          format: double
        status:
          type: string
          enum: [available, sold]
        owner:
          $ref: '#/components/schemas/Owner'
        tags:
          type: array
          items:
            type: string
        either:
          oneOf:
            - $ref: '#/components/schemas/Owner'
            - type: integer
      required: [id, name]
    Owner:
      type: object
      properties:
        email:
          type: string
          format: email
    PetList:
      type: array
      items:
        $ref: '#/components/schemas/Pet'
    PetAlias:
      $ref: '#/components/schemas/Pet'
  parameters:
    Trace:
      name: X-Trace
      in: header
      required: false
      schema:
        type: string
        pattern: '^[a-f0-9]+$'
      style: simple
      explode: false
  headers:
    RateLimit:
      description: Requests left
      schema:
        type: integer
      example: 100
  responses:
    BadRequest:
      description: Bad request
      headers:
        X-Rate-Limit:
          $ref: '#/components/headers/RateLimit'
        X-Request-Id:
          description: Request id
          schema:
            type: string
      content:
        application/json:
          schema:
            type: string
  requestBodies:
    NewPet:
      description: Pet to add
      required: true
      content:
        application/json:
          schema:
            $ref: '#/components/schemas/Pet'
          examples:
            PetSample:
              $ref: '#/components/examples/PetSample'
  examples:
    PetSample:
      summary: A dog
      value:
        name: Rex
        weight: 12.5
    RemotePet:
      externalValue: https://pets.example.com/rex.json
      value:
        ignored: true
  securitySchemes:
    bearer:
      type: http
      scheme: bearer
      bearerFormat: JWT
"#;

fn petstore() -> Value {
    parse_document(PETSTORE, DocumentFormat::Yaml).unwrap()
}

fn keys(store: &EntityStore) -> Vec<Vec<String>> {
    vec![
        store.schemas.iter().map(|s| s.name.clone()).collect(),
        store.parameters.iter().map(|p| p.key.clone()).collect(),
        store.responses.iter().map(|r| r.key.clone()).collect(),
        store.headers.iter().map(|h| h.key.clone()).collect(),
        store.request_bodies.iter().map(|b| b.key.clone()).collect(),
        store.examples.iter().map(|e| e.key.clone()).collect(),
        store.security_schemes.iter().map(|s| s.key.clone()).collect(),
    ]
}

fn operations(store: &EntityStore) -> Vec<(String, String)> {
    store
        .operations
        .iter()
        .map(|op| (op.method.to_string(), op.path.clone()))
        .collect()
}

fn kinds(store: &EntityStore) -> Vec<&'static str> {
    store.schemas.iter().map(|s| s.shape.kind_name()).collect()
}

#[test]
fn test_import_decomposes_petstore() {
    let store = import_document(&petstore()).unwrap();

    assert_eq!(
        operations(&store),
        vec![
            ("GET".to_string(), "/pets".to_string()),
            ("POST".to_string(), "/pets".to_string()),
            ("GET".to_string(), "/pets/{id}".to_string()),
            ("DELETE".to_string(), "/pets/{id}".to_string()),
        ]
    );
    assert_eq!(kinds(&store), vec!["object", "object", "array", "$ref"]);

    let list = &store.operations[0];
    assert_eq!(list.parameters.len(), 2);
    assert!(matches!(
        &list.parameters[1],
        OperationParameter::Ref { ref_name } if ref_name == "Trace"
    ));
    assert!(list.responses.is_empty());

    let delete = &store.operations[3];
    assert!(delete.responses.is_empty());
    assert!(delete.default_response.is_none());

    let NodeShape::Object { fields } = &store.schemas[0].shape else {
        panic!("Pet should be an object");
    };
    let required: Vec<_> = fields
        .iter()
        .filter(|f| f.required)
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(required, vec!["id", "name"]);
}

#[test]
fn test_emit_of_import_is_a_fixed_point() {
    let original = petstore();
    let first_store = import_document(&original).unwrap();
    let first = emit(&first_store, &original).unwrap();

    let second_store = import_document(&first).unwrap();
    let second = emit(&second_store, &first).unwrap();

    assert_eq!(first, second);
    assert_eq!(keys(&first_store), keys(&second_store));
    assert_eq!(operations(&first_store), operations(&second_store));
    assert_eq!(kinds(&first_store), kinds(&second_store));
}

#[test]
fn test_emit_keeps_structure_of_petstore() {
    let original = petstore();
    let store = import_document(&original).unwrap();
    let doc = emit(&store, &original).unwrap();

    assert_eq!(doc["info"], original["info"]);
    assert_eq!(doc["servers"], original["servers"]);
    assert_eq!(doc["components"]["schemas"], original["components"]["schemas"]);
    assert_eq!(
        doc["components"]["securitySchemes"],
        original["components"]["securitySchemes"]
    );
    assert_eq!(
        doc["components"]["responses"],
        original["components"]["responses"]
    );
    assert_eq!(
        doc["components"]["requestBodies"],
        original["components"]["requestBodies"]
    );
    assert_eq!(
        doc["paths"]["/pets"]["post"]["responses"],
        original["paths"]["/pets"]["post"]["responses"]
    );
    assert_eq!(
        doc["paths"]["/pets/{id}"]["get"]["responses"],
        original["paths"]["/pets/{id}"]["get"]["responses"]
    );
    assert_eq!(
        doc["components"]["examples"]["RemotePet"],
        serde_json::json!({"externalValue": "https://pets.example.com/rex.json"})
    );
    assert_eq!(doc["tags"], original["tags"]);
    assert_eq!(
        doc["paths"]["/pets"]["get"]["summary"],
        serde_json::json!("GET /pets")
    );
}

#[test]
fn test_json_documents_import_like_yaml() {
    let json_text = serde_json::to_string_pretty(&petstore()).unwrap();
    let from_json = oas_canvas_core::import_text(&json_text, "openapi.json").unwrap();
    let from_yaml = oas_canvas_core::import_text(PETSTORE, "openapi.yaml").unwrap();
    assert_eq!(keys(&from_json), keys(&from_yaml));
    assert_eq!(operations(&from_json), operations(&from_yaml));
}
