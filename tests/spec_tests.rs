#![allow(clippy::unwrap_used, clippy::expect_used)]

use brrtrouter_auth::security::{attach_auth, bearer, BearerAuth, SecuritySchemeDescriptor};
use brrtrouter_auth::spec::{load_spec, load_spec_from_str, RouteMeta};
use http::Method;
use std::io::Write;

const YAML_SPEC: &str = r#"openapi: 3.1.0
info:
  title: Pet Store
  version: "1.0.0"
security:
  - bearerAuth: []
components:
  securitySchemes:
    bearerAuth:
      type: http
      scheme: bearer
      bearerFormat: JWT
    petstore_auth:
      type: oauth2
      flows:
        password:
          tokenUrl: https://petstore.example.com/oauth/token
          scopes:
            read:pets: read your pets
            write:pets: modify pets in your account
paths:
  /pets:
    get:
      operationId: list_pets
      responses:
        "200": { description: OK }
    post:
      operationId: add_pet
      security:
        - petstore_auth: [write:pets]
        - bearerAuth: []
      responses:
        "200": { description: OK }
  /health:
    get:
      operationId: health
      security: []
      responses:
        "200": { description: OK }
"#;

fn write_temp_spec(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("brrtrouter_auth_spec")
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn find<'a>(routes: &'a [RouteMeta], operation_id: &str) -> &'a RouteMeta {
    routes
        .iter()
        .find(|r| r.operation_id.as_deref() == Some(operation_id))
        .unwrap_or_else(|| panic!("route {operation_id} not loaded"))
}

#[test]
fn test_load_yaml_spec_resolves_auths() {
    let file = write_temp_spec(".yaml", YAML_SPEC);
    let routes = load_spec(file.path()).unwrap();
    assert_eq!(routes.len(), 3);

    let list = find(&routes, "list_pets");
    assert_eq!(list.method, Method::GET);
    assert_eq!(list.auths.len(), 1);
    assert_eq!(list.auths[0].id(), "bearerAuth");
    assert!(matches!(
        list.auths[0].scheme(),
        SecuritySchemeDescriptor::Http { scheme, bearer_format: Some(format), .. }
            if scheme == "bearer" && format == "JWT"
    ));

    let add = find(&routes, "add_pet");
    let ids: Vec<&str> = add.auths.iter().map(|a| a.id()).collect();
    assert_eq!(ids, vec!["petstore_auth", "bearerAuth"]);
    assert_eq!(add.scopes_for("petstore_auth"), vec!["write:pets"]);
}

#[test]
fn test_empty_operation_security_falls_back_to_global() {
    let routes = load_spec_from_str(YAML_SPEC, true).unwrap();
    let health = find(&routes, "health");
    assert_eq!(health.requirement_names(), vec!["bearerAuth"]);
}

#[test]
fn test_no_security_anywhere_is_none() {
    let spec = YAML_SPEC.replace("security:\n  - bearerAuth: []\ncomponents", "components");
    let routes = load_spec_from_str(&spec, true).unwrap();
    let list = find(&routes, "list_pets");
    assert!(list.auths.is_empty());
    assert!(list.security.is_none());
}

#[test]
fn test_loaded_scopes_merge_with_attached_scopes() {
    let routes = load_spec_from_str(YAML_SPEC, true).unwrap();
    let add = find(&routes, "add_pet");

    let jwt = bearer(BearerAuth::default().format("JWT"));
    let secured = attach_auth(add, &[jwt], &["read:pets"]);

    assert_eq!(secured.auths.len(), 3);
    assert_eq!(secured.scopes_for("petstore_auth"), vec!["write:pets", "read:pets"]);
    assert_eq!(secured.scopes_for("bearerAuth"), vec!["read:pets"]);
    assert_eq!(
        secured.requirement_names(),
        vec!["petstore_auth", "bearerAuth", "http_bearer_JWT"]
    );
}

#[test]
fn test_load_json_spec() {
    let value: serde_json::Value = serde_yaml::from_str(YAML_SPEC).unwrap();
    let file = write_temp_spec(".json", &serde_json::to_string_pretty(&value).unwrap());
    let routes = load_spec(file.path()).unwrap();
    assert_eq!(routes.len(), 3);
}

#[test]
fn test_unknown_scheme_fails_load() {
    let spec = YAML_SPEC.replace("- petstore_auth: [write:pets]", "- ghost_auth: []");
    let err = load_spec_from_str(&spec, true).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("ghost_auth"), "{message}");
}

#[test]
fn test_missing_file_reports_path() {
    let err = load_spec("does/not/exist.yaml").unwrap_err();
    assert!(format!("{err:#}").contains("does/not/exist.yaml"));
}
