use super::types::RouteMeta;
use super::{SecurityRequirement, SecurityScheme};
use crate::security::{AuthScheme, SecuritySchemeDescriptor};
use crate::validator::{fail_if_issues, ValidationIssue};
use oas3::spec::ObjectOrReference;
use oas3::OpenApiV3Spec;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Convert an `oas3` security scheme into a [`SecuritySchemeDescriptor`].
///
/// Both sides share the OpenAPI JSON shape, so the conversion goes through
/// `serde_json`. Fails for scheme types the descriptor model does not cover
/// (such as `mutualTLS`).
pub fn descriptor_from_oas3(scheme: &SecurityScheme) -> anyhow::Result<SecuritySchemeDescriptor> {
    let value = serde_json::to_value(scheme)?;
    Ok(serde_json::from_value(value)?)
}

/// Security schemes of a document, split into the ones that resolved to a
/// descriptor and the names that were skipped.
#[derive(Debug, Clone, Default)]
pub struct SecuritySchemes {
    pub resolved: HashMap<String, SecuritySchemeDescriptor>,
    /// `$ref` entries and scheme types the descriptor model does not cover.
    pub skipped: HashSet<String>,
}

/// Collect `components.securitySchemes`, remembering which names were skipped.
pub fn collect_security_schemes(spec: &OpenApiV3Spec) -> SecuritySchemes {
    let mut schemes = SecuritySchemes::default();
    let Some(components) = spec.components.as_ref() else {
        return schemes;
    };

    for (name, scheme) in &components.security_schemes {
        match scheme {
            ObjectOrReference::Object(obj) => match descriptor_from_oas3(obj) {
                Ok(descriptor) => {
                    schemes.resolved.insert(name.clone(), descriptor);
                }
                Err(err) => {
                    warn!(scheme = %name, error = %err, "Skipping unsupported security scheme");
                    schemes.skipped.insert(name.clone());
                }
            },
            _ => {
                warn!(scheme = %name, "Skipping referenced security scheme");
                schemes.skipped.insert(name.clone());
            }
        }
    }
    schemes
}

/// Extract all security schemes from an OpenAPI specification
///
/// Parses the `components.securitySchemes` section and returns a map of scheme names
/// to their descriptors. `$ref` entries and unsupported scheme types are skipped.
///
/// # Arguments
///
/// * `spec` - The OpenAPI specification
///
/// # Returns
///
/// A map of security scheme names to their definitions
pub fn extract_security_schemes(spec: &OpenApiV3Spec) -> HashMap<String, SecuritySchemeDescriptor> {
    collect_security_schemes(spec).resolved
}

/// Resolve every scheme referenced by `requirements` against `schemes`.
///
/// Each distinct name becomes one [`AuthScheme`] whose id is the component
/// name. Names that were skipped or never defined are reported as issues.
pub fn resolve_auths(
    requirements: &[SecurityRequirement],
    schemes: &SecuritySchemes,
    location: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Vec<AuthScheme> {
    let mut auths: Vec<AuthScheme> = Vec::new();
    for requirement in requirements {
        for name in requirement.0.keys() {
            if auths.iter().any(|a| a.id() == name) {
                continue;
            }
            match schemes.resolved.get(name) {
                Some(descriptor) => auths.push(AuthScheme::with_id(name.clone(), descriptor.clone())),
                None if schemes.skipped.contains(name) => issues.push(ValidationIssue::new(
                    location,
                    "UnsupportedSecurityScheme",
                    format!("security requirement references unsupported scheme `{name}`"),
                )),
                None => issues.push(ValidationIssue::new(
                    location,
                    "UnknownSecurityScheme",
                    format!("security requirement references undefined scheme `{name}`"),
                )),
            }
        }
    }
    auths
}

/// Build route metadata from an OpenAPI specification
///
/// One [`RouteMeta`] is produced per operation. The operation's own
/// `security` list takes precedence over the document-level list; an empty
/// effective list leaves the route without security.
///
/// # Errors
///
/// Returns an error listing every security requirement that references a
/// scheme missing from `components.securitySchemes` or one that was skipped.
pub fn build_routes(spec: &OpenApiV3Spec) -> anyhow::Result<Vec<RouteMeta>> {
    let schemes = collect_security_schemes(spec);
    let mut routes = Vec::new();
    let mut issues = Vec::new();

    if let Some(paths_map) = spec.paths.as_ref() {
        for (path, item) in paths_map {
            for (method, operation) in item.methods() {
                let location = format!("{path} → {method}");

                let requirements = if !operation.security.is_empty() {
                    operation.security.clone()
                } else {
                    spec.security.clone()
                };

                let auths = resolve_auths(&requirements, &schemes, &location, &mut issues);
                let security = if requirements.is_empty() {
                    None
                } else {
                    Some(requirements)
                };

                debug!(
                    method = %method,
                    path = %path,
                    auths = auths.len(),
                    "Built route security"
                );

                routes.push(RouteMeta {
                    method: method.clone(),
                    path_pattern: path.clone(),
                    operation_id: operation.operation_id.clone(),
                    auths,
                    security,
                });
            }
        }
    }

    fail_if_issues(issues)?;
    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> OpenApiV3Spec {
        serde_yaml::from_str(yaml).unwrap()
    }

    const SPEC: &str = r#"openapi: 3.1.0
info:
  title: Pet Store
  version: "1.0.0"
security:
  - api_key: []
components:
  securitySchemes:
    api_key:
      type: apiKey
      name: X-API-Key
      in: header
    petstore_auth:
      type: oauth2
      flows:
        implicit:
          authorizationUrl: https://petstore.example.com/oauth/authorize
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
      responses:
        "200": { description: OK }
"#;

    #[test]
    fn test_extract_security_schemes() {
        let schemes = extract_security_schemes(&parse(SPEC));
        assert_eq!(schemes.len(), 2);
        assert_eq!(schemes["api_key"].auto_name(), "apiKey_header");
        assert_eq!(
            schemes["petstore_auth"].all_scopes(),
            vec!["read:pets", "write:pets"]
        );
    }

    #[test]
    fn test_operation_security_overrides_global() {
        let routes = build_routes(&parse(SPEC)).unwrap();
        let post = routes
            .iter()
            .find(|r| r.operation_id.as_deref() == Some("add_pet"))
            .unwrap();
        assert_eq!(post.auths.len(), 1);
        assert_eq!(post.auths[0].id(), "petstore_auth");
        assert_eq!(post.scopes_for("petstore_auth"), vec!["write:pets"]);

        let get = routes
            .iter()
            .find(|r| r.operation_id.as_deref() == Some("list_pets"))
            .unwrap();
        assert_eq!(get.auths[0].id(), "api_key");
        assert_eq!(get.requirement_names(), vec!["api_key"]);
    }

    const SKIPPED_SCHEMES: &str = "    mtls:\n      type: mutualTLS\n    aliased:\n      $ref: '#/components/securitySchemes/api_key'\n    petstore_auth:";

    #[test]
    fn test_extract_skips_mutual_tls_and_refs() {
        let spec = SPEC.replace("    petstore_auth:", SKIPPED_SCHEMES);
        let schemes = collect_security_schemes(&parse(&spec));

        assert_eq!(schemes.resolved.len(), 2);
        assert!(schemes.resolved.contains_key("api_key"));
        assert!(schemes.resolved.contains_key("petstore_auth"));
        assert!(!schemes.resolved.contains_key("mtls"));
        assert!(!schemes.resolved.contains_key("aliased"));
        assert_eq!(
            schemes.skipped,
            HashSet::from(["mtls".to_string(), "aliased".to_string()])
        );
        assert_eq!(extract_security_schemes(&parse(&spec)).len(), 2);
    }

    #[test]
    fn test_skipped_scheme_reported_as_unsupported() {
        let spec = SPEC
            .replace("    petstore_auth:", SKIPPED_SCHEMES)
            .replace("- petstore_auth: [write:pets]", "- mtls: []");
        let err = build_routes(&parse(&spec)).unwrap_err().to_string();
        assert!(err.contains("UnsupportedSecurityScheme"), "{err}");
        assert!(err.contains("unsupported scheme `mtls`"), "{err}");
        assert!(!err.contains("undefined"), "{err}");
    }

    #[test]
    fn test_unknown_scheme_fails() {
        let spec = SPEC.replace("- petstore_auth: [write:pets]", "- missing_auth: []");
        let err = build_routes(&parse(&spec)).unwrap_err();
        assert!(err.to_string().contains("UnknownSecurityScheme"));
    }
}
