//! Writing route security back into an OpenAPI document.
//!
//! [`apply_security`] publishes the schemes attached across a set of routes
//! under `components.securitySchemes` and writes each route's requirement
//! list into its operation. The document is handled as JSON so that every
//! other part of it is left exactly as it was.

use crate::security::SecuritySchemeDescriptor;
use crate::spec::RouteMeta;
use anyhow::Context;
use oas3::OpenApiV3Spec;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Every scheme attached to `routes`, keyed by id.
///
/// The first scheme seen for an id wins; later distinct schemes with the same
/// id are logged and left out.
pub fn security_components(routes: &[RouteMeta]) -> BTreeMap<String, SecuritySchemeDescriptor> {
    let mut components: BTreeMap<String, SecuritySchemeDescriptor> = BTreeMap::new();
    for route in routes {
        for auth in &route.auths {
            match components.get(auth.id()) {
                Some(existing) if existing != auth.scheme() => warn!(
                    id = %auth.id(),
                    path = %route.path_pattern,
                    "Security scheme id already published with a different definition"
                ),
                Some(_) => {}
                None => {
                    components.insert(auth.id().to_string(), auth.scheme().clone());
                }
            }
        }
    }
    components
}

fn object_entry<'a>(parent: &'a mut Map<String, Value>, key: &str) -> anyhow::Result<&'a mut Map<String, Value>> {
    parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .with_context(|| format!("`{key}` is not a JSON object"))
}

fn requirements_value(route: &RouteMeta) -> anyhow::Result<Option<Value>> {
    let Some(requirements) = route.security.as_ref() else {
        return Ok(None);
    };

    let list = requirements
        .iter()
        .map(|requirement| serde_json::to_value(&requirement.0))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(Value::Array(list)))
}

/// Publish the security of `routes` into the OpenAPI JSON document `doc`.
///
/// Schemes are merged into `components.securitySchemes`; an entry already in
/// the document is replaced by the attached scheme of the same id. For each
/// route, `paths.<path>.<method>.security` is set to the route's requirement
/// list, or removed when the route declares no security.
///
/// # Errors
///
/// Fails when the document, `components`, `securitySchemes`, `paths`, a path
/// item or an operation exists but is not a JSON object.
pub fn apply_security(doc: &mut Value, routes: &[RouteMeta]) -> anyhow::Result<()> {
    let root = doc
        .as_object_mut()
        .context("OpenAPI document is not a JSON object")?;

    let components = security_components(routes);
    if !components.is_empty() {
        let schemes = object_entry(object_entry(root, "components")?, "securitySchemes")?;
        for (id, descriptor) in components {
            schemes.insert(id, serde_json::to_value(descriptor)?);
        }
    }

    let paths = object_entry(root, "paths")?;
    for route in routes {
        let item = object_entry(paths, &route.path_pattern)
            .with_context(|| format!("path item {}", route.path_pattern))?;
        let operation = object_entry(item, &route.method_key())
            .with_context(|| format!("operation {} {}", route.method, route.path_pattern))?;

        match requirements_value(route)? {
            Some(security) => {
                operation.insert("security".to_string(), security);
            }
            None => {
                operation.remove("security");
            }
        }

        debug!(
            method = %route.method,
            path = %route.path_pattern,
            "Wrote route security into document"
        );
    }

    Ok(())
}

/// Parse a document written by [`apply_security`] with the OpenAPI library.
pub fn to_openapi(doc: Value) -> anyhow::Result<OpenApiV3Spec> {
    serde_json::from_value(doc).context("document is not a valid OpenAPI specification")
}
