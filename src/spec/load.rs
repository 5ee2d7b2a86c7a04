use super::build::build_routes;
use super::types::RouteMeta;
use anyhow::Context;
use oas3::OpenApiV3Spec;
use std::path::Path;

const METHODS: [&str; 8] = ["get", "post", "put", "delete", "patch", "options", "head", "trace"];

/// Drop path-item keys the OpenAPI parser would reject: anything that is
/// neither a standard path-item field, an HTTP method nor an `x-` extension.
fn retain_path_item_keys(value: &mut serde_json::Value) {
    let Some(serde_json::Value::Object(paths)) = value.get_mut("paths") else {
        return;
    };

    for item in paths.values_mut() {
        if let serde_json::Value::Object(obj) = item {
            obj.retain(|key, _| {
                let lower = key.to_ascii_lowercase();
                matches!(lower.as_str(), "summary" | "description" | "servers" | "parameters" | "$ref")
                    || METHODS.contains(&lower.as_str())
                    || key.starts_with("x-")
            });
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Parse an OpenAPI document from YAML or JSON text.
pub fn parse_spec(content: &str, yaml: bool) -> anyhow::Result<OpenApiV3Spec> {
    let mut value: serde_json::Value = if yaml {
        serde_yaml::from_str(content).context("invalid YAML OpenAPI document")?
    } else {
        serde_json::from_str(content).context("invalid JSON OpenAPI document")?
    };

    retain_path_item_keys(&mut value);
    serde_json::from_value(value).context("document is not a valid OpenAPI specification")
}

/// Load routes, with their attached security schemes, from an OpenAPI file.
///
/// `.yaml` and `.yml` files are parsed as YAML, everything else as JSON.
pub fn load_spec(file_path: impl AsRef<Path>) -> anyhow::Result<Vec<RouteMeta>> {
    let path = file_path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read OpenAPI document {}", path.display()))?;
    load_spec_from_str(&content, is_yaml(path))
}

pub fn load_spec_from_str(content: &str, yaml: bool) -> anyhow::Result<Vec<RouteMeta>> {
    let spec = parse_spec(content, yaml)?;
    build_routes(&spec)
}

/// Build route metadata from an already parsed [`OpenApiV3Spec`].
pub fn load_spec_from_spec(spec: &OpenApiV3Spec) -> anyhow::Result<Vec<RouteMeta>> {
    build_routes(spec)
}
