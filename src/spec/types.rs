use super::SecurityRequirement;
use crate::security::AuthScheme;
use http::Method;

/// A single operation of the API and the security metadata attached to it.
///
/// `security` is `None` when the route declares no authentication at all,
/// which a document renders by omitting the operation's `security` field.
/// `Some(vec![])` is never produced by this crate but is preserved if a
/// caller sets it.
#[derive(Debug, Clone)]
pub struct RouteMeta {
    pub method: Method,
    pub path_pattern: String,
    pub operation_id: Option<String>,
    pub auths: Vec<AuthScheme>,
    pub security: Option<Vec<SecurityRequirement>>,
}

impl RouteMeta {
    /// A route with no security attached.
    pub fn new(method: Method, path_pattern: impl Into<String>) -> Self {
        Self {
            method,
            path_pattern: path_pattern.into(),
            operation_id: None,
            auths: Vec::new(),
            security: None,
        }
    }

    pub fn operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    /// Scopes recorded for `name` across the current requirement list,
    /// in order of appearance and without duplicates.
    pub fn scopes_for(&self, name: &str) -> Vec<String> {
        let mut scopes: Vec<String> = Vec::new();
        for requirement in self.security.iter().flatten() {
            if let Some(recorded) = requirement.0.get(name) {
                for scope in recorded {
                    if !scopes.contains(scope) {
                        scopes.push(scope.clone());
                    }
                }
            }
        }
        scopes
    }

    /// Names referenced by the current requirement list, in order of appearance.
    pub fn requirement_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for requirement in self.security.iter().flatten() {
            for name in requirement.0.keys() {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// The requirement list flattened to `(name, scopes)` pairs.
    pub fn security_entries(&self) -> Option<Vec<(String, Vec<String>)>> {
        self.security.as_ref().map(|requirements| {
            requirements
                .iter()
                .flat_map(|requirement| requirement.0.iter())
                .map(|(name, scopes)| (name.clone(), scopes.clone()))
                .collect()
        })
    }

    /// Lowercase method name as used for operation keys in a path item.
    pub fn method_key(&self) -> String {
        self.method.as_str().to_ascii_lowercase()
    }
}
