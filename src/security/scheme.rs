//! Security-scheme descriptors and the [`AuthScheme`] value attached to routes.
//!
//! [`SecuritySchemeDescriptor`] serializes to exactly the OpenAPI
//! `securitySchemeObject` JSON shape, so descriptors can be written into a
//! document as-is and read back from anything `oas3` parses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Where an API key is carried on the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    #[default]
    Header,
    Query,
    Cookie,
}

impl ApiKeyLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiKeyLocation::Header => "header",
            ApiKeyLocation::Query => "query",
            ApiKeyLocation::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ApiKeyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiKeyLocation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "header" => Ok(ApiKeyLocation::Header),
            "query" => Ok(ApiKeyLocation::Query),
            "cookie" => Ok(ApiKeyLocation::Cookie),
            other => anyhow::bail!("unknown API key location `{other}` (expected header, query or cookie)"),
        }
    }
}

/// Scope name to human readable description.
pub type Scopes = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplicitFlow {
    pub authorization_url: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<Url>,
    #[serde(default)]
    pub scopes: Scopes,
}

/// Shared shape of the `password` and `clientCredentials` flows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenFlow {
    pub token_url: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<Url>,
    #[serde(default)]
    pub scopes: Scopes,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationCodeFlow {
    pub authorization_url: Url,
    pub token_url: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<Url>,
    #[serde(default)]
    pub scopes: Scopes,
}

/// The OAuth2 `flows` object. Any subset of the four flows may be present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2Flows {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implicit: Option<ImplicitFlow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<TokenFlow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_credentials: Option<TokenFlow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<AuthorizationCodeFlow>,
}

impl OAuth2Flows {
    /// Literal name segments of the present flows, in naming order.
    fn present_flow_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            self.password.as_ref().map(|_| "password"),
            self.client_credentials.as_ref().map(|_| "clientCredentials"),
            self.authorization_code.as_ref().map(|_| "authorizationCode"),
            self.implicit.as_ref().map(|_| "implicit"),
        ]
        .into_iter()
        .flatten()
    }

    /// Scope maps of the present flows, in aggregation order.
    fn scope_sets(&self) -> impl Iterator<Item = &Scopes> + '_ {
        [
            self.implicit.as_ref().map(|f| &f.scopes),
            self.authorization_code.as_ref().map(|f| &f.scopes),
            self.client_credentials.as_ref().map(|f| &f.scopes),
            self.password.as_ref().map(|f| &f.scopes),
        ]
        .into_iter()
        .flatten()
    }
}

/// An OpenAPI security scheme.
///
/// Basic and bearer authentication are both `http` schemes that differ in
/// their `scheme` value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SecuritySchemeDescriptor {
    #[serde(rename = "http")]
    Http {
        scheme: String,
        #[serde(rename = "bearerFormat", default, skip_serializing_if = "Option::is_none")]
        bearer_format: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename = "apiKey")]
    ApiKey {
        name: String,
        #[serde(rename = "in")]
        location: ApiKeyLocation,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename = "oauth2")]
    OAuth2 {
        flows: OAuth2Flows,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename = "openIdConnect")]
    OpenIdConnect {
        #[serde(rename = "openIdConnectUrl")]
        open_id_connect_url: Url,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl SecuritySchemeDescriptor {
    /// The OpenAPI `type` tag.
    pub fn type_tag(&self) -> &'static str {
        match self {
            SecuritySchemeDescriptor::Http { .. } => "http",
            SecuritySchemeDescriptor::ApiKey { .. } => "apiKey",
            SecuritySchemeDescriptor::OAuth2 { .. } => "oauth2",
            SecuritySchemeDescriptor::OpenIdConnect { .. } => "openIdConnect",
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            SecuritySchemeDescriptor::Http { description, .. }
            | SecuritySchemeDescriptor::ApiKey { description, .. }
            | SecuritySchemeDescriptor::OAuth2 { description, .. }
            | SecuritySchemeDescriptor::OpenIdConnect { description, .. } => description.as_deref(),
        }
    }

    /// Default identifier derived from the descriptor content.
    ///
    /// Segments are joined with `_`: type tag, HTTP auth scheme, bearer
    /// format, API-key location and, for OAuth2, one literal per present flow
    /// (`password`, `clientCredentials`, `authorizationCode`, `implicit`).
    /// Missing or empty segments are skipped.
    ///
    /// The API-key `name` is not part of the result, so two API-key schemes
    /// that only differ by header name derive the same id.
    pub fn auto_name(&self) -> String {
        let mut segments: Vec<&str> = vec![self.type_tag()];
        match self {
            SecuritySchemeDescriptor::Http {
                scheme,
                bearer_format,
                ..
            } => {
                segments.push(scheme);
                if let Some(format) = bearer_format {
                    segments.push(format);
                }
            }
            SecuritySchemeDescriptor::ApiKey { location, .. } => segments.push(location.as_str()),
            SecuritySchemeDescriptor::OAuth2 { flows, .. } => {
                for name in flows.present_flow_names() {
                    segments.push(name);
                }
            }
            SecuritySchemeDescriptor::OpenIdConnect { .. } => {}
        }
        segments.retain(|s| !s.is_empty());
        segments.join("_")
    }

    /// Every scope declared by the present OAuth2 flows, first occurrence
    /// wins. Empty for every other kind of scheme.
    pub fn all_scopes(&self) -> Vec<String> {
        let SecuritySchemeDescriptor::OAuth2 { flows, .. } = self else {
            return Vec::new();
        };

        let mut scopes: Vec<String> = Vec::new();
        for name in flows.scope_sets().flat_map(|set| set.keys()) {
            if !scopes.iter().any(|s| s == name) {
                scopes.push(name.clone());
            }
        }
        scopes
    }
}

/// A named security scheme, the unit attached to routes.
///
/// Two values are the same scheme only if both the id and the descriptor
/// match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AuthScheme {
    id: String,
    scheme: SecuritySchemeDescriptor,
}

impl AuthScheme {
    /// Wrap `scheme` under its [`auto_name`](SecuritySchemeDescriptor::auto_name).
    pub fn new(scheme: SecuritySchemeDescriptor) -> Self {
        Self {
            id: scheme.auto_name(),
            scheme,
        }
    }

    pub fn with_id(id: impl Into<String>, scheme: SecuritySchemeDescriptor) -> Self {
        Self {
            id: id.into(),
            scheme,
        }
    }

    /// Use `id` when given, otherwise derive one.
    pub fn from_parts(id: Option<String>, scheme: SecuritySchemeDescriptor) -> Self {
        match id {
            Some(id) => Self::with_id(id, scheme),
            None => Self::new(scheme),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn scheme(&self) -> &SecuritySchemeDescriptor {
        &self.scheme
    }

    pub fn all_scopes(&self) -> Vec<String> {
        self.scheme.all_scopes()
    }

    pub fn into_parts(self) -> (String, SecuritySchemeDescriptor) {
        (self.id, self.scheme)
    }
}
