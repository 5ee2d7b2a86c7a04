//! Constructors for the five supported authentication kinds.
//!
//! Each kind has a configuration object carrying its optional parameters and
//! defaults. The free functions ([`basic`], [`api_key`], [`bearer`],
//! [`oauth2`], [`open_id_connect`]) turn a configuration into an
//! [`AuthScheme`]; every configuration also converts with `From`.
//!
//! ```rust
//! use brrtrouter_auth::security::{api_key, bearer, ApiKeyAuth, BearerAuth};
//!
//! let jwt = bearer(BearerAuth::default().format("JWT"));
//! assert_eq!(jwt.id(), "http_bearer_JWT");
//!
//! let key = api_key(ApiKeyAuth::default().id("partnerKey").name("X-Partner-Key"));
//! assert_eq!(key.id(), "partnerKey");
//! ```

use super::scheme::{
    ApiKeyLocation, AuthScheme, AuthorizationCodeFlow, ImplicitFlow, OAuth2Flows, Scopes,
    SecuritySchemeDescriptor, TokenFlow,
};
use crate::runtime_config::RuntimeConfig;
use url::Url;

/// Header name used by [`ApiKeyAuth::default`].
pub const DEFAULT_API_KEY_NAME: &str = "X-API-Key";

/// HTTP basic authentication.
#[derive(Debug, Clone, Default)]
pub struct BasicAuth {
    pub id: Option<String>,
    pub description: Option<String>,
}

impl BasicAuth {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// API key authentication. Defaults to an `X-API-Key` header.
#[derive(Debug, Clone)]
pub struct ApiKeyAuth {
    pub id: Option<String>,
    pub name: String,
    pub location: ApiKeyLocation,
    pub description: Option<String>,
}

impl Default for ApiKeyAuth {
    fn default() -> Self {
        Self {
            id: None,
            name: DEFAULT_API_KEY_NAME.to_string(),
            location: ApiKeyLocation::Header,
            description: None,
        }
    }
}

impl ApiKeyAuth {
    /// Start from the API-key defaults in `config` instead of the built-in ones.
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self {
            name: config.api_key_name.clone(),
            location: config.api_key_location,
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn location(mut self, location: ApiKeyLocation) -> Self {
        self.location = location;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// HTTP bearer token authentication, optionally naming the token format.
#[derive(Debug, Clone, Default)]
pub struct BearerAuth {
    pub id: Option<String>,
    pub format: Option<String>,
    pub description: Option<String>,
}

impl BearerAuth {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The OAuth2 flow an [`OAuth2Auth`] declares, with the endpoints it requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OAuth2FlowType {
    Implicit { authorization_url: Url },
    Password { token_url: Url },
    ClientCredentials { token_url: Url },
    AuthorizationCode { authorization_url: Url, token_url: Url },
}

/// OAuth2 authentication with a single flow.
#[derive(Debug, Clone)]
pub struct OAuth2Auth {
    pub flow: OAuth2FlowType,
    pub id: Option<String>,
    pub refresh_url: Option<Url>,
    pub scopes: Scopes,
    pub description: Option<String>,
}

impl OAuth2Auth {
    pub fn new(flow: OAuth2FlowType) -> Self {
        Self {
            flow,
            id: None,
            refresh_url: None,
            scopes: Scopes::new(),
            description: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn refresh_url(mut self, url: Url) -> Self {
        self.refresh_url = Some(url);
        self
    }

    /// Declare one scope. Declaring the same name twice keeps the last description.
    pub fn scope(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.scopes.insert(name.into(), description.into());
        self
    }

    pub fn scopes(mut self, scopes: Scopes) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn flows(flow: OAuth2FlowType, refresh_url: Option<Url>, scopes: Scopes) -> OAuth2Flows {
        match flow {
            OAuth2FlowType::Implicit { authorization_url } => OAuth2Flows {
                implicit: Some(ImplicitFlow {
                    authorization_url,
                    refresh_url,
                    scopes,
                }),
                ..Default::default()
            },
            OAuth2FlowType::Password { token_url } => OAuth2Flows {
                password: Some(TokenFlow {
                    token_url,
                    refresh_url,
                    scopes,
                }),
                ..Default::default()
            },
            OAuth2FlowType::ClientCredentials { token_url } => OAuth2Flows {
                client_credentials: Some(TokenFlow {
                    token_url,
                    refresh_url,
                    scopes,
                }),
                ..Default::default()
            },
            OAuth2FlowType::AuthorizationCode {
                authorization_url,
                token_url,
            } => OAuth2Flows {
                authorization_code: Some(AuthorizationCodeFlow {
                    authorization_url,
                    token_url,
                    refresh_url,
                    scopes,
                }),
                ..Default::default()
            },
        }
    }
}

/// OpenID Connect discovery.
#[derive(Debug, Clone)]
pub struct OpenIdConnectAuth {
    pub id: Option<String>,
    pub url: Url,
    pub description: Option<String>,
}

impl OpenIdConnectAuth {
    pub fn new(url: Url) -> Self {
        Self {
            id: None,
            url,
            description: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

pub fn basic(config: BasicAuth) -> AuthScheme {
    AuthScheme::from_parts(
        config.id,
        SecuritySchemeDescriptor::Http {
            scheme: "basic".to_string(),
            bearer_format: None,
            description: config.description,
        },
    )
}

pub fn api_key(config: ApiKeyAuth) -> AuthScheme {
    AuthScheme::from_parts(
        config.id,
        SecuritySchemeDescriptor::ApiKey {
            name: config.name,
            location: config.location,
            description: config.description,
        },
    )
}

pub fn bearer(config: BearerAuth) -> AuthScheme {
    AuthScheme::from_parts(
        config.id,
        SecuritySchemeDescriptor::Http {
            scheme: "bearer".to_string(),
            bearer_format: config.format,
            description: config.description,
        },
    )
}

/// Build an OAuth2 scheme. Endpoint URLs are taken as given; checking that a
/// flow's endpoints are meaningful is left to whoever consumes the document.
pub fn oauth2(config: OAuth2Auth) -> AuthScheme {
    let OAuth2Auth {
        flow,
        id,
        refresh_url,
        scopes,
        description,
    } = config;

    AuthScheme::from_parts(
        id,
        SecuritySchemeDescriptor::OAuth2 {
            flows: OAuth2Auth::flows(flow, refresh_url, scopes),
            description,
        },
    )
}

pub fn open_id_connect(config: OpenIdConnectAuth) -> AuthScheme {
    AuthScheme::from_parts(
        config.id,
        SecuritySchemeDescriptor::OpenIdConnect {
            open_id_connect_url: config.url,
            description: config.description,
        },
    )
}

impl From<BasicAuth> for AuthScheme {
    fn from(config: BasicAuth) -> Self {
        basic(config)
    }
}

impl From<ApiKeyAuth> for AuthScheme {
    fn from(config: ApiKeyAuth) -> Self {
        api_key(config)
    }
}

impl From<BearerAuth> for AuthScheme {
    fn from(config: BearerAuth) -> Self {
        bearer(config)
    }
}

impl From<OAuth2Auth> for AuthScheme {
    fn from(config: OAuth2Auth) -> Self {
        oauth2(config)
    }
}

impl From<OpenIdConnectAuth> for AuthScheme {
    fn from(config: OpenIdConnectAuth) -> Self {
        open_id_connect(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_url() -> Url {
        Url::parse("https://auth.example.com/oauth/token").unwrap()
    }

    #[test]
    fn test_basic_default_id() {
        let scheme = basic(BasicAuth::default());
        assert_eq!(scheme.id(), "http_basic");
        assert_eq!(scheme, basic(BasicAuth::default()));
    }

    #[test]
    fn test_explicit_id_wins() {
        let scheme = basic(BasicAuth::default().id("basicAuth").description("Staff login"));
        assert_eq!(scheme.id(), "basicAuth");
        assert_eq!(scheme.scheme().description(), Some("Staff login"));
    }

    #[test]
    fn test_api_key_defaults() {
        let scheme = api_key(ApiKeyAuth::default());
        assert_eq!(scheme.id(), "apiKey_header");
        match scheme.scheme() {
            SecuritySchemeDescriptor::ApiKey { name, location, .. } => {
                assert_eq!(name, DEFAULT_API_KEY_NAME);
                assert_eq!(*location, ApiKeyLocation::Header);
            }
            other => panic!("unexpected scheme {other:?}"),
        }
    }

    #[test]
    fn test_api_key_from_config() {
        let config = RuntimeConfig {
            api_key_name: "api_key".to_string(),
            api_key_location: ApiKeyLocation::Query,
        };
        let scheme = api_key(ApiKeyAuth::from_config(&config));
        assert_eq!(scheme.id(), "apiKey_query");
    }

    #[test]
    fn test_bearer_with_format() {
        assert_eq!(bearer(BearerAuth::default()).id(), "http_bearer");
        assert_eq!(bearer(BearerAuth::default().format("JWT")).id(), "http_bearer_JWT");
    }

    #[test]
    fn test_oauth2_places_refresh_and_scopes_on_selected_flow() {
        let refresh = Url::parse("https://auth.example.com/oauth/refresh").unwrap();
        let scheme = oauth2(
            OAuth2Auth::new(OAuth2FlowType::ClientCredentials {
                token_url: token_url(),
            })
            .refresh_url(refresh.clone())
            .scope("orders:read", "Read orders")
            .scope("orders:write", "Write orders"),
        );

        assert_eq!(scheme.id(), "oauth2_clientCredentials");
        assert_eq!(scheme.all_scopes(), vec!["orders:read", "orders:write"]);

        let SecuritySchemeDescriptor::OAuth2 { flows, .. } = scheme.scheme() else {
            panic!("expected oauth2 scheme");
        };
        let flow = flows.client_credentials.as_ref().unwrap();
        assert_eq!(flow.refresh_url.as_ref(), Some(&refresh));
        assert!(flows.implicit.is_none());
        assert!(flows.password.is_none());
        assert!(flows.authorization_code.is_none());
    }

    #[test]
    fn test_oauth2_authorization_code_name() {
        let scheme: AuthScheme = OAuth2Auth::new(OAuth2FlowType::AuthorizationCode {
            authorization_url: Url::parse("https://auth.example.com/authorize").unwrap(),
            token_url: token_url(),
        })
        .into();
        assert_eq!(scheme.id(), "oauth2_authorizationCode");
        assert!(scheme.all_scopes().is_empty());
    }

    #[test]
    fn test_open_id_connect() {
        let url = Url::parse("https://id.example.com/.well-known/openid-configuration").unwrap();
        let scheme = open_id_connect(OpenIdConnectAuth::new(url));
        assert_eq!(scheme.id(), "openIdConnect");
    }
}
