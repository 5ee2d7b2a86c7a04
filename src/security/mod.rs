//! # Security Module
//!
//! Declarative security metadata for routes.
//!
//! ## Overview
//!
//! - [`scheme`] - the [`SecuritySchemeDescriptor`] model, default naming and scope aggregation
//! - [`factory`] - one constructor per authentication kind (basic, API key, bearer, OAuth2,
//!   OpenID Connect)
//! - [`binder`] - merging schemes and scopes into a route's security requirements
//!
//! ## Example
//!
//! ```rust
//! use brrtrouter_auth::security::{attach_auth, oauth2, OAuth2Auth, OAuth2FlowType};
//! use brrtrouter_auth::spec::RouteMeta;
//! use http::Method;
//! use url::Url;
//!
//! let petstore_auth = oauth2(
//!     OAuth2Auth::new(OAuth2FlowType::Implicit {
//!         authorization_url: Url::parse("https://petstore.example.com/oauth/authorize").unwrap(),
//!     })
//!     .id("petstore_auth")
//!     .scope("read:pets", "read your pets")
//!     .scope("write:pets", "modify pets in your account"),
//! );
//!
//! // No scopes given: every scope the flow declares is required.
//! let route = RouteMeta::new(Method::POST, "/pets").with_auth(&[petstore_auth], &[]);
//! assert_eq!(
//!     route.scopes_for("petstore_auth"),
//!     vec!["read:pets".to_string(), "write:pets".to_string()]
//! );
//! ```

pub mod binder;
pub mod factory;
pub mod scheme;

pub use binder::{attach_auth, attach_auth_all};
pub use factory::{
    api_key, basic, bearer, oauth2, open_id_connect, ApiKeyAuth, BasicAuth, BearerAuth, OAuth2Auth,
    OAuth2FlowType, OpenIdConnectAuth, DEFAULT_API_KEY_NAME,
};
pub use scheme::{
    ApiKeyLocation, AuthScheme, AuthorizationCodeFlow, ImplicitFlow, OAuth2Flows, Scopes,
    SecuritySchemeDescriptor, TokenFlow,
};
