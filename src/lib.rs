//! # BRRTRouter Auth
//!
//! Declarative OpenAPI security metadata for BRRTRouter routes.
//!
//! ## Overview
//!
//! Security schemes (basic, API key, bearer, OAuth2, OpenID Connect) are built
//! as plain values and bound to routes. Binding merges them with whatever the
//! route already carries, deduplicates them, and recomputes the route's
//! security requirement list, ready to be written into an OpenAPI document.
//!
//! ## Architecture
//!
//! - **[`security`]** - scheme descriptors, the scheme factory and the route binder
//! - **[`spec`]** - the [`RouteMeta`](spec::RouteMeta) route model and loading routes
//!   (with their security) from an OpenAPI document
//! - **[`document`]** - writing route security back into an OpenAPI document
//! - **[`validator`]** - loader validation issues
//! - **[`runtime_config`]** - environment driven defaults
//! - **[`logging`]** - `tracing` subscriber setup
//!
//! ## Example
//!
//! ```rust
//! use brrtrouter_auth::security::{api_key, attach_auth, bearer, ApiKeyAuth, BearerAuth};
//! use brrtrouter_auth::spec::RouteMeta;
//! use http::Method;
//!
//! let route = RouteMeta::new(Method::GET, "/pets").operation_id("list_pets");
//!
//! let jwt = bearer(BearerAuth::default().format("JWT"));
//! let key = api_key(ApiKeyAuth::default());
//!
//! let route = attach_auth(&route, &[jwt.clone()], &["pets:read"]);
//! let route = attach_auth(&route, &[key, jwt], &[]);
//!
//! assert_eq!(route.auths.len(), 2);
//! assert_eq!(route.requirement_names(), vec!["http_bearer_JWT", "apiKey_header"]);
//! assert_eq!(route.scopes_for("http_bearer_JWT"), vec!["pets:read".to_string()]);
//! ```

pub mod document;
pub mod logging;
pub mod runtime_config;
pub mod security;
pub mod spec;
pub mod validator;

pub use document::apply_security;
pub use security::{attach_auth, AuthScheme, SecuritySchemeDescriptor};
pub use spec::{load_spec, RouteMeta};
