//! Binding security schemes to routes.
//!
//! [`attach_auth`] merges new schemes into a route's attached schemes and
//! recomputes the route's security requirements. The input route is never
//! modified; a new [`RouteMeta`] is returned.
//!
//! Requirement scopes for each scheme are the union of the scopes already
//! recorded for that scheme name and the scopes passed by the caller. When
//! that union is empty the scheme's own declared scopes are used instead, so
//! an OAuth2 scheme attached without scopes requires every scope its flows
//! declare.

use super::scheme::AuthScheme;
use crate::spec::{RouteMeta, SecurityRequirement};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Attach `schemes` to `route`, requiring `scopes` for each attached scheme.
///
/// Attaching no schemes returns the route unchanged.
///
/// ```rust
/// use brrtrouter_auth::security::{attach_auth, bearer, BearerAuth};
/// use brrtrouter_auth::spec::RouteMeta;
/// use http::Method;
///
/// let route = RouteMeta::new(Method::GET, "/pets");
/// let jwt = bearer(BearerAuth::default().id("bearerAuth"));
///
/// let secured = attach_auth(&route, &[jwt], &["pets:read"]);
/// assert_eq!(secured.requirement_names(), vec!["bearerAuth"]);
/// assert!(route.security.is_none());
/// ```
#[must_use]
pub fn attach_auth(route: &RouteMeta, schemes: &[AuthScheme], scopes: &[&str]) -> RouteMeta {
    if schemes.is_empty() {
        return route.clone();
    }

    let auths = merge_auths(&route.auths, schemes);
    let security = requirements_for(route, &auths, scopes);

    debug!(
        method = %route.method,
        path = %route.path_pattern,
        attached = schemes.len(),
        total = auths.len(),
        scopes = ?scopes,
        "Attached security schemes to route"
    );

    RouteMeta {
        auths,
        security,
        ..route.clone()
    }
}

/// [`attach_auth`] applied to every route of a group.
#[must_use]
pub fn attach_auth_all(routes: &[RouteMeta], schemes: &[AuthScheme], scopes: &[&str]) -> Vec<RouteMeta> {
    routes
        .iter()
        .map(|route| attach_auth(route, schemes, scopes))
        .collect()
}

impl RouteMeta {
    /// Method form of [`attach_auth`].
    #[must_use]
    pub fn with_auth(&self, schemes: &[AuthScheme], scopes: &[&str]) -> RouteMeta {
        attach_auth(self, schemes, scopes)
    }
}

/// Existing schemes followed by the new ones not already present.
pub(crate) fn merge_auths(existing: &[AuthScheme], new: &[AuthScheme]) -> Vec<AuthScheme> {
    let mut merged: Vec<AuthScheme> = Vec::with_capacity(existing.len() + new.len());
    for scheme in existing.iter().chain(new) {
        if !merged.contains(scheme) {
            merged.push(scheme.clone());
        }
    }
    merged
}

/// One single-entry requirement per distinct scheme id in `auths`.
///
/// Returns `None` for an empty scheme set.
pub(crate) fn requirements_for(
    route: &RouteMeta,
    auths: &[AuthScheme],
    scopes: &[&str],
) -> Option<Vec<SecurityRequirement>> {
    if auths.is_empty() {
        return None;
    }

    let mut emitted: Vec<&AuthScheme> = Vec::with_capacity(auths.len());
    let mut requirements = Vec::with_capacity(auths.len());

    for scheme in auths {
        if let Some(owner) = emitted.iter().find(|owner| owner.id() == scheme.id()) {
            warn!(
                id = %scheme.id(),
                kept = ?owner.scheme(),
                shadowed = ?scheme.scheme(),
                path = %route.path_pattern,
                "Distinct security schemes share an id; give them explicit ids to keep both"
            );
            continue;
        }

        let mut required = route.scopes_for(scheme.id());
        for scope in scopes {
            if !required.iter().any(|s| s == scope) {
                required.push((*scope).to_string());
            }
        }
        if required.is_empty() {
            required = scheme.all_scopes();
        }

        requirements.push(SecurityRequirement(BTreeMap::from([(
            scheme.id().to_string(),
            required,
        )])));
        emitted.push(scheme);
    }

    Some(requirements)
}
