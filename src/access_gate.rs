//! Edge access control for page routes.
//!
//! Every request is classified against a fixed policy table before any page
//! logic runs. Public routes always pass; everything else needs a valid
//! session cookie, and the admin and subcontractor areas are steered by role.
//! Decode failures of any kind look exactly like a missing cookie to the
//! client.

use std::fmt;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    models::user::UserRole,
    routes::auth::{claims::Claims, session::SESSION_COOKIE},
    state::AppState,
    utils::session_token::{SessionCodec, SessionTokenError},
};

pub const LOGIN_PATH: &str = "/login";

/// `/` matches exactly; the rest also cover their sub-paths.
const PUBLIC_ROUTES: &[&str] = &["/", "/login", "/register", "/forgot-password", "/products"];
/// Never gated: API handlers authenticate themselves and assets are static.
const BYPASS_PREFIXES: &[&str] = &["/api", "/_next/static", "/_next/image", "/favicon.ico"];
const ADMIN_PREFIX: &str = "/admin";
const SUBCONTRACTOR_LANDING_PREFIX: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Bypass,
    Public,
    Admin,
    SubcontractorLanding,
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    MissingCredential,
    InvalidToken(SessionTokenError),
    WrongRole(UserRole),
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::MissingCredential => write!(f, "no session cookie"),
            DenyReason::InvalidToken(err) => write!(f, "{}", err),
            DenyReason::WrongRole(role) => write!(f, "area not available to role {}", role),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// `claims` is present whenever the route required and received a valid session.
    Allow { claims: Option<Claims> },
    RedirectTo {
        location: &'static str,
        reason: DenyReason,
    },
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow { .. })
    }

    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            GateDecision::RedirectTo { location, .. } => Some(*location),
            GateDecision::Allow { .. } => None,
        }
    }
}

/// True when `path` is `prefix` itself or lies below it at a segment boundary.
fn is_under(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

pub fn classify(path: &str) -> RouteClass {
    if BYPASS_PREFIXES.iter().any(|prefix| is_under(path, prefix)) {
        return RouteClass::Bypass;
    }

    let public = PUBLIC_ROUTES.iter().any(|route| match *route {
        "/" => path == "/",
        route => is_under(path, route),
    });
    if public {
        return RouteClass::Public;
    }

    if is_under(path, ADMIN_PREFIX) {
        RouteClass::Admin
    } else if is_under(path, SUBCONTRACTOR_LANDING_PREFIX) {
        RouteClass::SubcontractorLanding
    } else {
        RouteClass::Authenticated
    }
}

/// Allow/redirect decision for one request. Pure in (path, token, now).
pub fn decide(
    path: &str,
    token: Option<&str>,
    codec: &SessionCodec,
    now: DateTime<Utc>,
) -> GateDecision {
    let class = classify(path);
    if matches!(class, RouteClass::Bypass | RouteClass::Public) {
        return GateDecision::Allow { claims: None };
    }

    let Some(token) = token else {
        return GateDecision::RedirectTo {
            location: LOGIN_PATH,
            reason: DenyReason::MissingCredential,
        };
    };

    let claims = match codec.decode(token, now) {
        Ok(session) => session.claims,
        Err(err) => {
            return GateDecision::RedirectTo {
                location: LOGIN_PATH,
                reason: DenyReason::InvalidToken(err),
            }
        }
    };

    match (class, claims.role) {
        (RouteClass::Admin, role @ UserRole::Subcontractor)
        | (RouteClass::SubcontractorLanding, role @ UserRole::Admin) => GateDecision::RedirectTo {
            location: role.dashboard_path(),
            reason: DenyReason::WrongRole(role),
        },
        _ => GateDecision::Allow {
            claims: Some(claims),
        },
    }
}

/// Middleware form of [`decide`]; attaches the verified [`Claims`] to the request on success.
pub async fn access_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    let token = jar.get(SESSION_COOKIE).map(|cookie| cookie.value());

    match decide(&path, token, &state.sessions, Utc::now()) {
        GateDecision::Allow { claims } => {
            if let Some(claims) = claims {
                req.extensions_mut().insert(claims);
            }
            next.run(req).await
        }
        GateDecision::RedirectTo { location, reason } => {
            debug!(%path, %location, %reason, "Access gate redirect");
            Redirect::to(location).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::routes::test_support::test_state;

    fn codec() -> std::sync::Arc<SessionCodec> {
        test_state().sessions
    }

    fn claims(role: UserRole) -> Claims {
        Claims {
            id: "7".into(),
            email: "someone@example.com".into(),
            role,
            company_name: None,
            contact_person: None,
        }
    }

    fn token_issued_at(role: UserRole, issued_at: DateTime<Utc>) -> String {
        codec().encode(&claims(role), issued_at).unwrap()
    }

    fn token(role: UserRole) -> String {
        token_issued_at(role, Utc::now())
    }

    #[test]
    fn classifies_policy_table() {
        assert_eq!(classify("/"), RouteClass::Public);
        assert_eq!(classify("/login"), RouteClass::Public);
        assert_eq!(classify("/register"), RouteClass::Public);
        assert_eq!(classify("/forgot-password"), RouteClass::Public);
        assert_eq!(classify("/products"), RouteClass::Public);
        assert_eq!(classify("/products/42"), RouteClass::Public);

        assert_eq!(classify("/admin"), RouteClass::Admin);
        assert_eq!(classify("/admin/products/new"), RouteClass::Admin);
        assert_eq!(classify("/dashboard"), RouteClass::SubcontractorLanding);
        assert_eq!(classify("/dashboard/"), RouteClass::SubcontractorLanding);

        for path in ["/orders", "/orders/17/payment", "/quotes/new", "/messages", "/notifications"] {
            assert_eq!(classify(path), RouteClass::Authenticated, "{path}");
        }

        for path in ["/api/auth/login", "/_next/static/app.js", "/_next/image", "/favicon.ico"] {
            assert_eq!(classify(path), RouteClass::Bypass, "{path}");
        }
    }

    #[test]
    fn prefixes_respect_segment_boundaries() {
        assert_eq!(classify("/administrator"), RouteClass::Authenticated);
        assert_eq!(classify("/productsx"), RouteClass::Authenticated);
        assert_eq!(classify("/login-help"), RouteClass::Authenticated);
        assert_eq!(classify("/dashboards"), RouteClass::Authenticated);
        assert_eq!(classify("/apix"), RouteClass::Authenticated);
    }

    #[test]
    fn public_route_without_cookie_is_allowed() {
        let decision = decide("/products", None, &codec(), Utc::now());
        assert_eq!(decision, GateDecision::Allow { claims: None });
    }

    #[test]
    fn public_route_ignores_garbage_cookie() {
        let decision = decide("/", Some("%%%garbage"), &codec(), Utc::now());
        assert!(decision.is_allowed());
        let decision = decide("/login", Some("%%%garbage"), &codec(), Utc::now());
        assert!(decision.is_allowed());
    }

    #[test]
    fn protected_route_without_cookie_redirects_to_login() {
        let decision = decide("/dashboard", None, &codec(), Utc::now());
        assert_eq!(
            decision,
            GateDecision::RedirectTo {
                location: "/login",
                reason: DenyReason::MissingCredential,
            }
        );
    }

    #[test]
    fn subcontractor_is_steered_out_of_admin_area() {
        let token = token(UserRole::Subcontractor);
        let decision = decide("/admin/products", Some(&token), &codec(), Utc::now());
        assert_eq!(
            decision,
            GateDecision::RedirectTo {
                location: "/dashboard",
                reason: DenyReason::WrongRole(UserRole::Subcontractor),
            }
        );
    }

    #[test]
    fn admin_is_steered_to_admin_dashboard() {
        let token = token(UserRole::Admin);
        let decision = decide("/dashboard", Some(&token), &codec(), Utc::now());
        assert_eq!(decision.redirect_target(), Some("/admin/dashboard"));
    }

    #[test]
    fn admin_enters_admin_area_with_claims() {
        let token = token(UserRole::Admin);
        let decision = decide("/admin/analytics", Some(&token), &codec(), Utc::now());
        assert_eq!(
            decision,
            GateDecision::Allow {
                claims: Some(claims(UserRole::Admin)),
            }
        );
    }

    #[test]
    fn subcontractor_reaches_shared_pages() {
        let token = token(UserRole::Subcontractor);
        for path in ["/dashboard", "/orders", "/quotes", "/messages", "/notifications"] {
            let decision = decide(path, Some(&token), &codec(), Utc::now());
            assert!(decision.is_allowed(), "{path}");
        }
    }

    #[test]
    fn admin_reaches_shared_pages_outside_landing() {
        let token = token(UserRole::Admin);
        let decision = decide("/orders", Some(&token), &codec(), Utc::now());
        assert!(decision.is_allowed());
    }

    #[test]
    fn six_day_old_session_is_still_valid() {
        let now = Utc::now();
        let token = token_issued_at(UserRole::Subcontractor, now - Duration::days(6));
        assert!(decide("/orders", Some(&token), &codec(), now).is_allowed());
    }

    #[test]
    fn eight_day_old_session_redirects_to_login() {
        let now = Utc::now();
        let token = token_issued_at(UserRole::Subcontractor, now - Duration::days(8));
        assert_eq!(
            decide("/orders", Some(&token), &codec(), now),
            GateDecision::RedirectTo {
                location: "/login",
                reason: DenyReason::InvalidToken(SessionTokenError::Expired),
            }
        );
    }

    #[test]
    fn altered_cookie_redirects_to_login() {
        let mut token = token(UserRole::Subcontractor);
        token.replace_range(3..4, "*");
        let decision = decide("/orders", Some(&token), &codec(), Utc::now());
        assert_eq!(
            decision,
            GateDecision::RedirectTo {
                location: "/login",
                reason: DenyReason::InvalidToken(SessionTokenError::Malformed),
            }
        );
    }

    #[test]
    fn bypassed_paths_never_decode() {
        let decision = decide("/api/auth/me", Some("garbage"), &codec(), Utc::now());
        assert_eq!(decision, GateDecision::Allow { claims: None });
    }

    #[test]
    fn deny_reasons_render_for_logs() {
        assert_eq!(DenyReason::MissingCredential.to_string(), "no session cookie");
        assert_eq!(
            DenyReason::InvalidToken(SessionTokenError::Expired).to_string(),
            "session token has expired"
        );
        assert_eq!(
            DenyReason::WrongRole(UserRole::Subcontractor).to_string(),
            "area not available to role subcontractor"
        );
    }
}
