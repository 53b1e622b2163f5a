use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use time::Duration as TimeDuration;

use crate::models::user::UserRole;
use crate::routes::auth::claims::Claims;
use crate::state::AppState;
use crate::utils::session_token::SESSION_MAX_AGE_DAYS;

pub const SESSION_COOKIE: &str = "auth-token";

/// Cookie carrying a freshly minted session token.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(TimeDuration::days(SESSION_MAX_AGE_DAYS))
        .build()
}

pub fn expired_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(TimeDuration::seconds(0))
        .build()
}

#[derive(Debug, PartialEq)]
pub struct AuthSession(pub Claims);

impl<S> FromRequestParts<S> for AuthSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(SESSION_COOKIE).ok_or(StatusCode::UNAUTHORIZED)?;

        let claims = app_state
            .sessions
            .verify(token.value(), Utc::now())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(AuthSession(claims))
    }
}

/// Session held by an admin; 401 without a valid session, 403 for any other role.
#[derive(Debug, PartialEq)]
pub struct AdminSession(pub Claims);

impl<S> FromRequestParts<S> for AdminSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthSession(claims) = AuthSession::from_request_parts(parts, state).await?;
        match claims.role {
            UserRole::Admin => Ok(AdminSession(claims)),
            UserRole::Subcontractor => Err(StatusCode::FORBIDDEN),
        }
    }
}
