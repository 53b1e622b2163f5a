use axum::{extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;

use super::session::expired_session_cookie;
use crate::{responses::JsonResponse, state::AppState};

/// Logout only drops the client's copy; tokens are not tracked server-side.
pub async fn handle_logout(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> impl IntoResponse {
    let jar = jar.add(expired_session_cookie(app_state.config.secure_cookies()));

    (StatusCode::OK, jar, JsonResponse::success("Logged out"))
}
