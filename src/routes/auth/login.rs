use crate::routes::auth::claims::Claims;
use crate::{
    models::user::PublicUser, responses::JsonResponse, state::AppState,
    utils::password::verify_password,
};

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use super::session::{session_cookie, AuthSession};

#[derive(Deserialize, Serialize, Default)]
pub struct LoginPayload {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn handle_login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Response {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return JsonResponse::bad_request("Email and password are required").into_response();
    }

    let user = match app_state.db.find_user_by_email(&payload.email).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            info!(email = %payload.email, "Login rejected: unknown email");
            return JsonResponse::unauthorized("Invalid credentials").into_response();
        }
        Err(e) => {
            error!(error = %e, "Login failed: user store error");
            return JsonResponse::server_error("Internal server error").into_response();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Login rejected: wrong password");
            return JsonResponse::unauthorized("Invalid credentials").into_response();
        }
        Err(e) => {
            error!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
            return JsonResponse::server_error("Internal server error").into_response();
        }
    }

    let claims = Claims::from(&user);
    let token = match app_state.sessions.encode(&claims, Utc::now()) {
        Ok(token) => token,
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "Session token generation failed");
            return JsonResponse::server_error("Internal server error").into_response();
        }
    };

    info!(user_id = %user.id, role = %user.role, "Login succeeded");
    let jar = jar.add(session_cookie(token, app_state.config.secure_cookies()));
    (
        StatusCode::OK,
        jar,
        Json(json!({
            "success": true,
            "message": "Login successful",
            "user": PublicUser::from(&user),
        })),
    )
        .into_response()
}

pub async fn handle_me(AuthSession(claims): AuthSession) -> Response {
    Json(json!({
        "success": true,
        "user": claims,
    }))
    .into_response()
}
