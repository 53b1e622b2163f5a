use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, info};

use crate::{
    db::user_repository::RepositoryError,
    models::{
        signup::RegisterPayload,
        user::{PublicUser, UserRole},
    },
    responses::JsonResponse,
    state::AppState,
    utils::password::{hash_password, MIN_PASSWORD_LENGTH},
};

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub async fn handle_register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Response {
    let mut payload = payload;
    payload.email = payload.email.trim().to_lowercase();
    payload.company_name = payload.company_name.trim().to_string();
    payload.contact_person = payload.contact_person.trim().to_string();

    if payload.email.is_empty()
        || payload.password.is_empty()
        || payload.company_name.is_empty()
        || payload.contact_person.is_empty()
    {
        return JsonResponse::bad_request("Required fields are missing").into_response();
    }

    if !is_valid_email(&payload.email) {
        return JsonResponse::bad_request("Invalid email format").into_response();
    }

    if payload.password.chars().count() < MIN_PASSWORD_LENGTH {
        return JsonResponse::bad_request(&format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ))
        .into_response();
    }

    match state.db.is_email_taken(&payload.email).await {
        Ok(false) => {}
        Ok(true) => return JsonResponse::conflict("User already registered").into_response(),
        Err(e) => {
            error!(error = %e, "Registration failed: user store error");
            return JsonResponse::server_error("Internal server error").into_response();
        }
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Registration failed: password hashing error");
            return JsonResponse::server_error("Internal server error").into_response();
        }
    };

    // Self-service accounts are always subcontractors; admins are provisioned out of band.
    match state
        .db
        .create_user(&payload, &password_hash, UserRole::Subcontractor)
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, "Registered new subcontractor");
            Json(json!({
                "success": true,
                "message": "Registration successful",
                "user": PublicUser::from(&user),
            }))
            .into_response()
        }
        Err(RepositoryError::Duplicate(_)) => {
            JsonResponse::conflict("User already registered").into_response()
        }
        Err(e) => {
            error!(error = %e, "Registration failed: could not persist user");
            JsonResponse::server_error("Internal server error").into_response()
        }
    }
}
