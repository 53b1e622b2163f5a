pub mod auth;
pub mod pages;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{access_gate::access_gate, state::AppState};
use auth::{handle_login, handle_logout, handle_me, handle_register};
use pages::render_page;

/// `/api/auth` endpoints, returned bare so the binary can wrap them in its rate limiter.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handle_login))
        .route("/register", post(handle_register))
        .route("/logout", post(handle_logout))
        .route("/me", get(handle_me))
}

pub fn app(state: AppState, auth_routes: Router<AppState>) -> Router {
    Router::new()
        .nest("/api/auth", auth_routes)
        .fallback(render_page)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            access_gate,
        ))
        .with_state(state)
}
