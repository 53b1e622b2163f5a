use axum::{
    extract::Request,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::routes::auth::claims::Claims;

/// Stand-in for the UI: reports which page was reached and by whom.
pub async fn render_page(req: Request) -> Response {
    let user = req.extensions().get::<Claims>().cloned();

    Json(json!({
        "page": req.uri().path(),
        "user": user,
    }))
    .into_response()
}
