use axum::{extract::State, routing::post, Json, Router};
use serde_json::Value;

use crate::admin;
use crate::api::extract::GatedBody;
use crate::error::Result;
use crate::state::AppState;

/// Admin gateway route
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin-api", post(admin_api))
}

/// POST /functions/v1/admin-api - `{ adminKey, action, data? }`
async fn admin_api(State(state): State<AppState>, GatedBody(body): GatedBody) -> Result<Json<Value>> {
    admin::handle(&state, &body).await.map(Json)
}
