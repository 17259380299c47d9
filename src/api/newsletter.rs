use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use validator::Validate;

use crate::api::extract::JsonBody;
use crate::error::Result;
use crate::models::{NewsletterSignup, Subscriber};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub subscriber: Subscriber,
}

pub fn newsletter_routes() -> Router<AppState> {
    Router::new().route("/newsletter", post(subscribe))
}

/// POST /api/newsletter - duplicate emails answer 409 "Already subscribed"
async fn subscribe(
    State(state): State<AppState>,
    JsonBody(signup): JsonBody<NewsletterSignup>,
) -> Result<Json<SubscribeResponse>> {
    let signup = signup.normalized();
    signup.validate()?;

    let subscriber = state.repo.subscribe(&signup.email).await?;
    tracing::info!(subscriber_id = %subscriber.id, "Newsletter signup");

    Ok(Json(SubscribeResponse {
        success: true,
        subscriber,
    }))
}
