use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use tokio::task::JoinHandle;
use validator::Validate;

use crate::api::extract::JsonBody;
use crate::error::Result;
use crate::mail::Mailer;
use crate::models::{Rsvp, RsvpForm, Success};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RsvpResponse {
    pub success: bool,
    pub rsvp: Rsvp,
}

/// POST /functions/v1/send-rsvp-email
pub fn notifier_routes() -> Router<AppState> {
    Router::new().route("/send-rsvp-email", post(send_rsvp_email))
}

/// POST /api/rsvp
pub fn rsvp_routes() -> Router<AppState> {
    Router::new().route("/rsvp", post(submit_rsvp))
}

/// Send the confirmation + operator notification for one RSVP
async fn send_rsvp_email(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<RsvpForm>,
) -> Result<Json<Success>> {
    let form = form.normalized();
    form.validate()?;

    state.mailer.notify_rsvp(&form).await?;
    Ok(Json(Success::ok()))
}

/// Validate, persist, then notify in the background.
///
/// The notifier only starts once the row is committed, and its outcome never
/// reaches the caller or the stored RSVP.
async fn submit_rsvp(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<RsvpForm>,
) -> Result<Json<RsvpResponse>> {
    let form = form.normalized();
    form.validate()?;

    let rsvp = state.repo.create_rsvp(&form).await?;
    tracing::info!(rsvp_id = %rsvp.id, "RSVP recorded");

    dispatch_notification(state.mailer.clone(), form);

    Ok(Json(RsvpResponse {
        success: true,
        rsvp,
    }))
}

/// Fire-and-forget notifier task; failures are logged and dropped.
pub fn dispatch_notification(mailer: Arc<Mailer>, form: RsvpForm) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = mailer.notify_rsvp(&form).await {
            tracing::warn!(error = %e, email = %form.email, "RSVP notification failed");
        }
    })
}
