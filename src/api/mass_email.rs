use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use crate::admin::presented_key;
use crate::api::extract::GatedBody;
use crate::error::Result;
use crate::mail::bulk::resolve_recipients;
use crate::mail::MassEmailRequest;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MassEmailResponse {
    pub success: bool,
    pub sent: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub fn mass_email_routes() -> Router<AppState> {
    Router::new().route("/send-mass-email", post(send_mass_email))
}

/// POST /functions/v1/send-mass-email - `{ subject, message, adminKey, sendTo }`
async fn send_mass_email(
    State(state): State<AppState>,
    GatedBody(body): GatedBody,
) -> Result<Json<MassEmailResponse>> {
    state.guard.verify(presented_key(&body))?;
    let request: MassEmailRequest = serde_json::from_value(body)?;

    let recipients = resolve_recipients(&state.repo, request.send_to).await?;
    tracing::info!(
        recipients = recipients.len(),
        audience = ?request.send_to,
        "Sending mass email"
    );

    if recipients.is_empty() {
        return Ok(Json(MassEmailResponse {
            success: true,
            sent: 0,
            message: Some("No recipients found".to_string()),
        }));
    }

    let sent = state
        .mailer
        .send_mass_email(&recipients, &request.subject, &request.message)
        .await?;

    Ok(Json(MassEmailResponse {
        success: true,
        sent,
        message: None,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use crate::api::create_router;
    use crate::api::tests::{call, call_raw};
    use crate::store::Table;
    use crate::test_support::{
        test_state, test_state_with_sender, RecordingSender, TestHarness, TEST_ADMIN_KEY,
    };

    fn request(send_to: &str) -> Value {
        json!({
            "adminKey": TEST_ADMIN_KEY,
            "subject": "Game Night",
            "message": "Doors at 3PM\nBring friends",
            "sendTo": send_to,
        })
    }

    async fn seed_emails(harness: &TestHarness, table: Table, emails: &[&str]) {
        for (i, email) in emails.iter().enumerate() {
            let row = match table {
                Table::Rsvps => json!({ "name": format!("Guest {i}"), "email": email, "phone": "5551234567" }),
                _ => json!({ "email": email }),
            };
            harness.store.seed(table, row).await;
        }
    }

    #[tokio::test]
    async fn test_overlapping_audiences_are_deduplicated() {
        let harness = test_state();
        seed_emails(&harness, Table::Rsvps, &["a@x.com", "b@x.com"]).await;
        seed_emails(&harness, Table::NewsletterSubscribers, &["b@x.com", "c@x.com"]).await;

        let (status, body) = call(
            create_router(harness.state.clone()),
            Method::POST,
            "/functions/v1/send-mass-email",
            Some(request("all")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "sent": 3 }));

        let sent = harness.sender.sent();
        assert_eq!(sent.len(), 1);
        let mut bcc = sent[0].bcc.clone();
        bcc.sort();
        assert_eq!(bcc, vec!["a@x.com", "b@x.com", "c@x.com"]);
        assert_eq!(sent[0].to, vec!["noreply@aisocialklub.com"]);
        assert!(sent[0].html.contains("Doors at 3PM<br>Bring friends"));
    }

    #[tokio::test]
    async fn test_empty_audience_sends_nothing() {
        let harness = test_state();
        seed_emails(&harness, Table::NewsletterSubscribers, &["n@x.com"]).await;

        let (status, body) = call(
            create_router(harness.state.clone()),
            Method::POST,
            "/functions/v1/send-mass-email",
            Some(request("rsvps")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["sent"], json!(0));
        assert_eq!(harness.sender.attempts(), 0);
        // only the rsvps table was read
        assert_eq!(harness.store.calls(), 1);
    }

    #[tokio::test]
    async fn test_120_recipients_three_sequential_batches() {
        let harness = test_state();
        let emails: Vec<String> = (0..120).map(|i| format!("guest{i}@x.com")).collect();
        let refs: Vec<&str> = emails.iter().map(String::as_str).collect();
        seed_emails(&harness, Table::NewsletterSubscribers, &refs).await;

        let (status, body) = call(
            create_router(harness.state.clone()),
            Method::POST,
            "/functions/v1/send-mass-email",
            Some(request("newsletter")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "sent": 120 }));
        assert_eq!(
            harness.sender.sent().iter().map(|e| e.bcc.len()).collect::<Vec<_>>(),
            vec![50, 50, 20]
        );
    }

    #[tokio::test]
    async fn test_wrong_key_touches_nothing() {
        let harness = test_state();
        seed_emails(&harness, Table::Rsvps, &["a@x.com"]).await;

        let mut body = request("all");
        body["adminKey"] = json!("not-the-key");

        let (status, response) = call(
            create_router(harness.state.clone()),
            Method::POST,
            "/functions/v1/send-mass-email",
            Some(body),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(response, json!({ "error": "Unauthorized" }));
        assert_eq!(harness.store.calls(), 0);
        assert_eq!(harness.sender.attempts(), 0);
    }

    #[tokio::test]
    async fn test_wrong_key_without_content_type_is_unauthorized() {
        let harness = test_state();
        seed_emails(&harness, Table::Rsvps, &["a@x.com"]).await;

        let mut body = request("all");
        body["adminKey"] = json!("not-the-key");

        let (status, response) = call_raw(
            create_router(harness.state.clone()),
            "/functions/v1/send-mass-email",
            None,
            &body.to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(response, json!({ "error": "Unauthorized" }));
        assert_eq!(harness.store.calls(), 0);
        assert_eq!(harness.sender.attempts(), 0);
    }

    #[tokio::test]
    async fn test_malformed_request_with_key_is_bad_request() {
        let harness = test_state();
        let (status, response) = call(
            create_router(harness.state.clone()),
            Method::POST,
            "/functions/v1/send-mass-email",
            Some(json!({ "adminKey": TEST_ADMIN_KEY, "subject": 7, "sendTo": "all" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["error"].as_str().unwrap().starts_with("JSON error"));
        assert_eq!(harness.store.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_reported_once() {
        let harness = test_state_with_sender(RecordingSender::failing_on(2));
        let emails: Vec<String> = (0..60).map(|i| format!("guest{i}@x.com")).collect();
        let refs: Vec<&str> = emails.iter().map(String::as_str).collect();
        seed_emails(&harness, Table::Rsvps, &refs).await;

        let (status, body) = call(
            create_router(harness.state.clone()),
            Method::POST,
            "/functions/v1/send-mass-email",
            Some(request("rsvps")),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["sent"], json!(50));
        assert!(body["error"].as_str().unwrap().contains("rate limit"));
    }

    #[tokio::test]
    async fn test_unknown_audience_is_bad_request() {
        let harness = test_state();
        let (status, _) = call(
            create_router(harness.state.clone()),
            Method::POST,
            "/functions/v1/send-mass-email",
            Some(request("everyone")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(harness.store.calls(), 0);
    }
}
