use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{EmailSender, MailError, OutgoingEmail};
use crate::config::Config;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    api_key: String,
}

#[derive(Serialize)]
struct Payload<'a> {
    from: &'a str,
    to: &'a [String],
    #[serde(skip_serializing_if = "no_recipients")]
    bcc: &'a [String],
    subject: &'a str,
    html: &'a str,
}

fn no_recipients(list: &&[String]) -> bool {
    list.is_empty()
}

impl ResendMailer {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.resend_api_key.clone(),
        }
    }
}

#[async_trait]
impl EmailSender for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let payload = Payload {
            from: &email.from,
            to: &email.to,
            bcc: &email.bcc,
            subject: &email.subject,
            html: &email.html,
        };

        let res = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(MailError::Provider { status, body });
        }

        Ok(())
    }
}
