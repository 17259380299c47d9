use std::collections::HashSet;

use serde::Deserialize;

use super::{templates, Mailer, OutgoingEmail};
use crate::error::{AppError, Result};
use crate::store::{StoreResult, VenueRepository};

/// Who a mass email goes to
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Rsvps,
    Newsletter,
    All,
}

impl Audience {
    pub fn includes_rsvps(self) -> bool {
        matches!(self, Audience::Rsvps | Audience::All)
    }

    pub fn includes_newsletter(self) -> bool {
        matches!(self, Audience::Newsletter | Audience::All)
    }
}

/// `send-mass-email` body, parsed after the admin key has been checked
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MassEmailRequest {
    pub subject: String,
    pub message: String,
    pub send_to: Audience,
}

/// Set-union of address lists, keeping first-seen order
pub fn dedupe_recipients<I>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut seen = HashSet::new();
    lists
        .into_iter()
        .flatten()
        .filter(|email| seen.insert(email.clone()))
        .collect()
}

/// Load and deduplicate the recipients for `audience`
pub async fn resolve_recipients(
    repo: &VenueRepository,
    audience: Audience,
) -> StoreResult<Vec<String>> {
    let mut lists = Vec::with_capacity(2);
    if audience.includes_rsvps() {
        lists.push(repo.rsvp_emails().await?);
    }
    if audience.includes_newsletter() {
        lists.push(repo.subscriber_emails().await?);
    }
    Ok(dedupe_recipients(lists))
}

impl Mailer {
    /// Send one templated message to `recipients` in BCC batches.
    ///
    /// Batches go out strictly one after another. A failing batch aborts the
    /// rest; batches already sent stay sent and are reported in the error.
    /// Returns the number of recipients attempted.
    pub async fn send_mass_email(
        &self,
        recipients: &[String],
        subject: &str,
        message: &str,
    ) -> Result<usize> {
        let html = templates::mass_email(subject, message);
        let mut sent = 0;

        for (index, batch) in recipients.chunks(self.batch_size).enumerate() {
            let email = OutgoingEmail {
                from: self.from.clone(),
                to: vec![self.placeholder_to.clone()],
                bcc: batch.to_vec(),
                subject: subject.to_string(),
                html: html.clone(),
            };

            if let Err(e) = self.sender.send(&email).await {
                tracing::error!(batch = index + 1, sent, error = %e, "Mass email batch failed");
                return Err(AppError::PartialBatchFailure {
                    sent,
                    message: e.to_string(),
                });
            }

            sent += batch.len();
            tracing::info!(batch = index + 1, size = batch.len(), "Mass email batch sent");
        }

        Ok(sent)
    }
}
