use chrono::Utc;

use super::{templates, MailError, Mailer};
use crate::models::RsvpForm;

impl Mailer {
    /// Send the guest confirmation and the operator notification for one RSVP.
    ///
    /// Both sends are attempted regardless of each other; any failure comes
    /// back as a single aggregate error.
    pub async fn notify_rsvp(&self, rsvp: &RsvpForm) -> Result<(), MailError> {
        tracing::info!(email = %rsvp.email, "Sending RSVP confirmation");

        let confirmation = self.message(
            vec![rsvp.email.clone()],
            templates::RSVP_CONFIRMATION_SUBJECT.to_string(),
            templates::rsvp_confirmation(&rsvp.name),
        );

        let received_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        let notification = self.message(
            vec![self.operator.clone()],
            templates::rsvp_notification_subject(&rsvp.name),
            templates::rsvp_notification(&rsvp.name, &rsvp.email, &rsvp.phone, &received_at),
        );

        let (guest, operator) = tokio::join!(
            self.sender.send(&confirmation),
            self.sender.send(&notification)
        );

        let mut failures = Vec::new();
        if let Err(e) = guest {
            tracing::error!(error = %e, "RSVP confirmation email failed");
            failures.push(format!("confirmation: {}", e));
        }
        if let Err(e) = operator {
            tracing::error!(error = %e, "RSVP operator notification failed");
            failures.push(format!("notification: {}", e));
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(MailError::Aggregate(failures))
        }
    }
}
