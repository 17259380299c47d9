pub mod bulk;
pub mod notifier;
pub mod resend;
pub mod templates;

pub use bulk::{dedupe_recipients, Audience, MassEmailRequest};

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;

/// One provider call worth of mail
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail send failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Email provider error ({status}): {body}")]
    Provider { status: u16, body: String },

    #[error("{}", .0.join("; "))]
    Aggregate(Vec<String>),
}

/// Transactional email provider
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Mail service: addressing rules and templates on top of an [`EmailSender`]
#[derive(Clone)]
pub struct Mailer {
    sender: Arc<dyn EmailSender>,
    from: String,
    placeholder_to: String,
    operator: String,
    batch_size: usize,
}

impl Mailer {
    pub fn new(config: &Config, sender: Arc<dyn EmailSender>) -> Self {
        Self {
            sender,
            from: config.mail_from.clone(),
            placeholder_to: config.mail_placeholder_to.clone(),
            operator: config.rsvp_notify_email.clone(),
            batch_size: config.mass_email_batch_size.max(1),
        }
    }

    fn message(&self, to: Vec<String>, subject: String, html: String) -> OutgoingEmail {
        OutgoingEmail {
            from: self.from.clone(),
            to,
            bcc: Vec::new(),
            subject,
            html,
        }
    }
}
