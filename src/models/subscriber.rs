use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Newsletter subscriber row (`newsletter_subscribers`, email is unique)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscriber {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Public newsletter signup
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewsletterSignup {
    #[serde(default)]
    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email must be less than 255 characters")
    )]
    pub email: String,
}

impl NewsletterSignup {
    pub fn normalized(&self) -> Self {
        Self {
            email: self.email.trim().to_string(),
        }
    }
}
