use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// RSVP row as stored in `rsvps`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rsvp {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// Public RSVP form submission (also the RSVP notifier payload)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RsvpForm {
    #[serde(default)]
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[serde(default)]
    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email must be less than 255 characters")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
}

impl RsvpForm {
    /// Trimmed copy, the form that is validated and persisted
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    match name.chars().count() {
        0 => Err(field_error("length", "Name is required")),
        n if n > 100 => Err(field_error("length", "Name must be less than 100 characters")),
        _ => Ok(()),
    }
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    match phone.chars().count() {
        n if n < 10 => Err(field_error("length", "Phone number must be at least 10 digits")),
        n if n > 20 => Err(field_error("length", "Phone number is too long")),
        _ => Ok(()),
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}
