use crate::config::Config;
use crate::error::{AppError, Result};
use crate::security::ct_eq_str;

/// Shared-secret gate for admin requests.
///
/// There is no session: every admin request carries the key and is checked
/// independently.
#[derive(Clone)]
pub struct AdminGuard {
    secret: String,
}

impl AdminGuard {
    pub fn new(config: &Config) -> Self {
        Self::with_secret(config.admin_access_key.clone())
    }

    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Validate a presented admin key. A missing key is treated like a wrong one.
    pub fn verify(&self, presented: Option<&str>) -> Result<()> {
        match presented {
            Some(key) if ct_eq_str(key, &self.secret) => Ok(()),
            _ => Err(AppError::Unauthorized),
        }
    }
}
