use std::env;
use std::str::FromStr;

/// Development fallback for the admin shared secret. Must be overridden in any
/// real deployment via `ADMIN_ACCESS_KEY`.
pub const DEFAULT_ADMIN_KEY: &str = "aisocialklub2026";

/// Which data store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Supabase,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supabase" => Ok(StoreBackend::Supabase),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::InvalidStoreBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub admin_access_key: String,
    pub store_backend: StoreBackend,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub gallery_bucket: String,
    pub resend_api_key: String,
    pub mail_from: String,
    pub mail_placeholder_to: String,
    pub rsvp_notify_email: String,
    pub mass_email_batch_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let store_backend: StoreBackend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "supabase".to_string())
            .parse()?;

        // The memory backend needs no credentials; Supabase needs both.
        let (supabase_url, supabase_service_key) = match store_backend {
            StoreBackend::Supabase => (
                required("SUPABASE_URL")?,
                required("SUPABASE_SERVICE_ROLE_KEY")?,
            ),
            StoreBackend::Memory => (
                env::var("SUPABASE_URL").unwrap_or_else(|_| "http://localhost:54321".to_string()),
                env::var("SUPABASE_SERVICE_ROLE_KEY").unwrap_or_default(),
            ),
        };

        let mass_email_batch_size = env::var("MASS_EMAIL_BATCH_SIZE")
            .unwrap_or_else(|_| "50".to_string())
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::InvalidBatchSize)?;

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            admin_access_key: env::var("ADMIN_ACCESS_KEY")
                .unwrap_or_else(|_| DEFAULT_ADMIN_KEY.to_string()),
            store_backend,
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            supabase_service_key,
            gallery_bucket: env::var("GALLERY_BUCKET").unwrap_or_else(|_| "gallery".to_string()),
            resend_api_key: required("RESEND_API_KEY")?,
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "AI Social Klub <onboarding@resend.dev>".to_string()),
            mail_placeholder_to: env::var("MAIL_PLACEHOLDER_TO")
                .unwrap_or_else(|_| "noreply@aisocialklub.com".to_string()),
            rsvp_notify_email: env::var("RSVP_NOTIFY_EMAIL")
                .unwrap_or_else(|_| "admin@yourdomain.com".to_string()),
            mass_email_batch_size,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn uses_default_admin_key(&self) -> bool {
        self.admin_access_key == DEFAULT_ADMIN_KEY
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server port")]
    InvalidPort,
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
    #[error("MASS_EMAIL_BATCH_SIZE must be a positive integer")]
    InvalidBatchSize,
    #[error("Unknown STORE_BACKEND '{0}' (expected 'supabase' or 'memory')")]
    InvalidStoreBackend(String),
}
