use std::sync::Arc;

use crate::auth::AdminGuard;
use crate::config::Config;
use crate::mail::{EmailSender, Mailer};
use crate::storage::ObjectStorage;
use crate::store::{Store, VenueRepository};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub guard: Arc<AdminGuard>,
    pub repo: Arc<VenueRepository>,
    pub storage: Arc<dyn ObjectStorage>,
    pub mailer: Arc<Mailer>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn Store>,
        storage: Arc<dyn ObjectStorage>,
        sender: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            guard: Arc::new(AdminGuard::new(&config)),
            repo: Arc::new(VenueRepository::new(store)),
            storage,
            mailer: Arc::new(Mailer::new(&config, sender)),
            config: Arc::new(config),
        }
    }
}
