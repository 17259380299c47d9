pub mod memory;
pub mod postgrest;
pub mod venue_repository;

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;
pub use venue_repository::*;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{Config, StoreBackend};

/// Tables owned by the managed data store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Rsvps,
    NewsletterSubscribers,
    Events,
    GalleryImages,
    DrinkMenu,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Rsvps => "rsvps",
            Table::NewsletterSubscribers => "newsletter_subscribers",
            Table::Events => "events",
            Table::GalleryImages => "gallery_images",
            Table::DrinkMenu => "drink_menu",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

/// A single-table select: projection, equality filters and one sort key
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub columns: Option<&'static str>,
    pub filters: Vec<(&'static str, Value)>,
    pub order: Option<Order>,
}

impl Query {
    pub fn all() -> Self {
        Self {
            columns: None,
            filters: Vec::new(),
            order: None,
        }
    }

    /// Comma separated column list, `*` when unset
    pub fn columns(mut self, columns: &'static str) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.filters.push((column, value.into()));
        self
    }

    pub fn asc(mut self, column: &'static str) -> Self {
        self.order = Some(Order {
            column,
            ascending: true,
        });
        self
    }

    pub fn desc(mut self, column: &'static str) -> Self {
        self.order = Some(Order {
            column,
            ascending: false,
        });
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    UniqueViolation(String),

    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected row shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Store returned no row")]
    EmptyResult,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Row-level access to the managed data store.
///
/// Each method is exactly one round trip to the store. Update and delete do
/// not pre-check existence: an unknown id yields an empty update result and a
/// successful delete, whatever the store does.
#[async_trait]
pub trait Store: Send + Sync {
    async fn select(&self, table: Table, query: Query) -> StoreResult<Vec<Value>>;

    /// Insert one row and return it as stored (generated id, defaults)
    async fn insert(&self, table: Table, row: Value) -> StoreResult<Value>;

    /// Apply `patch` to the row with `id`, returning the affected rows
    async fn update(&self, table: Table, id: &str, patch: Value) -> StoreResult<Vec<Value>>;

    async fn delete(&self, table: Table, id: &str) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<bool>;
}

/// Build the configured store backend
pub fn create_store(config: &Config) -> Arc<dyn Store> {
    match config.store_backend {
        StoreBackend::Supabase => Arc::new(PostgrestStore::new(config)),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    }
}
