//! Fakes for the store, storage and mail seams, with call counters.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{Config, StoreBackend};
use crate::mail::{EmailSender, MailError, OutgoingEmail};
use crate::state::AppState;
use crate::storage::{ObjectStorage, SignedUpload, StorageError};
use crate::store::{MemoryStore, Query, Store, StoreError, StoreResult, Table};

pub const TEST_ADMIN_KEY: &str = "test-admin-key";

pub fn test_config() -> Config {
    Config {
        server_host: "localhost".to_string(),
        server_port: 8080,
        admin_access_key: TEST_ADMIN_KEY.to_string(),
        store_backend: StoreBackend::Memory,
        supabase_url: "http://localhost:54321".to_string(),
        supabase_service_key: String::new(),
        gallery_bucket: "gallery".to_string(),
        resend_api_key: "re_test".to_string(),
        mail_from: "AI Social Klub <onboarding@resend.dev>".to_string(),
        mail_placeholder_to: "noreply@aisocialklub.com".to_string(),
        rsvp_notify_email: "ops@example.com".to_string(),
        mass_email_batch_size: 50,
    }
}

/// Memory store that counts every trait call and can fail on demand
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
    fail_next: Mutex<Option<String>>,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Insert a row without counting it as a call
    pub async fn seed(&self, table: Table, row: Value) {
        self.inner.insert(table, row).await.unwrap();
    }

    pub fn fail_next(&self, message: &str) {
        *self.fail_next.lock().unwrap() = Some(message.to_string());
    }

    fn enter(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_next.lock().unwrap().take() {
            Some(message) => Err(StoreError::Api {
                status: 503,
                code: None,
                message,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Store for CountingStore {
    async fn select(&self, table: Table, query: Query) -> StoreResult<Vec<Value>> {
        self.enter()?;
        self.inner.select(table, query).await
    }

    async fn insert(&self, table: Table, row: Value) -> StoreResult<Value> {
        self.enter()?;
        self.inner.insert(table, row).await
    }

    async fn update(&self, table: Table, id: &str, patch: Value) -> StoreResult<Vec<Value>> {
        self.enter()?;
        self.inner.update(table, id, patch).await
    }

    async fn delete(&self, table: Table, id: &str) -> StoreResult<()> {
        self.enter()?;
        self.inner.delete(table, id).await
    }

    async fn health_check(&self) -> StoreResult<bool> {
        self.inner.health_check().await
    }
}

/// Records every email; optionally fails the n-th attempt (1-based)
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<OutgoingEmail>>,
    attempts: AtomicUsize,
    fail_on: Option<usize>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(attempt: usize) -> Self {
        Self {
            fail_on: Some(attempt),
            ..Self::default()
        }
    }

    pub fn failing_always() -> Self {
        Self {
            fail_on: Some(0),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on == Some(0) || self.fail_on == Some(attempt) {
            return Err(MailError::Provider {
                status: 429,
                body: "rate limit exceeded".to_string(),
            });
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeStorage {
    calls: AtomicUsize,
}

impl FakeStorage {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn create_signed_upload(&self, path: &str) -> Result<SignedUpload, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(SignedUpload {
            signed_url: format!("https://storage.test/upload/sign/gallery/{path}?token=tok"),
            token: Some("tok".to_string()),
        })
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://storage.test/public/gallery/{path}")
    }
}

pub struct TestHarness {
    pub state: AppState,
    pub store: Arc<CountingStore>,
    pub sender: Arc<RecordingSender>,
    pub storage: Arc<FakeStorage>,
}

pub fn test_state() -> TestHarness {
    test_state_with_sender(RecordingSender::new())
}

pub fn test_state_with_sender(sender: RecordingSender) -> TestHarness {
    let store = Arc::new(CountingStore::default());
    let sender = Arc::new(sender);
    let storage = Arc::new(FakeStorage::default());

    let state = AppState::new(test_config(), store.clone(), storage.clone(), sender.clone());

    TestHarness {
        state,
        store,
        sender,
        storage,
    }
}
