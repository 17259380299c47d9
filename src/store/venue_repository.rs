use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::{Query, Store, StoreError, StoreResult, Table};
use crate::error::{AppError, Result};
use crate::models::{
    Drink, DrinkPatch, Event, EventPatch, GalleryImage, NewDrink, NewEvent, NewGalleryImage, Rsvp,
    RsvpForm, Subscriber,
};

/// Typed access to the venue tables on top of a [`Store`]
#[derive(Clone)]
pub struct VenueRepository {
    store: Arc<dyn Store>,
}

fn decode<T: DeserializeOwned>(row: Value) -> StoreResult<T> {
    Ok(serde_json::from_value(row)?)
}

fn decode_all<T: DeserializeOwned>(rows: Vec<Value>) -> StoreResult<Vec<T>> {
    rows.into_iter().map(decode).collect()
}

fn encode<T: Serialize>(value: &T) -> StoreResult<Value> {
    Ok(serde_json::to_value(value)?)
}

impl VenueRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn health_check(&self) -> StoreResult<bool> {
        self.store.health_check().await
    }

    async fn list<T: DeserializeOwned>(&self, table: Table, query: Query) -> StoreResult<Vec<T>> {
        decode_all(self.store.select(table, query).await?)
    }

    async fn create<T: DeserializeOwned, N: Serialize>(&self, table: Table, new: &N) -> StoreResult<T> {
        decode(self.store.insert(table, encode(new)?).await?)
    }

    async fn update<T: DeserializeOwned, P: Serialize>(
        &self,
        table: Table,
        id: Uuid,
        patch: &P,
    ) -> StoreResult<Option<T>> {
        let rows = self
            .store
            .update(table, &id.to_string(), encode(patch)?)
            .await?;
        rows.into_iter().next().map(decode).transpose()
    }

    async fn delete(&self, table: Table, id: Uuid) -> StoreResult<()> {
        self.store.delete(table, &id.to_string()).await
    }

    // ==================== RSVPs ====================

    pub async fn list_rsvps(&self) -> StoreResult<Vec<Rsvp>> {
        self.list(Table::Rsvps, Query::all().desc("created_at")).await
    }

    pub async fn rsvp_emails(&self) -> StoreResult<Vec<String>> {
        self.emails(Table::Rsvps).await
    }

    /// Persist a validated RSVP form
    pub async fn create_rsvp(&self, form: &RsvpForm) -> StoreResult<Rsvp> {
        self.create(Table::Rsvps, form).await
    }

    // ==================== Newsletter ====================

    pub async fn list_subscribers(&self) -> StoreResult<Vec<Subscriber>> {
        self.list(Table::NewsletterSubscribers, Query::all().desc("created_at"))
            .await
    }

    pub async fn subscriber_emails(&self) -> StoreResult<Vec<String>> {
        self.emails(Table::NewsletterSubscribers).await
    }

    /// Insert a subscriber; a duplicate email surfaces as `Conflict`
    pub async fn subscribe(&self, email: &str) -> Result<Subscriber> {
        self.create(
            Table::NewsletterSubscribers,
            &serde_json::json!({ "email": email }),
        )
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation(_) => AppError::Conflict("Already subscribed".to_string()),
            other => other.into(),
        })
    }

    async fn emails(&self, table: Table) -> StoreResult<Vec<String>> {
        let rows = self.store.select(table, Query::all().columns("email")).await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get("email").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }

    // ==================== Events ====================

    pub async fn list_events(&self) -> StoreResult<Vec<Event>> {
        self.list(Table::Events, Query::all().asc("event_date")).await
    }

    pub async fn list_active_events(&self) -> StoreResult<Vec<Event>> {
        self.list(
            Table::Events,
            Query::all().eq("is_active", true).asc("event_date"),
        )
        .await
    }

    pub async fn create_event(&self, event: &NewEvent) -> StoreResult<Event> {
        self.create(Table::Events, event).await
    }

    pub async fn update_event(&self, id: Uuid, patch: &EventPatch) -> StoreResult<Option<Event>> {
        self.update(Table::Events, id, patch).await
    }

    pub async fn delete_event(&self, id: Uuid) -> StoreResult<()> {
        self.delete(Table::Events, id).await
    }

    // ==================== Gallery ====================

    pub async fn list_gallery(&self) -> StoreResult<Vec<GalleryImage>> {
        self.list(Table::GalleryImages, Query::all().asc("display_order"))
            .await
    }

    pub async fn list_active_gallery(&self) -> StoreResult<Vec<GalleryImage>> {
        self.list(
            Table::GalleryImages,
            Query::all().eq("is_active", true).asc("display_order"),
        )
        .await
    }

    pub async fn create_gallery_image(&self, image: &NewGalleryImage) -> StoreResult<GalleryImage> {
        self.create(Table::GalleryImages, image).await
    }

    pub async fn delete_gallery_image(&self, id: Uuid) -> StoreResult<()> {
        self.delete(Table::GalleryImages, id).await
    }

    // ==================== Drinks ====================

    pub async fn list_drinks(&self) -> StoreResult<Vec<Drink>> {
        self.list(Table::DrinkMenu, Query::all().asc("display_order"))
            .await
    }

    pub async fn list_available_drinks(&self) -> StoreResult<Vec<Drink>> {
        self.list(
            Table::DrinkMenu,
            Query::all().eq("is_available", true).asc("display_order"),
        )
        .await
    }

    pub async fn create_drink(&self, drink: &NewDrink) -> StoreResult<Drink> {
        self.create(Table::DrinkMenu, drink).await
    }

    pub async fn update_drink(&self, id: Uuid, patch: &DrinkPatch) -> StoreResult<Option<Drink>> {
        self.update(Table::DrinkMenu, id, patch).await
    }

    pub async fn delete_drink(&self, id: Uuid) -> StoreResult<()> {
        self.delete(Table::DrinkMenu, id).await
    }
}
