//! Admin gateway: shared-secret check, then dispatch on a closed set of actions.

pub mod csv;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{
    DrinkPatch, EventPatch, Identified, NewDrink, NewEvent, NewGalleryImage, RecordId, Success,
    UploadTicket, UploadUrlRequest,
};
use crate::security::generate_storage_key;
use crate::state::AppState;

/// Action tags accepted by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    GetRsvps,
    GetSubscribers,
    ExportCsv,
    GetEvents,
    CreateEvent,
    UpdateEvent,
    DeleteEvent,
    GetGallery,
    CreateGalleryImage,
    DeleteGalleryImage,
    GetDrinks,
    CreateDrink,
    UpdateDrink,
    DeleteDrink,
    GetUploadUrl,
}

impl ActionKind {
    /// Unknown tags are `InvalidAction`
    pub fn parse(tag: &str) -> Result<Self> {
        serde_json::from_value(Value::String(tag.to_string())).map_err(|_| AppError::InvalidAction)
    }
}

/// A fully parsed admin action with its typed payload
#[derive(Debug, Clone)]
pub enum AdminAction {
    GetRsvps,
    GetSubscribers,
    ExportCsv,
    GetEvents,
    CreateEvent(NewEvent),
    UpdateEvent(Identified<EventPatch>),
    DeleteEvent(RecordId),
    GetGallery,
    CreateGalleryImage(NewGalleryImage),
    DeleteGalleryImage(RecordId),
    GetDrinks,
    CreateDrink(NewDrink),
    UpdateDrink(Identified<DrinkPatch>),
    DeleteDrink(RecordId),
    GetUploadUrl(UploadUrlRequest),
}

fn payload<T: DeserializeOwned>(data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| AppError::BadRequest(format!("Invalid data: {}", e)))
}

impl AdminAction {
    pub fn from_parts(kind: ActionKind, data: Value) -> Result<Self> {
        Ok(match kind {
            ActionKind::GetRsvps => AdminAction::GetRsvps,
            ActionKind::GetSubscribers => AdminAction::GetSubscribers,
            ActionKind::ExportCsv => AdminAction::ExportCsv,
            ActionKind::GetEvents => AdminAction::GetEvents,
            ActionKind::CreateEvent => AdminAction::CreateEvent(payload(data)?),
            ActionKind::UpdateEvent => AdminAction::UpdateEvent(payload(data)?),
            ActionKind::DeleteEvent => AdminAction::DeleteEvent(payload(data)?),
            ActionKind::GetGallery => AdminAction::GetGallery,
            ActionKind::CreateGalleryImage => AdminAction::CreateGalleryImage(payload(data)?),
            ActionKind::DeleteGalleryImage => AdminAction::DeleteGalleryImage(payload(data)?),
            ActionKind::GetDrinks => AdminAction::GetDrinks,
            ActionKind::CreateDrink => AdminAction::CreateDrink(payload(data)?),
            ActionKind::UpdateDrink => AdminAction::UpdateDrink(payload(data)?),
            ActionKind::DeleteDrink => AdminAction::DeleteDrink(payload(data)?),
            ActionKind::GetUploadUrl => AdminAction::GetUploadUrl(payload(data)?),
        })
    }

    /// Parse `{ action, data? }` out of a request body
    pub fn from_body(body: &Value) -> Result<Self> {
        let tag = body
            .get("action")
            .and_then(Value::as_str)
            .ok_or(AppError::InvalidAction)?;
        let kind = ActionKind::parse(tag)?;
        let data = body.get("data").cloned().unwrap_or(Value::Null);
        Self::from_parts(kind, data)
    }

    pub fn name(&self) -> &'static str {
        match self {
            AdminAction::GetRsvps => "getRsvps",
            AdminAction::GetSubscribers => "getSubscribers",
            AdminAction::ExportCsv => "exportCsv",
            AdminAction::GetEvents => "getEvents",
            AdminAction::CreateEvent(_) => "createEvent",
            AdminAction::UpdateEvent(_) => "updateEvent",
            AdminAction::DeleteEvent(_) => "deleteEvent",
            AdminAction::GetGallery => "getGallery",
            AdminAction::CreateGalleryImage(_) => "createGalleryImage",
            AdminAction::DeleteGalleryImage(_) => "deleteGalleryImage",
            AdminAction::GetDrinks => "getDrinks",
            AdminAction::CreateDrink(_) => "createDrink",
            AdminAction::UpdateDrink(_) => "updateDrink",
            AdminAction::DeleteDrink(_) => "deleteDrink",
            AdminAction::GetUploadUrl(_) => "getUploadUrl",
        }
    }
}

/// The admin key as presented in a request body, if any
pub fn presented_key(body: &Value) -> Option<&str> {
    body.get("adminKey").and_then(Value::as_str)
}

/// Authenticate, parse and run one admin request.
///
/// The key is checked before the action tag is looked at, so an unauthorized
/// caller learns nothing about the action vocabulary.
pub async fn handle(state: &AppState, body: &Value) -> Result<Value> {
    state.guard.verify(presented_key(body))?;

    let action = AdminAction::from_body(body)?;
    tracing::info!(action = action.name(), "Admin action");

    execute(state, action).await
}

/// Run an already authorized action. Each arm is one store round trip,
/// except `exportCsv` (two reads) and `getUploadUrl` (one storage call).
pub async fn execute(state: &AppState, action: AdminAction) -> Result<Value> {
    let repo = &state.repo;

    let response = match action {
        AdminAction::GetRsvps => json!({ "rsvps": repo.list_rsvps().await? }),
        AdminAction::GetSubscribers => json!({ "subscribers": repo.list_subscribers().await? }),
        AdminAction::ExportCsv => {
            let rsvps = repo.list_rsvps().await?;
            let subscribers = repo.list_subscribers().await?;
            json!({
                "rsvpCsv": csv::rsvps_csv(&rsvps),
                "subscriberCsv": csv::subscribers_csv(&subscribers),
            })
        }

        AdminAction::GetEvents => json!({ "events": repo.list_events().await? }),
        AdminAction::CreateEvent(event) => json!({ "event": repo.create_event(&event).await? }),
        AdminAction::UpdateEvent(update) => {
            json!({ "event": repo.update_event(update.id, &update.changes).await? })
        }
        AdminAction::DeleteEvent(target) => {
            repo.delete_event(target.id).await?;
            json!(Success::ok())
        }

        AdminAction::GetGallery => json!({ "images": repo.list_gallery().await? }),
        AdminAction::CreateGalleryImage(image) => {
            json!({ "image": repo.create_gallery_image(&image).await? })
        }
        AdminAction::DeleteGalleryImage(target) => {
            repo.delete_gallery_image(target.id).await?;
            json!(Success::ok())
        }

        AdminAction::GetDrinks => json!({ "drinks": repo.list_drinks().await? }),
        AdminAction::CreateDrink(drink) => {
            drink.validate()?;
            json!({ "drink": repo.create_drink(&drink).await? })
        }
        AdminAction::UpdateDrink(update) => {
            update.changes.validate()?;
            json!({ "drink": repo.update_drink(update.id, &update.changes).await? })
        }
        AdminAction::DeleteDrink(target) => {
            repo.delete_drink(target.id).await?;
            json!(Success::ok())
        }

        AdminAction::GetUploadUrl(request) => json!(issue_upload_ticket(state, &request).await?),
    };

    Ok(response)
}

/// First half of the two-phase gallery upload: hand out a signed upload URL
/// plus the public URL to register afterwards with `createGalleryImage`.
async fn issue_upload_ticket(state: &AppState, request: &UploadUrlRequest) -> Result<UploadTicket> {
    let file_name = request.file_name.trim();
    if file_name.is_empty() {
        return Err(AppError::BadRequest("fileName is required".to_string()));
    }

    let path = generate_storage_key(file_name, Utc::now().timestamp_millis());
    let upload = state.storage.create_signed_upload(&path).await?;
    let public_url = state.storage.public_url(&path);

    tracing::info!(path = %path, "Upload URL issued");

    Ok(UploadTicket {
        signed_url: upload.signed_url,
        token: upload.token,
        path,
        public_url,
    })
}
