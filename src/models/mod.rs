pub mod drink;
pub mod event;
pub mod gallery;
pub mod rsvp;
pub mod subscriber;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use drink::{Drink, DrinkPatch, NewDrink};
pub use event::{Event, EventPatch, EventWindow, NewEvent};
pub use gallery::{GalleryImage, NewGalleryImage, UploadTicket, UploadUrlRequest};
pub use rsvp::{Rsvp, RsvpForm};
pub use subscriber::{NewsletterSignup, Subscriber};

/// `{ id }` payload of the delete actions
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RecordId {
    pub id: Uuid,
}

/// `{ id, ...changes }` payload of the update actions
#[derive(Debug, Clone, Deserialize)]
pub struct Identified<T> {
    pub id: Uuid,
    #[serde(flatten)]
    pub changes: T,
}

/// Generic `{ success: true }` acknowledgement
#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
