use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Drink, Event, EventWindow, GalleryImage};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize)]
pub struct GalleryResponse {
    pub images: Vec<GalleryImage>,
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse {
    pub drinks: Vec<Drink>,
}

#[derive(Debug, Deserialize)]
struct EventsQuery {
    #[serde(default)]
    when: EventWindow,
}

/// Read-only listings for the website
pub fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/gallery", get(list_gallery))
        .route("/drinks", get(list_drinks))
}

/// Split active events around `now`; past events come back most recent first.
pub fn select_window(events: Vec<Event>, window: EventWindow, now: chrono::DateTime<Utc>) -> Vec<Event> {
    match window {
        EventWindow::All => events,
        EventWindow::Upcoming => events.into_iter().filter(|e| e.is_upcoming(now)).collect(),
        EventWindow::Past => events
            .into_iter()
            .rev()
            .filter(|e| !e.is_upcoming(now))
            .collect(),
    }
}

/// GET /api/events?when=upcoming|past|all
async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<EventsResponse>> {
    let events = state.repo.list_active_events().await?;
    Ok(Json(EventsResponse {
        events: select_window(events, query.when, Utc::now()),
    }))
}

/// GET /api/gallery
async fn list_gallery(State(state): State<AppState>) -> Result<Json<GalleryResponse>> {
    Ok(Json(GalleryResponse {
        images: state.repo.list_active_gallery().await?,
    }))
}

/// GET /api/drinks
async fn list_drinks(State(state): State<AppState>) -> Result<Json<DrinksResponse>> {
    Ok(Json(DrinksResponse {
        drinks: state.repo.list_available_drinks().await?,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::api::create_router;
    use crate::api::tests::call;
    use crate::store::Table;
    use crate::test_support::test_state;

    fn titles(body: &serde_json::Value) -> Vec<String> {
        body["events"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_events_split_by_now() {
        let harness = test_state();
        let now = chrono::Utc::now();
        for (title, offset, active) in [
            ("Long ago", -30, true),
            ("Last week", -7, true),
            ("Hidden", 3, false),
            ("Next week", 7, true),
        ] {
            harness
                .store
                .seed(Table::Events, json!({
                    "title": title,
                    "event_date": now + Duration::days(offset),
                    "is_active": active,
                }))
                .await;
        }
        let router = create_router(harness.state.clone());

        let (status, body) = call(router.clone(), Method::GET, "/api/events?when=upcoming", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&body), vec!["Next week"]);

        let (_, body) = call(router.clone(), Method::GET, "/api/events?when=past", None).await;
        assert_eq!(titles(&body), vec!["Last week", "Long ago"]);

        let (_, body) = call(router, Method::GET, "/api/events", None).await;
        assert_eq!(titles(&body), vec!["Long ago", "Last week", "Next week"]);
    }

    #[tokio::test]
    async fn test_only_available_drinks_listed() {
        let harness = test_state();
        harness
            .store
            .seed(Table::DrinkMenu, json!({ "name": "Stout", "price": 8, "category": "beer", "display_order": 2 }))
            .await;
        harness
            .store
            .seed(Table::DrinkMenu, json!({ "name": "Cider", "price": 7, "category": "beer", "is_available": false }))
            .await;
        harness
            .store
            .seed(Table::DrinkMenu, json!({ "name": "Lager", "price": 6, "category": "beer", "display_order": 1 }))
            .await;

        let (status, body) = call(create_router(harness.state.clone()), Method::GET, "/api/drinks", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body["drinks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Lager", "Stout"]);
    }

    #[tokio::test]
    async fn test_gallery_lists_active_images() {
        let harness = test_state();
        harness
            .store
            .seed(Table::GalleryImages, json!({ "image_url": "https://cdn/a.png", "display_order": 1 }))
            .await;
        harness
            .store
            .seed(Table::GalleryImages, json!({ "image_url": "https://cdn/b.png", "is_active": false }))
            .await;

        let (_, body) = call(create_router(harness.state.clone()), Method::GET, "/api/gallery", None).await;
        assert_eq!(body["images"].as_array().unwrap().len(), 1);
        assert_eq!(body["images"][0]["image_url"], json!("https://cdn/a.png"));
    }
}
