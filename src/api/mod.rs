pub mod admin;
pub mod extract;
pub mod health;
pub mod mass_email;
pub mod newsletter;
pub mod public;
pub mod rsvp;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::HeaderName;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/functions/v1", function_routes())
        .nest("/api", public_routes())
        .merge(health::health_routes())
        .layer(cors_layer())
        .with_state(state)
}

/// Dashboard and notifier endpoints
fn function_routes() -> Router<AppState> {
    Router::new()
        .merge(admin::admin_routes())
        .merge(mass_email::mass_email_routes())
        .merge(rsvp::notifier_routes())
}

/// Website-facing endpoints
fn public_routes() -> Router<AppState> {
    Router::new()
        .merge(rsvp::rsvp_routes())
        .merge(newsletter::newsletter_routes())
        .merge(public::listing_routes())
}

/// Open to any origin; pre-flight requests are answered by the layer itself.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::test_support::test_state;

    pub async fn call(router: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// POST a raw body, optionally without a content type
    pub async fn call_raw(
        router: Router,
        uri: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(Method::POST).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_preflight_returns_cors_headers() {
        let router = create_router(test_state().state);

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/functions/v1/admin-api")
            .header("origin", "https://aisocialklub.com")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type, apikey")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }
}
