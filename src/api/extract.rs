use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, Result};

/// JSON body whose rejections are `AppError`s, so a bad body still answers
/// with an `{error}` object. The content type is not checked.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        Ok(JsonBody(serde_json::from_slice(&bytes)?))
    }
}

/// Body of a key-gated endpoint, never rejected.
///
/// Anything that is not JSON reads as `null`, which carries no `adminKey`, so
/// the handler's key check answers 401 before any payload is interpreted.
#[derive(Debug, Clone)]
pub struct GatedBody(pub Value);

impl<S> FromRequest<S> for GatedBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let value = match Bytes::from_request(req, state).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or(Value::Null),
            Err(e) => {
                tracing::debug!(error = %e, "Unreadable request body");
                Value::Null
            }
        };

        Ok(GatedBody(value))
    }
}
