pub mod products;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use chrono::{Local, Utc};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::AppError;

/// `Json` extractor whose rejections use the service's error body.
///
/// A request without a JSON content type is read as an empty payload
/// (`T::default()`), so a bodyless PUT changes nothing and a bodyless POST
/// fails name validation.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::MissingJsonContentType(_)) => Ok(Self(T::default())),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

// ── Health ───────────────────────────────────────────────────────────────────

pub async fn root() -> &'static str {
    "Server is running"
}

pub async fn hello() -> Json<serde_json::Value> {
    Json(json!({ "message": "Hello from server!" }))
}

pub async fn time() -> Json<serde_json::Value> {
    Json(json!({
        "serverTime": Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        "timestamp": Utc::now().timestamp_millis(),
    }))
}

pub async fn status() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "OK", "message": "Server is healthy" })),
    )
}
