use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

pub mod accounts;
pub mod catalog;
pub mod favorites;
pub mod watches;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
