use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Success envelope; failures use the `AppError` body with `"status": "error"`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub payload: T,
}

pub type ApiJson<T> = Json<ApiResponse<T>>;

pub fn ok<T: Serialize>(payload: T) -> ApiJson<T> {
    Json(ApiResponse {
        status: "ok",
        payload,
    })
}

pub fn created<T: Serialize>(payload: T) -> (StatusCode, ApiJson<T>) {
    (StatusCode::CREATED, ok(payload))
}
