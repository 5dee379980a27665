use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::DubbingError;

#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            status: "error".to_string(),
            message: message.to_string(),
            data: None,
        }
    }
}

pub struct ApiSuccess<T>(pub T, pub StatusCode);

impl<T> IntoResponse for ApiSuccess<ApiResponse<T>>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        let (response, status) = (self.0, self.1);
        (status, Json(response)).into_response()
    }
}

pub struct ApiError(pub String, pub StatusCode);

impl ApiError {
    pub fn not_found(message: &str) -> Self {
        Self(message.to_string(), StatusCode::NOT_FOUND)
    }

    /// Unresolved references become 404, anything else `fallback`.
    pub fn from_anyhow(err: anyhow::Error, fallback: StatusCode) -> Self {
        let status = match err.downcast_ref::<DubbingError>() {
            Some(DubbingError::Reference { .. }) => StatusCode::NOT_FOUND,
            _ => fallback,
        };
        Self(err.to_string(), status)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (message, status) = (self.0, self.1);
        let response = ApiResponse::<()>::error(&message);
        (status, Json(response)).into_response()
    }
}
