use super::dto::LanguageResponse;
use super::service::LanguageService;
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

/// List active languages
#[utoipa::path(
    get,
    path = "/api/v1/languages",
    responses(
        (status = 200, description = "Active languages", body = ApiResponse<Vec<LanguageResponse>>)
    ),
    tag = "Languages"
)]
pub async fn list_languages(State(state): State<AppState>) -> impl IntoResponse {
    let languages: Vec<LanguageResponse> = LanguageService::languages(state.store.as_ref())
        .await
        .into_iter()
        .map(LanguageResponse::from)
        .collect();

    ApiSuccess(
        ApiResponse::success(languages, "Languages retrieved successfully"),
        StatusCode::OK,
    )
}

/// List languages a video in the given language can be dubbed into
#[utoipa::path(
    get,
    path = "/api/v1/languages/{id}/targets",
    params(
        ("id" = Uuid, Path, description = "Source language ID")
    ),
    responses(
        (status = 200, description = "Target languages", body = ApiResponse<Vec<LanguageResponse>>)
    ),
    tag = "Languages"
)]
pub async fn list_target_languages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let languages: Vec<LanguageResponse> =
        LanguageService::target_languages(state.store.as_ref(), id)
            .await
            .into_iter()
            .map(LanguageResponse::from)
            .collect();

    ApiSuccess(
        ApiResponse::success(languages, "Target languages retrieved successfully"),
        StatusCode::OK,
    )
}
