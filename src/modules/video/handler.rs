use super::dto::VideoResponse;
use super::service::VideoService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::common::upload::{stream_to_disk, StoredFile};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

/// Upload a source video
/// Multipart fields: `source_language_id` (text) and `video` (file)
#[utoipa::path(
    post,
    path = "/api/v1/videos",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video stored", body = ApiResponse<VideoResponse>),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Source language not found"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Videos"
)]
pub async fn upload_video(State(state): State<AppState>, mut multipart: Multipart) -> impl IntoResponse {
    let mut source_language_id: Option<Uuid> = None;
    let mut stored: Option<StoredFile> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                discard(&stored).await;
                return ApiError(format!("Invalid multipart body: {}", e), StatusCode::BAD_REQUEST)
                    .into_response();
            }
        };

        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "source_language_id" => {
                let raw = field.text().await.unwrap_or_default();
                match raw.trim().parse::<Uuid>() {
                    Ok(id) => source_language_id = Some(id),
                    Err(_) => {
                        discard(&stored).await;
                        return ApiError(
                            "source_language_id must be a UUID".to_string(),
                            StatusCode::BAD_REQUEST,
                        )
                        .into_response();
                    }
                }
            }
            "video" if stored.is_none() => {
                let original = field.file_name().unwrap_or("video.mp4").to_string();
                info!("Starting video upload: {}", original);
                let path = VideoService::storage_path(&state, &original);
                match stream_to_disk(field, &path).await {
                    Ok(file) => stored = Some(file),
                    Err(e) => {
                        return ApiError(format!("Upload failed: {}", e), StatusCode::BAD_REQUEST)
                            .into_response();
                    }
                }
            }
            _ => {}
        }
    }

    let (Some(file), Some(language_id)) = (stored.clone(), source_language_id) else {
        discard(&stored).await;
        return ApiError(
            "Both 'video' and 'source_language_id' fields are required".to_string(),
            StatusCode::BAD_REQUEST,
        )
        .into_response();
    };

    if let Err(e) = VideoService::ensure_source_language(&state, language_id).await {
        discard(&stored).await;
        return ApiError::from_anyhow(e, StatusCode::INTERNAL_SERVER_ERROR).into_response();
    }

    match VideoService::register_upload(&state, file, language_id).await {
        Ok(video) => ApiSuccess(
            ApiResponse::success(VideoResponse::from(video), "Video uploaded successfully"),
            StatusCode::CREATED,
        )
        .into_response(),
        Err(e) => ApiError::from_anyhow(e, StatusCode::INTERNAL_SERVER_ERROR).into_response(),
    }
}

async fn discard(stored: &Option<StoredFile>) {
    if let Some(file) = stored {
        let _ = tokio::fs::remove_file(&file.path).await;
    }
}

/// List uploaded videos
#[utoipa::path(
    get,
    path = "/api/v1/videos",
    responses(
        (status = 200, description = "List of videos", body = ApiResponse<Vec<VideoResponse>>)
    ),
    tag = "Videos"
)]
pub async fn list_videos(State(state): State<AppState>) -> impl IntoResponse {
    let videos: Vec<VideoResponse> = VideoService::list(&state)
        .await
        .into_iter()
        .map(VideoResponse::from)
        .collect();

    ApiSuccess(
        ApiResponse::success(videos, "Videos retrieved successfully"),
        StatusCode::OK,
    )
}

/// Get video by ID
#[utoipa::path(
    get,
    path = "/api/v1/videos/{id}",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video details", body = ApiResponse<VideoResponse>),
        (status = 404, description = "Video not found")
    ),
    tag = "Videos"
)]
pub async fn get_video(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match VideoService::get(&state, id).await {
        Some(video) => ApiSuccess(
            ApiResponse::success(VideoResponse::from(video), "Video retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        None => ApiError::not_found("Video not found").into_response(),
    }
}
