use super::dto::{CreateJobRequest, DubbingJobResponse, ListJobsQuery};
use super::service::DubbingService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    Json,
    body::Body,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tokio_util::io::ReaderStream;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Create a dubbing job and start processing it
///
/// Returns as soon as the job is queued; poll `GET /api/v1/jobs/{id}` for progress.
#[utoipa::path(
    post,
    path = "/api/v1/jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 202, description = "Job accepted", body = ApiResponse<DubbingJobResponse>),
        (status = 404, description = "Video or language not found"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Dubbing"
)]
pub async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<CreateJobRequest>,
) -> impl IntoResponse {
    let job = match DubbingService::create_job(
        state.store.as_ref(),
        payload.source_video_id,
        payload.target_language_id,
    )
    .await
    {
        Ok(job) => job,
        Err(e) => {
            return ApiError::from_anyhow(e, StatusCode::INTERNAL_SERVER_ERROR).into_response();
        }
    };

    let handle = DubbingService::submit(&state.dispatcher, job.id).await;
    tokio::spawn(async move {
        let job_id = handle.job_id();
        if handle.await {
            info!("Dubbing job {} finished", job_id);
        } else {
            warn!("Dubbing job {} did not complete", job_id);
        }
    });

    match DubbingService::get_job(state.store.as_ref(), job.id).await {
        Some(record) => ApiSuccess(
            ApiResponse::success(DubbingJobResponse::from(record), "Dubbing job accepted"),
            StatusCode::ACCEPTED,
        )
        .into_response(),
        None => ApiError(
            "Dubbing job was created but could not be read back".to_string(),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .into_response(),
    }
}

/// List dubbing jobs, newest first
#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    params(ListJobsQuery),
    responses(
        (status = 200, description = "List of jobs", body = ApiResponse<Vec<DubbingJobResponse>>)
    ),
    tag = "Dubbing"
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<ListJobsQuery>,
) -> impl IntoResponse {
    let jobs: Vec<DubbingJobResponse> = DubbingService::list_jobs(state.store.as_ref(), query.video_id)
        .await
        .into_iter()
        .map(DubbingJobResponse::from)
        .collect();

    ApiSuccess(
        ApiResponse::success(jobs, "Dubbing jobs retrieved successfully"),
        StatusCode::OK,
    )
}

/// Get dubbing job status
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Dubbing job ID")
    ),
    responses(
        (status = 200, description = "Job details", body = ApiResponse<DubbingJobResponse>),
        (status = 404, description = "Job not found")
    ),
    tag = "Dubbing"
)]
pub async fn get_job(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match DubbingService::get_job(state.store.as_ref(), id).await {
        Some(record) => ApiSuccess(
            ApiResponse::success(DubbingJobResponse::from(record), "Dubbing job retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        None => ApiError::not_found("Dubbing job not found").into_response(),
    }
}

/// Download the dubbed video
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}/output",
    params(
        ("id" = Uuid, Path, description = "Dubbing job ID")
    ),
    responses(
        (status = 200, description = "Dubbed video file"),
        (status = 404, description = "No output available")
    ),
    tag = "Dubbing"
)]
pub async fn download_output(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let Some(path) = DubbingService::output_path(state.store.as_ref(), id).await else {
        return ApiError::not_found("Dubbed video not available").into_response();
    };

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to open {}: {}", path.display(), e);
            return ApiError::not_found("Dubbed video not available").into_response();
        }
    };
    let length = file.metadata().await.map(|m| m.len()).ok();

    let content_type = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .to_string();
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}.mp4", id));

    let mut builder = axum::response::Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        );
    if let Some(length) = length {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }

    match builder.body(Body::from_stream(ReaderStream::new(file))) {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to build download response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
