use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::model::{DubbingStatus, JobRecord};
use crate::common::format::format_file_size;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateJobRequest {
    pub source_video_id: Uuid,
    pub target_language_id: Uuid,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListJobsQuery {
    /// Only jobs for this source video
    pub video_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DubbingJobResponse {
    pub id: Uuid,
    pub source_video_id: Uuid,
    pub target_language_id: Uuid,
    pub status: DubbingStatus,
    pub output_filename: Option<String>,
    pub output_file_size: Option<i64>,
    pub output_file_size_display: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    #[serde(with = "time::serde::iso8601::option")]
    pub processing_started_at: Option<OffsetDateTime>,
    #[schema(value_type = Option<String>, format = DateTime)]
    #[serde(with = "time::serde::iso8601::option")]
    pub processing_completed_at: Option<OffsetDateTime>,
    pub error_message: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    #[serde(with = "time::serde::iso8601")]
    pub created_at: OffsetDateTime,
    #[schema(value_type = String, format = DateTime)]
    #[serde(with = "time::serde::iso8601")]
    pub updated_at: OffsetDateTime,
    pub source_video_filename: String,
    pub target_language_name: String,
}

impl From<JobRecord> for DubbingJobResponse {
    fn from(record: JobRecord) -> Self {
        let job = record.job;
        Self {
            id: job.id,
            source_video_id: job.source_video_id,
            target_language_id: job.target_language_id,
            status: job.status,
            output_filename: job.output_filename,
            output_file_size: job.output_file_size,
            output_file_size_display: job.output_file_size.map(format_file_size),
            processing_started_at: job.processing_started_at,
            processing_completed_at: job.processing_completed_at,
            error_message: job.error_message,
            created_at: job.created_at,
            updated_at: job.updated_at,
            source_video_filename: record.source_video.original_filename,
            target_language_name: record.target_language.name,
        }
    }
}
