use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use super::model::Video;
use crate::common::format::{format_duration, format_file_size};

#[derive(Debug, Serialize, ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    pub filename: String,
    pub original_filename: String,
    pub file_size: i64,
    pub file_size_display: String,
    /// Seconds with two decimals, e.g. `"12.30"`.
    pub duration: Option<String>,
    pub duration_display: Option<String>,
    pub mime_type: String,
    pub source_language_id: Uuid,
    #[schema(value_type = String, format = DateTime)]
    #[serde(with = "time::serde::iso8601")]
    pub uploaded_at: OffsetDateTime,
}

impl From<Video> for VideoResponse {
    fn from(v: Video) -> Self {
        Self {
            duration: v.duration_seconds(),
            duration_display: v.duration_centis.map(format_duration),
            file_size_display: format_file_size(v.file_size),
            id: v.id,
            filename: v.filename,
            original_filename: v.original_filename,
            file_size: v.file_size,
            mime_type: v.mime_type,
            source_language_id: v.source_language_id,
            uploaded_at: v.uploaded_at,
        }
    }
}
