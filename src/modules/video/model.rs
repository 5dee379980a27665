use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// An uploaded source video. Never mutated after insert.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, ToSchema, PartialEq, Eq)]
pub struct Video {
    pub id: Uuid,
    pub filename: String,
    pub original_filename: String,
    pub file_path: String,
    pub file_size: i64,
    /// Duration in hundredths of a second.
    pub duration_centis: Option<i64>,
    pub mime_type: String,
    pub source_language_id: Uuid,
    #[schema(value_type = String, format = DateTime)]
    #[serde(with = "time::serde::iso8601")]
    pub uploaded_at: OffsetDateTime,
}

impl Video {
    /// Duration as fixed-point seconds, e.g. `12.30`.
    pub fn duration_seconds(&self) -> Option<String> {
        self.duration_centis
            .map(|c| format!("{}.{:02}", c / 100, c % 100))
    }
}

/// Fields supplied by the caller when registering an upload.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub filename: String,
    pub original_filename: String,
    pub file_path: String,
    pub file_size: i64,
    pub duration_centis: Option<i64>,
    pub mime_type: String,
    pub source_language_id: Uuid,
}
