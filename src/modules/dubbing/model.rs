use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::language::model::Language;
use crate::modules::video::model::Video;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DubbingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl DubbingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DubbingStatus::Pending => "pending",
            DubbingStatus::Processing => "processing",
            DubbingStatus::Completed => "completed",
            DubbingStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DubbingStatus::Completed | DubbingStatus::Failed)
    }
}

impl fmt::Display for DubbingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown dubbing status '{0}'")]
pub struct UnknownStatus(String);

impl FromStr for DubbingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DubbingStatus::Pending),
            "processing" => Ok(DubbingStatus::Processing),
            "completed" => Ok(DubbingStatus::Completed),
            "failed" => Ok(DubbingStatus::Failed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for DubbingStatus {
    type Error = UnknownStatus;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, ToSchema, PartialEq, Eq)]
pub struct DubbingJob {
    pub id: Uuid,
    pub source_video_id: Uuid,
    pub target_language_id: Uuid,
    #[sqlx(try_from = "String")]
    pub status: DubbingStatus,
    pub output_filename: Option<String>,
    pub output_file_path: Option<String>,
    pub output_file_size: Option<i64>,
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
}

impl DubbingJob {
    pub fn pending(source_video_id: Uuid, target_language_id: Uuid) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            source_video_id,
            target_language_id,
            status: DubbingStatus::Pending,
            output_filename: None,
            output_file_path: None,
            output_file_size: None,
            processing_started_at: None,
            processing_completed_at: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The product of a completed pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutput {
    pub filename: String,
    pub file_path: String,
    pub file_size: i64,
}

/// A job together with its eagerly resolved relationships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub job: DubbingJob,
    pub source_video: Video,
    pub target_language: Language,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            DubbingStatus::Pending,
            DubbingStatus::Processing,
            DubbingStatus::Completed,
            DubbingStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<DubbingStatus>().unwrap(), status);
        }
        assert!("PROCESSING".parse::<DubbingStatus>().is_err());
    }

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(!DubbingStatus::Pending.is_terminal());
        assert!(!DubbingStatus::Processing.is_terminal());
        assert!(DubbingStatus::Completed.is_terminal());
        assert!(DubbingStatus::Failed.is_terminal());
    }

    #[test]
    fn new_jobs_start_pending_and_empty() {
        let job = DubbingJob::pending(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(job.status, DubbingStatus::Pending);
        assert!(job.output_file_path.is_none());
        assert!(job.error_message.is_none());
        assert!(job.processing_started_at.is_none());
    }
}
