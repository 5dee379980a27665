use super::model::{DubbingJob, JobOutput, JobRecord};
use crate::modules::language::model::Language;
use crate::modules::video::model::Video;
use anyhow::{anyhow, Result};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

const JOB_COLUMNS: &str = "id, source_video_id, target_language_id, status, output_filename, \
    output_file_path, output_file_size, processing_started_at, processing_completed_at, \
    error_message, created_at, updated_at";

// Job columns qualified for the joined reads, followed by the video and
// language columns under prefixed aliases.
const RECORD_SELECT: &str = r#"
    SELECT j.id, j.source_video_id, j.target_language_id, j.status, j.output_filename,
           j.output_file_path, j.output_file_size, j.processing_started_at,
           j.processing_completed_at, j.error_message, j.created_at, j.updated_at,
           v.id AS video_id, v.filename AS video_filename,
           v.original_filename AS video_original_filename, v.file_path AS video_file_path,
           v.file_size AS video_file_size, v.duration_centis AS video_duration_centis,
           v.mime_type AS video_mime_type, v.source_language_id AS video_source_language_id,
           v.uploaded_at AS video_uploaded_at,
           l.id AS language_id, l.code AS language_code, l.name AS language_name,
           l.is_active AS language_is_active
    FROM dubbing_jobs j
    JOIN videos v ON v.id = j.source_video_id
    JOIN languages l ON l.id = j.target_language_id
"#;

/// One row of `RECORD_SELECT`.
#[derive(Debug, FromRow)]
struct JobRow {
    #[sqlx(flatten)]
    job: DubbingJob,
    video_id: Uuid,
    video_filename: String,
    video_original_filename: String,
    video_file_path: String,
    video_file_size: i64,
    video_duration_centis: Option<i64>,
    video_mime_type: String,
    video_source_language_id: Uuid,
    video_uploaded_at: OffsetDateTime,
    language_id: Uuid,
    language_code: String,
    language_name: String,
    language_is_active: bool,
}

impl From<JobRow> for JobRecord {
    fn from(row: JobRow) -> Self {
        JobRecord {
            job: row.job,
            source_video: Video {
                id: row.video_id,
                filename: row.video_filename,
                original_filename: row.video_original_filename,
                file_path: row.video_file_path,
                file_size: row.video_file_size,
                duration_centis: row.video_duration_centis,
                mime_type: row.video_mime_type,
                source_language_id: row.video_source_language_id,
                uploaded_at: row.video_uploaded_at,
            },
            target_language: Language {
                id: row.language_id,
                code: row.language_code,
                name: row.language_name,
                is_active: row.language_is_active,
            },
        }
    }
}

pub struct DubbingRepository;

impl DubbingRepository {
    pub async fn create(pool: &PgPool, job: &DubbingJob) -> Result<DubbingJob> {
        let sql = format!(
            r#"
            INSERT INTO dubbing_jobs
                (id, source_video_id, target_language_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {JOB_COLUMNS}
            "#
        );

        let job = sqlx::query_as::<_, DubbingJob>(&sql)
            .bind(job.id)
            .bind(job.source_video_id)
            .bind(job.target_language_id)
            .bind(job.status.as_str())
            .bind(job.created_at)
            .bind(job.updated_at)
            .fetch_one(pool)
            .await
            .map_err(|e| anyhow!("Failed to create dubbing job: {}", e))?;

        Ok(job)
    }

    /// Fetches a job joined with its video and target language.
    pub async fn find_record(pool: &PgPool, id: Uuid) -> Result<Option<JobRecord>> {
        let sql = format!("{RECORD_SELECT} WHERE j.id = $1");
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| anyhow!("Failed to fetch dubbing job: {}", e))?;

        Ok(row.map(JobRecord::from))
    }

    /// Newest first, optionally restricted to one source video.
    pub async fn list_records(pool: &PgPool, video_id: Option<Uuid>) -> Result<Vec<JobRecord>> {
        let sql = format!(
            r#"
            {RECORD_SELECT}
            WHERE $1::uuid IS NULL OR j.source_video_id = $1
            ORDER BY j.created_at DESC
            "#
        );

        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .bind(video_id)
            .fetch_all(pool)
            .await
            .map_err(|e| anyhow!("Failed to fetch dubbing jobs: {}", e))?;

        Ok(rows.into_iter().map(JobRecord::from).collect())
    }

    pub async fn mark_processing(pool: &PgPool, id: Uuid, at: OffsetDateTime) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE dubbing_jobs
            SET status = 'processing', processing_started_at = $2, updated_at = $2
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(at)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn mark_completed(
        pool: &PgPool,
        id: Uuid,
        output: &JobOutput,
        at: OffsetDateTime,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE dubbing_jobs
            SET status = 'completed',
                output_filename = $2,
                output_file_path = $3,
                output_file_size = $4,
                error_message = NULL,
                processing_completed_at = $5,
                updated_at = $5
            WHERE id = $1 AND status = 'processing'
            "#,
        )
        .bind(id)
        .bind(&output.filename)
        .bind(&output.file_path)
        .bind(output.file_size)
        .bind(at)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn mark_failed(
        pool: &PgPool,
        id: Uuid,
        message: &str,
        at: OffsetDateTime,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE dubbing_jobs
            SET status = 'failed',
                output_filename = NULL,
                output_file_path = NULL,
                output_file_size = NULL,
                error_message = $2,
                processing_completed_at = $3,
                updated_at = $3
            WHERE id = $1 AND status = 'processing'
            "#,
        )
        .bind(id)
        .bind(message)
        .bind(at)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::dubbing::model::DubbingStatus;

    #[test]
    fn joined_row_splits_into_a_record() {
        let now = OffsetDateTime::now_utc();
        let job = DubbingJob::pending(Uuid::new_v4(), Uuid::new_v4());
        let row = JobRow {
            job: job.clone(),
            video_id: job.source_video_id,
            video_filename: "video_1.mp4".to_string(),
            video_original_filename: "talk.mp4".to_string(),
            video_file_path: "/data/uploads/video_1.mp4".to_string(),
            video_file_size: 2048,
            video_duration_centis: Some(1230),
            video_mime_type: "video/mp4".to_string(),
            video_source_language_id: Uuid::new_v4(),
            video_uploaded_at: now,
            language_id: job.target_language_id,
            language_code: "es".to_string(),
            language_name: "Spanish".to_string(),
            language_is_active: true,
        };

        let record = JobRecord::from(row);
        assert_eq!(record.job, job);
        assert_eq!(record.job.status, DubbingStatus::Pending);
        assert_eq!(record.source_video.id, job.source_video_id);
        assert_eq!(record.source_video.original_filename, "talk.mp4");
        assert_eq!(record.source_video.duration_centis, Some(1230));
        assert_eq!(record.target_language.id, job.target_language_id);
        assert_eq!(record.target_language.code, "es");
        assert!(record.target_language.is_active);
    }
}
