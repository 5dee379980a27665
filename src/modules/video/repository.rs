use super::model::{NewVideo, Video};
use anyhow::{anyhow, Result};
use sqlx::PgPool;
use uuid::Uuid;

const VIDEO_COLUMNS: &str = "id, filename, original_filename, file_path, file_size, \
    duration_centis, mime_type, source_language_id, uploaded_at";

pub struct VideoRepository;

impl VideoRepository {
    pub async fn create(pool: &PgPool, video: &NewVideo) -> Result<Video> {
        let sql = format!(
            r#"
            INSERT INTO videos
                (id, filename, original_filename, file_path, file_size,
                 duration_centis, mime_type, source_language_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {VIDEO_COLUMNS}
            "#
        );

        let video = sqlx::query_as::<_, Video>(&sql)
            .bind(Uuid::new_v4())
            .bind(&video.filename)
            .bind(&video.original_filename)
            .bind(&video.file_path)
            .bind(video.file_size)
            .bind(video.duration_centis)
            .bind(&video.mime_type)
            .bind(video.source_language_id)
            .fetch_one(pool)
            .await
            .map_err(|e| anyhow!("Failed to create video: {}", e))?;

        Ok(video)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Video>> {
        let sql = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1");
        let video = sqlx::query_as::<_, Video>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| anyhow!("Failed to fetch video: {}", e))?;

        Ok(video)
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Video>> {
        let sql = format!("SELECT {VIDEO_COLUMNS} FROM videos ORDER BY uploaded_at DESC");
        let videos = sqlx::query_as::<_, Video>(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| anyhow!("Failed to fetch videos: {}", e))?;

        Ok(videos)
    }
}
