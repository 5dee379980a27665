use anyhow::Result;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::Store;
use crate::infrastructure::db::pool::DbPool;
use crate::modules::dubbing::model::{DubbingJob, JobOutput, JobRecord};
use crate::modules::dubbing::repository::DubbingRepository;
use crate::modules::language::model::Language;
use crate::modules::language::repository::LanguageRepository;
use crate::modules::video::model::{NewVideo, Video};
use crate::modules::video::repository::VideoRepository;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_language(&self, code: &str, name: &str) -> Result<Language> {
        LanguageRepository::create(&self.pool, code, name).await
    }

    async fn find_language(&self, id: Uuid) -> Result<Option<Language>> {
        LanguageRepository::find_by_id(&self.pool, id).await
    }

    async fn find_language_by_code(&self, code: &str) -> Result<Option<Language>> {
        LanguageRepository::find_by_code(&self.pool, code).await
    }

    async fn active_languages(&self) -> Result<Vec<Language>> {
        LanguageRepository::find_active(&self.pool).await
    }

    async fn create_video(&self, video: NewVideo) -> Result<Video> {
        VideoRepository::create(&self.pool, &video).await
    }

    async fn find_video(&self, id: Uuid) -> Result<Option<Video>> {
        VideoRepository::find_by_id(&self.pool, id).await
    }

    async fn list_videos(&self) -> Result<Vec<Video>> {
        VideoRepository::list(&self.pool).await
    }

    async fn create_job(&self, job: DubbingJob) -> Result<DubbingJob> {
        DubbingRepository::create(&self.pool, &job).await
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<JobRecord>> {
        DubbingRepository::find_record(&self.pool, id).await
    }

    async fn list_jobs(&self, video_id: Option<Uuid>) -> Result<Vec<JobRecord>> {
        DubbingRepository::list_records(&self.pool, video_id).await
    }

    async fn mark_processing(&self, id: Uuid, at: OffsetDateTime) -> Result<bool> {
        DubbingRepository::mark_processing(&self.pool, id, at).await
    }

    async fn mark_completed(
        &self,
        id: Uuid,
        output: &JobOutput,
        at: OffsetDateTime,
    ) -> Result<bool> {
        DubbingRepository::mark_completed(&self.pool, id, output, at).await
    }

    async fn mark_failed(&self, id: Uuid, message: &str, at: OffsetDateTime) -> Result<bool> {
        DubbingRepository::mark_failed(&self.pool, id, message, at).await
    }
}
