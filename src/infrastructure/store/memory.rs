use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{bail, Result};
use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::modules::dubbing::model::{DubbingJob, DubbingStatus, JobOutput, JobRecord};
use crate::modules::language::model::Language;
use crate::modules::video::model::{NewVideo, Video};

#[derive(Default)]
struct Tables {
    languages: Vec<Language>,
    videos: HashMap<Uuid, Video>,
    // insertion order, oldest first
    jobs: Vec<DubbingJob>,
}

impl Tables {
    fn resolve(&self, job: &DubbingJob) -> Option<JobRecord> {
        let source_video = self.videos.get(&job.source_video_id)?.clone();
        let target_language = self
            .languages
            .iter()
            .find(|l| l.id == job.target_language_id)?
            .clone();

        Some(JobRecord {
            job: job.clone(),
            source_video,
            target_language,
        })
    }

    fn job_mut(&mut self, id: Uuid) -> Option<&mut DubbingJob> {
        self.jobs.iter_mut().find(|j| j.id == id)
    }
}

/// Process-local store used when no database is configured.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail, as an unreachable database would.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            bail!("store unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_language(&self, code: &str, name: &str) -> Result<Language> {
        self.check()?;
        let mut tables = self.tables.write().await;
        if tables.languages.iter().any(|l| l.code == code) {
            bail!("Failed to create language: code '{}' already exists", code);
        }

        let language = Language {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: name.to_string(),
            is_active: true,
        };
        tables.languages.push(language.clone());
        Ok(language)
    }

    async fn find_language(&self, id: Uuid) -> Result<Option<Language>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.languages.iter().find(|l| l.id == id).cloned())
    }

    async fn find_language_by_code(&self, code: &str) -> Result<Option<Language>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.languages.iter().find(|l| l.code == code).cloned())
    }

    async fn active_languages(&self) -> Result<Vec<Language>> {
        self.check()?;
        let tables = self.tables.read().await;
        let mut languages: Vec<_> = tables
            .languages
            .iter()
            .filter(|l| l.is_active)
            .cloned()
            .collect();
        languages.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(languages)
    }

    async fn create_video(&self, video: NewVideo) -> Result<Video> {
        self.check()?;
        let mut tables = self.tables.write().await;
        if !tables.languages.iter().any(|l| l.id == video.source_language_id) {
            bail!("Failed to create video: unknown language {}", video.source_language_id);
        }

        let video = Video {
            id: Uuid::new_v4(),
            filename: video.filename,
            original_filename: video.original_filename,
            file_path: video.file_path,
            file_size: video.file_size,
            duration_centis: video.duration_centis,
            mime_type: video.mime_type,
            source_language_id: video.source_language_id,
            uploaded_at: OffsetDateTime::now_utc(),
        };
        tables.videos.insert(video.id, video.clone());
        Ok(video)
    }

    async fn find_video(&self, id: Uuid) -> Result<Option<Video>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.videos.get(&id).cloned())
    }

    async fn list_videos(&self) -> Result<Vec<Video>> {
        self.check()?;
        let tables = self.tables.read().await;
        let mut videos: Vec<_> = tables.videos.values().cloned().collect();
        videos.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(videos)
    }

    async fn create_job(&self, job: DubbingJob) -> Result<DubbingJob> {
        self.check()?;
        let mut tables = self.tables.write().await;
        if !tables.videos.contains_key(&job.source_video_id) {
            bail!("Failed to create dubbing job: unknown video {}", job.source_video_id);
        }
        if !tables.languages.iter().any(|l| l.id == job.target_language_id) {
            bail!("Failed to create dubbing job: unknown language {}", job.target_language_id);
        }

        tables.jobs.push(job.clone());
        Ok(job)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<JobRecord>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .jobs
            .iter()
            .find(|j| j.id == id)
            .and_then(|job| tables.resolve(job)))
    }

    async fn list_jobs(&self, video_id: Option<Uuid>) -> Result<Vec<JobRecord>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .jobs
            .iter()
            .rev()
            .filter(|j| video_id.is_none_or(|v| j.source_video_id == v))
            .filter_map(|job| tables.resolve(job))
            .collect())
    }

    async fn mark_processing(&self, id: Uuid, at: OffsetDateTime) -> Result<bool> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let Some(job) = tables.job_mut(id) else {
            return Ok(false);
        };
        if job.status != DubbingStatus::Pending {
            return Ok(false);
        }

        job.status = DubbingStatus::Processing;
        job.processing_started_at = Some(at);
        job.updated_at = at;
        Ok(true)
    }

    async fn mark_completed(
        &self,
        id: Uuid,
        output: &JobOutput,
        at: OffsetDateTime,
    ) -> Result<bool> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let Some(job) = tables.job_mut(id) else {
            return Ok(false);
        };
        if job.status != DubbingStatus::Processing {
            return Ok(false);
        }

        job.status = DubbingStatus::Completed;
        job.output_filename = Some(output.filename.clone());
        job.output_file_path = Some(output.file_path.clone());
        job.output_file_size = Some(output.file_size);
        job.error_message = None;
        job.processing_completed_at = Some(at);
        job.updated_at = at;
        Ok(true)
    }

    async fn mark_failed(&self, id: Uuid, message: &str, at: OffsetDateTime) -> Result<bool> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let Some(job) = tables.job_mut(id) else {
            return Ok(false);
        };
        if job.status != DubbingStatus::Processing {
            return Ok(false);
        }

        job.status = DubbingStatus::Failed;
        job.output_filename = None;
        job.output_file_path = None;
        job.output_file_size = None;
        job.error_message = Some(message.to_string());
        job.processing_completed_at = Some(at);
        job.updated_at = at;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (MemoryStore, Uuid, Uuid) {
        let store = MemoryStore::new();
        let en = store.create_language("en", "English").await.unwrap();
        let es = store.create_language("es", "Spanish").await.unwrap();
        let video = store
            .create_video(NewVideo {
                filename: "clip.mp4".into(),
                original_filename: "clip.mp4".into(),
                file_path: "/tmp/clip.mp4".into(),
                file_size: 10,
                duration_centis: Some(1230),
                mime_type: "video/mp4".into(),
                source_language_id: en.id,
            })
            .await
            .unwrap();
        (store, video.id, es.id)
    }

    #[tokio::test]
    async fn status_moves_forward_only() {
        let (store, video, lang) = seeded().await;
        let job = store.create_job(DubbingJob::pending(video, lang)).await.unwrap();
        let now = OffsetDateTime::now_utc();

        // terminal writes require processing
        assert!(!store.mark_failed(job.id, "boom", now).await.unwrap());
        assert!(store.mark_processing(job.id, now).await.unwrap());
        assert!(!store.mark_processing(job.id, now).await.unwrap());
        assert!(store.mark_failed(job.id, "boom", now).await.unwrap());

        let output = JobOutput {
            filename: "x.mp4".into(),
            file_path: "/tmp/x.mp4".into(),
            file_size: 1,
        };
        assert!(!store.mark_completed(job.id, &output, now).await.unwrap());

        let record = store.find_job(job.id).await.unwrap().unwrap();
        assert_eq!(record.job.status, DubbingStatus::Failed);
        assert_eq!(record.job.error_message.as_deref(), Some("boom"));
        assert!(record.job.output_file_path.is_none());
    }

    #[tokio::test]
    async fn jobs_require_known_references() {
        let (store, video, _) = seeded().await;
        assert!(store
            .create_job(DubbingJob::pending(video, Uuid::new_v4()))
            .await
            .is_err());
        assert!(store
            .create_job(DubbingJob::pending(Uuid::new_v4(), Uuid::new_v4()))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let (store, _, _) = seeded().await;
        store.set_unavailable(true);
        assert!(store.active_languages().await.is_err());
        assert!(store.find_job(Uuid::new_v4()).await.is_err());
        store.set_unavailable(false);
        assert_eq!(store.active_languages().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn languages_are_unique_by_code() {
        let (store, _, _) = seeded().await;
        assert!(store.create_language("en", "English").await.is_err());
    }
}
