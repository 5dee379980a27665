use super::model::{DubbingJob, DubbingStatus, JobRecord};
use crate::error::{DubbingError, Entity};
use crate::infrastructure::store::Store;
use crate::workers::{Dispatcher, JobHandle};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{error, info};
use uuid::Uuid;

/// Job creation, dispatch and read-only queries.
pub struct DubbingService;

impl DubbingService {
    /// Creates a pending job. The target language is not compared with the
    /// video's source language.
    pub async fn create_job(
        store: &dyn Store,
        source_video_id: Uuid,
        target_language_id: Uuid,
    ) -> Result<DubbingJob> {
        if store.find_video(source_video_id).await?.is_none() {
            return Err(DubbingError::not_found(Entity::Video, source_video_id).into());
        }
        if store.find_language(target_language_id).await?.is_none() {
            return Err(DubbingError::not_found(Entity::Language, target_language_id).into());
        }

        let job = store
            .create_job(DubbingJob::pending(source_video_id, target_language_id))
            .await?;
        info!(
            "Created dubbing job {} (video {}, language {})",
            job.id, source_video_id, target_language_id
        );
        Ok(job)
    }

    /// Hands a job to the worker pool. See [`Dispatcher::submit`].
    pub async fn submit(dispatcher: &Dispatcher, job_id: Uuid) -> JobHandle {
        dispatcher.submit(job_id).await
    }

    pub async fn get_job(store: &dyn Store, job_id: Uuid) -> Option<JobRecord> {
        match store.find_job(job_id).await {
            Ok(record) => record,
            Err(e) => {
                error!("Failed to fetch dubbing job {}: {}", job_id, e);
                None
            }
        }
    }

    pub async fn list_jobs(store: &dyn Store, video_id: Option<Uuid>) -> Vec<JobRecord> {
        match store.list_jobs(video_id).await {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to fetch dubbing jobs: {}", e);
                Vec::new()
            }
        }
    }

    /// Output file of a completed job, checked on disk at every call.
    pub async fn output_path(store: &dyn Store, job_id: Uuid) -> Option<PathBuf> {
        let record = Self::get_job(store, job_id).await?;
        if record.job.status != DubbingStatus::Completed {
            return None;
        }

        let path = PathBuf::from(record.job.output_file_path?);
        match tokio::fs::try_exists(&path).await {
            Ok(true) => Some(path),
            _ => None,
        }
    }
}
