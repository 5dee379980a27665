//! Record store contract consumed by the dubbing core.
//!
//! Status writes are conditional so the job state machine can only move
//! forward: `pending -> processing -> {completed | failed}`. Each write
//! reports whether a row actually moved.

use anyhow::Result;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::modules::dubbing::model::{DubbingJob, JobOutput, JobRecord};
use crate::modules::language::model::Language;
use crate::modules::video::model::{NewVideo, Video};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_language(&self, code: &str, name: &str) -> Result<Language>;
    async fn find_language(&self, id: Uuid) -> Result<Option<Language>>;
    async fn find_language_by_code(&self, code: &str) -> Result<Option<Language>>;
    async fn active_languages(&self) -> Result<Vec<Language>>;

    async fn create_video(&self, video: NewVideo) -> Result<Video>;
    async fn find_video(&self, id: Uuid) -> Result<Option<Video>>;
    async fn list_videos(&self) -> Result<Vec<Video>>;

    async fn create_job(&self, job: DubbingJob) -> Result<DubbingJob>;
    /// Fetches a job with its video and language. `None` when any of the
    /// three does not resolve.
    async fn find_job(&self, id: Uuid) -> Result<Option<JobRecord>>;
    async fn list_jobs(&self, video_id: Option<Uuid>) -> Result<Vec<JobRecord>>;

    async fn mark_processing(&self, id: Uuid, at: OffsetDateTime) -> Result<bool>;
    async fn mark_completed(&self, id: Uuid, output: &JobOutput, at: OffsetDateTime)
    -> Result<bool>;
    async fn mark_failed(&self, id: Uuid, message: &str, at: OffsetDateTime) -> Result<bool>;
}
