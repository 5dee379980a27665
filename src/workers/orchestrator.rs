//! Runs the five dubbing stages for one job and persists its terminal status.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::FutureExt;
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::stages::Stages;
use super::stages::muxer::output_file_name;
use crate::error::{DubbingError, Stage};
use crate::infrastructure::store::Store;
use crate::modules::dubbing::model::{JobOutput, JobRecord};

const MAX_ERROR_MESSAGE: usize = 1000;

pub struct Orchestrator {
    store: Arc<dyn Store>,
    stages: Stages,
    output_dir: PathBuf,
}

/// Intermediate files produced while a job runs.
#[derive(Default)]
struct Scratch {
    audio: Option<PathBuf>,
    speech: Option<PathBuf>,
}

impl Scratch {
    async fn cleanup(self) {
        for path in [self.audio, self.speech].into_iter().flatten() {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!("Removed intermediate {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Cleanup error for {}: {}", path.display(), e),
            }
        }
    }
}

impl Orchestrator {
    pub fn new(store: Arc<dyn Store>, stages: Stages, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            stages,
            output_dir: output_dir.into(),
        }
    }

    /// Runs a job start to finish on the current task.
    ///
    /// Returns `false` without touching the store when the job or its
    /// references do not resolve.
    pub async fn run(&self, job_id: Uuid) -> bool {
        let Some(record) = self.resolve(job_id).await else {
            return false;
        };
        if !self.begin(job_id).await {
            return false;
        }
        self.execute(record).await
    }

    pub(crate) async fn resolve(&self, job_id: Uuid) -> Option<JobRecord> {
        match self.store.find_job(job_id).await {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                error!("Dubbing job {} not found", job_id);
                None
            }
            Err(e) => {
                error!("Failed to load dubbing job {}: {}", job_id, e);
                None
            }
        }
    }

    /// The `pending -> processing` write.
    pub(crate) async fn begin(&self, job_id: Uuid) -> bool {
        match self
            .store
            .mark_processing(job_id, OffsetDateTime::now_utc())
            .await
        {
            Ok(true) => true,
            Ok(false) => {
                warn!("Dubbing job {} is not pending; refusing to start it", job_id);
                false
            }
            Err(e) => {
                error!("Failed to mark dubbing job {} as processing: {}", job_id, e);
                false
            }
        }
    }

    /// Runs the stages for a job already marked processing and writes the
    /// terminal status. Never panics and never returns an error.
    pub(crate) async fn execute(&self, record: JobRecord) -> bool {
        let job_id = record.job.id;
        let mut scratch = Scratch::default();

        let outcome = AssertUnwindSafe(self.run_stages(&record, &mut scratch))
            .catch_unwind()
            .await;

        scratch.cleanup().await;

        match outcome {
            Ok(Ok(output)) => self.complete(job_id, output).await,
            Ok(Err(fault)) => {
                warn!("Dubbing job {} failed: {}", job_id, fault);
                self.fail(job_id, &fault.to_string()).await;
                false
            }
            Err(panic) => {
                let fault = DubbingError::Unexpected(panic_message(panic));
                error!("Sync processing error for job {}: {}", job_id, fault);
                self.fail(job_id, &fault.to_string()).await;
                false
            }
        }
    }

    /// Fails a claimed job that will never reach a worker.
    pub(crate) async fn abandon(&self, job_id: Uuid) {
        self.fail(job_id, "Dubbing worker pool is shut down").await;
    }

    async fn run_stages(
        &self,
        record: &JobRecord,
        scratch: &mut Scratch,
    ) -> Result<JobOutput, DubbingError> {
        let job_id = record.job.id;
        let video = Path::new(&record.source_video.file_path);
        let code = record.target_language.code.as_str();

        enter(job_id, Stage::Extract);
        let audio = self
            .stages
            .extractor
            .extract(video)
            .await
            .ok_or(DubbingError::Stage(Stage::Extract))?;
        scratch.audio = Some(audio.clone());

        enter(job_id, Stage::Transcribe);
        let transcript = self
            .stages
            .transcriber
            .transcribe(&audio)
            .await
            .ok_or(DubbingError::Stage(Stage::Transcribe))?;

        enter(job_id, Stage::Translate);
        let translated = self
            .stages
            .translator
            .translate(&transcript, code)
            .await
            .ok_or(DubbingError::Stage(Stage::Translate))?;

        enter(job_id, Stage::Synthesize);
        let speech = self
            .stages
            .synthesizer
            .synthesize(&translated, code)
            .await
            .ok_or(DubbingError::Stage(Stage::Synthesize))?;
        scratch.speech = Some(speech.clone());

        enter(job_id, Stage::Mux);
        let target = self
            .output_dir
            .join(output_file_name(video, code, OffsetDateTime::now_utc()));
        let output = self
            .stages
            .muxer
            .mux(video, &speech, &target)
            .await
            .ok_or(DubbingError::Stage(Stage::Mux))?;

        let file_size = match tokio::fs::metadata(&output).await {
            Ok(meta) => meta.len() as i64,
            Err(e) => {
                warn!("Cannot stat dubbed output {}: {}", output.display(), e);
                0
            }
        };
        let filename = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(JobOutput {
            filename,
            file_path: output.to_string_lossy().into_owned(),
            file_size,
        })
    }

    async fn complete(&self, job_id: Uuid, output: JobOutput) -> bool {
        match self
            .store
            .mark_completed(job_id, &output, OffsetDateTime::now_utc())
            .await
        {
            Ok(true) => {
                info!("✅ Dubbing job {} completed: {}", job_id, output.file_path);
                true
            }
            Ok(false) => {
                error!("Dubbing job {} left processing before it could complete", job_id);
                false
            }
            Err(e) => {
                error!("Error updating job success for {}: {}", job_id, e);
                // the output is unreachable without a completed record
                if let Err(io) = tokio::fs::remove_file(&output.file_path).await {
                    warn!("Cleanup error for {}: {}", output.file_path, io);
                }
                self.fail(job_id, &format!("Failed to record dubbed output: {}", e))
                    .await;
                false
            }
        }
    }

    async fn fail(&self, job_id: Uuid, message: &str) {
        let message: String = message.chars().take(MAX_ERROR_MESSAGE).collect();
        match self
            .store
            .mark_failed(job_id, &message, OffsetDateTime::now_utc())
            .await
        {
            Ok(true) => {}
            Ok(false) => error!("Dubbing job {} left processing before it could fail", job_id),
            Err(e) => error!("Error updating job error for {}: {}", job_id, e),
        }
    }
}

fn enter(job_id: Uuid, stage: Stage) {
    debug!(
        "Job {}: stage {}/{} {}",
        job_id,
        stage.step(),
        Stage::ORDER.len(),
        stage
    );
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "pipeline panicked".to_string()
    }
}
