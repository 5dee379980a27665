#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use time::OffsetDateTime;
use tempfile::TempDir;
use uuid::Uuid;

use dubbing::config::settings::AppConfig;
use dubbing::error::Stage;
use dubbing::infrastructure::store::{MemoryStore, Store};
use dubbing::modules::dubbing::model::{DubbingJob, JobOutput, JobRecord};
use dubbing::modules::language::model::Language;
use dubbing::modules::language::service::LanguageService;
use dubbing::modules::video::model::{NewVideo, Video};
use dubbing::state::AppState;
use dubbing::workers::stages::{
    AudioExtractor, MetadataProbe, Muxer, SpeechSynthesizer, Stages, Transcriber, Translator,
};
use dubbing::workers::{Dispatcher, Orchestrator};

/// Shared behaviour and call log for the mock adapters.
#[derive(Default)]
pub struct Script {
    calls: [AtomicUsize; 5],
    failing: Mutex<Vec<Stage>>,
    panicking: Mutex<Option<Stage>>,
    delay: Mutex<Option<Duration>>,
    produced: Mutex<Vec<PathBuf>>,
    skip_output_write: AtomicBool,
    running: AtomicUsize,
    peak_running: AtomicUsize,
    scratch: PathBuf,
}

fn index(stage: Stage) -> usize {
    Stage::ORDER
        .iter()
        .position(|s| *s == stage)
        .expect("stage is listed in ORDER")
}

impl Script {
    fn new(scratch: PathBuf) -> Self {
        Self {
            scratch,
            ..Default::default()
        }
    }

    pub fn fail(&self, stage: Stage) {
        self.failing.lock().unwrap().push(stage);
    }

    pub fn fail_all(&self) {
        self.failing.lock().unwrap().extend(Stage::ORDER);
    }

    /// Panics once, on the next call to `stage`.
    pub fn panic_at(&self, stage: Stage) {
        *self.panicking.lock().unwrap() = Some(stage);
    }

    /// The muxer reports success without writing its output.
    pub fn skip_output_write(&self) {
        self.skip_output_write.store(true, Ordering::SeqCst);
    }

    pub fn delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self, stage: Stage) -> usize {
        self.calls[index(stage)].load(Ordering::SeqCst)
    }

    /// Most pipelines seen between extraction and mux at the same time.
    /// Only meaningful when every pipeline reaches the muxer.
    pub fn peak_running(&self) -> usize {
        self.peak_running.load(Ordering::SeqCst)
    }

    fn pipeline_started(&self) {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_running.fetch_max(now, Ordering::SeqCst);
    }

    fn pipeline_finished(&self) {
        self.running.fetch_sub(1, Ordering::SeqCst);
    }

    /// Intermediate files written by the extractor and synthesizer.
    pub fn produced(&self) -> Vec<PathBuf> {
        self.produced.lock().unwrap().clone()
    }

    /// Records the call and reports whether the stage should yield nothing.
    async fn enter(&self, stage: Stage) -> bool {
        self.calls[index(stage)].fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let panics = {
            let mut panicking = self.panicking.lock().unwrap();
            *panicking == Some(stage) && panicking.take().is_some()
        };
        if panics {
            panic!("{} adapter exploded", stage);
        }
        self.failing.lock().unwrap().contains(&stage)
    }

    fn scratch_file(&self, prefix: &str, ext: &str, content: &[u8]) -> PathBuf {
        let path = self
            .scratch
            .join(format!("{}_{}.{}", prefix, Uuid::new_v4(), ext));
        std::fs::write(&path, content).unwrap();
        self.produced.lock().unwrap().push(path.clone());
        path
    }
}

pub struct MockExtractor(Arc<Script>);
pub struct MockTranscriber(Arc<Script>);
pub struct MockTranslator(Arc<Script>);
pub struct MockSynthesizer(Arc<Script>);
pub struct MockMuxer(Arc<Script>);

#[async_trait]
impl AudioExtractor for MockExtractor {
    async fn extract(&self, _video: &Path) -> Option<PathBuf> {
        self.0.pipeline_started();
        if self.0.enter(Stage::Extract).await {
            return None;
        }
        Some(self.0.scratch_file("audio", "wav", b"RIFF"))
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, audio: &Path) -> Option<String> {
        if self.0.enter(Stage::Transcribe).await {
            return None;
        }
        assert!(audio.exists(), "transcriber got a missing audio file");
        Some("hello".to_string())
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, target_code: &str) -> Option<String> {
        if self.0.enter(Stage::Translate).await {
            return None;
        }
        match (text, target_code) {
            ("hello", "es") => Some("hola".to_string()),
            ("hello", "fr") => Some("bonjour".to_string()),
            _ => Some(format!("{} ({})", text, target_code)),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str, _target_code: &str) -> Option<PathBuf> {
        if self.0.enter(Stage::Synthesize).await {
            return None;
        }
        Some(self.0.scratch_file("speech", "mp3", text.as_bytes()))
    }
}

#[async_trait]
impl Muxer for MockMuxer {
    async fn mux(&self, _video: &Path, audio: &Path, output: &Path) -> Option<PathBuf> {
        let yields_nothing = self.0.enter(Stage::Mux).await;
        self.0.pipeline_finished();
        if yields_nothing {
            return None;
        }
        assert!(audio.exists(), "muxer got a missing speech file");
        if !self.0.skip_output_write.load(Ordering::SeqCst) {
            std::fs::write(output, b"dubbed video").ok()?;
        }
        Some(output.to_path_buf())
    }
}

pub struct FixedProbe(pub Option<i64>);

#[async_trait]
impl MetadataProbe for FixedProbe {
    async fn duration_centis(&self, _path: &Path) -> Option<i64> {
        self.0
    }
}

/// Delegates to a memory store but refuses to record completed jobs.
pub struct CompletionRejectingStore(pub Arc<MemoryStore>);

#[async_trait]
impl Store for CompletionRejectingStore {
    async fn create_language(&self, code: &str, name: &str) -> Result<Language> {
        self.0.create_language(code, name).await
    }

    async fn find_language(&self, id: Uuid) -> Result<Option<Language>> {
        self.0.find_language(id).await
    }

    async fn find_language_by_code(&self, code: &str) -> Result<Option<Language>> {
        self.0.find_language_by_code(code).await
    }

    async fn active_languages(&self) -> Result<Vec<Language>> {
        self.0.active_languages().await
    }

    async fn create_video(&self, video: NewVideo) -> Result<Video> {
        self.0.create_video(video).await
    }

    async fn find_video(&self, id: Uuid) -> Result<Option<Video>> {
        self.0.find_video(id).await
    }

    async fn list_videos(&self) -> Result<Vec<Video>> {
        self.0.list_videos().await
    }

    async fn create_job(&self, job: DubbingJob) -> Result<DubbingJob> {
        self.0.create_job(job).await
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<JobRecord>> {
        self.0.find_job(id).await
    }

    async fn list_jobs(&self, video_id: Option<Uuid>) -> Result<Vec<JobRecord>> {
        self.0.list_jobs(video_id).await
    }

    async fn mark_processing(&self, id: Uuid, at: OffsetDateTime) -> Result<bool> {
        self.0.mark_processing(id, at).await
    }

    async fn mark_completed(
        &self,
        _id: Uuid,
        _output: &JobOutput,
        _at: OffsetDateTime,
    ) -> Result<bool> {
        Err(anyhow!("connection reset"))
    }

    async fn mark_failed(&self, id: Uuid, message: &str, at: OffsetDateTime) -> Result<bool> {
        self.0.mark_failed(id, message, at).await
    }
}

/// A memory store with seeded languages, one uploaded video and a worker pool
/// running mock adapters.
pub struct Fixture {
    pub dir: TempDir,
    pub store: Arc<MemoryStore>,
    pub script: Arc<Script>,
    pub stages: Stages,
    pub orchestrator: Arc<Orchestrator>,
    pub dispatcher: Arc<Dispatcher>,
    pub video: Video,
    pub english: Language,
    pub spanish: Language,
    pub french: Language,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_workers(2).await
    }

    pub async fn with_workers(workers: usize) -> Self {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["uploads", "outputs", "scratch"] {
            std::fs::create_dir_all(dir.path().join(sub)).unwrap();
        }

        let store = Arc::new(MemoryStore::new());
        LanguageService::seed_defaults(store.as_ref()).await.unwrap();
        let language = |code: &'static str| {
            let store = store.clone();
            async move { store.find_language_by_code(code).await.unwrap().unwrap() }
        };
        let english = language("en").await;
        let spanish = language("es").await;
        let french = language("fr").await;

        let video_path = dir.path().join("uploads").join("clip.mp4");
        std::fs::write(&video_path, b"source video").unwrap();
        let video = store
            .create_video(NewVideo {
                filename: "clip.mp4".to_string(),
                original_filename: "clip.mp4".to_string(),
                file_path: video_path.to_string_lossy().into_owned(),
                file_size: 12,
                duration_centis: Some(1230),
                mime_type: "video/mp4".to_string(),
                source_language_id: english.id,
            })
            .await
            .unwrap();

        let script = Arc::new(Script::new(dir.path().join("scratch")));
        let stages = Stages {
            extractor: Arc::new(MockExtractor(script.clone())),
            transcriber: Arc::new(MockTranscriber(script.clone())),
            translator: Arc::new(MockTranslator(script.clone())),
            synthesizer: Arc::new(MockSynthesizer(script.clone())),
            muxer: Arc::new(MockMuxer(script.clone())),
        };
        let orchestrator = Arc::new(Orchestrator::new(
            store.clone(),
            stages.clone(),
            dir.path().join("outputs"),
        ));
        let dispatcher = Arc::new(Dispatcher::start(orchestrator.clone(), workers));

        Self {
            dir,
            store,
            script,
            stages,
            orchestrator,
            dispatcher,
            video,
            english,
            spanish,
            french,
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn state(&self) -> AppState {
        let config = AppConfig {
            upload_dir: self.dir.path().join("uploads"),
            output_dir: self.dir.path().join("outputs"),
            scratch_dir: self.dir.path().join("scratch"),
            ..AppConfig::default()
        };
        AppState::new(
            config,
            self.store.clone(),
            Arc::new(FixedProbe(Some(1230))),
            self.dispatcher.clone(),
        )
    }
}
