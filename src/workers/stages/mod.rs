//! Stage adapters.
//!
//! Each adapter wraps one external tool or service call. Adapters never
//! return errors: any fault is logged where it happens and surfaces to the
//! caller as `None`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::settings::AppConfig;

pub mod extractor;
pub mod language;
pub mod muxer;
pub mod openai;
pub mod probe;
pub mod process;
pub mod synthesizer;
#[cfg(test)]
pub(crate) mod testing;
pub mod transcriber;
pub mod translator;

pub use extractor::FfmpegExtractor;
pub use language::LanguageCode;
pub use muxer::FfmpegMuxer;
pub use openai::OpenAiClient;
pub use probe::FfprobeProbe;
pub use synthesizer::OpenAiSynthesizer;
pub use transcriber::WhisperTranscriber;
pub use translator::ChatTranslator;

#[async_trait]
pub trait MetadataProbe: Send + Sync {
    /// Duration in hundredths of a second.
    async fn duration_centis(&self, path: &Path) -> Option<i64>;
}

#[async_trait]
pub trait AudioExtractor: Send + Sync {
    /// Extracts a mono 16 kHz PCM track into a new scratch file.
    async fn extract(&self, video: &Path) -> Option<PathBuf>;
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &Path) -> Option<String>;
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_code: &str) -> Option<String>;
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, target_code: &str) -> Option<PathBuf>;
}

#[async_trait]
pub trait Muxer: Send + Sync {
    /// Writes `output` with the video stream of `video` and the audio of `audio`.
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Option<PathBuf>;
}

/// The five pipeline adapters, in execution order.
#[derive(Clone)]
pub struct Stages {
    pub extractor: Arc<dyn AudioExtractor>,
    pub transcriber: Arc<dyn Transcriber>,
    pub translator: Arc<dyn Translator>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub muxer: Arc<dyn Muxer>,
}

impl Stages {
    /// Production adapters backed by ffmpeg and the OpenAI API.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let client = OpenAiClient::new(&config.openai)?;

        Ok(Self {
            extractor: Arc::new(FfmpegExtractor::new(&config.tools, &config.scratch_dir)),
            transcriber: Arc::new(WhisperTranscriber::new(client.clone(), &config.openai)),
            translator: Arc::new(ChatTranslator::new(client.clone(), &config.openai)),
            synthesizer: Arc::new(OpenAiSynthesizer::new(
                client,
                &config.openai,
                &config.scratch_dir,
            )),
            muxer: Arc::new(FfmpegMuxer::new(&config.tools)),
        })
    }
}
