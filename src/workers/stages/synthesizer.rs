use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};
use uuid::Uuid;

use super::SpeechSynthesizer;
use super::language::LanguageCode;
use super::openai::OpenAiClient;
use crate::config::settings::OpenAiConfig;
use crate::error::{DubbingError, DubbingResult};

pub struct OpenAiSynthesizer {
    client: OpenAiClient,
    model: String,
    voice: String,
    scratch_dir: PathBuf,
    timeout: Duration,
}

impl OpenAiSynthesizer {
    pub fn new(client: OpenAiClient, config: &OpenAiConfig, scratch_dir: &Path) -> Self {
        Self {
            client,
            model: config.speech_model.clone(),
            voice: config.speech_voice.clone(),
            scratch_dir: scratch_dir.to_path_buf(),
            timeout: config.synthesis_timeout,
        }
    }

    async fn try_synthesize(&self, text: &str, speech: &Path) -> DubbingResult<()> {
        let audio = self
            .client
            .speech(&self.model, &self.voice, text, self.timeout)
            .await?;
        if audio.is_empty() {
            return Err(DubbingError::service("openai", "speech response was empty"));
        }

        tokio::fs::write(speech, &audio).await?;
        Ok(())
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSynthesizer {
    async fn synthesize(&self, text: &str, target_code: &str) -> Option<PathBuf> {
        let target = LanguageCode::parse(target_code);
        let speech = self
            .scratch_dir
            .join(format!("speech_{}_{}.mp3", target.code(), Uuid::new_v4().simple()));
        debug!("Generating {} speech ({} chars) with voice {}", target, text.len(), self.voice);

        match self.try_synthesize(text, &speech).await {
            Ok(()) => Some(speech),
            Err(e) => {
                error!("Error generating AI speech: {}", e);
                let _ = tokio::fs::remove_file(&speech).await;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::stages::testing::{files_with_prefix, unreachable_openai};

    #[tokio::test]
    async fn unreachable_service_leaves_no_speech() {
        let dir = tempfile::tempdir().unwrap();
        let config = unreachable_openai();
        let synthesizer =
            OpenAiSynthesizer::new(OpenAiClient::new(&config).unwrap(), &config, dir.path());

        assert!(synthesizer.synthesize("hola", "es").await.is_none());
        assert!(files_with_prefix(dir.path(), "speech_").is_empty());
    }
}
