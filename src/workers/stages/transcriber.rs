use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use super::Transcriber;
use super::openai::OpenAiClient;
use crate::config::settings::OpenAiConfig;

pub struct WhisperTranscriber {
    client: OpenAiClient,
    model: String,
    timeout: Duration,
}

impl WhisperTranscriber {
    pub fn new(client: OpenAiClient, config: &OpenAiConfig) -> Self {
        Self {
            client,
            model: config.transcription_model.clone(),
            timeout: config.transcription_timeout,
        }
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: &Path) -> Option<String> {
        match self.client.transcribe(audio, &self.model, self.timeout).await {
            Ok(text) if !text.trim().is_empty() => {
                debug!("Transcribed {} chars from {}", text.len(), audio.display());
                Some(text.trim().to_string())
            }
            Ok(_) => {
                error!("Transcription of {} was empty", audio.display());
                None
            }
            Err(e) => {
                error!("Error transcribing audio: {}", e);
                None
            }
        }
    }
}
