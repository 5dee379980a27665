//! Minimal OpenAI REST client covering the three calls the pipeline makes.

use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::config::settings::OpenAiConfig;
use crate::error::{DubbingError, DubbingResult};

const SERVICE: &str = "openai";

#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Uploads an audio file and returns the plain-text transcript.
    pub async fn transcribe(
        &self,
        audio: &Path,
        model: &str,
        timeout: Duration,
    ) -> DubbingResult<String> {
        let data = tokio::fs::read(audio).await?;
        let file_name = audio
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());
        let mime = mime_guess::from_path(audio).first_or_octet_stream();

        let file = Part::bytes(data)
            .file_name(file_name)
            .mime_str(mime.as_ref())?;
        let form = Form::new()
            .text("model", model.to_string())
            .text("response_format", "text")
            .part("file", file);

        let response = self
            .http
            .post(self.url("audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .multipart(form)
            .send()
            .await?;

        Ok(check(response).await?.text().await?)
    }

    /// Returns the content of the first choice.
    pub async fn chat(&self, request: &ChatRequest<'_>, timeout: Duration) -> DubbingResult<String> {
        let response = self
            .http
            .post(self.url("chat/completions"))
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(request)
            .send()
            .await?;

        let body: ChatResponse = check(response).await?.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DubbingError::service(SERVICE, "completion returned no content"))
    }

    /// Returns encoded audio (mp3) for `input`.
    pub async fn speech(
        &self,
        model: &str,
        voice: &str,
        input: &str,
        timeout: Duration,
    ) -> DubbingResult<Bytes> {
        let response = self
            .http
            .post(self.url("audio/speech"))
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(&SpeechRequest { model, voice, input })
            .send()
            .await?;

        Ok(check(response).await?.bytes().await?)
    }
}

async fn check(response: Response) -> DubbingResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(DubbingError::service(
        SERVICE,
        format!("{}: {}", status, body.chars().take(500).collect::<String>()),
    ))
}
