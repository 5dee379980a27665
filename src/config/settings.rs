use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::config::env::{self, EnvKey};

const DEFAULT_API_KEY: &str = "test-key";

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: Option<String>,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub scratch_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub workers: usize,
    pub tools: ToolConfig,
    pub openai: OpenAiConfig,
}

/// External media tools and their time bounds.
#[derive(Clone, Debug, Deserialize)]
pub struct ToolConfig {
    pub ffmpeg_bin: String,
    pub ffprobe_bin: String,
    pub probe_timeout: Duration,
    pub extract_timeout: Duration,
    pub mux_timeout: Duration,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub transcription_model: String,
    pub translation_model: String,
    pub speech_model: String,
    pub speech_voice: String,
    pub transcription_timeout: Duration,
    pub translation_timeout: Duration,
    pub synthesis_timeout: Duration,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
            probe_timeout: Duration::from_secs(30),
            extract_timeout: Duration::from_secs(300),
            mux_timeout: Duration::from_secs(600),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            transcription_model: "whisper-1".to_string(),
            translation_model: "gpt-3.5-turbo".to_string(),
            speech_model: "tts-1".to_string(),
            speech_voice: "alloy".to_string(),
            transcription_timeout: Duration::from_secs(300),
            translation_timeout: Duration::from_secs(120),
            synthesis_timeout: Duration::from_secs(300),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 3000,
            database_url: None,
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("outputs"),
            scratch_dir: std::env::temp_dir(),
            max_upload_bytes: 1024 * 1024 * 1024,
            workers: crate::workers::DEFAULT_WORKERS,
            tools: ToolConfig::default(),
            openai: OpenAiConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, anyhow::Error> {
        let tools = ToolConfig::default();
        let openai = OpenAiConfig::default();

        let base_url = env::get_or(EnvKey::OpenAiBaseUrl, &openai.base_url);
        Url::parse(&base_url)
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", EnvKey::OpenAiBaseUrl.as_str(), e))?;

        let api_key = env::get_or(EnvKey::OpenAiApiKey, DEFAULT_API_KEY);
        if api_key == DEFAULT_API_KEY {
            warn!("Using test OpenAI API key - transcription, translation and speech will fail");
        }

        let defaults = Self::default();
        let workers = env::get_parsed(EnvKey::Workers, defaults.workers).max(1);

        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, defaults.server_port),
            database_url: env::get_opt(EnvKey::DatabaseUrl),
            upload_dir: env::get_opt(EnvKey::UploadDir)
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            output_dir: env::get_opt(EnvKey::OutputDir)
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            scratch_dir: env::get_opt(EnvKey::ScratchDir)
                .map(PathBuf::from)
                .unwrap_or(defaults.scratch_dir),
            max_upload_bytes: env::get_parsed(EnvKey::MaxUploadBytes, defaults.max_upload_bytes),
            workers,
            tools: ToolConfig {
                ffmpeg_bin: env::get_or(EnvKey::FfmpegBin, &tools.ffmpeg_bin),
                ffprobe_bin: env::get_or(EnvKey::FfprobeBin, &tools.ffprobe_bin),
                probe_timeout: secs(EnvKey::ProbeTimeout, tools.probe_timeout),
                extract_timeout: secs(EnvKey::ExtractTimeout, tools.extract_timeout),
                mux_timeout: secs(EnvKey::MuxTimeout, tools.mux_timeout),
            },
            openai: OpenAiConfig {
                api_key,
                base_url: base_url.trim_end_matches('/').to_string(),
                transcription_model: env::get_or(
                    EnvKey::TranscriptionModel,
                    &openai.transcription_model,
                ),
                translation_model: env::get_or(EnvKey::TranslationModel, &openai.translation_model),
                speech_model: env::get_or(EnvKey::SpeechModel, &openai.speech_model),
                speech_voice: env::get_or(EnvKey::SpeechVoice, &openai.speech_voice),
                transcription_timeout: secs(
                    EnvKey::TranscriptionTimeout,
                    openai.transcription_timeout,
                ),
                translation_timeout: secs(EnvKey::TranslationTimeout, openai.translation_timeout),
                synthesis_timeout: secs(EnvKey::SynthesisTimeout, openai.synthesis_timeout),
            },
        })
    }
}

fn secs(key: EnvKey, default: Duration) -> Duration {
    Duration::from_secs(env::get_parsed(key, default.as_secs()))
}
