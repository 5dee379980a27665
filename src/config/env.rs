use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    DatabaseUrl,
    UploadDir,
    OutputDir,
    ScratchDir,
    MaxUploadBytes,
    Workers,
    FfmpegBin,
    FfprobeBin,
    ProbeTimeout,
    ExtractTimeout,
    MuxTimeout,
    OpenAiApiKey,
    OpenAiBaseUrl,
    TranscriptionModel,
    TranslationModel,
    SpeechModel,
    SpeechVoice,
    TranscriptionTimeout,
    TranslationTimeout,
    SynthesisTimeout,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::DatabaseUrl => "DATABASE_URL",
            EnvKey::UploadDir => "UPLOAD_DIR",
            EnvKey::OutputDir => "OUTPUT_DIR",
            EnvKey::ScratchDir => "SCRATCH_DIR",
            EnvKey::MaxUploadBytes => "MAX_UPLOAD_BYTES",
            EnvKey::Workers => "DUBBING_WORKERS",
            EnvKey::FfmpegBin => "FFMPEG_BIN",
            EnvKey::FfprobeBin => "FFPROBE_BIN",
            EnvKey::ProbeTimeout => "PROBE_TIMEOUT_SECS",
            EnvKey::ExtractTimeout => "EXTRACT_TIMEOUT_SECS",
            EnvKey::MuxTimeout => "MUX_TIMEOUT_SECS",
            EnvKey::OpenAiApiKey => "OPENAI_API_KEY",
            EnvKey::OpenAiBaseUrl => "OPENAI_BASE_URL",
            EnvKey::TranscriptionModel => "TRANSCRIPTION_MODEL",
            EnvKey::TranslationModel => "TRANSLATION_MODEL",
            EnvKey::SpeechModel => "SPEECH_MODEL",
            EnvKey::SpeechVoice => "SPEECH_VOICE",
            EnvKey::TranscriptionTimeout => "TRANSCRIPTION_TIMEOUT_SECS",
            EnvKey::TranslationTimeout => "TRANSLATION_TIMEOUT_SECS",
            EnvKey::SynthesisTimeout => "SYNTHESIS_TIMEOUT_SECS",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_opt(key: EnvKey) -> Option<String> {
    get(key).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
