use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// One step of the fixed dubbing pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Extract,
    Transcribe,
    Translate,
    Synthesize,
    Mux,
}

impl Stage {
    pub const ORDER: [Stage; 5] = [
        Stage::Extract,
        Stage::Transcribe,
        Stage::Translate,
        Stage::Synthesize,
        Stage::Mux,
    ];

    /// 1-based position in [`Stage::ORDER`].
    pub fn step(self) -> usize {
        Stage::ORDER
            .iter()
            .position(|s| *s == self)
            .map_or(0, |i| i + 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Extract => "extract-audio",
            Stage::Transcribe => "transcribe",
            Stage::Translate => "translate",
            Stage::Synthesize => "synthesize-speech",
            Stage::Mux => "mux-output",
        }
    }

    /// The message persisted on the job when this stage yields nothing.
    pub fn failure_message(self) -> &'static str {
        match self {
            Stage::Extract => "Failed to extract audio from video",
            Stage::Transcribe => "Failed to transcribe audio",
            Stage::Translate => "Failed to translate text",
            Stage::Synthesize => "Failed to generate AI speech",
            Stage::Mux => "Failed to replace video audio",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Record kinds that can fail to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Job,
    Video,
    Language,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Job => f.write_str("Dubbing job"),
            Entity::Video => f.write_str("Video"),
            Entity::Language => f.write_str("Language"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DubbingError {
    #[error("{entity} {id} not found")]
    Reference { entity: Entity, id: Uuid },

    #[error("{}", .0.failure_message())]
    Stage(Stage),

    #[error("{tool} failed: {detail}")]
    ExternalTool { tool: String, detail: String },

    #[error("{tool} timed out after {seconds}s")]
    ToolTimeout { tool: String, seconds: u64 },

    #[error("{service} request failed: {detail}")]
    ExternalService { service: &'static str, detail: String },

    #[error("{0}")]
    Unexpected(String),
}

impl DubbingError {
    pub fn not_found(entity: Entity, id: Uuid) -> Self {
        DubbingError::Reference { entity, id }
    }

    pub fn tool(tool: impl Into<String>, detail: impl Into<String>) -> Self {
        DubbingError::ExternalTool {
            tool: tool.into(),
            detail: detail.into(),
        }
    }

    pub fn service(service: &'static str, detail: impl fmt::Display) -> Self {
        DubbingError::ExternalService {
            service,
            detail: detail.to_string(),
        }
    }
}

impl From<std::io::Error> for DubbingError {
    fn from(err: std::io::Error) -> Self {
        DubbingError::Unexpected(err.to_string())
    }
}

impl From<reqwest::Error> for DubbingError {
    fn from(err: reqwest::Error) -> Self {
        DubbingError::service("openai", err)
    }
}

pub type DubbingResult<T> = Result<T, DubbingError>;
