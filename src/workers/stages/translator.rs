use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use super::Translator;
use super::language::LanguageCode;
use super::openai::{ChatMessage, ChatRequest, OpenAiClient};
use crate::config::settings::OpenAiConfig;

const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.3;

pub struct ChatTranslator {
    client: OpenAiClient,
    model: String,
    timeout: Duration,
}

impl ChatTranslator {
    pub fn new(client: OpenAiClient, config: &OpenAiConfig) -> Self {
        Self {
            client,
            model: config.translation_model.clone(),
            timeout: config.translation_timeout,
        }
    }
}

pub fn system_prompt(target: &LanguageCode) -> String {
    format!(
        "Translate the following text to {}. Preserve the natural flow and timing \
         suitable for dubbing. Only return the translated text, no explanations.",
        target.display_name()
    )
}

#[async_trait]
impl Translator for ChatTranslator {
    async fn translate(&self, text: &str, target_code: &str) -> Option<String> {
        let target = LanguageCode::parse(target_code);
        let prompt = system_prompt(&target);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        match self.client.chat(&request, self.timeout).await {
            Ok(translated) if !translated.trim().is_empty() => {
                debug!("Translated {} chars to {}", text.len(), target);
                Some(translated.trim().to_string())
            }
            Ok(_) => {
                error!("Translation to {} was empty", target);
                None
            }
            Err(e) => {
                error!("Error translating text: {}", e);
                None
            }
        }
    }
}
