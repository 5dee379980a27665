use std::fmt;

/// Language vocabulary understood by the translation and speech services.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LanguageCode {
    English,
    Spanish,
    French,
    German,
    Unrecognized(String),
}

impl LanguageCode {
    pub fn parse(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => LanguageCode::English,
            "es" => LanguageCode::Spanish,
            "fr" => LanguageCode::French,
            "de" => LanguageCode::German,
            _ => LanguageCode::Unrecognized(code.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            LanguageCode::English => "en",
            LanguageCode::Spanish => "es",
            LanguageCode::French => "fr",
            LanguageCode::German => "de",
            LanguageCode::Unrecognized(code) => code,
        }
    }

    /// Name used in prompts. Unknown codes pass through unchanged.
    pub fn display_name(&self) -> &str {
        match self {
            LanguageCode::English => "English",
            LanguageCode::Spanish => "Spanish",
            LanguageCode::French => "French",
            LanguageCode::German => "German",
            LanguageCode::Unrecognized(code) => code,
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
