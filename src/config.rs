//! Configuration for the Hearth assistant
//!
//! Everything comes from the environment. The only required value is the
//! Gemini API key; its absence is fatal at startup with a remediation
//! message, before the loop ever runs.

use crate::{Error, Result};

/// Default wake phrases
const DEFAULT_WAKE_PHRASES: &[&str] = &["hey hearth", "hello hearth", "hey assistant", "hey speaker"];

/// Assistant configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Phrases that activate command listening
    pub wake_phrases: Vec<String>,

    /// API keys
    pub api_keys: ApiKeys,

    /// STT model identifier (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model identifier (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// Gemini model for replies
    pub llm_model: String,
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Gemini API key (required)
    pub gemini: String,

    /// `OpenAI` API key (STT and TTS adapters)
    pub openai: Option<String>,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns a configuration error with a remediation message if
    /// `GEMINI_API_KEY` is not set
    pub fn load() -> Result<Self> {
        let gemini = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "GEMINI_API_KEY is not set. Get an API key from \
                     https://aistudio.google.com/apikey and export it before starting"
                        .to_string(),
                )
            })?;

        let api_keys = ApiKeys {
            gemini,
            openai: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
        };

        let wake_phrases = std::env::var("HEARTH_WAKE_PHRASES").map_or_else(
            |_| {
                DEFAULT_WAKE_PHRASES
                    .iter()
                    .map(ToString::to_string)
                    .collect()
            },
            |raw| parse_wake_phrases(&raw),
        );

        let stt_model =
            std::env::var("HEARTH_STT_MODEL").unwrap_or_else(|_| "whisper-1".to_string());
        let tts_model = std::env::var("HEARTH_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string());
        let tts_voice = std::env::var("HEARTH_TTS_VOICE").unwrap_or_else(|_| "nova".to_string());
        let llm_model = std::env::var("HEARTH_LLM_MODEL")
            .unwrap_or_else(|_| crate::llm::DEFAULT_MODEL.to_string());

        Ok(Self {
            wake_phrases,
            api_keys,
            stt_model,
            tts_model,
            tts_voice,
            llm_model,
        })
    }
}

/// Parse a comma-separated wake phrase list, falling back to defaults when
/// every entry is blank
fn parse_wake_phrases(raw: &str) -> Vec<String> {
    let phrases: Vec<String> = raw
        .split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    if phrases.is_empty() {
        DEFAULT_WAKE_PHRASES.iter().map(ToString::to_string).collect()
    } else {
        phrases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wake_phrases() {
        assert_eq!(
            parse_wake_phrases("hey hearth, computer "),
            vec!["hey hearth".to_string(), "computer".to_string()]
        );
    }

    #[test]
    fn test_parse_wake_phrases_blank_falls_back() {
        let phrases = parse_wake_phrases(" , ,");
        assert_eq!(phrases.len(), DEFAULT_WAKE_PHRASES.len());
    }
}
