//! Wake phrase matching over transcribed text
//!
//! The assistant has no on-device wake-word model; ambient audio is
//! transcribed in short windows and the text is checked here. Any configured
//! phrase occurring anywhere in the utterance qualifies.

/// Matches transcripts against a fixed set of wake phrases
#[derive(Debug, Clone)]
pub struct WakePhraseMatcher {
    phrases: Vec<String>,
}

impl WakePhraseMatcher {
    /// Create a matcher; phrases are lowercased and trimmed once up front
    #[must_use]
    pub fn new(phrases: &[String]) -> Self {
        let normalized: Vec<String> = phrases
            .iter()
            .map(|p| p.to_lowercase().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        tracing::debug!(phrases = ?normalized, "wake phrase matcher initialized");

        Self { phrases: normalized }
    }

    /// The phrase detected in `transcript`, if any
    ///
    /// Case-insensitive substring search over the full transcript.
    #[must_use]
    pub fn detect(&self, transcript: &str) -> Option<&str> {
        let folded = transcript.to_lowercase();
        self.phrases
            .iter()
            .find(|p| folded.contains(p.as_str()))
            .map(String::as_str)
    }

    /// Whether `transcript` contains any wake phrase
    #[must_use]
    pub fn matches(&self, transcript: &str) -> bool {
        self.detect(transcript).is_some()
    }

    /// The normalized phrase list
    #[must_use]
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}
