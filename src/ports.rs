//! Port traits for the external capabilities the dialogue loop depends on
//!
//! The core never touches audio hardware or HTTP directly; it drives these
//! three boundaries. Expected recognition failures are modeled as
//! [`TranscriptOutcome`] values rather than errors so the loop handles every
//! case explicitly.

use std::time::Duration;

use async_trait::async_trait;

use crate::Result;

/// Bounds for a single listen operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenWindow {
    /// How long to wait for speech to begin
    pub timeout: Duration,
    /// Maximum total utterance length once speech has begun
    pub max_phrase: Duration,
}

impl ListenWindow {
    /// Create a listen window from whole seconds
    #[must_use]
    pub const fn from_secs(timeout: u64, max_phrase: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout),
            max_phrase: Duration::from_secs(max_phrase),
        }
    }
}

/// Outcome of a listen-and-transcribe operation
///
/// These are values, not errors: the transcription port never raises past
/// its own boundary for expected failure modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptOutcome {
    /// Speech was captured and recognized
    Text(String),
    /// Audio was captured but could not be recognized
    NoMatch,
    /// No speech began within the listen window
    Timeout,
    /// The transcription service failed
    ServiceError(String),
}

/// Captures one utterance from the microphone and transcribes it
#[async_trait(?Send)]
pub trait TranscriptionPort {
    /// Listen for a single utterance bounded by `window`
    async fn listen(&mut self, window: ListenWindow) -> TranscriptOutcome;
}

/// Renders text audibly, blocking until playback finishes
#[async_trait(?Send)]
pub trait SpeechOutputPort {
    /// Speak `text`, returning once playback is complete
    ///
    /// # Errors
    ///
    /// Returns error if synthesis or playback fails
    async fn speak(&mut self, text: &str) -> Result<()>;

    /// Play a short cue indicating the assistant is about to capture a command
    ///
    /// # Errors
    ///
    /// Returns error if playback fails
    async fn chime(&mut self) -> Result<()>;

    /// Set output volume, clamped to [0.1, 1.0]
    fn set_volume(&mut self, volume: f32);

    /// Current output volume
    fn volume(&self) -> f32;
}

/// Generates a text reply for a prompt
#[async_trait(?Send)]
pub trait LanguageModelPort {
    /// Generate a reply for `prompt`
    ///
    /// # Errors
    ///
    /// Returns error if the model request fails
    async fn generate(&self, prompt: &str) -> Result<String>;
}
