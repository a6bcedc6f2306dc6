//! Hearth - a wake-word voice assistant
//!
//! Listens continuously for a wake phrase, captures a spoken command,
//! serves a small set of local special commands, and otherwise forwards the
//! command to a cloud language model and speaks the reply.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                 Dialogue Loop                     │
//! │  wake listen → command capture → dispatch → ...   │
//! │  owns: ConversationHistory, SpeakerSettings,      │
//! │        RunState                                   │
//! └───────┬───────────────┬───────────────┬──────────┘
//!         │               │               │
//!   Transcription   Speech Output   Language Model
//!       Port            Port            Port
//!         │               │               │
//!   mic + Whisper   OpenAI TTS +     Gemini API
//!       (cpal)      cpal playback
//! ```
//!
//! The loop is single-flow: listen, speak, and generate are awaited
//! sequentially, and session state is owned by the loop, so no locks guard
//! it. Cancellation is external-only via an interrupt channel.

pub mod commands;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod history;
pub mod llm;
pub mod ports;
pub mod prompt;
pub mod session;
pub mod voice;

pub use commands::CommandOutcome;
pub use config::Config;
pub use dialogue::{DialogueLoop, Phase, Utterance, UtteranceSource};
pub use error::{Error, Result};
pub use history::{ConversationHistory, Exchange, MAX_EXCHANGES};
pub use llm::GeminiClient;
pub use ports::{LanguageModelPort, ListenWindow, SpeechOutputPort, TranscriptOutcome, TranscriptionPort};
pub use session::{RunState, Session, SpeakerSettings};
pub use voice::WakePhraseMatcher;
