//! Voice processing module
//!
//! Microphone capture, playback, wake phrase matching, and the concrete
//! cloud-backed adapters for the transcription and speech output ports.

pub mod capture;
pub mod playback;
mod stt;
mod tts;
mod wake;

pub use capture::{AudioCapture, SAMPLE_RATE, rms_energy, samples_to_wav};
pub use playback::{AudioPlayback, PLAYBACK_SAMPLE_RATE};
pub use stt::{CloudTranscriber, MicTranscriber};
pub use tts::{Speaker, SpeechSynthesizer, sine_tone};
pub use wake::WakePhraseMatcher;
