//! Mock ports for exercising the dialogue loop without hardware or network

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use hearth_assistant::{
    Error, LanguageModelPort, ListenWindow, Result, SpeechOutputPort, TranscriptOutcome,
    TranscriptionPort,
};

/// What a scripted transcriber does when its script runs out
#[derive(Clone, Copy)]
pub enum OnExhausted {
    /// Fail the test; the loop listened more than expected
    Panic,
    /// Keep returning timeouts (for interrupt tests)
    Timeout,
}

/// Transcription port that replays a fixed script of outcomes
pub struct ScriptedTranscriber {
    script: VecDeque<TranscriptOutcome>,
    on_exhausted: OnExhausted,
    windows: Arc<Mutex<Vec<ListenWindow>>>,
}

impl ScriptedTranscriber {
    pub fn new(script: Vec<TranscriptOutcome>) -> Self {
        Self {
            script: script.into(),
            on_exhausted: OnExhausted::Panic,
            windows: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_exhausted(mut self, behavior: OnExhausted) -> Self {
        self.on_exhausted = behavior;
        self
    }

    /// Handle to the listen windows observed, in call order
    pub fn windows(&self) -> Arc<Mutex<Vec<ListenWindow>>> {
        Arc::clone(&self.windows)
    }
}

#[async_trait(?Send)]
impl TranscriptionPort for ScriptedTranscriber {
    async fn listen(&mut self, window: ListenWindow) -> TranscriptOutcome {
        self.windows.lock().unwrap().push(window);

        self.script.pop_front().unwrap_or_else(|| match self.on_exhausted {
            OnExhausted::Panic => panic!("transcription script exhausted"),
            OnExhausted::Timeout => TranscriptOutcome::Timeout,
        })
    }
}

/// Speech output port that records everything instead of playing audio
pub struct RecordingSpeaker {
    spoken: Arc<Mutex<Vec<String>>>,
    chimes: Arc<Mutex<usize>>,
    volumes_set: Arc<Mutex<Vec<f32>>>,
    volume: f32,
}

impl Default for RecordingSpeaker {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self {
            spoken: Arc::new(Mutex::new(Vec::new())),
            chimes: Arc::new(Mutex::new(0)),
            volumes_set: Arc::new(Mutex::new(Vec::new())),
            volume: 0.9,
        }
    }

    /// Handle to everything spoken, in order
    pub fn spoken(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.spoken)
    }

    /// Handle to the chime count
    pub fn chimes(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.chimes)
    }

    /// Handle to every volume value the loop pushed to the port
    pub fn volumes_set(&self) -> Arc<Mutex<Vec<f32>>> {
        Arc::clone(&self.volumes_set)
    }
}

#[async_trait(?Send)]
impl SpeechOutputPort for RecordingSpeaker {
    async fn speak(&mut self, text: &str) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn chime(&mut self) -> Result<()> {
        *self.chimes.lock().unwrap() += 1;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.volumes_set.lock().unwrap().push(volume);
    }

    fn volume(&self) -> f32 {
        self.volume
    }
}

/// Speech output port where synthesis always fails
///
/// Tracks nothing but the attempts; used to pin down that speech failures
/// are logged, never fatal.
pub struct BrokenSpeaker {
    attempts: Arc<Mutex<Vec<String>>>,
    volume: f32,
}

impl Default for BrokenSpeaker {
    fn default() -> Self {
        Self::new()
    }
}

impl BrokenSpeaker {
    pub fn new() -> Self {
        Self {
            attempts: Arc::new(Mutex::new(Vec::new())),
            volume: 0.9,
        }
    }

    /// Handle to every text the loop tried to speak, in order
    pub fn attempts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.attempts)
    }
}

#[async_trait(?Send)]
impl SpeechOutputPort for BrokenSpeaker {
    async fn speak(&mut self, text: &str) -> Result<()> {
        self.attempts.lock().unwrap().push(text.to_string());
        Err(Error::Tts("synthesis backend unavailable".to_string()))
    }

    async fn chime(&mut self) -> Result<()> {
        Err(Error::Audio("output device unavailable".to_string()))
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn volume(&self) -> f32 {
        self.volume
    }
}

/// Language-model port that replays scripted replies
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<std::result::Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A model the test expects to never be invoked
    pub fn unreachable() -> Self {
        Self::new(Vec::new())
    }

    /// Handle to the prompts received, in order
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

#[async_trait(?Send)]
impl LanguageModelPort for ScriptedLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let scripted = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("language model invoked without a scripted reply"));

        scripted.map_err(Error::Llm)
    }
}
