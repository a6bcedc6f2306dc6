//! The dialogue loop: wake-word detection, command capture, and dispatch
//!
//! Drives the assistant's top-level cycle until stopped. All I/O goes
//! through the port traits, so the loop itself never branches on platform
//! or transport. Expected recognition failures arrive as
//! [`TranscriptOutcome`] values and are handled in place; only truly
//! unexpected errors unwind to the loop boundary in [`DialogueLoop::run`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::commands::{self, CommandOutcome};
use crate::history::Exchange;
use crate::ports::{LanguageModelPort, ListenWindow, SpeechOutputPort, TranscriptOutcome, TranscriptionPort};
use crate::prompt::{LLM_APOLOGY, build_prompt};
use crate::session::Session;
use crate::voice::WakePhraseMatcher;
use crate::Result;

/// Wake listening: short window, short phrase
const WAKE_WINDOW: ListenWindow = ListenWindow::from_secs(1, 3);

/// Command capture: longer window after the wake phrase
const COMMAND_WINDOW: ListenWindow = ListenWindow::from_secs(8, 15);

/// Pause after handling a command, so trailing audio is not re-captured
const POST_COMMAND_PAUSE: Duration = Duration::from_millis(500);

/// Pause between idle wake-listening iterations
const IDLE_PAUSE: Duration = Duration::from_millis(100);

/// Spoken once at startup
pub const GREETING: &str = "Hello! I'm Hearth, your voice assistant. I'm ready to help!";

/// Spoken when a stop phrase ends the session
pub const FAREWELL: &str = "Goodbye! Have a great day!";

/// Spoken on external interrupt
pub const INTERRUPT_FAREWELL: &str = "Goodbye!";

/// Spoken when a command was captured but not recognized
pub const RETRY_PROMPT: &str = "I'm sorry, I didn't understand that. Could you please repeat?";

/// Spoken when command capture times out
pub const TIMEOUT_PROMPT: &str = "I didn't hear anything. Try saying the wake phrase again.";

/// Spoken when the transcription service fails during command capture
pub const STT_TROUBLE: &str = "I'm having trouble with speech recognition right now.";

/// Spoken once at the loop boundary before an unexpected error exits
pub const FATAL_APOLOGY: &str = "I encountered an error and need to shut down.";

/// Where an utterance came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtteranceSource {
    /// Captured during wake-phrase listening
    Wake,
    /// Captured during command listening
    Command,
}

/// One transcribed utterance; exists only within a loop iteration
#[derive(Debug, Clone)]
pub struct Utterance {
    /// Raw transcribed text
    pub text: String,
    /// When the transcript arrived
    pub captured_at: DateTime<Utc>,
    /// Which listening pass produced it
    pub source: UtteranceSource,
}

impl Utterance {
    fn new(text: String, source: UtteranceSource) -> Self {
        Self {
            text,
            captured_at: Utc::now(),
            source,
        }
    }
}

/// Loop state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Polling short windows for a wake phrase
    ListeningForWake,
    /// Wake phrase heard; capturing a command
    ListeningForCommand,
    /// Resolving or forwarding a captured command
    Dispatching,
    /// Terminal; no further listening
    Stopped,
}

enum Tick {
    Interrupted,
    Stepped(Result<()>),
}

/// Orchestrates wake-word detection, command capture, and dispatch
pub struct DialogueLoop<T, S, L> {
    transcriber: T,
    speech: S,
    llm: L,
    matcher: WakePhraseMatcher,
    session: Session,
    phase: Phase,
}

impl<T, S, L> DialogueLoop<T, S, L>
where
    T: TranscriptionPort,
    S: SpeechOutputPort,
    L: LanguageModelPort,
{
    /// Create a loop over the three ports
    pub fn new(transcriber: T, mut speech: S, llm: L, wake_phrases: Vec<String>) -> Self {
        let matcher = WakePhraseMatcher::new(&wake_phrases);
        let session = Session::new(wake_phrases);
        speech.set_volume(session.speaker.volume());

        Self {
            transcriber,
            speech,
            llm,
            matcher,
            session,
            phase: Phase::ListeningForWake,
        }
    }

    /// Session state, for inspection after the loop ends
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Current loop phase
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Run until a stop phrase, an interrupt, or an unexpected error
    ///
    /// The interrupt channel is observed between and during the blocking
    /// listen/speak points; on interrupt a best-effort farewell is spoken
    /// and the loop exits gracefully.
    ///
    /// # Errors
    ///
    /// Returns error only for unexpected failures; a generic apology is
    /// spoken first. Recoverable conditions never surface here.
    pub async fn run(&mut self, interrupt: &mut mpsc::Receiver<()>) -> Result<()> {
        tracing::info!(wake_phrases = ?self.matcher.phrases(), "dialogue loop started");
        self.announce(GREETING).await;

        while self.session.is_running() {
            let tick = tokio::select! {
                _ = interrupt.recv() => Tick::Interrupted,
                result = self.step() => Tick::Stepped(result),
            };

            match tick {
                Tick::Interrupted => {
                    tracing::info!("interrupt received");
                    self.announce(INTERRUPT_FAREWELL).await;
                    self.session.stop();
                    self.phase = Phase::Stopped;
                }
                Tick::Stepped(Ok(())) => {}
                // None of the bundled ports error through step today; this
                // boundary covers adapters that do
                Tick::Stepped(Err(e)) => {
                    tracing::error!(error = %e, "unexpected error in dialogue loop");
                    self.announce(FATAL_APOLOGY).await;
                    self.phase = Phase::Stopped;
                    return Err(e);
                }
            }
        }

        tracing::info!("dialogue loop stopped");
        Ok(())
    }

    /// One wake-listening iteration
    async fn step(&mut self) -> Result<()> {
        self.phase = Phase::ListeningForWake;

        match self.transcriber.listen(WAKE_WINDOW).await {
            TranscriptOutcome::Text(text) => {
                let utterance = Utterance::new(text, UtteranceSource::Wake);
                let detected = self.matcher.detect(&utterance.text).map(ToString::to_string);

                if let Some(phrase) = detected {
                    tracing::info!(phrase, transcript = %utterance.text, "wake phrase detected");
                    self.capture_command().await?;
                } else {
                    tracing::debug!(transcript = %utterance.text, "no wake phrase");
                }
            }
            TranscriptOutcome::NoMatch | TranscriptOutcome::Timeout => {
                tracing::trace!("nothing recognized during wake listening");
            }
            // Recoverable-silent: no user-visible feedback during wake listening
            TranscriptOutcome::ServiceError(msg) => {
                tracing::warn!(error = %msg, "transcription service error during wake listening");
            }
        }

        tokio::time::sleep(IDLE_PAUSE).await;
        Ok(())
    }

    /// Capture a command after a wake phrase and handle it
    async fn capture_command(&mut self) -> Result<()> {
        self.phase = Phase::ListeningForCommand;

        if let Err(e) = self.speech.chime().await {
            tracing::warn!(error = %e, "capture cue failed");
        }

        match self.transcriber.listen(COMMAND_WINDOW).await {
            TranscriptOutcome::Text(text) => {
                let utterance = Utterance::new(text, UtteranceSource::Command);
                tracing::info!(command = %utterance.text, "command received");
                self.phase = Phase::Dispatching;
                self.dispatch(&utterance).await;
            }
            TranscriptOutcome::NoMatch => {
                tracing::debug!("command not understood");
                self.announce(RETRY_PROMPT).await;
            }
            TranscriptOutcome::Timeout => {
                tracing::debug!("command capture timed out");
                self.announce(TIMEOUT_PROMPT).await;
            }
            TranscriptOutcome::ServiceError(msg) => {
                tracing::warn!(error = %msg, "transcription service error during command capture");
                self.announce(STT_TROUBLE).await;
            }
        }

        tokio::time::sleep(POST_COMMAND_PAUSE).await;

        if self.session.is_running() {
            self.phase = Phase::ListeningForWake;
        }

        Ok(())
    }

    /// Resolve a command locally or forward it to the language model
    async fn dispatch(&mut self, utterance: &Utterance) {
        match commands::resolve(&utterance.text, &mut self.session) {
            CommandOutcome::Stop => {
                self.announce(FAREWELL).await;
                self.session.stop();
                self.phase = Phase::Stopped;
            }
            CommandOutcome::Reply(reply) => {
                // Volume commands mutate the session; sync the port before
                // the confirmation is spoken at the new level
                self.speech.set_volume(self.session.speaker.volume());
                self.announce(&reply).await;
            }
            CommandOutcome::Unhandled => {
                let reply = self.generate_reply(&utterance.text).await;
                self.announce(&reply).await;
            }
        }
    }

    /// Ask the language model; absorb failures into the fixed apology
    async fn generate_reply(&mut self, command: &str) -> String {
        let prompt = build_prompt(&self.session.history, command);

        match self.llm.generate(&prompt).await {
            Ok(reply) => {
                self.session.history.push(Exchange::new(command, reply.clone()));
                reply
            }
            Err(e) => {
                tracing::warn!(error = %e, "language model failed");
                LLM_APOLOGY.to_string()
            }
        }
    }

    /// Speak, logging failures; speech output errors never stop the loop
    async fn announce(&mut self, text: &str) {
        if let Err(e) = self.speech.speak(text).await {
            tracing::error!(error = %e, text, "speech output failed");
        }
    }
}
