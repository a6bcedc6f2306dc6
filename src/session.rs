//! Session state owned by the dialogue loop
//!
//! Conversation history, speaker settings, and the run state live in one
//! explicit object passed into the loop and resolver. Nothing else mutates
//! it, so no locks are needed.

use crate::history::ConversationHistory;

/// Lowest permitted output volume
pub const MIN_VOLUME: f32 = 0.1;

/// Highest permitted output volume
pub const MAX_VOLUME: f32 = 1.0;

/// Step applied by the volume up/down commands
pub const VOLUME_STEP: f32 = 0.2;

/// Default output volume at session start
pub const DEFAULT_VOLUME: f32 = 0.9;

/// Whether the assistant should keep looping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Loop keeps iterating
    #[default]
    Running,
    /// Stop requested; terminal
    Stopping,
}

/// Mutable session-scoped speaker state
#[derive(Debug, Clone)]
pub struct SpeakerSettings {
    volume: f32,
    wake_phrases: Vec<String>,
}

impl SpeakerSettings {
    /// Create settings with the given wake phrases and default volume
    #[must_use]
    pub fn new(wake_phrases: Vec<String>) -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            wake_phrases,
        }
    }

    /// Current output volume, always within [0.1, 1.0]
    #[must_use]
    pub const fn volume(&self) -> f32 {
        self.volume
    }

    /// Current volume as an integer percentage
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn volume_percent(&self) -> u32 {
        (self.volume * 100.0).round() as u32
    }

    /// Decrease volume by one step, saturating at the floor
    pub fn volume_down(&mut self) -> f32 {
        self.volume = (self.volume - VOLUME_STEP).max(MIN_VOLUME);
        tracing::debug!(volume = self.volume, "volume lowered");
        self.volume
    }

    /// Increase volume by one step, saturating at the cap
    pub fn volume_up(&mut self) -> f32 {
        self.volume = (self.volume + VOLUME_STEP).min(MAX_VOLUME);
        tracing::debug!(volume = self.volume, "volume raised");
        self.volume
    }

    /// The configured wake phrases
    #[must_use]
    pub fn wake_phrases(&self) -> &[String] {
        &self.wake_phrases
    }
}

/// Session state for one assistant run
#[derive(Debug)]
pub struct Session {
    /// Rolling conversation memory
    pub history: ConversationHistory,
    /// Output volume and wake phrases
    pub speaker: SpeakerSettings,
    run_state: RunState,
}

impl Session {
    /// Create a fresh session
    #[must_use]
    pub fn new(wake_phrases: Vec<String>) -> Self {
        Self {
            history: ConversationHistory::new(),
            speaker: SpeakerSettings::new(wake_phrases),
            run_state: RunState::Running,
        }
    }

    /// Current run state
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Whether the loop should keep iterating
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Transition to the terminal stopping state
    pub fn stop(&mut self) {
        self.run_state = RunState::Stopping;
        tracing::info!("session stopping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_down_saturates() {
        let mut settings = SpeakerSettings::new(vec![]);
        settings.volume = 0.3;

        assert!((settings.volume_down() - 0.1).abs() < f32::EPSILON);
        assert!((settings.volume_down() - 0.1).abs() < f32::EPSILON);
        assert!((settings.volume() - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_volume_up_saturates() {
        let mut settings = SpeakerSettings::new(vec![]);
        assert!((settings.volume() - 0.9).abs() < f32::EPSILON);

        assert!((settings.volume_up() - 1.0).abs() < f32::EPSILON);
        assert!((settings.volume_up() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_volume_percent() {
        let mut settings = SpeakerSettings::new(vec![]);
        assert_eq!(settings.volume_percent(), 90);
        settings.volume_down();
        assert_eq!(settings.volume_percent(), 70);
    }

    #[test]
    fn test_stop_is_terminal() {
        let mut session = Session::new(vec!["hey hearth".to_string()]);
        assert!(session.is_running());

        session.stop();
        assert_eq!(session.run_state(), RunState::Stopping);
        assert!(!session.is_running());
    }
}
