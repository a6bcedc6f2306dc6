//! Special-command resolver
//!
//! Recognizes a small closed set of local intents from a transcribed command
//! before the language model is consulted. Pure pattern matching plus simple
//! session mutation; it never fails.
//!
//! Matching is case-folded substring search, same as wake detection. That
//! means "stop" inside "nonstop" matches; this mirrors the product behavior
//! and is deliberately not tightened here.

use chrono::Local;

use crate::session::Session;

/// Phrases that ask for the current time
const TIME_PHRASES: &[&str] = &["what time is it", "current time", "time now"];

/// Phrases that ask for today's date
const DATE_PHRASES: &[&str] = &["what day is it", "what's the date", "today's date"];

/// Phrases that stop the assistant
const STOP_PHRASES: &[&str] = &["stop listening", "goodbye", "shut down", "quit"];

/// Phrases that clear conversation memory
const RESET_PHRASES: &[&str] = &["clear conversation", "reset conversation", "start over"];

/// Phrases that lower the output volume
const VOLUME_DOWN_PHRASES: &[&str] = &["lower volume", "speak quieter"];

/// Phrases that raise the output volume
const VOLUME_UP_PHRASES: &[&str] = &["raise volume", "speak louder"];

/// Result of resolving a command locally
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A local reply to speak; the language model is bypassed
    Reply(String),
    /// Stop sentinel; the loop should speak a farewell and terminate
    Stop,
    /// Not a special command; escalate to the language model
    Unhandled,
}

/// Resolve a transcribed command against the special-command table
///
/// Tests phrase sets in a fixed priority order; the first match wins. Every
/// input maps to exactly one outcome.
pub fn resolve(command: &str, session: &mut Session) -> CommandOutcome {
    let folded = command.to_lowercase();

    if matches_any(&folded, TIME_PHRASES) {
        let now = Local::now().format("%I:%M %p");
        return CommandOutcome::Reply(format!("The current time is {now}"));
    }

    if matches_any(&folded, DATE_PHRASES) {
        let today = Local::now().format("%A, %B %d, %Y");
        return CommandOutcome::Reply(format!("Today is {today}"));
    }

    if matches_any(&folded, STOP_PHRASES) {
        tracing::info!(command, "stop phrase detected");
        return CommandOutcome::Stop;
    }

    if matches_any(&folded, RESET_PHRASES) {
        session.history.clear();
        return CommandOutcome::Reply(
            "Conversation history cleared. How can I help you?".to_string(),
        );
    }

    if matches_any(&folded, VOLUME_DOWN_PHRASES) {
        session.speaker.volume_down();
        return CommandOutcome::Reply(format!(
            "Volume lowered to {}%",
            session.speaker.volume_percent()
        ));
    }

    if matches_any(&folded, VOLUME_UP_PHRASES) {
        session.speaker.volume_up();
        return CommandOutcome::Reply(format!(
            "Volume raised to {}%",
            session.speaker.volume_percent()
        ));
    }

    CommandOutcome::Unhandled
}

/// Case-folded substring membership test
fn matches_any(folded_command: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| folded_command.contains(p))
}
