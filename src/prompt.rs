//! Prompt construction for the language-model port

use crate::history::ConversationHistory;

/// Number of recent exchanges serialized into each prompt
pub const CONTEXT_EXCHANGES: usize = 3;

/// Spoken when the language model fails; replaces the reply, never crashes
pub const LLM_APOLOGY: &str =
    "I'm sorry, I'm having trouble connecting to my brain right now. Please try again.";

/// Persona framing prepended to every prompt
const SYSTEM_FRAMING: &str = "You are a helpful voice assistant in a smart speaker. \
Keep your responses concise and conversational, typically 1-2 sentences unless asked \
for detailed information. Be friendly, natural, and helpful.";

/// Build the bounded-context prompt for a user input
///
/// Persona framing, then the last [`CONTEXT_EXCHANGES`] exchanges rendered
/// oldest-first as "User:"/"Assistant:" lines, then the new input.
#[must_use]
pub fn build_prompt(history: &ConversationHistory, user_input: &str) -> String {
    let mut prompt = String::from(SYSTEM_FRAMING);

    let context: Vec<String> = history
        .recent(CONTEXT_EXCHANGES)
        .map(|e| format!("User: {}\nAssistant: {}", e.user, e.assistant))
        .collect();

    if !context.is_empty() {
        prompt.push_str("\n\nPrevious conversation:\n");
        prompt.push_str(&context.join("\n"));
    }

    prompt.push_str("\n\nCurrent user input: ");
    prompt.push_str(user_input);
    prompt.push_str("\n\nPlease provide a helpful response:");

    prompt
}
