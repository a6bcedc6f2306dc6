//! Short-term conversation memory
//!
//! A bounded rolling log of the most recent exchanges, used to build prompt
//! context. Nothing here is persisted; the history lives and dies with the
//! session.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Maximum number of exchanges retained
pub const MAX_EXCHANGES: usize = 10;

/// One user-command/assistant-reply pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// What the user said
    pub user: String,
    /// What the assistant replied
    pub assistant: String,
    /// When the exchange completed
    pub timestamp: DateTime<Utc>,
}

impl Exchange {
    /// Create an exchange stamped with the current time
    #[must_use]
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered rolling log of exchanges, most-recent last
///
/// Invariant: never holds more than [`MAX_EXCHANGES`] entries. On overflow
/// the oldest entry is evicted.
#[derive(Debug, Default, Clone)]
pub struct ConversationHistory {
    exchanges: VecDeque<Exchange>,
}

impl ConversationHistory {
    /// Create an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an exchange, evicting the oldest entry if at capacity
    pub fn push(&mut self, exchange: Exchange) {
        if self.exchanges.len() == MAX_EXCHANGES {
            self.exchanges.pop_front();
        }
        self.exchanges.push_back(exchange);
        tracing::debug!(len = self.exchanges.len(), "exchange recorded");
    }

    /// The last `n` exchanges, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Exchange> {
        let skip = self.exchanges.len().saturating_sub(n);
        self.exchanges.iter().skip(skip)
    }

    /// Number of stored exchanges
    #[must_use]
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    /// Whether the history is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Drop all stored exchanges
    pub fn clear(&mut self) {
        self.exchanges.clear();
        tracing::debug!("conversation history cleared");
    }

    /// Iterate all exchanges, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange(n: usize) -> Exchange {
        Exchange::new(format!("question {n}"), format!("answer {n}"))
    }

    #[test]
    fn test_push_and_len() {
        let mut history = ConversationHistory::new();
        assert!(history.is_empty());

        history.push(exchange(1));
        history.push(exchange(2));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut history = ConversationHistory::new();
        for n in 0..=MAX_EXCHANGES {
            history.push(exchange(n));
        }

        assert_eq!(history.len(), MAX_EXCHANGES);

        // Entry 0 evicted, order of the rest preserved
        let users: Vec<String> = history.iter().map(|e| e.user.clone()).collect();
        let expected: Vec<String> = (1..=MAX_EXCHANGES).map(|n| format!("question {n}")).collect();
        assert_eq!(users, expected);
    }

    #[test]
    fn test_recent_is_oldest_first() {
        let mut history = ConversationHistory::new();
        for n in 1..=5 {
            history.push(exchange(n));
        }

        let recent: Vec<&str> = history.recent(3).map(|e| e.user.as_str()).collect();
        assert_eq!(recent, vec!["question 3", "question 4", "question 5"]);
    }

    #[test]
    fn test_recent_with_short_history() {
        let mut history = ConversationHistory::new();
        history.push(exchange(1));

        assert_eq!(history.recent(3).count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut history = ConversationHistory::new();
        history.push(exchange(1));
        history.clear();
        assert!(history.is_empty());
    }
}
