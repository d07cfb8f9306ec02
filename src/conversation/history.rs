//! Ordered conversation history and the trimming policy over it.

use tracing::debug;

use crate::error::{ChatError, Result};
use crate::tokenizer::TokenCounter;
use crate::types::Message;

/// Ordered message history whose first entry is always the system message.
///
/// Insertion order is chronological order, and the sequence is exactly the
/// context sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    pub fn system_prompt(&self) -> &str {
        self.messages[0].text()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of entries, including the system message.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Append a user or assistant message.
    pub fn push(&mut self, message: Message) -> Result<()> {
        if message.is_system() {
            return Err(ChatError::MalformedInput(
                "a conversation holds exactly one system message".into(),
            ));
        }
        self.messages.push(message);
        Ok(())
    }

    /// Drop everything but the system message.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }

    /// Remove the newest entry if it is a user message, returning its text.
    pub fn pop_user(&mut self) -> Option<String> {
        if self.messages.len() > 1 && matches!(self.messages.last(), Some(Message::User(_))) {
            return match self.messages.pop() {
                Some(Message::User(text)) => Some(text),
                _ => None,
            };
        }
        None
    }

    /// Trim in place so the sequence fits `budget` prompt tokens.
    pub fn trim_to_budget<C: TokenCounter + ?Sized>(
        &mut self,
        budget: usize,
        counter: &C,
    ) -> TrimOutcome {
        trim_messages(&mut self.messages, budget, counter)
    }
}

/// Result of a trimming pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimOutcome {
    /// Entries removed from the front of the non-system region.
    pub removed: usize,
    /// Prompt tokens used by the remaining sequence.
    pub used_tokens: usize,
    /// Prompt-token ceiling the pass trimmed against.
    pub budget: usize,
}

impl TrimOutcome {
    pub fn within_budget(&self) -> bool {
        self.used_tokens <= self.budget
    }
}

/// Pure form of the trimming policy: returns the trimmed copy of `messages`.
///
/// Removes the oldest entry after the system message, one at a time, until the
/// sequence fits `budget` or only the system message and one other entry remain.
pub fn trim_to_budget<C: TokenCounter + ?Sized>(
    messages: &[Message],
    budget: usize,
    counter: &C,
) -> (Vec<Message>, TrimOutcome) {
    let mut trimmed = messages.to_vec();
    let outcome = trim_messages(&mut trimmed, budget, counter);
    (trimmed, outcome)
}

fn trim_messages<C: TokenCounter + ?Sized>(
    messages: &mut Vec<Message>,
    budget: usize,
    counter: &C,
) -> TrimOutcome {
    let mut used = counter.count_message_sequence_tokens(messages);
    let mut removed = 0;

    while used > budget && messages.len() > 2 {
        let dropped = messages.remove(1);
        removed += 1;
        used = counter.count_message_sequence_tokens(messages);
        debug!(
            role = %dropped.role(),
            used_tokens = used,
            budget,
            "trimmed oldest message from history"
        );
    }

    TrimOutcome {
        removed,
        used_tokens: used,
        budget,
    }
}
