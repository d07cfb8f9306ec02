//! Conversation state manager.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::history::ConversationHistory;
use crate::error::{ChatError, Result};
use crate::tokenizer::{default_counter, SharedTokenCounter, TokenCounter};
use crate::types::Message;

/// Model context window, the combined prompt and completion ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBudget {
    pub context_window: usize,
}

impl ContextBudget {
    pub fn new(context_window: usize) -> Self {
        Self { context_window }
    }

    /// Prompt tokens left after reserving `max_completion_tokens` for the reply.
    pub fn max_prompt_tokens(&self, max_completion_tokens: usize) -> usize {
        self.context_window.saturating_sub(max_completion_tokens)
    }
}

/// The message sequence to submit for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub messages: Vec<Message>,
    /// Locally estimated prompt tokens for `messages`.
    pub prompt_tokens: usize,
    /// History entries dropped to make room.
    pub trimmed: usize,
}

/// Read-only snapshot of a conversation's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationStats {
    /// Entries in history, including the system message.
    pub message_count: usize,
    pub token_count: usize,
    pub context_window: usize,
    /// Tokens left in the context window for a reply.
    pub available_tokens: usize,
}

/// Owns a conversation's history and keeps each request inside the context window.
///
/// One manager per conversation; it is not meant to be shared across concurrent
/// callers without external locking.
#[derive(Debug)]
pub struct ConversationManager<C = SharedTokenCounter> {
    history: Option<ConversationHistory>,
    budget: ContextBudget,
    counter: C,
}

impl ConversationManager<SharedTokenCounter> {
    /// Manager counting tokens with [`default_counter`].
    pub fn with_default_counter(budget: ContextBudget) -> Self {
        Self::new(budget, default_counter())
    }
}

impl<C: TokenCounter> ConversationManager<C> {
    pub fn new(budget: ContextBudget, counter: C) -> Self {
        Self {
            history: None,
            budget,
            counter,
        }
    }

    /// Start (or restart) the conversation with a system prompt.
    pub fn initialize(&mut self, system_prompt: impl Into<String>) {
        self.history = Some(ConversationHistory::new(system_prompt));
    }

    pub fn is_initialized(&self) -> bool {
        self.history.is_some()
    }

    pub fn budget(&self) -> ContextBudget {
        self.budget
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }

    /// Current history, system message first.
    pub fn messages(&self) -> Result<&[Message]> {
        Ok(self.history()?.messages())
    }

    /// Append a user message. Budget is checked when the request is prepared.
    pub fn add_user_message(&mut self, text: impl Into<String>) -> Result<()> {
        self.push(Message::user(text))
    }

    /// Append the assistant reply to the preceding request.
    pub fn add_assistant_message(&mut self, text: impl Into<String>) -> Result<()> {
        self.push(Message::assistant(text))
    }

    /// Append a user or assistant message.
    pub fn push(&mut self, message: Message) -> Result<()> {
        self.history_mut()?.push(message)
    }

    /// Trim history to fit the window and return the sequence to send.
    ///
    /// Guarantees `prompt_tokens + max_completion_tokens <= context_window`, or
    /// fails with [`ChatError::BudgetExhausted`] after trimming down to the
    /// system message plus the most recent entry. Content is never truncated.
    ///
    /// Trimming is applied in place either way: on `BudgetExhausted` the manager
    /// is left holding that two-entry floor, readable through [`Self::messages`].
    /// Callers that want to reject the input without losing context should take
    /// a [`Self::snapshot`] first and [`Self::restore`] it.
    pub fn prepare_request_messages(
        &mut self,
        max_completion_tokens: usize,
    ) -> Result<PreparedRequest> {
        let budget = self.budget.max_prompt_tokens(max_completion_tokens);
        let history = self.history.as_mut().ok_or(ChatError::Uninitialized)?;
        let outcome = history.trim_to_budget(budget, &self.counter);

        if outcome.removed > 0 {
            info!(
                removed = outcome.removed,
                remaining = history.message_count(),
                used_tokens = outcome.used_tokens,
                budget,
                "trimmed conversation history to fit context window"
            );
        }

        if !outcome.within_budget() {
            warn!(
                used_tokens = outcome.used_tokens,
                budget, "conversation exceeds context budget at minimum history"
            );
            return Err(ChatError::BudgetExhausted {
                required: outcome.used_tokens,
                budget,
            });
        }

        Ok(PreparedRequest {
            messages: history.messages().to_vec(),
            prompt_tokens: outcome.used_tokens,
            trimmed: outcome.removed,
        })
    }

    /// Reset history to the original system message.
    pub fn clear(&mut self) -> Result<()> {
        self.history_mut()?.reset();
        Ok(())
    }

    /// Remove the trailing user message, e.g. after the remote call for it failed.
    pub fn discard_last_user_message(&mut self) -> Result<Option<String>> {
        Ok(self.history_mut()?.pop_user())
    }

    /// Copy of the current history.
    pub fn snapshot(&self) -> Result<ConversationHistory> {
        Ok(self.history()?.clone())
    }

    /// Replace the history with one taken earlier by [`Self::snapshot`].
    pub fn restore(&mut self, history: ConversationHistory) {
        self.history = Some(history);
    }

    pub fn stats(&self) -> Result<ConversationStats> {
        let history = self.history()?;
        let token_count = self
            .counter
            .count_message_sequence_tokens(history.messages());
        Ok(ConversationStats {
            message_count: history.message_count(),
            token_count,
            context_window: self.budget.context_window,
            available_tokens: self.budget.context_window.saturating_sub(token_count),
        })
    }

    fn history(&self) -> Result<&ConversationHistory> {
        self.history.as_ref().ok_or(ChatError::Uninitialized)
    }

    fn history_mut(&mut self) -> Result<&mut ConversationHistory> {
        self.history.as_mut().ok_or(ChatError::Uninitialized)
    }
}
