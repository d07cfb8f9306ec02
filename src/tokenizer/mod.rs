//! Token counting for context-window accounting.
//!
//! Budget decisions are made locally, before a request is sent, so the counter
//! must track the remote service's own accounting closely. [`TiktokenCounter`]
//! uses the same `cl100k_base` encoding as the GPT-3.5/GPT-4 family;
//! [`HeuristicCounter`] is the fallback when those tables are unavailable.

pub mod heuristic;
pub mod tiktoken;

pub use heuristic::HeuristicCounter;
pub use tiktoken::TiktokenCounter;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::Message;

/// Fixed costs charged by the chat protocol on top of message content.
///
/// These are properties of the remote protocol version, not of the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenOverhead {
    /// Charged once per message: `<|im_start|>{role}\n ... <|im_end|>\n`.
    pub per_message: usize,
    /// Charged once per request to prime the assistant reply.
    pub priming: usize,
}

impl Default for TokenOverhead {
    fn default() -> Self {
        Self {
            per_message: 5,
            priming: 2,
        }
    }
}

/// Maps text and message sequences to token counts.
pub trait TokenCounter: Send + Sync {
    /// Count tokens in plain text.
    fn count_tokens(&self, text: &str) -> usize;

    /// Protocol overhead applied by the message-level counts.
    fn overhead(&self) -> TokenOverhead;

    /// Count a single message: content plus per-message overhead.
    fn count_message_tokens(&self, message: &Message) -> usize {
        self.count_tokens(message.text()) + self.overhead().per_message
    }

    /// Count a full request: every message plus the priming overhead.
    fn count_message_sequence_tokens(&self, messages: &[Message]) -> usize {
        messages
            .iter()
            .map(|m| self.count_message_tokens(m))
            .sum::<usize>()
            + self.overhead().priming
    }
}

/// Arc-wrapped token counter for sharing between a session and its callers.
pub type SharedTokenCounter = Arc<dyn TokenCounter>;

impl<T: TokenCounter + ?Sized> TokenCounter for Arc<T> {
    fn count_tokens(&self, text: &str) -> usize {
        (**self).count_tokens(text)
    }

    fn overhead(&self) -> TokenOverhead {
        (**self).overhead()
    }
}

/// Exact `cl100k_base` counter, or the character heuristic if it cannot load.
pub fn default_counter() -> SharedTokenCounter {
    match TiktokenCounter::cl100k() {
        Ok(counter) => Arc::new(counter),
        Err(e) => {
            warn!(error = %e, "cl100k_base unavailable, estimating tokens from character count");
            Arc::new(HeuristicCounter::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_count_adds_overheads() {
        let counter = HeuristicCounter::default();
        let messages = vec![Message::system("abcd"), Message::user("abcdefgh")];
        // 1 + 5 + 2 + 5 + 2
        assert_eq!(counter.count_message_sequence_tokens(&messages), 15);
    }

    #[test]
    fn empty_sequence_costs_priming_only() {
        let counter = HeuristicCounter::default();
        assert_eq!(counter.count_message_sequence_tokens(&[]), 2);
    }

    #[test]
    fn custom_overhead_is_respected() {
        let counter = HeuristicCounter::default().with_overhead(TokenOverhead {
            per_message: 0,
            priming: 0,
        });
        let messages = vec![Message::user("abcdefgh")];
        assert_eq!(counter.count_message_sequence_tokens(&messages), 2);
    }

    #[test]
    fn shared_counter_delegates() {
        let shared: SharedTokenCounter = Arc::new(HeuristicCounter::default());
        assert_eq!(shared.count_tokens("abcdefgh"), 2);
        assert_eq!(shared.overhead(), TokenOverhead::default());
    }

    #[test]
    fn default_counter_is_deterministic() {
        let counter = default_counter();
        let text = "The quick brown fox jumps over the lazy dog.";
        assert_eq!(counter.count_tokens(text), counter.count_tokens(text));
    }
}
