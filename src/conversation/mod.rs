//! Multi-turn conversation memory bounded by a token budget.
//!
//! The model keeps no state between requests: every turn resends the whole
//! history. [`ConversationManager`] owns that history, keeps the system message
//! pinned at the front, and trims the oldest turns when the next request would
//! overflow the context window.
//!
//! ```
//! use colloquy::conversation::{ContextBudget, ConversationManager};
//! use colloquy::tokenizer::HeuristicCounter;
//!
//! # fn example() -> colloquy::error::Result<()> {
//! let mut manager = ConversationManager::new(ContextBudget::new(4_000), HeuristicCounter::default());
//! manager.initialize("You are a helpful assistant.");
//! manager.add_user_message("Hi")?;
//! let request = manager.prepare_request_messages(500)?;
//! assert_eq!(request.messages.len(), 2);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod history;
pub mod manager;

pub use history::{trim_to_budget, ConversationHistory, TrimOutcome};
pub use manager::{ContextBudget, ConversationManager, ConversationStats, PreparedRequest};
