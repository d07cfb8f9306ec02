//! Convenience re-exports for common use.

pub use crate::config::ChatConfig;
pub use crate::conversation::{ContextBudget, ConversationManager, ConversationStats, PreparedRequest};
pub use crate::error::{ChatError, Result};
pub use crate::provider::{ChatCompletionProvider, ChatRequest, ChatResponse};
pub use crate::session::{ChatSession, TurnOutcome};
pub use crate::tokenizer::{HeuristicCounter, TiktokenCounter, TokenCounter, TokenOverhead};
pub use crate::types::{FinishReason, GenerationSettings, Message, Role, Usage};
