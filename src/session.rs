//! A chat session: conversation memory wired to a completion provider.

use tracing::debug;

use crate::conversation::{ConversationManager, ConversationStats};
use crate::error::Result;
use crate::provider::{ChatCompletionProvider, ChatRequest};
use crate::tokenizer::{SharedTokenCounter, TokenCounter};
use crate::types::{FinishReason, GenerationSettings, Message, Usage};

/// Outcome of one exchange with the model.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub reply: String,
    pub finish_reason: Option<FinishReason>,
    /// Usage reported by the service for this exchange.
    pub usage: Usage,
    /// History entries dropped to fit this request.
    pub trimmed: usize,
}

/// Runs turns against a provider while the manager keeps history within budget.
pub struct ChatSession<P, C = SharedTokenCounter> {
    provider: P,
    manager: ConversationManager<C>,
    settings: GenerationSettings,
    total_usage: Usage,
}

impl<P, C> ChatSession<P, C>
where
    P: ChatCompletionProvider,
    C: TokenCounter,
{
    /// Create a session. `manager` must already be initialized with a system prompt.
    pub fn new(provider: P, manager: ConversationManager<C>, settings: GenerationSettings) -> Self {
        Self {
            provider,
            manager,
            settings,
            total_usage: Usage::default(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn manager(&self) -> &ConversationManager<C> {
        &self.manager
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Usage accumulated across every exchange since the session started.
    pub fn total_usage(&self) -> Usage {
        self.total_usage
    }

    /// Ask the model for an opening message based on the system prompt alone.
    pub async fn greet(&mut self) -> Result<TurnOutcome> {
        self.exchange().await
    }

    /// Send a user message and record the reply.
    ///
    /// If the request cannot be sent (budget exhausted, provider failure) the
    /// history is put back as it was before the call, so the rejected message
    /// is not replayed and nothing trimmed for it is lost.
    pub async fn send(&mut self, text: impl Into<String>) -> Result<TurnOutcome> {
        let before = self.manager.snapshot()?;
        self.manager.add_user_message(text)?;
        match self.exchange().await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.manager.restore(before);
                Err(err)
            }
        }
    }

    /// Reset history to the system prompt. Usage totals are kept.
    pub fn clear(&mut self) -> Result<()> {
        self.manager.clear()
    }

    pub fn stats(&self) -> Result<ConversationStats> {
        self.manager.stats()
    }

    pub fn messages(&self) -> Result<&[Message]> {
        self.manager.messages()
    }

    async fn exchange(&mut self) -> Result<TurnOutcome> {
        self.settings.validate()?;
        let reserved = self.settings.max_tokens.unwrap_or(0) as usize;
        let prepared = self.manager.prepare_request_messages(reserved)?;

        let request = ChatRequest::new(prepared.messages, self.settings.clone());
        let response = self.provider.complete(&request).await?;

        if response.usage.prompt_tokens > 0 {
            debug!(
                estimated = prepared.prompt_tokens,
                reported = response.usage.prompt_tokens,
                drift = response.usage.prompt_drift(prepared.prompt_tokens),
                "prompt token estimate vs reported usage"
            );
        }

        self.manager.add_assistant_message(response.text.clone())?;
        self.total_usage.merge(&response.usage);

        Ok(TurnOutcome {
            reply: response.text,
            finish_reason: response.finish_reason,
            usage: response.usage,
            trimmed: prepared.trimmed,
        })
    }
}
