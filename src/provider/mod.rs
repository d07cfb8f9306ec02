//! Chat-completion provider trait and implementations.

pub mod http;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "azure")]
pub mod azure;

use async_trait::async_trait;

use crate::error::ChatError;
use crate::types::{FinishReason, GenerationSettings, Message, Usage};

/// A request sent to a chat-completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub settings: GenerationSettings,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>, settings: GenerationSettings) -> Self {
        Self { messages, settings }
    }
}

/// Response from a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub text: String,
    pub finish_reason: Option<FinishReason>,
    pub usage: Usage,
}

/// The remote chat-completion service.
#[async_trait]
pub trait ChatCompletionProvider: Send + Sync {
    /// Provider name (e.g., "openai", "azure").
    fn provider_name(&self) -> &str;

    /// The model or deployment this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate one completion (non-streaming).
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError>;
}

#[async_trait]
impl<P: ChatCompletionProvider + ?Sized> ChatCompletionProvider for Box<P> {
    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        (**self).complete(request).await
    }
}

/// Create a provider from configuration, preferring Azure when it is configured.
#[allow(unused_variables)]
pub fn from_config(
    config: &crate::config::ChatConfig,
) -> Result<Box<dyn ChatCompletionProvider>, ChatError> {
    match config.provider()? {
        #[cfg(feature = "azure")]
        crate::config::ProviderConfig::Azure(azure) => Ok(Box::new(
            azure::AzureOpenAiProvider::new(
                azure.endpoint,
                azure.deployment,
                azure.api_key,
                azure.api_version,
            ),
        )),
        #[cfg(feature = "openai")]
        crate::config::ProviderConfig::OpenAi(openai) => Ok(Box::new(openai::OpenAiProvider::new(
            openai.model,
            openai.api_key,
            Some(openai.base_url),
        ))),
        #[allow(unreachable_patterns)]
        other => Err(ChatError::Configuration(format!(
            "{} provider not enabled via feature flags",
            other.name()
        ))),
    }
}
