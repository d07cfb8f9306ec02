//! Azure OpenAI provider.

use async_trait::async_trait;

use crate::error::ChatError;

use super::http::api_key_headers;
use super::openai::OpenAiProvider;
use super::{ChatCompletionProvider, ChatRequest, ChatResponse};

/// Azure OpenAI Service provider.
pub struct AzureOpenAiProvider {
    inner: OpenAiProvider,
}

impl AzureOpenAiProvider {
    /// Create with Azure-specific endpoint.
    /// `endpoint`: e.g., "https://myresource.openai.azure.com"
    /// `deployment`: e.g., "gpt-4o-mini"
    /// `api_version`: e.g., "2025-01-01-preview"
    pub fn new(endpoint: String, deployment: String, api_key: String, api_version: String) -> Self {
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            deployment,
            api_version
        );
        Self {
            inner: OpenAiProvider::with_endpoint("azure", deployment, url, api_key_headers(&api_key)),
        }
    }
}

#[async_trait]
impl ChatCompletionProvider for AzureOpenAiProvider {
    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        self.inner.complete(request).await
    }
}
