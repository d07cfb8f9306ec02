//! Shared test helpers and mock provider.

#![allow(dead_code)]

use async_trait::async_trait;

use colloquy::error::ChatError;
use colloquy::provider::{ChatCompletionProvider, ChatRequest, ChatResponse};
use colloquy::types::*;

/// A mock provider that returns canned responses and records every request.
pub struct MockProvider {
    model_id: String,
    responses: std::sync::Mutex<Vec<Result<ChatResponse, ChatError>>>,
    requests: std::sync::Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            responses: std::sync::Mutex::new(Vec::new()),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.queue_response_with(text, FinishReason::Stop);
    }

    /// Queue a text response with a specific finish reason.
    pub fn queue_response_with(&self, text: &str, finish_reason: FinishReason) {
        self.responses.lock().unwrap().push(Ok(ChatResponse {
            text: text.to_string(),
            finish_reason: Some(finish_reason),
            usage: Usage {
                prompt_tokens: 10,
                completion_tokens: 20,
                total_tokens: 30,
            },
        }));
    }

    /// Queue a failure.
    pub fn queue_error(&self, error: ChatError) {
        self.responses.lock().unwrap().push(Err(error));
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletionProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(ChatResponse {
                text: "Mock response".to_string(),
                finish_reason: Some(FinishReason::Stop),
                usage: Usage::default(),
            });
        }
        responses.remove(0)
    }
}
