//! OpenAI Chat Completions API provider.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::ChatError;
use crate::types::*;

use super::http::{bearer_headers, shared_client, status_to_error};
use super::{ChatCompletionProvider, ChatRequest, ChatResponse};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat Completions over plain REST.
///
/// Also serves Azure deployments through [`OpenAiProvider::with_endpoint`],
/// which swaps the URL and auth header but keeps the wire format.
pub struct OpenAiProvider {
    provider_name: &'static str,
    model: String,
    url: String,
    headers: HeaderMap,
    /// Azure routes by deployment in the URL and takes no `model` field.
    send_model: bool,
}

impl OpenAiProvider {
    pub fn new(model: String, api_key: String, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            provider_name: "openai",
            url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            headers: bearer_headers(&api_key),
            model,
            send_model: true,
        }
    }

    /// Target a fully-formed completions URL with caller-built headers.
    pub(crate) fn with_endpoint(
        provider_name: &'static str,
        model: String,
        url: String,
        headers: HeaderMap,
    ) -> Self {
        Self {
            provider_name,
            model,
            url,
            headers,
            send_model: false,
        }
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }

    pub(crate) fn build_request_body(&self, request: &ChatRequest) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        if self.send_model {
            obj.insert("model".into(), self.model.clone().into());
        }
        obj.insert("messages".into(), serde_json::json!(request.messages));

        let settings = &request.settings;
        if let Some(max) = settings.max_tokens {
            obj.insert("max_tokens".into(), max.into());
        }
        if let Some(temp) = settings.temperature {
            obj.insert("temperature".into(), temp.into());
        }
        if let Some(top_p) = settings.top_p {
            obj.insert("top_p".into(), top_p.into());
        }
        if let Some(ref stops) = settings.stop_sequences {
            obj.insert("stop".into(), serde_json::json!(stops));
        }
        if let Some(pp) = settings.presence_penalty {
            obj.insert("presence_penalty".into(), pp.into());
        }
        if let Some(fp) = settings.frequency_penalty {
            obj.insert("frequency_penalty".into(), fp.into());
        }
        if let Some(seed) = settings.seed {
            obj.insert("seed".into(), seed.into());
        }

        serde_json::Value::Object(obj)
    }
}

#[async_trait]
impl ChatCompletionProvider for OpenAiProvider {
    fn provider_name(&self) -> &str {
        self.provider_name
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        request.settings.validate()?;
        let body = self.build_request_body(request);

        debug!(
            provider = self.provider_name,
            model = %self.model,
            url = %self.url(),
            messages = request.messages.len(),
            "chat completion request"
        );

        let resp = shared_client()
            .post(&self.url)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: ChatCompletionResponse = resp.json().await?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::api(200, "No choices in chat completion response"))?;

        let finish_reason = choice.finish_reason.as_deref().and_then(parse_finish_reason);
        let usage = data
            .usage
            .map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        debug!(
            provider = self.provider_name,
            finish_reason = ?finish_reason,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "chat completion response"
        );

        Ok(ChatResponse {
            text: choice.message.content.unwrap_or_default(),
            finish_reason,
            usage,
        })
    }
}

fn parse_finish_reason(s: &str) -> Option<FinishReason> {
    match s {
        "stop" => Some(FinishReason::Stop),
        "length" => Some(FinishReason::Length),
        "content_filter" => Some(FinishReason::ContentFilter),
        _ => None,
    }
}

// Chat Completions response types (internal)

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<UsagePayload>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct UsagePayload {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
