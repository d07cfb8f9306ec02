//! Configuration loaded from the environment (and `.env`).
//!
//! Azure OpenAI is used when its endpoint, key and deployment are all set;
//! otherwise an OpenAI-compatible endpoint is used if `OPENAI_API_KEY` is set.

use tracing::debug;

use crate::conversation::ContextBudget;
use crate::error::{ChatError, Result};
use crate::types::GenerationSettings;

pub const DEFAULT_AZURE_API_VERSION: &str = "2025-01-01-preview";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_CONTEXT_TOKENS: usize = 4_000;
pub const DEFAULT_MAX_RESPONSE_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Azure OpenAI deployment settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AzureConfig {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
}

/// OpenAI-compatible endpoint settings.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

/// The resolved remote service.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderConfig {
    Azure(AzureConfig),
    OpenAi(OpenAiConfig),
}

impl ProviderConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Azure(_) => "azure",
            Self::OpenAi(_) => "openai",
        }
    }
}

/// Chat configuration: remote service plus context-window budget.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    pub azure: Option<AzureConfig>,
    pub openai: Option<OpenAiConfig>,
    pub max_context_tokens: usize,
    pub max_response_tokens: u32,
    pub temperature: Option<f64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            azure: None,
            openai: None,
            max_context_tokens: DEFAULT_MAX_CONTEXT_TOKENS,
            max_response_tokens: DEFAULT_MAX_RESPONSE_TOKENS,
            temperature: Some(DEFAULT_TEMPERATURE),
        }
    }
}

impl ChatConfig {
    /// Load from process environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let azure = match (
            var("AZURE_OPENAI_ENDPOINT"),
            var("AZURE_OPENAI_API_KEY"),
            var("AZURE_OPENAI_DEPLOYMENT"),
        ) {
            (Some(endpoint), Some(api_key), Some(deployment)) => Some(AzureConfig {
                endpoint: endpoint.trim_end_matches('/').to_string(),
                api_key,
                deployment,
                api_version: var("AZURE_OPENAI_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
            }),
            _ => None,
        };

        let openai = var("OPENAI_API_KEY").map(|api_key| OpenAiConfig {
            api_key,
            base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
        });

        let config = Self {
            azure,
            openai,
            max_context_tokens: parse_var(&var, "CHAT_MAX_CONTEXT_TOKENS")?
                .unwrap_or(DEFAULT_MAX_CONTEXT_TOKENS),
            max_response_tokens: parse_var(&var, "CHAT_MAX_RESPONSE_TOKENS")?
                .unwrap_or(DEFAULT_MAX_RESPONSE_TOKENS),
            temperature: Some(
                parse_var(&var, "CHAT_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE),
            ),
        };

        debug!(
            azure = config.azure.is_some(),
            openai = config.openai.is_some(),
            max_context_tokens = config.max_context_tokens,
            max_response_tokens = config.max_response_tokens,
            "loaded chat configuration"
        );

        Ok(config)
    }

    /// Resolve which remote service to call.
    pub fn provider(&self) -> Result<ProviderConfig> {
        if let Some(azure) = &self.azure {
            return Ok(ProviderConfig::Azure(azure.clone()));
        }
        if let Some(openai) = &self.openai {
            return Ok(ProviderConfig::OpenAi(openai.clone()));
        }
        Err(ChatError::Configuration(
            "Missing credentials: set AZURE_OPENAI_ENDPOINT, AZURE_OPENAI_API_KEY and \
             AZURE_OPENAI_DEPLOYMENT, or OPENAI_API_KEY (a .env file is read if present)"
                .into(),
        ))
    }

    pub fn budget(&self) -> ContextBudget {
        ContextBudget::new(self.max_context_tokens)
    }

    /// Default generation settings derived from this configuration.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            max_tokens: Some(self.max_response_tokens),
            temperature: self.temperature,
            ..Default::default()
        }
    }
}

fn parse_var<T, F>(var: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| {
                ChatError::Configuration(format!("{key} has an invalid value: '{raw}'"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = ChatConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ChatConfig::default());
        assert!(matches!(config.provider(), Err(ChatError::Configuration(_))));
    }

    #[test]
    fn azure_requires_endpoint_key_and_deployment() {
        let config = ChatConfig::from_lookup(lookup(&[
            ("AZURE_OPENAI_ENDPOINT", "https://r.openai.azure.com/"),
            ("AZURE_OPENAI_API_KEY", "key"),
        ]))
        .unwrap();
        assert!(config.azure.is_none());
    }

    #[test]
    fn azure_config_with_default_version() {
        let config = ChatConfig::from_lookup(lookup(&[
            ("AZURE_OPENAI_ENDPOINT", "https://r.openai.azure.com/"),
            ("AZURE_OPENAI_API_KEY", "key"),
            ("AZURE_OPENAI_DEPLOYMENT", "gpt-4o-mini"),
        ]))
        .unwrap();
        let azure = config.azure.clone().unwrap();
        assert_eq!(azure.endpoint, "https://r.openai.azure.com");
        assert_eq!(azure.api_version, DEFAULT_AZURE_API_VERSION);
        assert_eq!(config.provider().unwrap().name(), "azure");
    }

    #[test]
    fn azure_wins_over_openai() {
        let config = ChatConfig::from_lookup(lookup(&[
            ("AZURE_OPENAI_ENDPOINT", "https://r.openai.azure.com"),
            ("AZURE_OPENAI_API_KEY", "key"),
            ("AZURE_OPENAI_DEPLOYMENT", "dep"),
            ("OPENAI_API_KEY", "sk"),
        ]))
        .unwrap();
        assert!(matches!(config.provider().unwrap(), ProviderConfig::Azure(_)));
    }

    #[test]
    fn openai_fallback_with_overrides() {
        let config = ChatConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk"),
            ("OPENAI_BASE_URL", "http://localhost:1234/v1"),
            ("OPENAI_MODEL", "local-model"),
        ]))
        .unwrap();
        match config.provider().unwrap() {
            ProviderConfig::OpenAi(openai) => {
                assert_eq!(openai.base_url, "http://localhost:1234/v1");
                assert_eq!(openai.model, "local-model");
            }
            other => panic!("expected OpenAi, got {other:?}"),
        }
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = ChatConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(config.openai.is_none());
    }

    #[test]
    fn budget_overrides() {
        let config = ChatConfig::from_lookup(lookup(&[
            ("CHAT_MAX_CONTEXT_TOKENS", "8000"),
            ("CHAT_MAX_RESPONSE_TOKENS", "1000"),
            ("CHAT_TEMPERATURE", "0.2"),
        ]))
        .unwrap();
        assert_eq!(config.budget(), ContextBudget::new(8_000));
        let settings = config.generation_settings();
        assert_eq!(settings.max_tokens, Some(1_000));
        assert_eq!(settings.temperature, Some(0.2));
    }

    #[test]
    fn invalid_number_is_configuration_error() {
        let err = ChatConfig::from_lookup(lookup(&[("CHAT_MAX_CONTEXT_TOKENS", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("CHAT_MAX_CONTEXT_TOKENS"));
    }
}
