//! Generation settings and related enums.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::warn;

use crate::error::{ChatError, Result};

/// Settings controlling text generation.
///
/// `temperature` and `top_p` are alternatives: tune one and leave the other unset.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationSettings {
    /// Maximum completion tokens; also the amount reserved out of the context window.
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub stop_sequences: Option<Vec<String>>,
    pub presence_penalty: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub seed: Option<u64>,
}

impl GenerationSettings {
    /// Check parameter ranges before a request is built.
    pub fn validate(&self) -> Result<()> {
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ChatError::InvalidArgument(format!(
                    "temperature must be within 0.0..=2.0, got {t}"
                )));
            }
        }
        if let Some(p) = self.top_p {
            if !(0.0..=1.0).contains(&p) {
                return Err(ChatError::InvalidArgument(format!(
                    "top_p must be within 0.0..=1.0, got {p}"
                )));
            }
        }
        for (name, value) in [
            ("presence_penalty", self.presence_penalty),
            ("frequency_penalty", self.frequency_penalty),
        ] {
            if let Some(v) = value {
                if !(-2.0..=2.0).contains(&v) {
                    return Err(ChatError::InvalidArgument(format!(
                        "{name} must be within -2.0..=2.0, got {v}"
                    )));
                }
            }
        }
        if self.max_tokens == Some(0) {
            return Err(ChatError::InvalidArgument(
                "max_tokens must be greater than zero".into(),
            ));
        }
        if self.temperature.is_some() && self.top_p.is_some() {
            warn!("both temperature and top_p are set; adjust one and leave the other at its default");
        }
        Ok(())
    }
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    /// Completed normally.
    Stop,
    /// Truncated by the `max_tokens` limit.
    Length,
    /// Blocked by the service's content policy.
    ContentFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let settings = GenerationSettings::builder()
            .max_tokens(500)
            .temperature(0.7)
            .build();
        assert_eq!(settings.max_tokens, Some(500));
        assert_eq!(settings.temperature, Some(0.7));
        assert!(settings.top_p.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let settings = GenerationSettings::builder().temperature(2.5).build();
        assert!(matches!(
            settings.validate(),
            Err(ChatError::InvalidArgument(ref m)) if m.contains("temperature")
        ));
    }

    #[test]
    fn rejects_out_of_range_top_p() {
        let settings = GenerationSettings::builder().top_p(1.2).build();
        assert!(matches!(
            settings.validate(),
            Err(ChatError::InvalidArgument(ref m)) if m.contains("top_p")
        ));
    }

    #[test]
    fn rejects_zero_max_tokens() {
        let settings = GenerationSettings::builder().max_tokens(0).build();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn both_sampling_knobs_is_allowed() {
        let settings = GenerationSettings::builder()
            .temperature(1.0)
            .top_p(0.5)
            .build();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn finish_reason_round_trips_through_strings() {
        assert_eq!(FinishReason::ContentFilter.to_string(), "content_filter");
        assert_eq!("length".parse::<FinishReason>().unwrap(), FinishReason::Length);
    }
}
