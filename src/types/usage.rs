//! Token usage accounting types.

use serde::{Deserialize, Serialize};

/// Token usage reported by the remote service for one completion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    /// Merge another usage into this one (accumulate).
    pub fn merge(&mut self, other: &Usage) {
        self.prompt_tokens = self.prompt_tokens.saturating_add(other.prompt_tokens);
        self.completion_tokens = self.completion_tokens.saturating_add(other.completion_tokens);
        self.total_tokens = self.total_tokens.saturating_add(other.total_tokens);
    }

    /// Signed difference between the reported prompt tokens and a local estimate.
    ///
    /// Positive when the service charged more than was estimated.
    pub fn prompt_drift(&self, estimated_prompt_tokens: usize) -> i64 {
        i64::from(self.prompt_tokens) - estimated_prompt_tokens as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_accumulates() {
        let mut total = Usage::default();
        total.merge(&Usage {
            prompt_tokens: 10,
            completion_tokens: 20,
            total_tokens: 30,
        });
        total.merge(&Usage {
            prompt_tokens: 5,
            completion_tokens: 15,
            total_tokens: 20,
        });
        assert_eq!(total.prompt_tokens, 15);
        assert_eq!(total.completion_tokens, 35);
        assert_eq!(total.total_tokens, 50);
    }

    #[test]
    fn merge_saturates_instead_of_overflowing() {
        let mut total = Usage {
            prompt_tokens: u32::MAX - 1,
            completion_tokens: 7,
            total_tokens: u32::MAX,
        };
        total.merge(&Usage {
            prompt_tokens: 10,
            completion_tokens: 3,
            total_tokens: 13,
        });
        assert_eq!(total.prompt_tokens, u32::MAX);
        assert_eq!(total.completion_tokens, 10);
        assert_eq!(total.total_tokens, u32::MAX);
    }

    #[test]
    fn prompt_drift_is_signed() {
        let usage = Usage {
            prompt_tokens: 40,
            ..Default::default()
        };
        assert_eq!(usage.prompt_drift(42), -2);
        assert_eq!(usage.prompt_drift(37), 3);
    }
}
