//! Character-based token estimate.

use super::{TokenCounter, TokenOverhead};

/// Estimates tokens as `ceil(chars / 4)`.
///
/// Close enough for English prose under `cl100k_base`; tends to undercount code and
/// non-Latin scripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicCounter {
    overhead: TokenOverhead,
}

impl HeuristicCounter {
    pub fn with_overhead(mut self, overhead: TokenOverhead) -> Self {
        self.overhead = overhead;
        self
    }
}

impl TokenCounter for HeuristicCounter {
    fn count_tokens(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        text.chars().count().div_ceil(4)
    }

    fn overhead(&self) -> TokenOverhead {
        self.overhead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_zero() {
        assert_eq!(HeuristicCounter::default().count_tokens(""), 0);
    }

    #[test]
    fn rounds_up_partial_tokens() {
        let counter = HeuristicCounter::default();
        assert_eq!(counter.count_tokens("abc"), 1);
        assert_eq!(counter.count_tokens("abcd"), 1);
        assert_eq!(counter.count_tokens("abcde"), 2);
    }

    #[test]
    fn counts_chars_not_bytes() {
        // 8 chars, 24 bytes
        assert_eq!(HeuristicCounter::default().count_tokens("日本語のテキスト"), 2);
    }
}
