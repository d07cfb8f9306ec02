//! Exact BPE token counts via `tiktoken-rs`.

use std::fmt;
use std::sync::Arc;

use tiktoken_rs::CoreBPE;

use super::{TokenCounter, TokenOverhead};
use crate::error::{ChatError, Result};

/// Counts tokens with the `cl100k_base` encoding used by GPT-3.5 and GPT-4.
#[derive(Clone)]
pub struct TiktokenCounter {
    bpe: Arc<CoreBPE>,
    overhead: TokenOverhead,
}

impl fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("encoding", &"cl100k_base")
            .field("overhead", &self.overhead)
            .finish()
    }
}

impl TiktokenCounter {
    /// Load the `cl100k_base` tables.
    pub fn cl100k() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| ChatError::Tokenizer(e.to_string()))?;
        Ok(Self {
            bpe: Arc::new(bpe),
            overhead: TokenOverhead::default(),
        })
    }

    pub fn with_overhead(mut self, overhead: TokenOverhead) -> Self {
        self.overhead = overhead;
        self
    }
}

impl TokenCounter for TiktokenCounter {
    fn count_tokens(&self, text: &str) -> usize {
        // Special-token markers in user text are counted as ordinary text.
        self.bpe.encode_ordinary(text).len()
    }

    fn overhead(&self) -> TokenOverhead {
        self.overhead
    }
}
