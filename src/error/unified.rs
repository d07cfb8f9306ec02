//! Error classification and recovery hints.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller misuse or bad input to the conversation core.
    Input,
    /// The conversation cannot fit the model's context window.
    ContextLength,
    Authentication,
    RateLimit,
    Network,
    Server,
    Api,
    Configuration,
    Serialization,
    Unknown,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryWithBackoff,
    CheckCredentials,
    CheckConfiguration,
    /// Shorten, summarize or reject the input, or use a larger context window.
    ReduceInputSize,
    /// Fix the calling code.
    FixRequest,
    ContactSupport,
}
