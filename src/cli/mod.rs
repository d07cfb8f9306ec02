//! CLI entry point for colloquy.

pub mod repl;

use clap::{Parser, Subcommand};

pub use repl::{run_chat, ReplCommand};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// colloquy CLI
#[derive(Parser, Debug)]
#[command(name = "colloquy", version, about = "Chat completions with conversation memory")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive multi-turn chat (commands: stats, clear, quit)
    Chat(ChatArgs),
    /// Send a single prompt and show the response details
    Ask(AskArgs),
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// System prompt defining the assistant persona
    #[arg(short, long, default_value = DEFAULT_SYSTEM_PROMPT)]
    pub system: String,

    /// Context window size in tokens (overrides CHAT_MAX_CONTEXT_TOKENS)
    #[arg(long)]
    pub max_context_tokens: Option<usize>,

    /// Tokens reserved for each reply (overrides CHAT_MAX_RESPONSE_TOKENS)
    #[arg(long)]
    pub max_response_tokens: Option<u32>,

    /// Temperature (0.0 - 2.0)
    #[arg(short, long, conflicts_with = "top_p")]
    pub temperature: Option<f64>,

    /// Nucleus sampling (0.0 - 1.0), an alternative to temperature
    #[arg(long)]
    pub top_p: Option<f64>,

    /// Skip the assistant's opening message
    #[arg(long)]
    pub no_greeting: bool,
}

/// Arguments for the `ask` subcommand.
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// System prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Temperature (0.0 - 2.0)
    #[arg(short, long, conflicts_with = "top_p")]
    pub temperature: Option<f64>,

    /// Nucleus sampling (0.0 - 1.0)
    #[arg(long)]
    pub top_p: Option<f64>,

    /// Max tokens
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// User prompt
    pub prompt: String,
}
