//! colloquy: multi-turn chat completions with token-budgeted memory.
//!
//! Chat-completion models keep no state between requests, so every turn resends
//! the whole conversation. This crate owns that conversation: it pins the system
//! prompt, counts tokens the way the model does, and drops the oldest turns when
//! the next request would overflow the context window.
//!
//! # Quick Start
//!
//! ```no_run
//! use colloquy::config::ChatConfig;
//! use colloquy::conversation::ConversationManager;
//! use colloquy::session::ChatSession;
//!
//! # async fn example() -> colloquy::error::Result<()> {
//! let config = ChatConfig::from_env()?;
//! let provider = colloquy::provider::from_config(&config)?;
//!
//! let mut manager = ConversationManager::with_default_counter(config.budget());
//! manager.initialize("You are a friendly travel assistant.");
//!
//! let mut session = ChatSession::new(provider, manager, config.generation_settings());
//! let turn = session.send("Where should I go in October?").await?;
//! println!("{}", turn.reply);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod conversation;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod session;
pub mod tokenizer;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
