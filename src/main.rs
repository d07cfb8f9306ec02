//! colloquy CLI binary entry point.

use std::io::Write;

use clap::Parser;
use colloquy::cli::{AskArgs, ChatArgs, Cli, Commands};
use colloquy::config::ChatConfig;
use colloquy::conversation::ConversationManager;
use colloquy::provider::{ChatCompletionProvider, ChatRequest};
use colloquy::session::ChatSession;
use colloquy::types::{GenerationSettings, Message};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "colloquy=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chat(args) => handle_chat(args).await,
        Commands::Ask(args) => handle_ask(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn handle_chat(args: ChatArgs) -> colloquy::error::Result<()> {
    let mut config = ChatConfig::from_env()?;
    if let Some(max) = args.max_context_tokens {
        config.max_context_tokens = max;
    }
    if let Some(max) = args.max_response_tokens {
        config.max_response_tokens = max;
    }

    let provider = colloquy::provider::from_config(&config)?;

    let mut settings = config.generation_settings();
    if args.top_p.is_some() {
        settings.temperature = None;
        settings.top_p = args.top_p;
    } else if args.temperature.is_some() {
        settings.temperature = args.temperature;
    }

    let mut manager = ConversationManager::with_default_counter(config.budget());
    manager.initialize(args.system);

    println!("Chatting with {} ({})", provider.model_id(), provider.provider_name());
    let mut session = ChatSession::new(provider, manager, settings);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    colloquy::cli::run_chat(&mut session, !args.no_greeting, stdin.lock(), &mut stdout).await?;

    let usage = session.total_usage();
    if usage.total_tokens > 0 {
        println!(
            "Session usage: {} prompt + {} completion = {} tokens",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );
    }
    Ok(())
}

async fn handle_ask(args: AskArgs) -> colloquy::error::Result<()> {
    let config = ChatConfig::from_env()?;
    let provider = colloquy::provider::from_config(&config)?;

    let mut messages = Vec::new();
    if let Some(system) = args.system {
        messages.push(Message::system(system));
    }
    messages.push(Message::user(args.prompt));

    let settings = GenerationSettings {
        max_tokens: args.max_tokens,
        temperature: args.temperature,
        top_p: args.top_p,
        ..Default::default()
    };

    let response = provider.complete(&ChatRequest::new(messages, settings)).await?;

    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", response.text)?;
    writeln!(out)?;
    match response.finish_reason {
        Some(reason) => writeln!(out, "Finish reason: {reason}")?,
        None => writeln!(out, "Finish reason: unknown")?,
    }
    writeln!(out, "{}", colloquy::cli::repl::format_usage(&response.usage))?;
    Ok(())
}
