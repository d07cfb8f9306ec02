//! Tests for the interactive chat loop.

#![cfg(feature = "cli")]

mod common;

use common::MockProvider;

use colloquy::cli::run_chat;
use colloquy::conversation::{ContextBudget, ConversationManager};
use colloquy::session::ChatSession;
use colloquy::tokenizer::HeuristicCounter;
use colloquy::types::{GenerationSettings, Message};

fn session() -> ChatSession<MockProvider, HeuristicCounter> {
    let mut manager =
        ConversationManager::new(ContextBudget::new(1_000), HeuristicCounter::default());
    manager.initialize("You are helpful.");
    ChatSession::new(
        MockProvider::new("mock-model"),
        manager,
        GenerationSettings::builder().max_tokens(150).build(),
    )
}

async fn run(session: &mut ChatSession<MockProvider, HeuristicCounter>, greet: bool, input: &str) -> String {
    let mut out = Vec::new();
    run_chat(session, greet, input.as_bytes(), &mut out)
        .await
        .expect("chat loop should not fail");
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn greets_then_answers_until_quit() {
    let mut session = session();
    session.provider().queue_response("Welcome!");
    session.provider().queue_response("Paris is great.");

    let output = run(&mut session, true, "Where to go?\nquit\nignored\n").await;

    assert!(output.contains("Assistant: Welcome!"));
    assert!(output.contains("Assistant: Paris is great."));
    assert!(output.contains("[Tokens - Prompt: 10, Response: 20, Total: 30]"));
    assert!(output.contains("Goodbye!"));
    assert_eq!(session.provider().requests().len(), 2);
}

#[tokio::test]
async fn blank_lines_are_skipped_and_eof_ends_loop() {
    let mut session = session();

    let output = run(&mut session, false, "\n   \n").await;

    assert!(session.provider().requests().is_empty());
    assert!(!output.contains("Goodbye!"));
}

#[tokio::test]
async fn stats_and_clear_commands() {
    let mut session = session();
    session.provider().queue_response("Noted.");

    let output = run(&mut session, false, "I like beaches\nstats\nclear\n").await;

    assert!(output.contains("Messages in history: 3"));
    assert!(output.contains("[Conversation cleared. Starting fresh!]"));
    assert_eq!(
        session.messages().unwrap(),
        &[Message::system("You are helpful.")]
    );
}

#[tokio::test]
async fn oversized_message_prints_notice_and_continues() {
    let mut session = session();
    session.provider().queue_response("Short answer.");
    let input = format!("{}\nhello\n", "word".repeat(2_000));

    let output = run(&mut session, false, &input).await;

    assert!(output.contains("[Message too long"));
    assert!(output.contains("Assistant: Short answer."));
    assert_eq!(session.provider().requests().len(), 1);
}
