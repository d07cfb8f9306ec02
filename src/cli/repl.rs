//! Interactive chat loop.

use std::io::{BufRead, Write};

use crate::conversation::ConversationStats;
use crate::error::{ChatError, Result};
use crate::provider::ChatCompletionProvider;
use crate::session::{ChatSession, TurnOutcome};
use crate::tokenizer::TokenCounter;
use crate::types::{FinishReason, Usage};

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Clear,
    Stats,
    /// Blank line, ignored.
    Empty,
    Message(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        match line.to_lowercase().as_str() {
            "quit" | "exit" => Self::Quit,
            "clear" => Self::Clear,
            "stats" => Self::Stats,
            _ => Self::Message(line.to_string()),
        }
    }
}

/// Run the chat loop until `quit` or end of input.
pub async fn run_chat<P, C, R, W>(
    session: &mut ChatSession<P, C>,
    greet: bool,
    input: R,
    out: &mut W,
) -> Result<()>
where
    P: ChatCompletionProvider,
    C: TokenCounter,
    R: BufRead,
    W: Write,
{
    writeln!(out, "(Type 'quit' to exit, 'clear' to reset, 'stats' for info)")?;

    if greet {
        match session.greet().await {
            Ok(outcome) => print_reply(out, &outcome)?,
            Err(e) => writeln!(out, "\nError: {e}\n")?,
        }
    }

    let mut lines = input.lines();
    loop {
        write!(out, "You: ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };

        match ReplCommand::parse(&line?) {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => {
                writeln!(out, "\nGoodbye!")?;
                break;
            }
            ReplCommand::Clear => {
                session.clear()?;
                writeln!(out, "\n[Conversation cleared. Starting fresh!]\n")?;
            }
            ReplCommand::Stats => {
                writeln!(out, "{}", format_stats(&session.stats()?))?;
            }
            ReplCommand::Message(text) => match session.send(text).await {
                Ok(outcome) => {
                    if outcome.trimmed > 0 {
                        writeln!(
                            out,
                            "\n[Removed {} old message(s) to stay within the token limit]",
                            outcome.trimmed
                        )?;
                    }
                    print_reply(out, &outcome)?;
                    if outcome.usage.total_tokens > 0 {
                        writeln!(out, "{}\n", format_usage(&outcome.usage))?;
                    }
                }
                Err(ChatError::BudgetExhausted { required, budget }) => {
                    writeln!(
                        out,
                        "\n[Message too long: needs {required} prompt tokens but only {budget} fit. \
                         Please shorten it.]\n"
                    )?;
                }
                Err(e) => writeln!(out, "\nError: {e}\n")?,
            },
        }
    }

    Ok(())
}

fn print_reply<W: Write>(out: &mut W, outcome: &TurnOutcome) -> Result<()> {
    writeln!(out, "\nAssistant: {}\n", outcome.reply)?;
    match outcome.finish_reason {
        Some(FinishReason::Length) => writeln!(out, "[Response truncated: max tokens reached]")?,
        Some(FinishReason::ContentFilter) => {
            writeln!(out, "[Response blocked by content filter]")?
        }
        _ => {}
    }
    Ok(())
}

/// Render conversation statistics for display.
pub fn format_stats(stats: &ConversationStats) -> String {
    format!(
        "\n--- Conversation Stats ---\n\
         Messages in history: {}\n\
         Total tokens: {} / {}\n\
         Available for response: {}\n\
         --------------------------",
        stats.message_count, stats.token_count, stats.context_window, stats.available_tokens
    )
}

/// Render reported token usage for display.
pub fn format_usage(usage: &Usage) -> String {
    format!(
        "[Tokens - Prompt: {}, Response: {}, Total: {}]",
        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
    )
}
