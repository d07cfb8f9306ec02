//! Message types for model communication.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ChatError;

/// A single conversational turn.
///
/// Serializes to the chat-completions wire shape
/// `{"role": "user", "content": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
pub enum Message {
    System(String),
    User(String),
    Assistant(String),
}

impl Message {
    /// Create a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::System(text.into())
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::User(text.into())
    }

    /// Create an assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::Assistant(text.into())
    }

    pub fn role(&self) -> Role {
        match self {
            Self::System(_) => Role::System,
            Self::User(_) => Role::User,
            Self::Assistant(_) => Role::Assistant,
        }
    }

    /// The text content of the message.
    pub fn text(&self) -> &str {
        match self {
            Self::System(text) | Self::User(text) | Self::Assistant(text) => text,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Self::System(_))
    }
}

/// Conversation role.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Build a message from an untyped `{role, content}` record.
///
/// Unlike plain deserialization, every rejection is reported as
/// [`ChatError::MalformedInput`] naming the offending field.
impl TryFrom<serde_json::Value> for Message {
    type Error = ChatError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        let obj = value
            .as_object()
            .ok_or_else(|| ChatError::MalformedInput("message must be a JSON object".into()))?;

        let role = match obj.get("role") {
            None | Some(serde_json::Value::Null) => {
                return Err(ChatError::MalformedInput("message is missing a role".into()))
            }
            Some(serde_json::Value::String(role)) => role
                .parse::<Role>()
                .map_err(|_| ChatError::MalformedInput(format!("unknown role '{role}'")))?,
            Some(other) => {
                return Err(ChatError::MalformedInput(format!(
                    "role must be a string, got {other}"
                )))
            }
        };

        let content = match obj.get("content") {
            Some(serde_json::Value::String(text)) => text.clone(),
            None | Some(serde_json::Value::Null) => {
                return Err(ChatError::MalformedInput(format!(
                    "{role} message is missing text content"
                )))
            }
            Some(_) => {
                return Err(ChatError::MalformedInput(format!(
                    "{role} message content must be text"
                )))
            }
        };

        Ok(match role {
            Role::System => Self::System(content),
            Role::User => Self::User(content),
            Role::Assistant => Self::Assistant(content),
        })
    }
}
