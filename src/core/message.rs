use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sender {
    User,
    Bot,
    /// Placeholder shown while a request is in flight.
    Typing,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
            Sender::Typing => "typing",
        }
    }

    pub fn is_bot(self) -> bool {
        self == Sender::Bot
    }

    pub fn is_typing(self) -> bool {
        self == Sender::Typing
    }
}

impl AsRef<str> for Sender {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Sender {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            "typing" => Ok(Sender::Typing),
            _ => Err(format!("invalid message sender: {value}")),
        }
    }
}

impl TryFrom<String> for Sender {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Sender> for String {
    fn from(value: Sender) -> Self {
        value.as_str().to_string()
    }
}

/// Identifier of a transcript entry, unique for the lifetime of a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Backend-supplied conversation memory attached to a bot reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryInfo {
    /// Sanitized memory text.
    pub content: String,
    /// Number of messages the backend keeps in its buffer, if reported.
    pub buffer_length: Option<u64>,
}

impl MemoryInfo {
    pub fn new(content: impl Into<String>, buffer_length: Option<u64>) -> Self {
        Self {
            content: content.into(),
            buffer_length,
        }
    }

    /// Label used in the memory panel header.
    pub fn buffer_label(&self) -> String {
        match self.buffer_length {
            Some(length) => length.to_string(),
            None => "?".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_info: Option<MemoryInfo>,
    /// Set on the locally generated failure notice, never on backend text.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl Message {
    pub fn new(id: MessageId, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id,
            sender,
            text: text.into(),
            memory_info: None,
            is_error: false,
        }
    }

    pub fn with_memory(mut self, memory_info: Option<MemoryInfo>) -> Self {
        self.memory_info = memory_info;
        self
    }

    pub fn is_bot(&self) -> bool {
        self.sender.is_bot()
    }

    pub fn is_typing(&self) -> bool {
        self.sender.is_typing()
    }
}
