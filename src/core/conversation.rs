//! Ordered transcript of the current conversation.
//!
//! The log only grows at the end. The two exceptions are the in-place text
//! updates made while a reply is revealed and the removal of the typing
//! placeholder once a request settles.

use crate::core::message::{MemoryInfo, Message, MessageId, Sender};
use std::collections::VecDeque;

#[derive(Debug, Default, Clone)]
pub struct ConversationLog {
    messages: VecDeque<Message>,
    next_id: u64,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn append_user(&mut self, text: impl Into<String>) -> MessageId {
        let id = self.allocate_id();
        self.messages.push_back(Message::new(id, Sender::User, text));
        id
    }

    pub fn append_bot(
        &mut self,
        text: impl Into<String>,
        memory_info: Option<MemoryInfo>,
    ) -> MessageId {
        let id = self.allocate_id();
        self.messages
            .push_back(Message::new(id, Sender::Bot, text).with_memory(memory_info));
        id
    }

    /// Append a bot message flagged as a client-side failure notice.
    pub fn append_error(&mut self, text: impl Into<String>) -> MessageId {
        let id = self.allocate_id();
        let mut message = Message::new(id, Sender::Bot, text);
        message.is_error = true;
        self.messages.push_back(message);
        id
    }

    /// Append the typing placeholder. At most one exists at a time; if one is
    /// already present its id is returned and nothing is appended.
    pub fn append_typing(&mut self) -> MessageId {
        if let Some(existing) = self.messages.iter().find(|m| m.is_typing()) {
            return existing.id;
        }
        let id = self.allocate_id();
        self.messages.push_back(Message::new(id, Sender::Typing, ""));
        id
    }

    pub fn remove_by_id(&mut self, id: MessageId) -> bool {
        match self.messages.iter().position(|m| m.id == id) {
            Some(index) => {
                self.messages.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replace the text of one message. Returns `false` if the id is unknown.
    pub fn mutate_text_by_id(&mut self, id: MessageId, text: impl Into<String>) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn typing_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_typing()).count()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop every message. Ids keep counting up so stale handles never match.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
