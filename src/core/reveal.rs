//! Typewriter reveal of bot replies.
//!
//! Pauses go through [`Sleeper`] so tests and `--no-typewriter` can run a
//! reveal without waiting on the clock.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::core::message::{MemoryInfo, MessageId};
use crate::core::session::ChatState;

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real pauses on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Never waits.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantSleeper;

#[async_trait]
impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

pub struct RevealEngine {
    sleeper: Arc<dyn Sleeper>,
    delay: Duration,
}

impl RevealEngine {
    pub fn new(sleeper: Arc<dyn Sleeper>, delay: Duration) -> Self {
        Self { sleeper, delay }
    }

    /// Append an empty bot message and grow it one character at a time
    /// until it reads `text`. Returns the id of the revealed message.
    pub async fn reveal(
        &self,
        state: &Mutex<ChatState>,
        text: &str,
        memory_info: Option<MemoryInfo>,
    ) -> MessageId {
        self.reveal_with_progress(state, text, memory_info, |_| {})
            .await
    }

    /// Like [`RevealEngine::reveal`], calling `on_char` after each committed
    /// character.
    pub async fn reveal_with_progress<F>(
        &self,
        state: &Mutex<ChatState>,
        text: &str,
        memory_info: Option<MemoryInfo>,
        mut on_char: F,
    ) -> MessageId
    where
        F: FnMut(char) + Send,
    {
        let id = state.lock().await.log.append_bot("", memory_info);

        let mut shown = String::with_capacity(text.len());
        for ch in text.chars() {
            shown.push(ch);
            {
                let mut guard = state.lock().await;
                if !guard.log.mutate_text_by_id(id, shown.as_str()) {
                    tracing::debug!(message = %id, "reveal target disappeared; stopping");
                    return id;
                }
            }
            on_char(ch);
            if !self.delay.is_zero() {
                self.sleeper.sleep(self.delay).await;
            }
        }

        id
    }
}
