//! Interactive chat screen: terminal setup, the event loop and key handling.
//!
//! Submissions run on a spawned task so the screen keeps redrawing while a
//! request is in flight and the reply is being revealed. The loop only ever
//! holds the state lock for the duration of a single draw.

mod keybindings;
mod lifecycle;

use std::{error::Error, sync::Arc, time::Duration};

use ratatui::crossterm::event::{self, Event, MouseEventKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use self::keybindings::{map_key, KeyAction, DEFAULT_PAGE_ROWS, WHEEL_ROWS};
use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::api::ChatBackend;
use crate::core::reveal::Sleeper;
use crate::core::session::{ChatSession, SubmitOutcome};
use crate::ui::input::InputBox;
use crate::ui::renderer::{ui, ScrollState, ViewOptions};

/// Redraw cadence; also drives the typing animation.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Everything needed to start an interactive session.
pub struct ChatOptions {
    pub backend: Arc<dyn ChatBackend>,
    pub sleeper: Arc<dyn Sleeper>,
    pub reveal_delay: Duration,
    pub view: ViewOptions,
}

#[derive(Debug)]
enum UiEvent {
    Crossterm(Event),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyLoopAction {
    Continue,
    Break,
}

/// Run the chat screen until the user quits.
pub async fn run_chat(options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let ChatOptions {
        backend,
        sleeper,
        reveal_delay,
        view,
    } = options;
    let session = ChatSession::new(backend, sleeper, reveal_delay);

    let mut terminal = setup_terminal()?;
    let (event_tx, event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader = spawn_event_reader(event_tx);

    let result = event_loop(&mut terminal, &session, &view, event_rx).await;

    session.shutdown();
    event_reader.abort();
    restore_terminal(&mut terminal)?;
    result
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            // Short poll timeout so the task yields regularly.
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

struct LoopState {
    input: InputBox,
    scroll: ScrollState,
    frame: u64,
    in_flight: Option<JoinHandle<SubmitOutcome>>,
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    session: &ChatSession,
    view: &ViewOptions,
    mut event_rx: mpsc::UnboundedReceiver<UiEvent>,
) -> Result<(), Box<dyn Error>> {
    let mut ls = LoopState {
        input: InputBox::new(),
        scroll: ScrollState::default(),
        frame: 0,
        in_flight: None,
    };
    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let state = session.state();

    loop {
        {
            let guard = state.lock().await;
            terminal.draw(|f| {
                ui(f, &guard, &mut ls.input, &mut ls.scroll, view, ls.frame);
            })?;
        }

        tokio::select! {
            _ = ticker.tick() => {
                ls.frame = ls.frame.wrapping_add(1);
                reap_finished(&mut ls).await;
            }
            maybe_event = event_rx.recv() => {
                let Some(UiEvent::Crossterm(ev)) = maybe_event else {
                    return Ok(());
                };
                if handle_event(ev, session, &mut ls).await == KeyLoopAction::Break {
                    info!("chat session closed by user");
                    return Ok(());
                }
            }
        }
    }
}

async fn reap_finished(ls: &mut LoopState) {
    if ls.in_flight.as_ref().is_some_and(|h| h.is_finished()) {
        if let Some(handle) = ls.in_flight.take() {
            match handle.await {
                Ok(outcome) => debug!(?outcome, "submission finished"),
                Err(err) => debug!(error = %err, "submission task ended abnormally"),
            }
        }
    }
}

async fn handle_event(ev: Event, session: &ChatSession, ls: &mut LoopState) -> KeyLoopAction {
    let loading = session.state().lock().await.loading;

    match ev {
        Event::Key(key) => match map_key(&key, loading) {
            KeyAction::Quit => return KeyLoopAction::Break,
            KeyAction::ToggleMemory => {
                session.toggle_memory().await;
            }
            KeyAction::Reset => {
                if session.reset().await {
                    ls.input.clear();
                    ls.scroll.follow_bottom();
                }
            }
            KeyAction::Submit => submit(session, ls).await,
            KeyAction::InsertNewline => ls.input.insert_newline(),
            KeyAction::PageUp => ls.scroll.scroll_up(page_rows(&ls.scroll)),
            KeyAction::PageDown => ls.scroll.scroll_down(page_rows(&ls.scroll)),
            KeyAction::Edit => {
                ls.input.input(key);
            }
            KeyAction::Ignore => {}
        },
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => ls.scroll.scroll_up(WHEEL_ROWS),
            MouseEventKind::ScrollDown => ls.scroll.scroll_down(WHEEL_ROWS),
            _ => {}
        },
        Event::Paste(text) if !loading => {
            for ch in text.replace("\r\n", "\n").chars() {
                if ch == '\n' || ch == '\r' {
                    ls.input.insert_newline();
                } else {
                    ls.input.input(tui_textarea::Input {
                        key: tui_textarea::Key::Char(ch),
                        ctrl: false,
                        alt: false,
                        shift: false,
                    });
                }
            }
        }
        _ => {}
    }
    KeyLoopAction::Continue
}

/// Hand the typed text to the session on a background task. Blank input is
/// left in place, matching the session's own empty-submission rule.
async fn submit(session: &ChatSession, ls: &mut LoopState) {
    if ls.input.is_blank() {
        return;
    }
    {
        let state = session.state();
        let mut guard = state.lock().await;
        if guard.loading {
            return;
        }
        guard.input = ls.input.text();
    }
    ls.input.clear();
    ls.scroll.follow_bottom();

    let session = session.clone();
    ls.in_flight = Some(tokio::spawn(async move { session.submit_input().await }));
}

fn page_rows(scroll: &ScrollState) -> u16 {
    match scroll.last_viewport_height {
        0 => DEFAULT_PAGE_ROWS,
        height => height.saturating_sub(1).max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChatError, ChatRequest, ChatResponse};
    use crate::core::reveal::InstantSleeper;
    use async_trait::async_trait;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    struct EchoBackend;

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn send(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
            Ok(ChatResponse {
                answer: format!("echo: {}", request.question),
                session_id: Some("loop-session".to_string()),
                ..ChatResponse::default()
            })
        }
    }

    fn session() -> ChatSession {
        ChatSession::new(Arc::new(EchoBackend), Arc::new(InstantSleeper), Duration::ZERO)
    }

    fn loop_state() -> LoopState {
        LoopState {
            input: InputBox::new(),
            scroll: ScrollState::default(),
            frame: 0,
            in_flight: None,
        }
    }

    #[tokio::test]
    async fn submit_hands_typed_text_to_the_session() {
        let session = session();
        let mut ls = loop_state();
        let pasted = handle_event(Event::Paste("hello".to_string()), &session, &mut ls).await;
        assert_eq!(pasted, KeyLoopAction::Continue);
        assert_eq!(ls.input.text(), "hello");

        submit(&session, &mut ls).await;
        assert!(ls.input.is_blank());
        let outcome = ls
            .in_flight
            .take()
            .expect("submission spawned")
            .await
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Answered);

        let state = session.snapshot().await;
        let texts: Vec<_> = state.log.iter().map(|m| m.text.clone()).collect();
        assert_eq!(texts, vec!["hello", "echo: hello"]);
        assert_eq!(state.session_id.as_deref(), Some("loop-session"));
        assert!(state.input.is_empty());
    }

    #[tokio::test]
    async fn blank_input_is_not_submitted() {
        let session = session();
        let mut ls = loop_state();
        ls.input.insert_newline();

        submit(&session, &mut ls).await;
        assert!(ls.in_flight.is_none());
        assert!(session.snapshot().await.log.is_empty());
    }

    #[tokio::test]
    async fn submit_is_skipped_while_loading() {
        let session = session();
        session.state().lock().await.loading = true;
        let mut ls = loop_state();
        handle_event(Event::Paste("later".to_string()), &session, &mut ls).await;
        assert!(ls.input.is_blank());

        ls.input.input(tui_textarea::Input {
            key: tui_textarea::Key::Char('x'),
            ctrl: false,
            alt: false,
            shift: false,
        });
        submit(&session, &mut ls).await;
        assert!(ls.in_flight.is_none());
        assert_eq!(ls.input.text(), "x");
    }

    #[tokio::test]
    async fn control_keys_toggle_memory_and_quit() {
        let session = session();
        let mut ls = loop_state();

        let ctrl_o = KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL);
        handle_event(Event::Key(ctrl_o), &session, &mut ls).await;
        assert!(session.snapshot().await.show_memory);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            handle_event(Event::Key(ctrl_c), &session, &mut ls).await,
            KeyLoopAction::Break
        );
    }
}
