//! Key event classification for the chat screen.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Rows moved per PageUp/PageDown press when the viewport height is unknown.
pub const DEFAULT_PAGE_ROWS: u16 = 10;

/// Rows moved per mouse wheel notch.
pub const WHEEL_ROWS: u16 = 3;

/// What the loop should do with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    ToggleMemory,
    Reset,
    Submit,
    InsertNewline,
    PageUp,
    PageDown,
    /// Pass the key to the input editor.
    Edit,
    Ignore,
}

/// Classify `key`. While `loading` the editor is disabled, so submission and
/// editing keys are ignored; quitting, scrolling and the memory toggle still
/// work.
pub fn map_key(key: &KeyEvent, loading: bool) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let action = match key.code {
        KeyCode::Char('c') if ctrl => KeyAction::Quit,
        KeyCode::Char('o') if ctrl => KeyAction::ToggleMemory,
        KeyCode::Char('l') if ctrl => KeyAction::Reset,
        KeyCode::PageUp => KeyAction::PageUp,
        KeyCode::PageDown => KeyAction::PageDown,
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            KeyAction::InsertNewline
        }
        KeyCode::Enter => KeyAction::Submit,
        _ => KeyAction::Edit,
    };

    match action {
        KeyAction::Submit | KeyAction::InsertNewline | KeyAction::Edit | KeyAction::Reset
            if loading =>
        {
            KeyAction::Ignore
        }
        other => other,
    }
}
