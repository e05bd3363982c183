use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use tui_textarea::{Input, TextArea};

use crate::ui::theme::Theme;

/// Visible rows the input grows to before it starts scrolling.
const MAX_INPUT_ROWS: u16 = 6;

const PLACEHOLDER: &str = "Type your question...";

/// Multi-line message editor shown under the transcript.
pub struct InputBox {
    textarea: TextArea<'static>,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(Style::default());
        textarea.set_placeholder_text(PLACEHOLDER);
        Self { textarea }
    }

    /// Current contents with rows joined by `\n`.
    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn is_blank(&self) -> bool {
        self.textarea.lines().iter().all(|line| line.trim().is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Forward an editing key; returns true if the text changed.
    pub fn input(&mut self, input: impl Into<Input>) -> bool {
        self.textarea.input(input)
    }

    pub fn insert_newline(&mut self) {
        self.textarea.insert_newline();
    }

    /// Rows of text to show, not counting borders.
    pub fn height(&self) -> u16 {
        let rows = self.textarea.lines().len().min(MAX_INPUT_ROWS as usize) as u16;
        rows.max(1)
    }

    /// Restyle the editor for the current loading state.
    pub fn apply_chrome(&mut self, theme: &Theme, loading: bool) {
        let (title, border, text) = if loading {
            (
                " ⏳ Waiting for Echo... ",
                theme.input_disabled_style,
                theme.input_disabled_style,
            )
        } else {
            (
                " Message (Enter to send, Shift+Enter for newline) ",
                theme.input_border_style,
                theme.input_text_style,
            )
        };
        self.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title)
                .title_style(theme.input_title_style),
        );
        self.textarea.set_style(text);
        self.textarea.set_cursor_style(if loading {
            text
        } else {
            theme.input_cursor_style
        });
    }

    pub fn widget(&self) -> &TextArea<'static> {
        &self.textarea
    }
}
