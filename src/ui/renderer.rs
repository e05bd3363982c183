use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::core::constants::APP_TITLE;
use crate::core::session::ChatState;
use crate::ui::input::InputBox;
use crate::ui::theme::Theme;
use crate::ui::transcript::build_transcript_lines;
use crate::utils::scroll::ScrollCalculator;

/// Presentation settings that stay fixed for a session.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub theme: Theme,
    pub markdown: bool,
}

/// Transcript scroll position. `None` follows the newest line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    pub pinned_offset: Option<u16>,
    /// Max offset from the last draw, used to clamp user scrolling.
    pub last_max_offset: u16,
    /// Transcript viewport height from the last draw.
    pub last_viewport_height: u16,
}

impl ScrollState {
    pub fn scroll_up(&mut self, rows: u16) {
        let current = self.pinned_offset.unwrap_or(self.last_max_offset);
        self.pinned_offset = Some(current.saturating_sub(rows));
    }

    pub fn scroll_down(&mut self, rows: u16) {
        if let Some(current) = self.pinned_offset {
            let next = current.saturating_add(rows);
            // Reaching the bottom resumes auto-scroll.
            self.pinned_offset = (next < self.last_max_offset).then_some(next);
        }
    }

    pub fn follow_bottom(&mut self) {
        self.pinned_offset = None;
    }

    fn resolve(&mut self, max_offset: u16, viewport_height: u16) -> u16 {
        self.last_max_offset = max_offset;
        self.last_viewport_height = viewport_height;
        match self.pinned_offset {
            Some(offset) => offset.min(max_offset),
            None => max_offset,
        }
    }
}

/// Draw one frame: header, transcript, input box and footer.
pub fn ui(
    f: &mut Frame,
    state: &ChatState,
    input: &mut InputBox,
    scroll: &mut ScrollState,
    view: &ViewOptions,
    frame_counter: u64,
) {
    let theme = &view.theme;
    input.apply_chrome(theme, state.loading);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(input.height() + 2), // +2 for borders
            Constraint::Length(1),
        ])
        .split(f.area());

    f.render_widget(Paragraph::new(header_line(state, theme)), chunks[0]);
    render_transcript(f, chunks[1], state, scroll, view, frame_counter);
    f.render_widget(input.widget(), chunks[2]);
    f.render_widget(Paragraph::new(footer_line(state, theme)), chunks[3]);
}

fn render_transcript(
    f: &mut Frame,
    area: Rect,
    state: &ChatState,
    scroll: &mut ScrollState,
    view: &ViewOptions,
    frame_counter: u64,
) {
    let lines = build_transcript_lines(state, &view.theme, view.markdown, frame_counter);
    let wrapped = ScrollCalculator::prewrap_lines(&lines, area.width);
    let max_offset = ScrollCalculator::calculate_max_scroll_offset(&wrapped, area.height);
    let offset = scroll.resolve(max_offset, area.height);

    f.render_widget(Paragraph::new(wrapped).scroll((offset, 0)), area);
}

fn header_line(state: &ChatState, theme: &Theme) -> Line<'static> {
    let toggle = if state.show_memory {
        "🔒 Hide Memory"
    } else {
        "🧠 Show Memory"
    };
    Line::from(vec![
        Span::styled(APP_TITLE, theme.title_style),
        Span::styled(
            format!("  {toggle} (Ctrl+O) · New chat (Ctrl+L) · Quit (Ctrl+C)"),
            theme.header_hint_style,
        ),
    ])
}

fn footer_line(state: &ChatState, theme: &Theme) -> Line<'static> {
    match state.short_session_id() {
        Some(short) => Line::from(Span::styled(
            format!("Session: {short}..."),
            theme.footer_style,
        )),
        None => Line::default(),
    }
}
