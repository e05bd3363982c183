//! Turns the conversation log into styled lines for the transcript pane.

use ratatui::text::{Line, Span};

use crate::core::constants::WELCOME_LINES;
use crate::core::message::{MemoryInfo, Message, Sender};
use crate::core::sanitize::clean_memory_content;
use crate::core::session::ChatState;
use crate::ui::markdown::{render_markdown, render_plain, MarkdownProfile};
use crate::ui::theme::Theme;

const USER_PREFIX: &str = "You: ";
const MEMORY_GUTTER: &str = "│ ";
const TYPING_FRAMES: [&str; 3] = ["●∙∙", "∙●∙", "∙∙●"];

/// Frames each dot stays lit, at the event loop's redraw rate.
const FRAMES_PER_DOT: u64 = 20;

/// Dot pattern for the typing placeholder at redraw `frame`.
pub fn typing_indicator(frame: u64) -> &'static str {
    let index = (frame / FRAMES_PER_DOT) % TYPING_FRAMES.len() as u64;
    TYPING_FRAMES[index as usize]
}

/// Build the unwrapped transcript for `state`.
///
/// An empty log shows the welcome text. Messages are separated by a blank
/// line; bot replies carrying memory get an extra panel when the memory
/// inspector is on.
pub fn build_transcript_lines(
    state: &ChatState,
    theme: &Theme,
    markdown: bool,
    frame: u64,
) -> Vec<Line<'static>> {
    if state.log.is_empty() {
        return WELCOME_LINES
            .iter()
            .map(|text| Line::from(Span::styled(*text, theme.welcome_style)))
            .collect();
    }

    let mut lines = Vec::new();
    for (index, message) in state.log.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        push_message_lines(&mut lines, message, theme, markdown, frame);
        if state.show_memory && message.is_bot() {
            if let Some(memory) = &message.memory_info {
                push_memory_panel(&mut lines, memory, theme);
            }
        }
    }
    lines
}

fn push_message_lines(
    lines: &mut Vec<Line<'static>>,
    message: &Message,
    theme: &Theme,
    markdown: bool,
    frame: u64,
) {
    match message.sender {
        Sender::Typing => {
            lines.push(Line::from(Span::styled(
                typing_indicator(frame),
                theme.typing_style,
            )));
        }
        Sender::User => push_user_lines(lines, &message.text, theme),
        Sender::Bot => {
            if message.text.is_empty() {
                // Reveal has not committed a character yet.
                lines.push(Line::default());
            } else if message.is_error {
                lines.extend(render_plain(&message.text, theme.error_text_style));
            } else if markdown {
                lines.extend(render_markdown(
                    &message.text,
                    theme,
                    MarkdownProfile::Reply,
                    theme.bot_text_style,
                ));
            } else {
                lines.extend(render_plain(&message.text, theme.bot_text_style));
            }
        }
    }
}

fn push_user_lines(lines: &mut Vec<Line<'static>>, text: &str, theme: &Theme) {
    let indent = " ".repeat(USER_PREFIX.len());
    for (index, line) in text.split('\n').enumerate() {
        let lead = if index == 0 {
            Span::styled(USER_PREFIX, theme.user_prefix_style)
        } else {
            Span::raw(indent.clone())
        };
        lines.push(Line::from(vec![
            lead,
            Span::styled(line.replace('\t', "    "), theme.user_text_style),
        ]));
    }
}

fn push_memory_panel(lines: &mut Vec<Line<'static>>, memory: &MemoryInfo, theme: &Theme) {
    let gutter = || Span::styled(MEMORY_GUTTER, theme.memory_border_style);

    lines.push(Line::from(vec![
        gutter(),
        Span::styled(
            format!("🧠 Memory (Buffer: {} messages)", memory.buffer_label()),
            theme.memory_header_style,
        ),
    ]));

    let content = clean_memory_content(&memory.content);
    let body = render_markdown(
        &content,
        theme,
        MarkdownProfile::Memory,
        theme.memory_text_style,
    );
    for line in body {
        let mut spans = vec![gutter()];
        spans.extend(line.spans);
        lines.push(Line::from(spans));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::REQUEST_FAILED_MESSAGE;

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    fn state_with(messages: impl FnOnce(&mut ChatState)) -> ChatState {
        let mut state = ChatState::default();
        messages(&mut state);
        state
    }

    #[test]
    fn empty_log_shows_welcome() {
        let state = ChatState::default();
        let lines = build_transcript_lines(&state, &Theme::dark_default(), true, 0);
        assert_eq!(texts(&lines), WELCOME_LINES.to_vec());
    }

    #[test]
    fn user_messages_are_prefixed_and_not_interpreted() {
        let state = state_with(|s| {
            s.log.append_user("**hi**\nthere");
        });
        let lines = build_transcript_lines(&state, &Theme::dark_default(), true, 0);
        assert_eq!(texts(&lines), vec!["You: **hi**", "     there"]);
    }

    #[test]
    fn typing_placeholder_animates() {
        let state = state_with(|s| {
            s.log.append_typing();
        });
        let theme = Theme::dark_default();
        let first = build_transcript_lines(&state, &theme, true, 0);
        let later = build_transcript_lines(&state, &theme, true, FRAMES_PER_DOT);
        assert_eq!(texts(&first), vec!["●∙∙"]);
        assert_eq!(texts(&later), vec!["∙●∙"]);
        assert_eq!(typing_indicator(FRAMES_PER_DOT * 3), "●∙∙");
    }

    #[test]
    fn bot_replies_use_markdown_when_enabled() {
        let state = state_with(|s| {
            s.log.append_bot("**Echo** here", None);
        });
        let theme = Theme::dark_default();
        let rendered = build_transcript_lines(&state, &theme, true, 0);
        assert_eq!(texts(&rendered), vec!["Echo here"]);

        let plain = build_transcript_lines(&state, &theme, false, 0);
        assert_eq!(texts(&plain), vec!["**Echo** here"]);
    }

    #[test]
    fn request_failures_use_error_style() {
        let state = state_with(|s| {
            s.log.append_error(REQUEST_FAILED_MESSAGE);
        });
        let theme = Theme::dark_default();
        let lines = build_transcript_lines(&state, &theme, true, 0);
        assert_eq!(lines[0].spans[0].style, theme.error_text_style);
    }

    #[test]
    fn backend_text_matching_the_failure_notice_is_a_normal_reply() {
        let state = state_with(|s| {
            s.log.append_bot(REQUEST_FAILED_MESSAGE, None);
        });
        let theme = Theme::dark_default();
        let lines = build_transcript_lines(&state, &theme, false, 0);
        assert_eq!(texts(&lines), vec![REQUEST_FAILED_MESSAGE]);
        assert_eq!(lines[0].spans[0].style, theme.bot_text_style);
    }

    #[test]
    fn messages_are_separated_by_blank_lines() {
        let state = state_with(|s| {
            s.log.append_user("Hello");
            s.log.append_bot("Hi there", None);
        });
        let lines = build_transcript_lines(&state, &Theme::dark_default(), true, 0);
        assert_eq!(texts(&lines), vec!["You: Hello", "", "Hi there"]);
    }

    #[test]
    fn memory_panel_only_when_toggled_on() {
        let memory = MemoryInfo::new("**Human**: hi", Some(3));
        let mut state = state_with(|s| {
            s.log.append_bot("Hi there", Some(memory));
        });
        let theme = Theme::dark_default();

        let hidden = build_transcript_lines(&state, &theme, true, 0);
        assert_eq!(texts(&hidden), vec!["Hi there"]);

        state.show_memory = true;
        let shown = build_transcript_lines(&state, &theme, true, 0);
        assert_eq!(
            texts(&shown),
            vec![
                "Hi there",
                "│ 🧠 Memory (Buffer: 3 messages)",
                "│ Human: hi",
            ]
        );
    }

    #[test]
    fn memory_panel_sanitizes_before_rendering() {
        let memory = MemoryInfo::new("<think>x</think>", None);
        let state = state_with(|s| {
            s.show_memory = true;
            s.log.append_bot("ok", Some(memory));
        });
        let lines = build_transcript_lines(&state, &Theme::dark_default(), true, 0);
        assert_eq!(
            texts(&lines),
            vec!["ok", "│ 🧠 Memory (Buffer: ? messages)", "│ No memory yet"]
        );
    }

    #[test]
    fn user_messages_never_show_memory() {
        let state = state_with(|s| {
            s.show_memory = true;
            s.log.append_user("Hello");
        });
        let lines = build_transcript_lines(&state, &Theme::dark_default(), true, 0);
        assert_eq!(texts(&lines), vec!["You: Hello"]);
    }
}
