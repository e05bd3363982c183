//! Restricted markdown rendering for bot replies and the memory panel.
//!
//! Only a fixed set of elements gets dedicated styling; anything else is
//! shown as plain text in the surrounding style. Links are printed with
//! their destination and are never followed by the client.

use crate::ui::theme::Theme;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

/// Which element subset to style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkdownProfile {
    /// Headings, paragraphs, lists, strong, emphasis, inline code and links.
    Reply,
    /// Paragraphs, lists and strong only.
    Memory,
}

impl MarkdownProfile {
    fn styles_headings(self) -> bool {
        self == MarkdownProfile::Reply
    }

    fn styles_inline_extras(self) -> bool {
        self == MarkdownProfile::Reply
    }
}

#[derive(Clone, Debug)]
enum ListKind {
    Unordered,
    Ordered(u64),
}

struct MarkdownRenderer<'a> {
    theme: &'a Theme,
    profile: MarkdownProfile,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    list_stack: Vec<ListKind>,
    link_targets: Vec<Option<String>>,
    pending_indent: Option<usize>,
    in_code_block: bool,
}

impl<'a> MarkdownRenderer<'a> {
    fn new(theme: &'a Theme, profile: MarkdownProfile, base: Style) -> Self {
        Self {
            theme,
            profile,
            lines: Vec::new(),
            current: Vec::new(),
            style_stack: vec![base],
            list_stack: Vec::new(),
            link_targets: Vec::new(),
            pending_indent: None,
            in_code_block: false,
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, patch: Style) {
        let style = self.current_style().patch(patch);
        self.style_stack.push(style);
    }

    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn push_span(&mut self, span: Span<'static>) {
        if self.current.is_empty() {
            if let Some(indent) = self.pending_indent.take() {
                if indent > 0 {
                    self.current.push(Span::raw(" ".repeat(indent)));
                }
            }
        }
        self.current.push(span);
    }

    fn push_text(&mut self, text: &str) {
        let style = self.current_style();
        self.push_span(Span::styled(detab(text), style));
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            let spans = std::mem::take(&mut self.current);
            self.lines.push(Line::from(spans));
        }
    }

    fn push_empty_line(&mut self) {
        if self
            .lines
            .last()
            .map(|line| line.width() > 0)
            .unwrap_or(false)
        {
            self.lines.push(Line::default());
        }
    }

    fn list_indent(&self) -> usize {
        self.list_stack.len().saturating_sub(1) * 2
    }

    fn continuation_indent(&self) -> usize {
        if self.list_stack.is_empty() {
            0
        } else {
            // Align wrapped item text with the text after the marker.
            self.list_indent() + 2
        }
    }

    fn render(mut self, content: &str) -> Vec<Line<'static>> {
        let parser = Parser::new_ext(content, Options::empty());

        for event in parser {
            match event {
                Event::Start(tag) => self.start_tag(tag),
                Event::End(tag_end) => self.end_tag(tag_end),
                Event::Text(text) => {
                    if self.in_code_block {
                        for line in text.lines() {
                            self.push_text(line);
                            self.flush();
                        }
                    } else {
                        self.push_text(&text);
                    }
                }
                Event::Code(code) => {
                    let style = if self.profile.styles_inline_extras() {
                        self.current_style().patch(self.theme.md_inline_code_style)
                    } else {
                        self.current_style()
                    };
                    self.push_span(Span::styled(detab(&code), style));
                }
                Event::SoftBreak | Event::HardBreak => {
                    self.flush();
                    self.pending_indent = Some(self.continuation_indent());
                }
                Event::Rule => {
                    self.flush();
                    let style = self.current_style();
                    self.lines.push(Line::from(Span::styled("───", style)));
                    self.push_empty_line();
                }
                Event::TaskListMarker(checked) => {
                    let marker = if checked { "[x] " } else { "[ ] " };
                    self.push_span(Span::styled(marker, self.theme.md_list_marker_style));
                }
                // Raw HTML is never rendered.
                _ => {}
            }
        }

        self.flush();
        while self
            .lines
            .last()
            .map(|line| line.width() == 0)
            .unwrap_or(false)
        {
            self.lines.pop();
        }
        self.lines
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                if self.profile.styles_headings() {
                    let style = self.theme.md_heading_style(level as u8);
                    self.push_style(style);
                } else {
                    self.push_style(Style::default());
                }
            }
            Tag::List(start) => {
                self.flush();
                self.list_stack.push(match start {
                    Some(n) => ListKind::Ordered(n),
                    None => ListKind::Unordered,
                });
            }
            Tag::Item => {
                self.flush();
                let marker = match self.list_stack.last_mut() {
                    Some(ListKind::Ordered(next)) => {
                        let current = *next;
                        *next += 1;
                        format!("{current}. ")
                    }
                    _ => "• ".to_string(),
                };
                self.pending_indent = Some(self.list_indent());
                self.push_span(Span::styled(marker, self.theme.md_list_marker_style));
            }
            Tag::Strong => self.push_style(self.theme.md_strong_style),
            Tag::Emphasis => {
                if self.profile.styles_inline_extras() {
                    self.push_style(self.theme.md_emphasis_style);
                } else {
                    self.push_style(Style::default());
                }
            }
            Tag::Link { dest_url, .. } => {
                if self.profile.styles_inline_extras() {
                    self.push_style(self.theme.md_link_style);
                    self.link_targets.push(Some(dest_url.to_string()));
                } else {
                    self.push_style(Style::default());
                    self.link_targets.push(None);
                }
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.in_code_block = true;
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag_end: TagEnd) {
        match tag_end {
            TagEnd::Paragraph => {
                self.flush();
                if self.list_stack.is_empty() {
                    self.push_empty_line();
                }
            }
            TagEnd::Heading(_) => {
                self.flush();
                self.pop_style();
                self.push_empty_line();
            }
            TagEnd::List(_) => {
                self.flush();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.push_empty_line();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Strong | TagEnd::Emphasis => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(Some(target)) = self.link_targets.pop() {
                    self.push_span(Span::styled(
                        format!(" <{target}>"),
                        self.theme.md_link_target_style,
                    ));
                }
            }
            TagEnd::CodeBlock => {
                self.flush();
                self.in_code_block = false;
                self.push_empty_line();
            }
            _ => {}
        }
    }
}

/// Render `content` into owned lines using `base` as the text style.
pub fn render_markdown(
    content: &str,
    theme: &Theme,
    profile: MarkdownProfile,
    base: Style,
) -> Vec<Line<'static>> {
    MarkdownRenderer::new(theme, profile, base).render(content)
}

/// Split plain text into lines without interpreting markup.
pub fn render_plain(content: &str, style: Style) -> Vec<Line<'static>> {
    content
        .split('\n')
        .map(|line| Line::from(Span::styled(detab(line), style)))
        .collect()
}

/// Display width of the widest line.
pub fn max_line_width(lines: &[Line<'_>]) -> usize {
    lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.width())
                .sum::<usize>()
        })
        .max()
        .unwrap_or(0)
}

fn detab(s: &str) -> String {
    s.replace('\t', "    ")
}
