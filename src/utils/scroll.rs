use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

/// Handles transcript wrapping and scroll bounds.
pub struct ScrollCalculator;

impl ScrollCalculator {
    /// Pre-wrap lines to `terminal_width` columns, breaking at spaces and
    /// splitting words that are wider than a full line. Styles are kept per
    /// character so the wrapped output renders identically.
    ///
    /// Rendering pre-wrapped lines without ratatui's own wrapping keeps the
    /// line count used for scrolling equal to what is drawn.
    pub fn prewrap_lines(lines: &[Line<'_>], terminal_width: u16) -> Vec<Line<'static>> {
        let width = terminal_width as usize;
        let mut out: Vec<Line<'static>> = Vec::with_capacity(lines.len());

        for line in lines {
            if width == 0 {
                out.push(to_owned_line(line));
                continue;
            }
            wrap_line(line, width, &mut out);
        }

        out
    }

    /// Number of rows the pre-wrapped lines occupy.
    pub fn calculate_wrapped_line_count(lines: &[Line<'_>]) -> u16 {
        lines.len().min(u16::MAX as usize) as u16
    }

    /// Largest offset that still fills the viewport; 0 when everything fits.
    pub fn calculate_max_scroll_offset(lines: &[Line<'_>], available_height: u16) -> u16 {
        Self::calculate_wrapped_line_count(lines).saturating_sub(available_height)
    }
}

fn to_owned_line(line: &Line<'_>) -> Line<'static> {
    let spans: Vec<Span<'static>> = line
        .spans
        .iter()
        .map(|s| Span::styled(s.content.to_string(), s.style))
        .collect();
    Line::from(spans)
}

/// Accumulates styled output for a single visual row.
#[derive(Default)]
struct RowBuilder {
    spans: Vec<Span<'static>>,
    width: usize,
}

impl RowBuilder {
    fn push(&mut self, ch: char, style: Style, ch_width: usize) {
        if let Some(last) = self.spans.last_mut() {
            if last.style == style {
                last.content.to_mut().push(ch);
                self.width += ch_width;
                return;
            }
        }
        self.spans.push(Span::styled(ch.to_string(), style));
        self.width += ch_width;
    }

    fn emit(&mut self, out: &mut Vec<Line<'static>>) {
        out.push(Line::from(std::mem::take(&mut self.spans)));
        self.width = 0;
    }
}

fn wrap_line(line: &Line<'_>, width: usize, out: &mut Vec<Line<'static>>) {
    let mut row = RowBuilder::default();
    let mut word: Vec<(char, Style, usize)> = Vec::new();
    let mut word_width = 0usize;
    let mut emitted_any = false;

    let flush_word = |row: &mut RowBuilder,
                      out: &mut Vec<Line<'static>>,
                      word: &mut Vec<(char, Style, usize)>,
                      word_width: &mut usize,
                      emitted_any: &mut bool| {
        if word.is_empty() {
            return;
        }
        if row.width > 0 && row.width + *word_width > width {
            row.emit(out);
            *emitted_any = true;
        }
        for (ch, style, ch_width) in word.drain(..) {
            if row.width > 0 && row.width + ch_width > width {
                row.emit(out);
                *emitted_any = true;
            }
            row.push(ch, style, ch_width);
        }
        *word_width = 0;
    };

    for span in &line.spans {
        for ch in span.content.chars() {
            if ch == ' ' {
                flush_word(&mut row, out, &mut word, &mut word_width, &mut emitted_any);
                if row.width < width {
                    row.push(' ', span.style, 1);
                } else {
                    // The space that triggered the wrap is dropped.
                    row.emit(out);
                    emitted_any = true;
                }
            } else {
                let ch_width = ch.width().unwrap_or(0);
                word.push((ch, span.style, ch_width));
                word_width += ch_width;
            }
        }
    }
    flush_word(&mut row, out, &mut word, &mut word_width, &mut emitted_any);

    if !row.spans.is_empty() {
        row.emit(out);
        emitted_any = true;
    }
    if !emitted_any {
        out.push(Line::from(""));
    }
}
