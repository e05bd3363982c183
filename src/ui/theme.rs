use ratatui::style::{Color, Modifier, Style};

const ACCENT: Color = Color::Rgb(0xa8, 0x55, 0xf7);
const ACCENT_SOFT: Color = Color::Rgb(0xd8, 0xb4, 0xfe);
const CODE_BACKGROUND: Color = Color::Rgb(0x3b, 0x25, 0x52);

#[derive(Debug, Clone)]
pub struct Theme {
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub bot_text_style: Style,
    pub error_text_style: Style,
    pub typing_style: Style,
    pub welcome_style: Style,

    // Memory panel
    pub memory_border_style: Style,
    pub memory_header_style: Style,
    pub memory_text_style: Style,

    // Chrome
    pub title_style: Style,
    pub header_hint_style: Style,
    pub footer_style: Style,
    pub input_border_style: Style,
    pub input_disabled_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
    pub input_cursor_style: Style,

    // Markdown
    pub md_heading_styles: [Style; 3],
    pub md_strong_style: Style,
    pub md_emphasis_style: Style,
    pub md_inline_code_style: Style,
    pub md_link_style: Style,
    pub md_link_target_style: Style,
    pub md_list_marker_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            bot_text_style: Style::default().fg(Color::White),
            error_text_style: Style::default().fg(Color::LightRed),
            typing_style: Style::default().fg(ACCENT_SOFT),
            welcome_style: Style::default().fg(Color::Gray),

            memory_border_style: Style::default().fg(ACCENT),
            memory_header_style: Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            memory_text_style: Style::default().fg(Color::Gray),

            title_style: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            header_hint_style: Style::default().fg(Color::DarkGray),
            footer_style: Style::default().fg(Color::DarkGray),
            input_border_style: Style::default().fg(ACCENT),
            input_disabled_style: Style::default().fg(Color::DarkGray),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),

            md_heading_styles: [
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::UNDERLINED),
                Style::default().add_modifier(Modifier::BOLD),
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::DIM),
            ],
            md_strong_style: Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            md_emphasis_style: Style::default()
                .fg(ACCENT_SOFT)
                .add_modifier(Modifier::ITALIC),
            md_inline_code_style: Style::default().bg(CODE_BACKGROUND),
            md_link_style: Style::default()
                .fg(ACCENT)
                .add_modifier(Modifier::UNDERLINED),
            md_link_target_style: Style::default().fg(Color::DarkGray),
            md_list_marker_style: Style::default().fg(ACCENT_SOFT),
        }
    }

    /// Black-and-white theme for non-interactive output.
    pub fn monochrome() -> Self {
        let plain = Style::default();
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Theme {
            user_prefix_style: bold,
            user_text_style: plain,
            bot_text_style: plain,
            error_text_style: plain,
            typing_style: plain,
            welcome_style: plain,
            memory_border_style: plain,
            memory_header_style: bold,
            memory_text_style: plain,
            title_style: bold,
            header_hint_style: plain,
            footer_style: plain,
            input_border_style: plain,
            input_disabled_style: plain,
            input_title_style: plain,
            input_text_style: plain,
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            md_heading_styles: [bold, bold, bold],
            md_strong_style: bold,
            md_emphasis_style: Style::default().add_modifier(Modifier::ITALIC),
            md_inline_code_style: plain,
            md_link_style: Style::default().add_modifier(Modifier::UNDERLINED),
            md_link_target_style: plain,
            md_list_marker_style: plain,
        }
    }

    /// Heading style for levels 1-3; deeper levels reuse the level 3 style.
    pub fn md_heading_style(&self, level: u8) -> Style {
        let index = (level.clamp(1, 3) - 1) as usize;
        self.md_heading_styles[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_headings_reuse_third_level() {
        let theme = Theme::dark_default();
        assert_eq!(theme.md_heading_style(6), theme.md_heading_style(3));
        assert_eq!(theme.md_heading_style(0), theme.md_heading_style(1));
    }
}
