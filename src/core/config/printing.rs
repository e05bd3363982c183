use crate::core::config::data::Config;

impl Config {
    /// Lines describing the effective configuration, marking values that
    /// come from defaults.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = vec!["Current configuration:".to_string()];
        lines.push(format!(
            "  backend-url: {}{}",
            self.backend_url(),
            default_marker(self.backend_url.is_none())
        ));
        lines.push(format!(
            "  reveal-delay: {} ms{}",
            self.reveal_delay().as_millis(),
            default_marker(self.reveal_delay_ms.is_none())
        ));
        lines.push(format!(
            "  markdown: {}{}",
            if self.markdown_enabled() { "on" } else { "off" },
            default_marker(self.markdown.is_none())
        ));
        match self.request_timeout() {
            Some(timeout) => lines.push(format!("  request-timeout: {} s", timeout.as_secs())),
            None => lines.push("  request-timeout: (unset, waits indefinitely)".to_string()),
        }
        lines
    }

    pub fn print_all(&self) {
        for line in self.describe() {
            println!("{line}");
        }
    }
}

fn default_marker(is_default: bool) -> &'static str {
    if is_default {
        " (default)"
    } else {
        ""
    }
}
