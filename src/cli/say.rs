//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};

use crate::core::message::MemoryInfo;
use crate::core::session::{ChatSession, SubmitOutcome};
use crate::ui::markdown::{render_markdown, MarkdownProfile};
use crate::ui::theme::Theme;

use super::RunSettings;

/// Output options for a one-shot question.
#[derive(Debug, Clone, Copy)]
pub struct SayOptions {
    pub markdown: bool,
    pub show_memory: bool,
}

pub async fn run_say(
    words: Vec<String>,
    show_memory: bool,
    settings: &RunSettings,
) -> Result<(), Box<dyn Error>> {
    let prompt = words.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: echo-chat say <question>");
        std::process::exit(1);
    }

    let backend = settings.backend()?;
    let session = ChatSession::new(backend, settings.sleeper(), settings.reveal_delay);
    let options = SayOptions {
        markdown: settings.markdown,
        show_memory,
    };

    let mut stdout = io::stdout();
    match say(&session, &prompt, options, &mut stdout).await? {
        SubmitOutcome::Failed => {
            eprintln!("❌ Error getting response from {}", settings.backend_url);
            std::process::exit(1);
        }
        _ => Ok(()),
    }
}

/// Ask `prompt` once and write the reply to `out`.
///
/// Plain output is written as it is revealed; markdown output is rendered
/// after the reply completes so the markup can be interpreted as a whole.
pub async fn say<W>(
    session: &ChatSession,
    prompt: &str,
    options: SayOptions,
    out: &mut W,
) -> Result<SubmitOutcome, Box<dyn Error>>
where
    W: Write + Send,
{
    let mut write_error: Option<io::Error> = None;
    let outcome = {
        let stream_live = !options.markdown;
        let out = &mut *out;
        let write_error = &mut write_error;
        session
            .submit_with_progress(prompt, move |ch| {
                if !stream_live || write_error.is_some() {
                    return;
                }
                let mut buf = [0u8; 4];
                if let Err(err) = out
                    .write_all(ch.encode_utf8(&mut buf).as_bytes())
                    .and_then(|_| out.flush())
                {
                    *write_error = Some(err);
                }
            })
            .await
    };
    if let Some(err) = write_error {
        return Err(err.into());
    }

    if outcome != SubmitOutcome::Answered {
        return Ok(outcome);
    }

    let state = session.snapshot().await;
    let Some(reply) = state.log.last() else {
        return Ok(outcome);
    };

    if options.markdown {
        let theme = Theme::monochrome();
        for line in render_markdown(
            &reply.text,
            &theme,
            MarkdownProfile::Reply,
            theme.bot_text_style,
        ) {
            writeln!(out, "{line}")?;
        }
    } else {
        writeln!(out)?;
    }

    if options.show_memory {
        if let Some(memory) = &reply.memory_info {
            write_memory(out, memory)?;
        }
    }
    out.flush()?;
    Ok(outcome)
}

fn write_memory<W: Write>(out: &mut W, memory: &MemoryInfo) -> io::Result<()> {
    let theme = Theme::monochrome();
    writeln!(out)?;
    writeln!(out, "🧠 Memory (Buffer: {} messages)", memory.buffer_label())?;
    for line in render_markdown(
        &memory.content,
        &theme,
        MarkdownProfile::Memory,
        theme.memory_text_style,
    ) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
