use std::fmt;

pub const MARKDOWN_CHARS: [char; 19] =
    ['_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\'];

/// Escapes Telegram MarkdownV2 reserved characters when displayed.
pub struct EscapeMarkdown<'a>(pub &'a str);

impl fmt::Display for EscapeMarkdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for char in self.0.chars() {
            if MARKDOWN_CHARS.contains(&char) {
                write!(f, "\\")?;
            }
            write!(f, "{char}")?;
        }

        Ok(())
    }
}

pub fn format_duration(duration: u64) -> String {
    let hours = duration / 3600;
    let minutes = (duration / 60) % 60;
    let seconds = duration % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
