//! Printers: verbatim run output and colored session text.

use std::io::{self, Write};

use owo_colors::OwoColorize;

pub struct TextPrinter {
    pub color: Option<String>,
}

impl TextPrinter {
    pub fn paint(&self, text: &str) -> String {
        match self.color.as_deref() {
            Some("green") => text.green().to_string(),
            Some("cyan") => text.cyan().to_string(),
            Some("magenta") => text.magenta().to_string(),
            Some("yellow") => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }

    pub fn print(&self, text: &str) {
        println!("{}", self.paint(text));
    }

    /// Print without a newline and flush, for prompts.
    pub fn prompt(&self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        write!(out, "{}", self.paint(text))?;
        out.flush()
    }
}

/// Write run output exactly as captured, closing an unterminated last line.
pub fn print_output(text: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(text.as_bytes())?;
    if !text.is_empty() && !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}
