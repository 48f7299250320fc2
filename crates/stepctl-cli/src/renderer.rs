//! Terminal rendering of plan listings.
//!
//! Listings and status lines are markdown. With color enabled, headers and
//! status prefixes are colored and list items go through termimad; otherwise
//! the text is printed as is.

use std::io::{self, Write};

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Renderer that switches between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    pub fn render(&self, markdown: &str) -> Result<()> {
        let mut out = io::stdout().lock();
        if !self.rich_enabled {
            out.write_all(markdown.as_bytes())?;
            out.flush()?;
            return Ok(());
        }
        for line in markdown.lines() {
            match line_color(line) {
                // termimad drops the hashes; thread headers keep them
                Some(code) => writeln!(out, "\x1b[{code}m{line}\x1b[0m")?,
                None => writeln!(out, "{}", self.skin.inline(line))?,
            }
        }
        out.flush()?;
        Ok(())
    }
}

/// ANSI color for lines printed verbatim.
fn line_color(line: &str) -> Option<u8> {
    if line.starts_with("## ") {
        Some(34)
    } else if line.starts_with("### ") {
        Some(36)
    } else if line.starts_with("Success:") {
        Some(32)
    } else if line.starts_with("Error:") {
        Some(31)
    } else {
        None
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
    }

    #[test]
    fn test_default_is_rich() {
        let renderer = TerminalRenderer::default();
        assert!(renderer.rich_enabled);
    }

    #[test]
    fn test_line_colors() {
        assert_eq!(line_color("## thread #1: tid = 0x0001"), Some(34));
        assert_eq!(line_color("### Active plan stack"), Some(36));
        assert_eq!(line_color("Error: no plan stack"), Some(31));
        assert_eq!(line_color("- Element 0: base"), None);
    }
}
