use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

use super::renderers::{RenderedLine, RenderedPage, Tone};

const DEFAULT_WIDTH: usize = 100;

/// Prints rendered pages to stdout, with ANSI colours when attached to a terminal
pub struct ConsoleRenderer {
    color: bool,
    width: usize,
}

impl ConsoleRenderer {
    pub fn new(color: bool, width: usize) -> Self {
        Self { color, width }
    }

    /// Colour and width from the current stdout.
    pub fn detect() -> Self {
        let stdout = std::io::stdout();
        let color = stdout.is_terminal() && std::env::var_os("NO_COLOR").is_none();
        let width = terminal_size::terminal_size()
            .map(|(terminal_size::Width(w), _)| w as usize)
            .unwrap_or(DEFAULT_WIDTH);
        Self::new(color, width)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn paint(&self, line: &RenderedLine) -> String {
        if !self.color {
            return line.plain_text().trim_end().to_string();
        }
        line.segments
            .iter()
            .map(|segment| {
                let text = segment.text.as_str();
                match segment.tone {
                    Tone::Normal => text.to_string(),
                    Tone::Header => text.bold().to_string(),
                    Tone::Muted => text.dimmed().to_string(),
                    Tone::Selected => text.reversed().to_string(),
                    Tone::Accent => text.cyan().to_string(),
                }
            })
            .collect()
    }

    pub fn status(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn print_page(&self, page: &RenderedPage) {
        for line in &page.lines {
            println!("{}", self.paint(line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_without_color_is_plain() {
        let mut line = RenderedLine::default();
        line.push("[x] ", Tone::Accent);
        line.push("Practical 1  ", Tone::Selected);
        let console = ConsoleRenderer::new(false, 80);
        assert_eq!(console.paint(&line), "[x] Practical 1");
    }

    #[test]
    fn test_paint_with_color_wraps_segments() {
        let mut line = RenderedLine::default();
        line.push("Name", Tone::Header);
        let console = ConsoleRenderer::new(true, 80);
        let painted = console.paint(&line);
        assert!(painted.contains("Name"));
        assert!(painted.starts_with("\u{1b}["));
    }
}
