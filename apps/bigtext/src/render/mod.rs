//! Render sinks: where a fitted layout gets drawn.
//!
//! The engine never draws. A sink receives each new layout and presents it;
//! `TerminalSink` writes it as aligned text rows with a rule under every
//! separator line, recycling its row buffers between redraws. Configured
//! colors are applied with SGR escapes and reset after each frame.

use std::io::{self, Write};
use std::iter;

use crate::config::Align;
use crate::layout::{Layout, LineKind};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const RESET: &str = "\x1b[0m";
const RULE: char = '─';

const BASIC_COLORS: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

/// A terminal color: one of the eight basic ANSI colors or a 24-bit RGB value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermColor {
    /// Index into the basic palette, `0..8`.
    Basic(u8),
    Rgb(u8, u8, u8),
}

impl TermColor {
    /// Parses a basic color name (`"red"`) or a `#rrggbb` value.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        if let Some(hex) = value.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return None;
            }
            let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).ok();
            return Some(TermColor::Rgb(channel(0)?, channel(2)?, channel(4)?));
        }
        BASIC_COLORS
            .iter()
            .position(|name| *name == value)
            .map(|index| TermColor::Basic(index as u8))
    }

    fn sgr(self, background: bool) -> String {
        let base = if background { 40 } else { 30 };
        match self {
            TermColor::Basic(index) => format!("\x1b[{}m", base + u32::from(index)),
            TermColor::Rgb(r, g, b) => format!("\x1b[{};2;{r};{g};{b}m", base + 8),
        }
    }
}

/// Foreground and background colors. `None` keeps the terminal's own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Palette {
    pub fg: Option<TermColor>,
    pub bg: Option<TermColor>,
}

impl Palette {
    fn is_default(&self) -> bool {
        self.fg.is_none() && self.bg.is_none()
    }

    fn escape(&self) -> String {
        let bg = self.bg.map(|color| color.sgr(true)).unwrap_or_default();
        let fg = self.fg.map(|color| color.sgr(false)).unwrap_or_default();
        bg + &fg
    }
}

pub trait RenderSink: Send {
    fn present(&mut self, layout: &Layout) -> io::Result<()>;
}

/// Draws layouts as rows of text on a writer, usually stdout.
pub struct TerminalSink<W> {
    out: W,
    align: Align,
    clear_screen: bool,
    palette: Palette,
    /// Rows of the frame currently shown.
    rows: Vec<String>,
    /// Row buffers released by the previous frame.
    free: Vec<String>,
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W, align: Align, clear_screen: bool) -> Self {
        Self {
            out,
            align,
            clear_screen,
            palette: Palette::default(),
            rows: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    fn release_rows(&mut self) {
        self.free.extend(self.rows.drain(..).map(|mut row| {
            row.clear();
            row
        }));
    }

    fn take_row(&mut self) -> String {
        self.free.pop().unwrap_or_default()
    }

    fn build_rows(&mut self, layout: &Layout) {
        let cols = layout.grid.cols;
        for line in &layout.lines {
            let mut row = self.take_row();
            let slack = cols.saturating_sub(line.char_len());
            let indent = match self.align {
                Align::Left => 0,
                Align::Center => slack / 2,
                Align::Right => slack,
            };
            row.extend(iter::repeat(' ').take(indent));
            row.push_str(&line.text);
            self.rows.push(row);

            match line.kind {
                LineKind::Separator => {
                    let mut rule = self.take_row();
                    rule.extend(iter::repeat(RULE).take(cols));
                    self.rows.push(rule);
                }
                LineKind::Normal => {}
            }
        }
    }
}

impl<W: Write + Send> RenderSink for TerminalSink<W> {
    fn present(&mut self, layout: &Layout) -> io::Result<()> {
        self.release_rows();
        self.build_rows(layout);

        // Colors go first so a full-screen clear paints the background.
        let colored = !self.palette.is_default();
        if colored {
            self.out.write_all(self.palette.escape().as_bytes())?;
        }
        if self.clear_screen {
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        for row in &self.rows {
            writeln!(self.out, "{row}")?;
        }
        if colored {
            self.out.write_all(RESET.as_bytes())?;
        }
        self.out.flush()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FontSize, GridCapacity, Line};

    fn layout(lines: &[(&str, LineKind)], cols: usize) -> Layout {
        Layout {
            font_size: FontSize::from_points(12),
            grid: GridCapacity { rows: 10, cols },
            lines: lines
                .iter()
                .map(|&(text, kind)| Line {
                    text: text.to_string(),
                    kind,
                })
                .collect(),
            fallback: false,
        }
    }

    #[test]
    fn test_left_aligned_rows_with_rule() {
        let mut sink = TerminalSink::new(Vec::new(), Align::Left, false);
        sink.present(&layout(
            &[("one", LineKind::Separator), ("two", LineKind::Normal)],
            5,
        ))
        .unwrap();
        assert_eq!(sink.rows, ["one", "─────", "two"]);
        assert_eq!(
            String::from_utf8(sink.out.clone()).unwrap(),
            "one\n─────\ntwo\n"
        );
    }

    #[test]
    fn test_center_and_right_alignment() {
        let lines = [("ab", LineKind::Normal)];
        let mut center = TerminalSink::new(Vec::new(), Align::Center, false);
        center.present(&layout(&lines, 7)).unwrap();
        assert_eq!(center.rows, ["  ab"]);

        let mut right = TerminalSink::new(Vec::new(), Align::Right, false);
        right.present(&layout(&lines, 7)).unwrap();
        assert_eq!(right.rows, ["     ab"]);
    }

    #[test]
    fn test_full_screen_clears_first() {
        let mut sink = TerminalSink::new(Vec::new(), Align::Left, true);
        sink.present(&layout(&[("x", LineKind::Normal)], 1)).unwrap();
        assert!(sink.out.starts_with(CLEAR_SCREEN.as_bytes()));
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!(TermColor::parse("Black"), Some(TermColor::Basic(0)));
        assert_eq!(TermColor::parse(" white "), Some(TermColor::Basic(7)));
        assert_eq!(TermColor::parse("#00A0ff"), Some(TermColor::Rgb(0, 160, 255)));
        assert_eq!(TermColor::parse("#fff"), None);
        assert_eq!(TermColor::parse("#gg0000"), None);
        assert_eq!(TermColor::parse("#ééé"), None);
        assert_eq!(TermColor::parse("chartreuse"), None);
    }

    #[test]
    fn test_palette_wraps_frame_in_color_escapes() {
        let palette = Palette {
            fg: Some(TermColor::Basic(7)),
            bg: Some(TermColor::Rgb(1, 2, 3)),
        };
        let mut sink = TerminalSink::new(Vec::new(), Align::Left, true).with_palette(palette);
        sink.present(&layout(&[("hi", LineKind::Normal)], 2)).unwrap();
        assert_eq!(
            String::from_utf8(sink.out).unwrap(),
            "\x1b[48;2;1;2;3m\x1b[37m\x1b[2J\x1b[Hhi\n\x1b[0m"
        );
    }

    #[test]
    fn test_redraw_recycles_row_buffers() {
        let mut sink = TerminalSink::new(io::sink(), Align::Left, false);
        let three = layout(
            &[
                ("a", LineKind::Normal),
                ("b", LineKind::Normal),
                ("c", LineKind::Normal),
            ],
            3,
        );
        sink.present(&three).unwrap();
        assert_eq!(sink.free.len(), 0);

        sink.present(&layout(&[("z", LineKind::Normal)], 3)).unwrap();
        assert_eq!(sink.rows, ["z"]);
        assert_eq!(sink.free.len(), 2);

        sink.present(&three).unwrap();
        assert_eq!(sink.free.len(), 0);
        assert_eq!(sink.rows, ["a", "b", "c"]);
    }
}
