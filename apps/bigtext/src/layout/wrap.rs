//! Line Wrapper: greedy, character-count line breaking.
//!
//! Operates purely on character counts: no font or pixel knowledge. A line is
//! committed when the scan runs `cols` characters past the current line start
//! or when an explicit `\n` forces a break. With word wrap enabled, the most
//! recent space moves the break point to just after itself, so lines prefer to
//! end on whitespace. Once the unscanned remainder fits in `cols`, it is
//! emitted split only on explicit newlines.
//!
//! Post-processing drops trailing empty lines and demotes a trailing
//! separator, so a layout never ends with a divider.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Line-breaking policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapPolicy {
    /// Allow breaks after a space, not only at the column limit or a newline.
    pub word_wrap: bool,
    /// Mark lines ended by an explicit newline as paragraph separators.
    pub line_separator: bool,
}

impl Default for WrapPolicy {
    fn default() -> Self {
        Self {
            word_wrap: true,
            line_separator: false,
        }
    }
}

/// Whether a divider is drawn after the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Normal,
    Separator,
}

/// One display line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub text: String,
    pub kind: LineKind,
}

impl Line {
    fn new(chars: &[char], forced: bool, policy: WrapPolicy) -> Self {
        let kind = if forced && policy.line_separator {
            LineKind::Separator
        } else {
            LineKind::Normal
        };
        Self {
            text: chars.iter().filter(|&&c| c != '\n').collect(),
            kind,
        }
    }

    /// Length in characters, the unit of the column budget.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wrapping
// ────────────────────────────────────────────────────────────────────────────

/// Wraps `text` into lines of at most `cols` characters.
///
/// Returns `None` when `cols == 0`: nothing can be laid out in zero columns,
/// and callers treat that as "does not fit".
///
/// When a space sits exactly at the column limit the break is taken at the
/// space, which is consumed rather than carried on either line.
pub fn wrap(text: &str, cols: usize, policy: WrapPolicy) -> Option<Vec<Line>> {
    if cols == 0 {
        return None;
    }

    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut end = start + cols;

    for (i, &c) in chars.iter().enumerate() {
        let mut forced = false;
        if c == '\n' {
            end = i + 1;
            forced = true;
        } else if policy.word_wrap && c == ' ' {
            end = i + 1;
        }

        if i - start >= cols || forced {
            // A break space at the limit sits one past the budget.
            let line_end = if forced { end } else { end.min(start + cols) };
            lines.push(Line::new(&chars[start..line_end], forced, policy));
            start = end;
            end = start + cols;
        }

        if start + cols >= len {
            for segment in chars[start..].split(|&ch| ch == '\n') {
                lines.push(Line::new(segment, true, policy));
            }
            break;
        }
    }

    trim_trailing(&mut lines);
    Some(lines)
}

/// Drops trailing empty lines and demotes a trailing separator.
fn trim_trailing(lines: &mut Vec<Line>) {
    while lines.last().is_some_and(|line| line.text.is_empty()) {
        lines.pop();
    }
    if let Some(last) = lines.last_mut() {
        last.kind = LineKind::Normal;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
