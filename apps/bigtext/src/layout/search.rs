//! Fit Search: finds the largest font size at which text fits the display.
//!
//! # Search space
//! Font sizes are enumerated in deca-points from `min_pt` (inclusive) to
//! `max_pt` (exclusive), giving indices `[0, N)`. Fit is assumed monotone in
//! the index: if index `i` fits, every smaller index fits too.
//!
//! # Probing
//! `fits(i)` sizes the grid at index `i`, rejects early when the text has more
//! characters than the grid has cells, then wraps and compares the line count
//! against the rows. Indices below zero always fit; indices at or past `N`
//! never do.
//!
//! # Guess
//! A `SearchGuess` remembers the last answer. Testing it (and the next index
//! up) first lets a repeat call on similar text finish in two probes. The guess
//! only changes how many probes run, never the answer.

use tracing::debug;

use crate::layout::font_metrics::{FontMetricsOracle, FontSize, MetricsCache};
use crate::layout::grid::{capacity, DisplayArea, GridCapacity};
use crate::layout::wrap::{wrap, Line, WrapPolicy};

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Allowed font sizes: `min` inclusive, `max` exclusive, in tenth-point steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeRange {
    min: FontSize,
    max: FontSize,
}

impl SizeRange {
    pub fn new(min_pt: u32, max_pt: u32) -> Self {
        Self {
            min: FontSize::from_points(min_pt),
            max: FontSize::from_points(max_pt),
        }
    }

    /// Number of searchable sizes.
    pub fn len(&self) -> usize {
        self.max.deca_points().saturating_sub(self.min.deca_points()) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn size_at(&self, index: usize) -> FontSize {
        FontSize::from_deca_points(self.min.deca_points() + index as u32)
    }

    pub fn min(&self) -> FontSize {
        self.min
    }

    pub fn max(&self) -> FontSize {
        self.max
    }
}

/// The index found by the previous search, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchGuess(Option<usize>);

impl SearchGuess {
    pub fn get(&self) -> Option<usize> {
        self.0
    }

    pub fn remember(&mut self, index: usize) {
        self.0 = Some(index);
    }
}

/// A fitted layout, ready for a render sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub font_size: FontSize,
    /// Grid the lines were wrapped into.
    pub grid: GridCapacity,
    pub lines: Vec<Line>,
    /// True when the placeholder was fitted instead of the requested text.
    pub fallback: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Search
// ────────────────────────────────────────────────────────────────────────────

/// One search over the size range for a fixed text.
pub struct FitSearch<'a, O> {
    text: &'a str,
    char_count: usize,
    range: SizeRange,
    area: DisplayArea,
    policy: WrapPolicy,
    metrics: &'a mut MetricsCache<O>,
    probes: usize,
}

impl<'a, O: FontMetricsOracle> FitSearch<'a, O> {
    pub fn new(
        text: &'a str,
        range: SizeRange,
        area: DisplayArea,
        policy: WrapPolicy,
        metrics: &'a mut MetricsCache<O>,
    ) -> Self {
        Self {
            text,
            char_count: text.chars().count(),
            range,
            area,
            policy,
            metrics,
            probes: 0,
        }
    }

    /// Lays the text out at `index`, or `None` when it does not fit there.
    pub fn layout_at(&mut self, index: usize) -> Option<Layout> {
        if index >= self.range.len() {
            return None;
        }
        self.probes += 1;

        let font_size = self.range.size_at(index);
        let grid = capacity(self.metrics.get(font_size), self.area);
        if grid.is_degenerate() || self.char_count > grid.cells() {
            return None;
        }
        let lines = wrap(self.text, grid.cols, self.policy)?;
        (lines.len() <= grid.rows).then_some(Layout {
            font_size,
            grid,
            lines,
            fallback: false,
        })
    }

    pub fn fits(&mut self, index: i64) -> bool {
        match usize::try_from(index) {
            Ok(index) => self.layout_at(index).is_some(),
            Err(_) => true,
        }
    }

    /// Finds the largest fitting size, or `None` when even the smallest fails.
    ///
    /// Stores the resulting index in `guess` whatever the outcome.
    pub fn run(&mut self, guess: &mut SearchGuess) -> Option<Layout> {
        let n = self.range.len() as i64;
        // Invariant: `lo` fits (or is the -1 sentinel), `hi` does not (or is N).
        let mut lo: i64 = -1;
        let mut hi: i64 = n;
        let mut best = None;

        if let Some(g) = guess.get() {
            if let Some(layout) = self.layout_at(g) {
                lo = g as i64;
                best = Some(layout);
                match self.layout_at(g + 1) {
                    Some(layout) => {
                        lo = g as i64 + 1;
                        best = Some(layout);
                    }
                    None => hi = g as i64 + 1,
                }
            }
        }

        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            match self.layout_at(mid as usize) {
                Some(layout) => {
                    lo = mid;
                    best = Some(layout);
                }
                None => hi = mid,
            }
        }

        guess.remember(lo.max(0) as usize);
        debug!(
            probes = self.probes,
            index = lo,
            guessed = guess.get(),
            "fit search finished"
        );
        best
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
