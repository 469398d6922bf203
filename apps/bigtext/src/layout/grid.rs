//! Grid sizing: how many rows and columns of text a display area holds at a
//! given font size.

use crate::layout::font_metrics::GlyphMetrics;

/// Display area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayArea {
    pub width: u32,
    pub height: u32,
}

impl DisplayArea {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Replaces either dimension with a forced value, when one is given.
    pub fn with_forced(self, width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width: width.unwrap_or(self.width),
            height: height.unwrap_or(self.height),
        }
    }
}

/// Text capacity of a display area at one font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCapacity {
    pub rows: usize,
    pub cols: usize,
}

impl GridCapacity {
    /// Zero rows or columns: nothing fits, not even empty text.
    pub fn is_degenerate(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn cells(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }
}

/// Computes the grid capacity of `area` for the given glyph metrics.
///
/// Zero-sized metrics yield a zero dimension instead of dividing by zero.
pub fn capacity(metrics: GlyphMetrics, area: DisplayArea) -> GridCapacity {
    let cols = area.width.checked_div(metrics.glyph_width).unwrap_or(0);
    let rows = area.height.checked_div(metrics.line_height).unwrap_or(0);
    GridCapacity {
        rows: rows as usize,
        cols: cols as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(glyph_width: u32, line_height: u32) -> GlyphMetrics {
        GlyphMetrics {
            glyph_width,
            line_height,
        }
    }

    #[test]
    fn test_capacity_floors_both_dimensions() {
        let grid = capacity(metrics(56, 100), DisplayArea::new(480, 800));
        assert_eq!(grid, GridCapacity { rows: 8, cols: 8 });
        assert_eq!(grid.cells(), 64);
    }

    #[test]
    fn test_zero_metrics_yield_degenerate_grid() {
        let area = DisplayArea::new(480, 800);
        assert!(capacity(metrics(0, 18), area).is_degenerate());
        assert!(capacity(metrics(10, 0), area).is_degenerate());
        assert_eq!(capacity(metrics(0, 0), area), GridCapacity { rows: 0, cols: 0 });
    }

    #[test]
    fn test_glyph_larger_than_area_is_degenerate() {
        let grid = capacity(metrics(10, 18), DisplayArea::new(1, 1));
        assert!(grid.is_degenerate());
    }

    #[test]
    fn test_forced_dimensions_replace_host_values() {
        let area = DisplayArea::new(854, 480);
        assert_eq!(area.with_forced(Some(300), None), DisplayArea::new(300, 480));
        assert_eq!(area.with_forced(None, Some(100)), DisplayArea::new(854, 100));
        assert_eq!(area.with_forced(None, None), area);
    }
}
