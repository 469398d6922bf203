//! Text Fitter: the engine's entry point.
//!
//! Runs the size search over the configured range. When the text fits nowhere
//! it logs a warning and fits a one-character placeholder instead; if even
//! that fails the display is unusable and the caller gets `TerminalNoFit`.

use tracing::{error, info, warn};

use crate::errors::FitError;
use crate::layout::font_metrics::{FontMetricsOracle, MetricsCache};
use crate::layout::grid::DisplayArea;
use crate::layout::search::{FitSearch, Layout, SearchGuess, SizeRange};
use crate::layout::wrap::WrapPolicy;

/// Shown when the requested text cannot fit at any size.
pub const PLACEHOLDER: &str = "!";

/// Fixed inputs of every fit: size bounds, area and wrap policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitParams {
    pub range: SizeRange,
    pub area: DisplayArea,
    pub policy: WrapPolicy,
}

/// Owns the search guess and metrics cache across fits.
pub struct TextFitter<O> {
    params: FitParams,
    metrics: MetricsCache<O>,
    guess: SearchGuess,
}

impl<O: FontMetricsOracle> TextFitter<O> {
    pub fn new(params: FitParams, oracle: O, typeface: impl Into<String>) -> Self {
        Self {
            params,
            metrics: MetricsCache::new(oracle, typeface),
            guess: SearchGuess::default(),
        }
    }

    /// Fits `text` without any fallback.
    pub fn try_fit(&mut self, text: &str) -> Result<Layout, FitError> {
        let FitParams {
            range,
            area,
            policy,
        } = self.params;
        let mut search = FitSearch::new(text, range, area, policy, &mut self.metrics);
        search.run(&mut self.guess).ok_or(FitError::NoFit {
            min: range.min(),
            max: range.max(),
        })
    }

    /// Fits `text`, falling back to the placeholder when it is too big.
    pub fn fit(&mut self, text: &str) -> Result<Layout, FitError> {
        match self.try_fit(text) {
            Ok(layout) => {
                info!(
                    font = %layout.font_size,
                    rows = layout.grid.rows,
                    cols = layout.grid.cols,
                    lines = layout.lines.len(),
                    "text fitted"
                );
                Ok(layout)
            }
            Err(e @ FitError::NoFit { .. }) => {
                warn!(chars = text.chars().count(), "{e}");
                self.fit_placeholder()
            }
            Err(e) => Err(e),
        }
    }

    fn fit_placeholder(&mut self) -> Result<Layout, FitError> {
        match self.try_fit(PLACEHOLDER) {
            Ok(layout) => Ok(Layout {
                fallback: true,
                ..layout
            }),
            Err(_) => {
                let FitParams { range, area, .. } = self.params;
                let err = FitError::TerminalNoFit {
                    width: area.width,
                    height: area.height,
                    min: range.min(),
                };
                error!("failure: {err}");
                Err(err)
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{FontSize, GlyphMetrics, StaticMetrics};

    struct LinearOracle;

    impl FontMetricsOracle for LinearOracle {
        fn measure(&self, _typeface: &str, size: FontSize) -> GlyphMetrics {
            GlyphMetrics {
                glyph_width: size.deca_points() / 10,
                line_height: size.deca_points() * 18 / 100,
            }
        }
    }

    fn fitter(width: u32, height: u32) -> TextFitter<LinearOracle> {
        let params = FitParams {
            range: SizeRange::new(4, 600),
            area: DisplayArea::new(width, height),
            policy: WrapPolicy::default(),
        };
        TextFitter::new(params, LinearOracle, "Test Mono")
    }

    #[test]
    fn test_fit_returns_largest_layout() {
        let mut fitter = fitter(480, 800);
        let layout = fitter
            .fit("The quick brown fox jumped over the lazy dog.")
            .unwrap();
        assert_eq!(layout.font_size, FontSize::from_deca_points(561));
        assert!(!layout.fallback);
        assert_eq!(fitter.guess.get(), Some(521));
    }

    #[test]
    fn test_try_fit_reports_no_fit() {
        // 4pt glyphs in a 40x7 area: one row of ten columns.
        let mut fitter = fitter(40, 7);
        let err = fitter.try_fit(&"x".repeat(11)).unwrap_err();
        assert_eq!(
            err,
            FitError::NoFit {
                min: FontSize::from_points(4),
                max: FontSize::from_points(600),
            }
        );
    }

    #[test]
    fn test_too_big_text_falls_back_to_placeholder() {
        let mut fitter = fitter(40, 7);
        let layout = fitter.fit(&"x".repeat(11)).unwrap();
        assert!(layout.fallback);
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].text, PLACEHOLDER);
    }

    #[test]
    fn test_one_pixel_display_is_terminal() {
        let mut fitter = fitter(1, 1);
        let err = fitter.fit("anything").unwrap_err();
        assert_eq!(
            err,
            FitError::TerminalNoFit {
                width: 1,
                height: 1,
                min: FontSize::from_points(4),
            }
        );
    }

    #[test]
    fn test_guess_does_not_change_results() {
        let texts = [
            "short",
            "a somewhat longer line of text that needs wrapping",
            "x",
            "multi\nline\ntext\nwith\nmany\nrows",
            "",
            "short",
        ];
        let mut warm = fitter(480, 800);
        for text in texts {
            let mut cold = fitter(480, 800);
            assert_eq!(warm.fit(text), cold.fit(text), "{text:?}");
        }
    }

    #[test]
    fn test_static_metrics_fit_real_typeface() {
        let params = FitParams {
            range: SizeRange::new(4, 600),
            area: DisplayArea::new(854, 480),
            policy: WrapPolicy::default(),
        };
        let mut fitter = TextFitter::new(params, StaticMetrics::new(96), "Inconsolata");
        let layout = fitter.fit("hello world").unwrap();
        assert!(!layout.fallback);
        assert!(layout.lines.len() <= layout.grid.rows);
        assert!(layout.font_size > FontSize::from_points(4));
    }
}
