// Text-fitting engine: largest font size at which text fits a fixed area.
// Data flows one way: fitter -> search -> {grid, wrap} -> font_metrics.

pub mod fitter;
pub mod font_metrics;
pub mod grid;
pub mod search;
pub mod wrap;

// Re-export the public API consumed by the host (display, routes, main).
pub use fitter::{FitParams, TextFitter, PLACEHOLDER};
pub use font_metrics::{FontFamily, FontMetricsOracle, FontSize, GlyphMetrics, StaticMetrics};
pub use grid::{DisplayArea, GridCapacity};
pub use search::{Layout, SearchGuess, SizeRange};
pub use wrap::{Line, LineKind, WrapPolicy};
