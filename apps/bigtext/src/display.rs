//! The displayed text: fits each new text and hands the layout to the sink.

use tracing::warn;

use crate::config::Align;
use crate::errors::FitError;
use crate::input::normalize;
use crate::layout::{FontMetricsOracle, Layout, TextFitter};
use crate::render::RenderSink;

/// Owns the fitter, the render sink and the layout currently shown.
///
/// Callers serialize `set_text`; nothing in here synchronizes.
pub struct Display<O> {
    fitter: TextFitter<O>,
    sink: Box<dyn RenderSink>,
    align: Align,
    current: Option<Layout>,
}

impl<O: FontMetricsOracle> Display<O> {
    pub fn new(fitter: TextFitter<O>, sink: Box<dyn RenderSink>, align: Align) -> Self {
        Self {
            fitter,
            sink,
            align,
            current: None,
        }
    }

    /// Fits `text` and redraws. A draw failure is logged; a fit failure is
    /// returned and leaves the previous layout in place.
    pub fn set_text(&mut self, text: &str) -> Result<&Layout, FitError> {
        let layout = self.fitter.fit(&normalize(text))?;
        if let Err(e) = self.sink.present(&layout) {
            warn!("Failed to draw layout: {e}");
        }
        Ok(self.current.insert(layout))
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.current.as_ref()
    }

    pub fn align(&self) -> Align {
        self.align
    }
}
