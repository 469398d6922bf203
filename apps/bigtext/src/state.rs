use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::display::Display;
use crate::layout::StaticMetrics;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// One fit in flight at a time: updates queue on this lock.
    pub display: Arc<Mutex<Display<StaticMetrics>>>,
    /// Flipped to `true` when the display can no longer show anything.
    pub fatal: Arc<watch::Sender<bool>>,
}
