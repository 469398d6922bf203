use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Align;
use crate::errors::{AppError, FitError};
use crate::layout::{Layout, Line};
use crate::state::AppState;

/// Upper bound on accepted text, in characters.
pub const MAX_TEXT_CHARS: usize = 100_000;

#[derive(Debug, Deserialize)]
pub struct SetTextRequest {
    pub text: String,
}

/// JSON view of a layout for HTTP clients.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LayoutView {
    pub font_pt: f32,
    pub rows: usize,
    pub cols: usize,
    pub fallback: bool,
    pub align: Align,
    pub lines: Vec<Line>,
}

impl LayoutView {
    pub fn new(layout: &Layout, align: Align) -> Self {
        Self {
            font_pt: layout.font_size.points(),
            rows: layout.grid.rows,
            cols: layout.grid.cols,
            fallback: layout.fallback,
            align,
            lines: layout.lines.clone(),
        }
    }
}

/// POST /text
pub async fn handle_set_text(
    State(state): State<AppState>,
    Json(req): Json<SetTextRequest>,
) -> Result<Json<LayoutView>, AppError> {
    let chars = req.text.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(AppError::Validation(format!(
            "text has {chars} characters, limit is {MAX_TEXT_CHARS}"
        )));
    }
    info!(chars, "set text requested");

    // CPU-bound fit; the display lock serializes concurrent updates.
    let display = Arc::clone(&state.display);
    let result = tokio::task::spawn_blocking(move || {
        let mut display = display.blocking_lock();
        let align = display.align();
        display
            .set_text(&req.text)
            .map(|layout| LayoutView::new(layout, align))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in set_text: {e}")))?;

    match result {
        Ok(view) => Ok(Json(view)),
        Err(e @ FitError::TerminalNoFit { .. }) => {
            state.fatal.send_replace(true);
            Err(AppError::Fit(e))
        }
        Err(e) => Err(AppError::Fit(e)),
    }
}

/// GET /layout
pub async fn handle_get_layout(
    State(state): State<AppState>,
) -> Result<Json<LayoutView>, AppError> {
    let display = state.display.lock().await;
    display
        .layout()
        .map(|layout| Json(LayoutView::new(layout, display.align())))
        .ok_or_else(|| AppError::NotFound("no text has been displayed yet".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use tokio::sync::{watch, Mutex};
    use tower::ServiceExt;

    use super::*;
    use crate::display::Display;
    use crate::layout::{
        DisplayArea, FitParams, LineKind, SizeRange, StaticMetrics, TextFitter, WrapPolicy,
    };
    use crate::render::TerminalSink;
    use crate::routes::build_router;

    fn app(width: u32, height: u32) -> (Router, watch::Receiver<bool>) {
        let params = FitParams {
            range: SizeRange::new(4, 600),
            area: DisplayArea::new(width, height),
            policy: WrapPolicy {
                word_wrap: true,
                line_separator: true,
            },
        };
        let fitter = TextFitter::new(params, StaticMetrics::new(96), "Inconsolata");
        let sink = TerminalSink::new(io::sink(), Align::Right, false);
        let display = Display::new(fitter, Box::new(sink), Align::Right);
        let (fatal, rx) = watch::channel(false);
        let state = AppState {
            display: Arc::new(Mutex::new(display)),
            fatal: Arc::new(fatal),
        };
        (build_router(state), rx)
    }

    fn post_text(text: &str) -> Request<Body> {
        Request::post("/text")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({ "text": text }).to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_set_text_returns_layout() {
        let (app, _) = app(854, 480);
        let response = app.oneshot(post_text("hello\nworld")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let view: LayoutView = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(view.align, Align::Right);
        assert!(!view.fallback);
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.lines[0].kind, LineKind::Separator);
        assert_eq!(view.lines[1].kind, LineKind::Normal);
        assert!(view.lines.len() <= view.rows);
    }

    #[tokio::test]
    async fn test_get_layout_before_and_after_update() {
        let (app, _) = app(854, 480);
        let empty = app
            .clone()
            .oneshot(Request::get("/layout").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(empty.status(), StatusCode::NOT_FOUND);

        app.clone().oneshot(post_text("big")).await.unwrap();
        let response = app
            .oneshot(Request::get("/layout").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["lines"][0]["text"], "big");
        assert_eq!(json["lines"][0]["kind"], "normal");
    }

    #[tokio::test]
    async fn test_oversized_text_is_rejected() {
        let (app, _) = app(854, 480);
        let response = app
            .oneshot(post_text(&"x".repeat(MAX_TEXT_CHARS + 1)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_terminal_failure_signals_shutdown() {
        let (app, rx) = app(1, 1);
        let response = app.oneshot(post_text("anything")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"]["code"], "FIT_ERROR");
        assert!(*rx.borrow());
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app(854, 480);
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }
}
