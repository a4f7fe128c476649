//! HTTP surface for the viewer
//!
//! Routes:
//! - `GET /`: the embedded viewer page
//! - `GET /api/meta`: mode, record count, pane titles
//! - `GET /api/records/:idx`: one record, image urls rewritten to `/img/...`
//! - `GET /img/:idx/:n`: image bytes, content type guessed from the path

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;

use crate::loader::{ViewMode, ViewerState, Views};

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Serialize)]
struct MetaResponse {
    mode: ViewMode,
    count: usize,
    file_a: String,
    file_b: Option<String>,
    pane_titles: (String, String),
    skipped: usize,
}

/// Build the viewer router over shared state.
pub fn router(state: Arc<ViewerState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/meta", get(meta))
        .route("/api/records/:idx", get(record))
        .route("/img/:idx/:n", get(image))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn meta(State(state): State<Arc<ViewerState>>) -> Json<MetaResponse> {
    Json(MetaResponse {
        mode: state.mode,
        count: state.len(),
        file_a: state.file_a.clone(),
        file_b: state.file_b.clone(),
        pane_titles: state.pane_titles(),
        skipped: state.skipped,
    })
}

/// One record as the page consumes it: id, image urls, and the two text
/// panes (human/assistant in single mode, answer A/B in compare mode).
async fn record(
    State(state): State<Arc<ViewerState>>,
    Path(idx): Path<usize>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let body = match &state.views {
        Views::Single(views) => {
            let view = views.get(idx).ok_or(StatusCode::NOT_FOUND)?;
            json!({
                "id": view.id,
                "images": image_urls(idx, view.image.len()),
                "panes": [view.human, view.assistant],
            })
        }
        Views::Compare(views) => {
            let view = views.get(idx).ok_or(StatusCode::NOT_FOUND)?;
            json!({
                "id": view.id,
                "images": image_urls(idx, view.image.len()),
                "panes": [view.answer_a, view.answer_b],
            })
        }
    };
    Ok(Json(body))
}

async fn image(
    State(state): State<Arc<ViewerState>>,
    Path((idx, n)): Path<(usize, usize)>,
) -> Response {
    let Some(path) = state.image_path(idx, n) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response()
        }
        Err(e) => {
            tracing::warn!(path, error = %e, "failed to read image");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

fn image_urls(idx: usize, count: usize) -> Vec<String> {
    (0..count).map(|n| format!("/img/{idx}/{n}")).collect()
}

/// Bind to loopback and serve until interrupted.
///
/// `port` 0 picks an ephemeral port; the bound URL is printed either way.
pub async fn serve(state: Arc<ViewerState>, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("Failed to bind viewer on 127.0.0.1:{port}"))?;
    let addr = listener
        .local_addr()
        .context("Failed to get viewer address")?;

    tracing::info!(%addr, mode = ?state.mode, records = state.len(), "viewer listening");
    println!("Viewer running at http://{addr}/ (Ctrl-C to stop)");

    axum::serve(listener, router(state))
        .await
        .context("Viewer server failed")?;
    Ok(())
}
