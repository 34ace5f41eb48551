//! Axum route handlers for the Render API.

use axum::{extract::State, response::Html, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::render::{normalize_resume, render_resume, render_with_limits};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    /// Missing templates fall through to the empty-template validation.
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub resume: Value,
    /// When false, `resume` is used as the render context verbatim.
    #[serde(default = "default_normalize")]
    pub normalize: bool,
}

fn default_normalize() -> bool {
    true
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/render
///
/// Renders a template against a résumé payload and returns the HTML document.
pub async fn handle_render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Html<String>, AppError> {
    if request.template.trim().is_empty() {
        return Err(AppError::Validation("Template HTML is empty".to_string()));
    }
    let max_bytes = state.config.max_template_bytes;
    if request.template.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "Template HTML exceeds {max_bytes} bytes"
        )));
    }

    let limits = state.config.render_limits();
    let template_bytes = request.template.len();

    // CPU-bound scan — keep it off the async executor.
    let rendered = tokio::task::spawn_blocking(move || {
        if request.normalize {
            render_resume(&request.template, &request.resume, limits)
        } else {
            render_with_limits(&request.template, &request.resume, limits)
        }
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))?;

    let html = rendered.map_err(|e| {
        warn!(template_bytes, "Render aborted: {e}");
        AppError::Render(e)
    })?;

    info!(
        template_bytes,
        output_bytes = html.len(),
        "Rendered résumé template"
    );
    Ok(Html(html))
}

/// POST /api/v1/resumes/normalize
///
/// Returns the canonical record a payload normalizes to, for editor previews.
pub async fn handle_normalize(Json(raw): Json<Value>) -> Json<ResumeRecord> {
    Json(normalize_resume(&raw))
}
