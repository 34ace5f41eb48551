// Résumé template engine.
// Pure and synchronous: a template string plus a data value in, an HTML string out.
// Async callers run renders inside tokio::task::spawn_blocking.

pub mod format;
pub mod handlers;
mod interpreter;
pub mod limits;
mod matcher;
pub mod normalize;
pub mod resolver;
pub mod tag;

use serde_json::Value;

pub use limits::{RenderError, RenderLimits};
pub use normalize::normalize_resume;

use crate::render::interpreter::Interpreter;
use crate::render::resolver::Frame;

/// Renders `template` against `data` with default limits.
#[allow(dead_code)]
pub fn render(template: &str, data: &Value) -> Result<String, RenderError> {
    render_with_limits(template, data, RenderLimits::default())
}

/// Renders `template` against `data` as the single outermost context frame.
pub fn render_with_limits(
    template: &str,
    data: &Value,
    limits: RenderLimits,
) -> Result<String, RenderError> {
    let mut interpreter = Interpreter::new(limits);
    let mut stack = vec![Frame::Record(data)];
    let html = interpreter.render_with_stack(template, &mut stack)?;

    tracing::trace!(
        tags = interpreter.tags_scanned(),
        bytes = html.len(),
        "Template rendered"
    );
    Ok(html)
}

/// Normalizes a loosely-shaped résumé payload and renders it.
pub fn render_resume(
    template: &str,
    raw: &Value,
    limits: RenderLimits,
) -> Result<String, RenderError> {
    let context = normalize_resume(raw).to_context();
    render_with_limits(template, &context, limits)
}
