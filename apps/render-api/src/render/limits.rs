use thiserror::Error;

/// Default number of `{{...}}` tags a single render may scan, counting both
/// interpreter dispatch and section-matcher lookahead.
pub const DEFAULT_MAX_TAG_SCANS: usize = 100_000;

/// Default maximum section nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Resource limits applied to one render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLimits {
    pub max_tag_scans: usize,
    pub max_depth: usize,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            max_tag_scans: DEFAULT_MAX_TAG_SCANS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The only failures the engine reports. Malformed templates and missing
/// data never error; these fire only when a render runs past its limits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("render limit exceeded: more than {limit} tag scans")]
    LimitExceeded { limit: usize },

    #[error("render limit exceeded: sections nested deeper than {limit}")]
    DepthExceeded { limit: usize },
}

/// Per-render counter of tag scans.
#[derive(Debug)]
pub(crate) struct ScanBudget {
    used: usize,
    limit: usize,
}

impl ScanBudget {
    pub(crate) fn new(limit: usize) -> Self {
        Self { used: 0, limit }
    }

    /// Records one tag scan, failing closed once the limit is passed.
    pub(crate) fn charge(&mut self) -> Result<(), RenderError> {
        self.used += 1;
        if self.used > self.limit {
            return Err(RenderError::LimitExceeded { limit: self.limit });
        }
        Ok(())
    }

    pub(crate) fn used(&self) -> usize {
        self.used
    }
}
