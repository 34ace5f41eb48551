use std::str::FromStr;

use anyhow::{Context, Result};

use crate::render::limits::{RenderLimits, DEFAULT_MAX_DEPTH, DEFAULT_MAX_TAG_SCANS};

const DEFAULT_MAX_TEMPLATE_BYTES: usize = 1024 * 1024;

/// Service configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub render_max_tag_scans: usize,
    pub render_max_depth: usize,
    pub max_template_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            render_max_tag_scans: DEFAULT_MAX_TAG_SCANS,
            render_max_depth: DEFAULT_MAX_DEPTH,
            max_template_bytes: DEFAULT_MAX_TEMPLATE_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            render_max_tag_scans: parse_env("RENDER_MAX_TAG_SCANS", defaults.render_max_tag_scans)?,
            render_max_depth: parse_env("RENDER_MAX_DEPTH", defaults.render_max_depth)?,
            max_template_bytes: parse_env("MAX_TEMPLATE_BYTES", defaults.max_template_bytes)?,
        })
    }

    pub fn render_limits(&self) -> RenderLimits {
        RenderLimits {
            max_tag_scans: self.render_max_tag_scans,
            max_depth: self.render_max_depth,
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'"))
}
