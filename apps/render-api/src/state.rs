use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// The service keeps no data between requests; state is configuration only.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}
