use std::sync::Arc;

use crate::config::Config;
use crate::store::WordStore;
use crate::worksheet::FontHandle;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Word catalogue. Postgres in production, in-memory in tests.
    pub words: Arc<dyn WordStore>,
    /// Worksheet font, resolved once at startup.
    pub font: Arc<FontHandle>,
    #[allow(dead_code)]
    pub config: Config,
}
