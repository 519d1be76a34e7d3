use std::sync::Arc;

use crate::applications::store::ApplicationStore;
use crate::catalog::Catalog;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Job application persistence. Postgres in production, in-memory for tests.
    pub store: Arc<dyn ApplicationStore>,
    pub catalog: Arc<Catalog>,
    pub config: Config,
}
