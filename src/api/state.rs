use std::sync::Arc;

use crate::domain::repositories::StatsRepository;

/// Shared state handed to every handler
///
/// The repository is injected here rather than reached through a global, so
/// the same router runs against Postgres in production and in memory in tests.
#[derive(Clone)]
pub struct AppState {
    pub stats: Arc<dyn StatsRepository>,
}

impl AppState {
    pub fn new(stats: Arc<dyn StatsRepository>) -> Self {
        Self { stats }
    }
}
