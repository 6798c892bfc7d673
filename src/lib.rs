// src/lib.rs
// Public library surface for the server binary, the report binary and integration tests.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod score;
pub mod stance;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::config::ScoringConfig;
pub use crate::engine::{RankedArticle, ScoreEngine};
pub use crate::error::{ScoreError, ScoreResult};
pub use crate::graph::AttentionGraphNode;
pub use crate::stance::{map_stance, CanonicalStance};
pub use crate::store::{DateWindow, EventStore, InMemoryStore};

use std::sync::Arc;

use tracing::info;

/// Build the full router from the environment: scoring config
/// (`$SCORING_CONFIG_PATH` → `config/scoring.toml` → defaults) and event data
/// (`$EVENT_STORE_PATH` → `data/events.json` → empty).
///
/// `/metrics` is mounted only with `DEBUG_ROUTES=1`.
pub async fn app() -> anyhow::Result<axum::Router> {
    let config = config::load_scoring_config_default()?;
    let store = InMemoryStore::load_default()?;
    info!(events = store.len(), top_n = config.ranking.top_n, "scoring engine ready");

    let shared: api::SharedStore = Arc::new(store);
    let state = api::AppState::new(ScoreEngine::new(shared, config));
    let mut router = api::router(state);

    if std::env::var("DEBUG_ROUTES").ok().as_deref() == Some("1") {
        let m = crate::metrics::Metrics::init()?;
        router = router.merge(m.router());
    }
    Ok(router)
}
