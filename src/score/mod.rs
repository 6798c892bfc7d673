// src/score/mod.rs
//! Pure scoring pipeline: rows → raw indicators → normalized → IIS → rank.
//! No I/O; the engine fetches the rows and calls [`score_population`].

pub mod composite;
pub mod hot;
pub mod indicators;
pub mod normalize;

use tracing::debug;

use crate::config::ScoringConfig;
use crate::error::ScoreResult;
use crate::store::DateWindow;

pub use composite::{impact_score, rank, ScoredArticle};
pub use hot::HotThresholds;
pub use indicators::{collect_raw, IndicatorRows, RawIndicators};
pub use normalize::{normalize_all, NormalizedIndicators};

/// Score every candidate article of the window and return them in rank order
/// (descending IIS, ties by ascending article key).
pub fn score_population(
    rows: &IndicatorRows,
    window: &DateWindow,
    cfg: &ScoringConfig,
) -> ScoreResult<Vec<ScoredArticle>> {
    let raw = collect_raw(rows, window, cfg.decay.half_life_days)?;
    debug!(target: "scoring", candidates = raw.len(), "raw indicators computed");

    let normalized = normalize_all(&raw);
    let population = raw
        .into_iter()
        .zip(normalized.into_values())
        .map(|((article_key, raw), normalized)| ScoredArticle {
            iis: impact_score(&normalized, &cfg.weights),
            article_key,
            raw,
            normalized,
        })
        .collect();

    Ok(rank(population))
}
