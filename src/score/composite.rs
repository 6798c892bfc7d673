//! Composite Issue Impact Score (IIS) and ranking.

use std::cmp::Ordering;

use serde::Serialize;

use super::indicators::RawIndicators;
use super::normalize::NormalizedIndicators;
use crate::config::ScoreWeights;

/// One candidate article after scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredArticle {
    pub article_key: String,
    pub raw: RawIndicators,
    pub normalized: NormalizedIndicators,
    pub iis: f64,
}

/// Weighted sum of the normalized indicators.
pub fn impact_score(n: &NormalizedIndicators, w: &ScoreWeights) -> f64 {
    w.volume * n.volume
        + w.persistence * n.persistence
        + w.growth * n.growth
        + w.acceleration * n.acceleration
        + w.controversy * n.controversy
        + w.buzz * n.buzz
}

/// Descending IIS; equal scores fall back to ascending article key.
pub fn rank_order(a: &ScoredArticle, b: &ScoredArticle) -> Ordering {
    b.iis
        .total_cmp(&a.iis)
        .then_with(|| a.article_key.cmp(&b.article_key))
}

/// Sort the full candidate population into rank order.
pub fn rank(mut population: Vec<ScoredArticle>) -> Vec<ScoredArticle> {
    population.sort_by(rank_order);
    population
}
