//! # Scoring Engine
//! Fetches pre-aggregated rows from an [`EventStore`] and runs the pure scoring
//! pipeline over them. Every call recomputes from scratch for its window.
//!
//! `rank_top_articles` → top-N ranked articles with stance counts and hot flag.
//! `build_attention_graph` → one graph node per ranked article, same order.

use std::time::Instant;

use chrono::NaiveDate;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::ScoringConfig;
use crate::error::{ScoreError, ScoreResult};
use crate::graph::{assemble_graph, AttentionGraphNode};
use crate::score::{score_population, HotThresholds, IndicatorRows, ScoredArticle};
use crate::stance::StanceCounts;
use crate::store::{DateWindow, EventStore};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("scoring_runs_total", "Scoring runs completed.");
        describe_counter!(
            "scoring_failures_total",
            "Scoring runs aborted by invalid ranges or unavailable data."
        );
        describe_gauge!(
            "scoring_candidates",
            "Candidate articles in the most recent scoring run."
        );
        describe_histogram!("scoring_duration_ms", "Scoring run time in milliseconds.");
        describe_counter!("graph_nodes_total", "Attention graph nodes emitted.");
    });
}

/// Output record of the ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedArticle {
    /// 1-based position.
    pub rank: usize,
    pub article_key: String,
    pub iis: f64,
    pub stance_counts: StanceCounts,
    pub total_comments: u64,
    pub hot: bool,
}

/// Validate `start <= end` into a window.
pub fn window_for(start: NaiveDate, end: NaiveDate) -> ScoreResult<DateWindow> {
    DateWindow::new(start, end).ok_or(ScoreError::InvalidRange { start, end })
}

pub struct ScoreEngine<S> {
    store: S,
    config: ScoringConfig,
}

impl<S: EventStore> ScoreEngine<S> {
    pub fn new(store: S, config: ScoringConfig) -> Self {
        ensure_metrics_described();
        Self { store, config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn unavailable(&self, query: &str, err: anyhow::Error) -> ScoreError {
        warn!(store = self.store.name(), query, error = ?err, "event store query failed");
        counter!("scoring_failures_total").increment(1);
        ScoreError::DataUnavailable(err.context(format!("{query} failed")))
    }

    async fn indicator_rows(&self, window: &DateWindow) -> ScoreResult<IndicatorRows> {
        let news_volume = self
            .store
            .news_volume_up_to(window.end)
            .await
            .map_err(|e| self.unavailable("news_volume_up_to", e))?;
        let mention_days = self
            .store
            .news_mention_days(window)
            .await
            .map_err(|e| self.unavailable("news_mention_days", e))?;
        let social_sentiment = self
            .store
            .social_sentiment_counts(window)
            .await
            .map_err(|e| self.unavailable("social_sentiment_counts", e))?;
        Ok(IndicatorRows {
            news_volume,
            mention_days,
            social_sentiment,
        })
    }

    /// Full candidate population of the window, in rank order.
    pub async fn score_window(&self, window: &DateWindow) -> ScoreResult<Vec<ScoredArticle>> {
        let started = Instant::now();
        let rows = self.indicator_rows(window).await?;
        let population = score_population(&rows, window, &self.config).inspect_err(|_| {
            counter!("scoring_failures_total").increment(1);
        })?;

        gauge!("scoring_candidates").set(population.len() as f64);
        histogram!("scoring_duration_ms").record(started.elapsed().as_secs_f64() * 1000.0);
        counter!("scoring_runs_total").increment(1);
        Ok(population)
    }

    /// Top `limit` articles of `[start, end]`, ranked by IIS.
    pub async fn rank_top_articles(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        limit: usize,
    ) -> ScoreResult<Vec<RankedArticle>> {
        let window = window_for(start, end).inspect_err(|_| {
            counter!("scoring_failures_total").increment(1);
        })?;
        let population = self.score_window(&window).await?;

        let Some(thresholds) = HotThresholds::from_population(&population, &self.config.hot)
        else {
            info!(target: "scoring", %start, %end, "no candidates in window");
            return Ok(Vec::new());
        };
        debug!(target: "scoring", ?thresholds, "hot thresholds");

        let comment_totals: BTreeMap<String, u64> = self
            .store
            .social_comment_totals(&window)
            .await
            .map_err(|e| self.unavailable("social_comment_totals", e))?
            .into_iter()
            .map(|r| (r.article_key, r.count))
            .collect();

        let mut stances: BTreeMap<String, StanceCounts> = BTreeMap::new();
        for row in self
            .store
            .social_stance_counts(&window)
            .await
            .map_err(|e| self.unavailable("social_stance_counts", e))?
        {
            stances
                .entry(row.article_key)
                .or_default()
                .add_raw(row.raw_sentiment.as_deref(), row.count);
        }

        let ranked: Vec<RankedArticle> = population
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, scored)| RankedArticle {
                rank: i + 1,
                article_key: scored.article_key.clone(),
                iis: scored.iis,
                stance_counts: stances
                    .get(&scored.article_key)
                    .copied()
                    .unwrap_or_default(),
                total_comments: comment_totals
                    .get(&scored.article_key)
                    .copied()
                    .unwrap_or(0),
                hot: thresholds.is_hot(scored),
            })
            .collect();

        info!(
            target: "scoring",
            %start, %end,
            candidates = population.len(),
            ranked = ranked.len(),
            top = ranked.first().map(|r| r.article_key.as_str()).unwrap_or_default(),
            "ranked window"
        );
        Ok(ranked)
    }

    /// Attention graph over the configured top-N, nodes in rank order.
    pub async fn build_attention_graph(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ScoreResult<Vec<AttentionGraphNode>> {
        let ranked = self
            .rank_top_articles(start, end, self.config.ranking.top_n)
            .await?;
        if ranked.is_empty() {
            return Ok(Vec::new());
        }
        let window = window_for(start, end)?;

        let counts = self
            .store
            .network_counts(&window)
            .await
            .map_err(|e| self.unavailable("network_counts", e))?;
        let opinions = self
            .store
            .network_opinions(&window)
            .await
            .map_err(|e| self.unavailable("network_opinions", e))?;

        let nodes = assemble_graph(
            &ranked,
            &counts,
            &opinions,
            self.config.graph.opinion_sample_cap,
        );
        counter!("graph_nodes_total").increment(nodes.len() as u64);
        debug!(target: "scoring", nodes = nodes.len(), "attention graph assembled");
        Ok(nodes)
    }
}
