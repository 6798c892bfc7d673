// src/store/memory.rs
//! In-memory Event Store over raw events, loaded from a JSON array.
//!
//! Event JSON shape:
//! ```json
//! { "source": "social", "article_key": "개인정보 보호법 제15조",
//!   "timestamp": "2025-11-03T10:15:00", "sentiment": "찬성_개정강화",
//!   "incident": "유출 사고", "category": "사회", "description": "...", "text": "..." }
//! ```
//! Every field except `source`, `article_key` and `timestamp` is optional.

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use super::{
    CategoryStanceRow, CommentTotalRow, DailyStanceRow, DateWindow, EventStore, MentionDaysRow,
    NetworkCountRow, NetworkOpinionRow, NewsVolumeRow, SentimentCountRow,
};
use crate::stance::REPRESENTATIVE_LABELS;

pub const DEFAULT_EVENT_STORE_PATH: &str = "data/events.json";
pub const ENV_EVENT_STORE_PATH: &str = "EVENT_STORE_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    News,
    Social,
}

/// Immutable fact from one of the two streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub source: EventSource,
    pub article_key: String,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub sentiment: Option<String>,
    /// Sub-category ("incident") the event was filed under.
    #[serde(default)]
    pub incident: Option<String>,
    /// Top-level category.
    #[serde(default)]
    pub category: Option<String>,
    /// Text of the legislative article itself.
    #[serde(default)]
    pub description: Option<String>,
    /// Opinion body of a social event.
    #[serde(default)]
    pub text: Option<String>,
}

impl Event {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    fn is_representative(&self) -> bool {
        self.sentiment
            .as_deref()
            .is_some_and(|s| REPRESENTATIVE_LABELS.contains(&s))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    events: Vec<Event>,
}

impl InMemoryStore {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let events: Vec<Event> = serde_json::from_str(s).context("parsing events JSON")?;
        Ok(Self::new(events))
    }

    /// Load events from an explicit JSON file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading events from {}", path.display()))?;
        Self::from_json_str(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Load events using env var + fallbacks:
    /// 1) $EVENT_STORE_PATH (must exist)
    /// 2) data/events.json
    /// 3) empty store
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_EVENT_STORE_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!(
                "{ENV_EVENT_STORE_PATH} points to non-existent path {}",
                pb.display()
            ));
        }
        let default_p = PathBuf::from(DEFAULT_EVENT_STORE_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        tracing::warn!(path = DEFAULT_EVENT_STORE_PATH, "no event data found, store is empty");
        Ok(Self::default())
    }

    fn social_in<'a>(&'a self, window: &'a DateWindow) -> impl Iterator<Item = &'a Event> + 'a {
        self.events
            .iter()
            .filter(move |e| e.source == EventSource::Social && window.contains(e.timestamp))
    }
}

/// Count occurrences of each key, in ascending key order.
fn tally<K: Ord>(keys: impl Iterator<Item = K>) -> BTreeMap<K, u64> {
    let mut out = BTreeMap::new();
    for k in keys {
        *out.entry(k).or_insert(0) += 1;
    }
    out
}

#[async_trait::async_trait]
impl EventStore for InMemoryStore {
    async fn news_volume_up_to(&self, end: NaiveDate) -> Result<Vec<NewsVolumeRow>> {
        let counts = tally(
            self.events
                .iter()
                .filter(|e| e.source == EventSource::News && e.date() <= end)
                .map(|e| (e.article_key.as_str(), e.date())),
        );
        Ok(counts
            .into_iter()
            .map(|((key, date), count)| NewsVolumeRow {
                article_key: key.to_string(),
                date,
                count,
            })
            .collect())
    }

    async fn news_mention_days(&self, window: &DateWindow) -> Result<Vec<MentionDaysRow>> {
        let mut days: BTreeMap<&str, BTreeSet<NaiveDate>> = BTreeMap::new();
        for e in self
            .events
            .iter()
            .filter(|e| e.source == EventSource::News && window.contains(e.timestamp))
        {
            days.entry(e.article_key.as_str()).or_default().insert(e.date());
        }
        Ok(days
            .into_iter()
            .map(|(key, set)| MentionDaysRow {
                article_key: key.to_string(),
                distinct_days: set.len() as u64,
            })
            .collect())
    }

    async fn social_sentiment_counts(
        &self,
        window: &DateWindow,
    ) -> Result<Vec<SentimentCountRow>> {
        let counts = tally(
            self.social_in(window)
                .map(|e| (e.article_key.as_str(), e.sentiment.as_deref())),
        );
        Ok(counts
            .into_iter()
            .map(|((key, sentiment), count)| SentimentCountRow {
                article_key: key.to_string(),
                raw_sentiment: sentiment.map(str::to_string),
                count,
            })
            .collect())
    }

    async fn social_comment_totals(&self, window: &DateWindow) -> Result<Vec<CommentTotalRow>> {
        let counts = tally(self.social_in(window).map(|e| e.article_key.as_str()));
        Ok(counts
            .into_iter()
            .map(|(key, count)| CommentTotalRow {
                article_key: key.to_string(),
                count,
            })
            .collect())
    }

    async fn social_stance_counts(&self, window: &DateWindow) -> Result<Vec<SentimentCountRow>> {
        let counts = tally(
            self.social_in(window)
                .filter(|e| e.is_representative())
                .map(|e| (e.article_key.as_str(), e.sentiment.as_deref())),
        );
        Ok(counts
            .into_iter()
            .map(|((key, sentiment), count)| SentimentCountRow {
                article_key: key.to_string(),
                raw_sentiment: sentiment.map(str::to_string),
                count,
            })
            .collect())
    }

    async fn network_counts(&self, window: &DateWindow) -> Result<Vec<NetworkCountRow>> {
        let mut descriptions: BTreeMap<&str, &str> = BTreeMap::new();
        let counts = tally(
            self.social_in(window)
                .filter(|e| e.is_representative() && e.incident.is_some())
                .map(|e| {
                    if let Some(d) = e.description.as_deref() {
                        descriptions.entry(e.article_key.as_str()).or_insert(d);
                    }
                    (
                        e.article_key.as_str(),
                        e.incident.as_deref().unwrap_or_default(),
                        e.sentiment.as_deref().unwrap_or_default(),
                    )
                }),
        );
        Ok(counts
            .into_iter()
            .map(|((key, incident, sentiment), count)| NetworkCountRow {
                article_key: key.to_string(),
                incident: incident.to_string(),
                description: descriptions.get(key).map(|d| d.to_string()),
                raw_sentiment: sentiment.to_string(),
                count,
            })
            .collect())
    }

    async fn network_opinions(&self, window: &DateWindow) -> Result<Vec<NetworkOpinionRow>> {
        Ok(self
            .social_in(window)
            .filter(|e| e.is_representative())
            .filter_map(|e| {
                Some(NetworkOpinionRow {
                    article_key: e.article_key.clone(),
                    incident: e.incident.clone()?,
                    raw_sentiment: e.sentiment.clone()?,
                    text: e.text.clone()?,
                })
            })
            .collect())
    }

    async fn daily_stance_counts(&self, window: &DateWindow) -> Result<Vec<DailyStanceRow>> {
        let counts = tally(
            self.social_in(window)
                .filter(|e| e.is_representative())
                .map(|e| (e.date(), e.sentiment.as_deref())),
        );
        Ok(counts
            .into_iter()
            .map(|((date, sentiment), count)| DailyStanceRow {
                date,
                raw_sentiment: sentiment.map(str::to_string),
                count,
            })
            .collect())
    }

    async fn category_stance_counts(
        &self,
        window: &DateWindow,
    ) -> Result<Vec<CategoryStanceRow>> {
        let counts = tally(
            self.social_in(window)
                .filter(|e| e.is_representative())
                .filter_map(|e| Some((e.category.as_deref()?, e.sentiment.as_deref()))),
        );
        Ok(counts
            .into_iter()
            .map(|((category, sentiment), count)| CategoryStanceRow {
                category: category.to_string(),
                raw_sentiment: sentiment.map(str::to_string),
                count,
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
