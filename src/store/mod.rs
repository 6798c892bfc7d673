// src/store/mod.rs
//! Event Store contract: pre-aggregated rows over the news and social streams.
//!
//! The engine only ever sees these row shapes; how a store aggregates its events
//! is its own business. [`memory::InMemoryStore`] is the bundled implementation.

pub mod memory;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub use memory::{Event, EventSource, InMemoryStore};

/// Inclusive calendar-day window `[start 00:00:00, end 23:59:59.999…]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Build a window; `None` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Whole calendar days: any time on `end` is inside.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        (self.start..=self.end).contains(&ts.date())
    }

    /// Number of calendar days covered, inclusive of both ends.
    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// News events per article per day, for every day up to the window end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsVolumeRow {
    pub article_key: String,
    pub date: NaiveDate,
    pub count: u64,
}

/// Distinct days with at least one news mention inside the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionDaysRow {
    pub article_key: String,
    pub distinct_days: u64,
}

/// Social events per article per raw sentiment label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentCountRow {
    pub article_key: String,
    pub raw_sentiment: Option<String>,
    pub count: u64,
}

/// Total social comments per article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentTotalRow {
    pub article_key: String,
    pub count: u64,
}

/// Social events per (article, incident, raw sentiment), with the article text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkCountRow {
    pub article_key: String,
    pub incident: String,
    pub description: Option<String>,
    pub raw_sentiment: String,
    pub count: u64,
}

/// One opinion text per social event, keyed like [`NetworkCountRow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkOpinionRow {
    pub article_key: String,
    pub incident: String,
    pub raw_sentiment: String,
    pub text: String,
}

/// Social events per calendar day per raw sentiment label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStanceRow {
    pub date: NaiveDate,
    pub raw_sentiment: Option<String>,
    pub count: u64,
}

/// Social events per top-level category per raw sentiment label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStanceRow {
    pub category: String,
    pub raw_sentiment: Option<String>,
    pub count: u64,
}

/// Read side of the event streams.
///
/// Stance-restricted queries (`social_stance_counts`, `network_*`,
/// `daily_stance_counts`, `category_stance_counts`) only return the three
/// representative raw labels (see [`crate::stance::REPRESENTATIVE_LABELS`]).
#[async_trait::async_trait]
pub trait EventStore: Send + Sync {
    /// All news up to and including `end` (not bounded by the window start).
    async fn news_volume_up_to(&self, end: NaiveDate) -> Result<Vec<NewsVolumeRow>>;
    async fn news_mention_days(&self, window: &DateWindow) -> Result<Vec<MentionDaysRow>>;
    async fn social_sentiment_counts(&self, window: &DateWindow)
        -> Result<Vec<SentimentCountRow>>;
    async fn social_comment_totals(&self, window: &DateWindow) -> Result<Vec<CommentTotalRow>>;
    async fn social_stance_counts(&self, window: &DateWindow) -> Result<Vec<SentimentCountRow>>;
    async fn network_counts(&self, window: &DateWindow) -> Result<Vec<NetworkCountRow>>;
    async fn network_opinions(&self, window: &DateWindow) -> Result<Vec<NetworkOpinionRow>>;
    async fn daily_stance_counts(&self, window: &DateWindow) -> Result<Vec<DailyStanceRow>>;
    async fn category_stance_counts(&self, window: &DateWindow)
        -> Result<Vec<CategoryStanceRow>>;
    fn name(&self) -> &'static str;
}

/// Shared stores (e.g. `Arc<dyn EventStore>` in the HTTP state) delegate to the inner store.
#[async_trait::async_trait]
impl<T: EventStore + ?Sized> EventStore for std::sync::Arc<T> {
    async fn news_volume_up_to(&self, end: NaiveDate) -> Result<Vec<NewsVolumeRow>> {
        (**self).news_volume_up_to(end).await
    }
    async fn news_mention_days(&self, window: &DateWindow) -> Result<Vec<MentionDaysRow>> {
        (**self).news_mention_days(window).await
    }
    async fn social_sentiment_counts(
        &self,
        window: &DateWindow,
    ) -> Result<Vec<SentimentCountRow>> {
        (**self).social_sentiment_counts(window).await
    }
    async fn social_comment_totals(&self, window: &DateWindow) -> Result<Vec<CommentTotalRow>> {
        (**self).social_comment_totals(window).await
    }
    async fn social_stance_counts(&self, window: &DateWindow) -> Result<Vec<SentimentCountRow>> {
        (**self).social_stance_counts(window).await
    }
    async fn network_counts(&self, window: &DateWindow) -> Result<Vec<NetworkCountRow>> {
        (**self).network_counts(window).await
    }
    async fn network_opinions(&self, window: &DateWindow) -> Result<Vec<NetworkOpinionRow>> {
        (**self).network_opinions(window).await
    }
    async fn daily_stance_counts(&self, window: &DateWindow) -> Result<Vec<DailyStanceRow>> {
        (**self).daily_stance_counts(window).await
    }
    async fn category_stance_counts(
        &self,
        window: &DateWindow,
    ) -> Result<Vec<CategoryStanceRow>> {
        (**self).category_stance_counts(window).await
    }
    fn name(&self) -> &'static str {
        (**self).name()
    }
}
