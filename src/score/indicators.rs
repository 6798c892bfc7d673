//! The six raw indicators: Volume, Persistence, Growth, Acceleration,
//! Controversy and Buzz.
//!
//! Each calculator is a pure function over Event Store rows. [`collect_raw`]
//! folds their outputs into one immutable mapping keyed by article.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{ScoreError, ScoreResult};
use crate::stance::{CON_LABELS, NEUTRAL, PRO_LABELS};
use crate::store::{DateWindow, MentionDaysRow, NewsVolumeRow, SentimentCountRow};

/// Number of trailing week buckets tracked for growth/acceleration.
const WEEKS_TRACKED: usize = 3;

/// Raw (un-normalized) indicator values of one article.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RawIndicators {
    pub volume: f64,
    pub persistence: f64,
    pub growth: f64,
    pub acceleration: f64,
    pub controversy: f64,
    pub buzz: f64,
}

/// Decayed news volume of one article, total and split into week buckets
/// (bucket 0 = the 7 days ending at the window end).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VolumeProfile {
    pub total: f64,
    pub weekly: [f64; WEEKS_TRACKED],
}

/// Exponential decay: weight halves every `half_life_days` days of age.
pub fn decay_weight(days_ago: i64, half_life_days: f64) -> f64 {
    (-std::f64::consts::LN_2 * days_ago as f64 / half_life_days).exp()
}

/// V: decayed news volume per article. Rows dated after `end` are malformed.
pub fn volume_profiles(
    rows: &[NewsVolumeRow],
    end: NaiveDate,
    half_life_days: f64,
) -> ScoreResult<BTreeMap<String, VolumeProfile>> {
    let mut out: BTreeMap<String, VolumeProfile> = BTreeMap::new();
    for row in rows {
        let days_ago = (end - row.date).num_days();
        if days_ago < 0 {
            return Err(ScoreError::data(anyhow::anyhow!(
                "news row for `{}` dated {} lies after window end {}",
                row.article_key,
                row.date,
                end
            )));
        }
        let contribution = decay_weight(days_ago, half_life_days) * row.count as f64;

        let profile = out.entry(row.article_key.clone()).or_default();
        profile.total += contribution;
        if let Some(bucket) = profile.weekly.get_mut((days_ago / 7) as usize) {
            *bucket += contribution;
        }
    }
    Ok(out)
}

/// P: share of window days on which the article was mentioned in the news.
pub fn persistence(rows: &[MentionDaysRow], window: &DateWindow) -> BTreeMap<String, f64> {
    let total_days = window.total_days() as f64;
    rows.iter()
        .map(|r| (r.article_key.clone(), r.distinct_days as f64 / total_days))
        .collect()
}

/// Relative change from `previous` to `current`; the absolute level stands in
/// when there is no previous baseline.
fn relative_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous
    } else {
        current
    }
}

/// G and A from the weekly buckets: `(growth, acceleration)`.
pub fn growth_and_acceleration(profile: &VolumeProfile) -> (f64, f64) {
    let [week0, week1, week2] = profile.weekly;
    let growth = relative_change(week0, week1);
    let growth_previous = relative_change(week1, week2);
    (growth, growth - growth_previous)
}

/// Social volume of one article split by polarity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolarityCounts {
    pub pro: u64,
    pub con: u64,
    pub neutral: u64,
}

impl PolarityCounts {
    fn add(&mut self, raw: Option<&str>, count: u64) {
        let Some(label) = raw else { return };
        if PRO_LABELS.contains(&label) {
            self.pro += count;
        } else if CON_LABELS.contains(&label) {
            self.con += count;
        } else if label == NEUTRAL {
            self.neutral += count;
        }
    }

    /// C: polarized volume scaled by how balanced pro and con are.
    pub fn controversy(&self) -> f64 {
        let polarized = self.pro + self.con;
        if polarized <= 1 {
            return 0.0;
        }
        let gap = self.pro.abs_diff(self.con) as f64;
        let balance = 1.0 - gap / polarized as f64;
        polarized as f64 * balance
    }

    /// B: total social volume regardless of polarity.
    pub fn buzz(&self) -> f64 {
        (self.pro + self.con + self.neutral) as f64
    }
}

pub fn polarity_counts(rows: &[SentimentCountRow]) -> BTreeMap<String, PolarityCounts> {
    let mut out: BTreeMap<String, PolarityCounts> = BTreeMap::new();
    for row in rows {
        out.entry(row.article_key.clone())
            .or_default()
            .add(row.raw_sentiment.as_deref(), row.count);
    }
    out
}

/// Rows feeding the raw indicators of one scoring run.
#[derive(Debug, Clone, Default)]
pub struct IndicatorRows {
    pub news_volume: Vec<NewsVolumeRow>,
    pub mention_days: Vec<MentionDaysRow>,
    pub social_sentiment: Vec<SentimentCountRow>,
}

/// Fold every calculator into one mapping. An article appears as soon as any
/// query mentions it; indicators it has no rows for stay at `0.0`.
pub fn collect_raw(
    rows: &IndicatorRows,
    window: &DateWindow,
    half_life_days: f64,
) -> ScoreResult<BTreeMap<String, RawIndicators>> {
    let volumes = volume_profiles(&rows.news_volume, window.end, half_life_days)?;
    let persistence = persistence(&rows.mention_days, window);
    let polarity = polarity_counts(&rows.social_sentiment);

    let mut out: BTreeMap<String, RawIndicators> = BTreeMap::new();
    for (key, profile) in &volumes {
        let (growth, acceleration) = growth_and_acceleration(profile);
        let raw = out.entry(key.clone()).or_default();
        raw.volume = profile.total;
        raw.growth = growth;
        raw.acceleration = acceleration;
    }
    for (key, p) in persistence {
        out.entry(key).or_default().persistence = p;
    }
    for (key, counts) in polarity {
        let raw = out.entry(key).or_default();
        raw.controversy = counts.controversy();
        raw.buzz = counts.buzz();
    }
    Ok(out)
}
