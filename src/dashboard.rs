//! Dashboard stance pivots: raw sentiment rows folded through the Stance Mapper
//! into per-article, per-day and per-category stance counts.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::window_for;
use crate::error::{ScoreError, ScoreResult};
use crate::stance::StanceCounts;
use crate::store::EventStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapLaw {
    pub law: String,
    #[serde(flatten)]
    pub stances: StanceCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStance {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub stances: StanceCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStance {
    pub category: String,
    #[serde(flatten)]
    pub stances: StanceCounts,
}

/// Sum `(key, raw label, count)` triples into stance counts per key, in key order.
pub fn pivot<K: Ord>(
    rows: impl IntoIterator<Item = (K, Option<String>, u64)>,
) -> BTreeMap<K, StanceCounts> {
    let mut out: BTreeMap<K, StanceCounts> = BTreeMap::new();
    for (key, raw, count) in rows {
        out.entry(key).or_default().add_raw(raw.as_deref(), count);
    }
    out
}

/// Stance counts per article.
pub async fn heatmap<S: EventStore + ?Sized>(
    store: &S,
    start: NaiveDate,
    end: NaiveDate,
) -> ScoreResult<Vec<HeatmapLaw>> {
    let window = window_for(start, end)?;
    let rows = store
        .social_stance_counts(&window)
        .await
        .map_err(ScoreError::data)?;
    Ok(pivot(rows.into_iter().map(|r| (r.article_key, r.raw_sentiment, r.count)))
        .into_iter()
        .map(|(law, stances)| HeatmapLaw { law, stances })
        .collect())
}

/// Stance counts per calendar day.
pub async fn stance_area<S: EventStore + ?Sized>(
    store: &S,
    start: NaiveDate,
    end: NaiveDate,
) -> ScoreResult<Vec<DailyStance>> {
    let window = window_for(start, end)?;
    let rows = store
        .daily_stance_counts(&window)
        .await
        .map_err(ScoreError::data)?;
    Ok(pivot(rows.into_iter().map(|r| (r.date, r.raw_sentiment, r.count)))
        .into_iter()
        .map(|(date, stances)| DailyStance { date, stances })
        .collect())
}

/// Stance counts per top-level category.
pub async fn social_bar<S: EventStore + ?Sized>(
    store: &S,
    start: NaiveDate,
    end: NaiveDate,
) -> ScoreResult<Vec<CategoryStance>> {
    let window = window_for(start, end)?;
    let rows = store
        .category_stance_counts(&window)
        .await
        .map_err(ScoreError::data)?;
    Ok(pivot(rows.into_iter().map(|r| (r.category, r.raw_sentiment, r.count)))
        .into_iter()
        .map(|(category, stances)| CategoryStance { category, stances })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stance::{CON_MAINTAIN, PRO_ABOLITION, PRO_REVISION};
    use crate::store::{Event, EventSource, InMemoryStore};

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn social(key: &str, ts: &str, label: &str, category: &str) -> Event {
        Event {
            source: EventSource::Social,
            article_key: key.into(),
            timestamp: ts.parse().unwrap(),
            sentiment: Some(label.into()),
            incident: None,
            category: Some(category.into()),
            description: None,
            text: None,
        }
    }

    fn store() -> InMemoryStore {
        InMemoryStore::new(vec![
            social("B", "2025-11-02T09:00:00", PRO_REVISION, "경제"),
            social("A", "2025-11-01T09:00:00", PRO_REVISION, "사회"),
            social("A", "2025-11-01T10:00:00", CON_MAINTAIN, "사회"),
            social("A", "2025-11-02T10:00:00", PRO_ABOLITION, "사회"),
            social("A", "2025-11-02T11:00:00", "반대_개정강화", "사회"),
        ])
    }

    #[test]
    fn pivot_maps_unknown_and_missing_to_maintain() {
        let p = pivot(vec![
            ("k", Some("찬성_개정강화".to_string()), 2),
            ("k", None, 1),
            ("k", Some("이상한값".to_string()), 4),
        ]);
        assert_eq!(p["k"].revision, 2);
        assert_eq!(p["k"].maintain, 5);
    }

    #[tokio::test]
    async fn heatmap_is_per_article_in_key_order() {
        let out = heatmap(&store(), d("2025-11-01"), d("2025-11-02")).await.unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].law, "A");
        assert_eq!(out[0].stances.revision, 1);
        assert_eq!(out[0].stances.abolition, 1);
        // 반대_개정강화 is not one of the representative labels
        assert_eq!(out[0].stances.maintain, 1);
        assert_eq!(out[1].law, "B");
    }

    #[tokio::test]
    async fn stance_area_is_per_day_in_date_order() {
        let out = stance_area(&store(), d("2025-11-01"), d("2025-11-02")).await.unwrap();
        let dates: Vec<_> = out.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d("2025-11-01"), d("2025-11-02")]);
        assert_eq!(out[1].stances.revision, 1);
        assert_eq!(out[1].stances.abolition, 1);
    }

    #[tokio::test]
    async fn social_bar_groups_by_category() {
        let out = social_bar(&store(), d("2025-11-01"), d("2025-11-02")).await.unwrap();
        let cats: Vec<_> = out.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(cats, vec!["경제", "사회"]);
        assert_eq!(out[1].stances.total(), 3);
    }

    #[tokio::test]
    async fn pivots_reject_inverted_range() {
        let err = heatmap(&store(), d("2025-11-03"), d("2025-11-02"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScoreError::InvalidRange { .. }));
    }

    #[test]
    fn flattened_json_shape() {
        let row = HeatmapLaw {
            law: "A".into(),
            stances: StanceCounts {
                revision: 1,
                abolition: 2,
                maintain: 3,
            },
        };
        let v = serde_json::to_value(&row).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"law": "A", "revision": 1, "abolition": 2, "maintain": 3})
        );
    }
}
