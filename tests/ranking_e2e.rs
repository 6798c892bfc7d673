// tests/ranking_e2e.rs
//
// End-to-end ranking over a synthetic population: ordering, ranks, hot flags
// and graph/rank agreement across many random windows.

use chrono::{Duration, NaiveDate};
use rand::Rng;

use law_impact_scorer::stance::{CON_MAINTAIN, NEUTRAL, PRO_ABOLITION, PRO_REVISION};
use law_impact_scorer::store::{Event, EventSource};
use law_impact_scorer::{InMemoryStore, ScoreEngine, ScoreError, ScoringConfig};

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn synthetic_store(seed_days: i64, articles: usize) -> InMemoryStore {
    let mut rng = rand::rng();
    let base = d("2025-10-01");
    let labels = [PRO_REVISION, PRO_ABOLITION, CON_MAINTAIN, NEUTRAL, "반대_개정강화"];
    let mut events = Vec::new();
    for a in 0..articles {
        let key = format!("법률 제{a}조");
        for _ in 0..rng.random_range(0..20) {
            let day = base + Duration::days(rng.random_range(0..seed_days));
            events.push(Event {
                source: EventSource::News,
                article_key: key.clone(),
                timestamp: day.and_hms_opt(9, 0, 0).unwrap(),
                sentiment: None,
                incident: None,
                category: None,
                description: None,
                text: None,
            });
        }
        for i in 0..rng.random_range(0..15) {
            let day = base + Duration::days(rng.random_range(0..seed_days));
            let label = labels[rng.random_range(0..labels.len())];
            events.push(Event {
                source: EventSource::Social,
                article_key: key.clone(),
                timestamp: day.and_hms_opt(12, 0, 0).unwrap(),
                sentiment: Some(label.to_string()),
                incident: Some(format!("사건{}", i % 3)),
                category: Some("사회".into()),
                description: Some(format!("{key} 본문")),
                text: Some(format!("의견 {i}")),
            });
        }
    }
    InMemoryStore::new(events)
}

#[tokio::test]
async fn random_windows_keep_ranking_invariants() {
    let engine = ScoreEngine::new(synthetic_store(60, 12), ScoringConfig::default());
    let mut rng = rand::rng();

    for _ in 0..25 {
        let start = d("2025-10-01") + Duration::days(rng.random_range(0..50));
        let end = start + Duration::days(rng.random_range(0..21));

        let ranked = engine.rank_top_articles(start, end, 5).await.unwrap();
        assert!(ranked.len() <= 5);
        for (i, r) in ranked.iter().enumerate() {
            assert_eq!(r.rank, i + 1);
            assert!((0.0..=1.0 + 1e-9).contains(&r.iis), "iis out of range: {}", r.iis);
            assert!(r.stance_counts.total() <= r.total_comments);
        }
        for w in ranked.windows(2) {
            assert!(
                w[0].iis > w[1].iis
                    || (w[0].iis == w[1].iis && w[0].article_key < w[1].article_key),
                "bad order: {:?} before {:?}",
                (&w[0].article_key, w[0].iis),
                (&w[1].article_key, w[1].iis)
            );
        }
        if let Some(first) = ranked.first() {
            assert!(first.hot, "the top article is always within the top IIS fraction");
        }

        let graph = engine.build_attention_graph(start, end).await.unwrap();
        let ranked_keys: Vec<_> = ranked.iter().map(|r| &r.article_key).collect();
        let node_keys: Vec<_> = graph.iter().map(|n| &n.article_key).collect();
        assert_eq!(node_keys, ranked_keys);
        for node in &graph {
            for inc in &node.incidents {
                for detail in [
                    &inc.per_stance.revision,
                    &inc.per_stance.abolition,
                    &inc.per_stance.maintain,
                ] {
                    assert!(detail.sample_opinions.len() <= 5);
                    assert!(detail.sample_opinions.len() as u64 <= detail.count);
                }
            }
        }
    }
}

#[tokio::test]
async fn smaller_limit_is_a_prefix_of_larger_limit() {
    let engine = ScoreEngine::new(synthetic_store(30, 10), ScoringConfig::default());
    let start = d("2025-10-10");
    let end = d("2025-10-24");
    let five = engine.rank_top_articles(start, end, 5).await.unwrap();
    let three = engine.rank_top_articles(start, end, 3).await.unwrap();
    assert_eq!(three.as_slice(), &five[..three.len()]);
}

#[tokio::test]
async fn identical_inputs_give_identical_outputs() {
    let engine = ScoreEngine::new(synthetic_store(30, 8), ScoringConfig::default());
    let a = engine
        .rank_top_articles(d("2025-10-05"), d("2025-10-25"), 5)
        .await
        .unwrap();
    let b = engine
        .rank_top_articles(d("2025-10-05"), d("2025-10-25"), 5)
        .await
        .unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn inverted_window_is_an_invalid_range() {
    let engine = ScoreEngine::new(InMemoryStore::default(), ScoringConfig::default());
    let err = engine
        .build_attention_graph(d("2025-10-10"), d("2025-10-09"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScoreError::InvalidRange { .. }));
}
