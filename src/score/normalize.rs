//! Per-indicator min-max scaling across the whole candidate set.

use std::collections::BTreeMap;

use serde::Serialize;

use super::indicators::RawIndicators;

/// Indicator values scaled into `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NormalizedIndicators {
    pub volume: f64,
    pub persistence: f64,
    pub growth: f64,
    pub acceleration: f64,
    pub controversy: f64,
    pub buzz: f64,
}

/// `(min, max)` of the values, or `None` for an empty input.
pub fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// `(value - min) / (max - min)`; `0.0` when the range is degenerate.
pub fn scale(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.0;
    }
    (value - min) / (max - min)
}

/// Min-max scaler for one indicator.
#[derive(Debug, Clone, Copy)]
struct Scaler {
    min: f64,
    max: f64,
}

impl Scaler {
    fn fit<'a>(
        raw: impl Iterator<Item = &'a RawIndicators>,
        pick: impl Fn(&RawIndicators) -> f64,
    ) -> Self {
        let (min, max) = min_max(raw.map(pick)).unwrap_or((0.0, 0.0));
        Self { min, max }
    }

    fn apply(&self, v: f64) -> f64 {
        scale(v, self.min, self.max)
    }
}

/// Normalize each of the six indicators independently.
pub fn normalize_all(
    raw: &BTreeMap<String, RawIndicators>,
) -> BTreeMap<String, NormalizedIndicators> {
    let volume = Scaler::fit(raw.values(), |r| r.volume);
    let persistence = Scaler::fit(raw.values(), |r| r.persistence);
    let growth = Scaler::fit(raw.values(), |r| r.growth);
    let acceleration = Scaler::fit(raw.values(), |r| r.acceleration);
    let controversy = Scaler::fit(raw.values(), |r| r.controversy);
    let buzz = Scaler::fit(raw.values(), |r| r.buzz);

    raw.iter()
        .map(|(key, r)| {
            let n = NormalizedIndicators {
                volume: volume.apply(r.volume),
                persistence: persistence.apply(r.persistence),
                growth: growth.apply(r.growth),
                acceleration: acceleration.apply(r.acceleration),
                controversy: controversy.apply(r.controversy),
                buzz: buzz.apply(r.buzz),
            };
            (key.clone(), n)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn raw(volume: f64, growth: f64) -> RawIndicators {
        RawIndicators {
            volume,
            growth,
            ..Default::default()
        }
    }

    #[test]
    fn single_article_flattens_to_zero() {
        let mut m = BTreeMap::new();
        m.insert("A".to_string(), raw(17.5, 3.0));
        let n = normalize_all(&m);
        assert_eq!(n["A"], NormalizedIndicators::default());
    }

    #[test]
    fn indicators_scale_independently() {
        let mut m = BTreeMap::new();
        m.insert("A".to_string(), raw(10.0, -2.0));
        m.insert("B".to_string(), raw(20.0, -2.0));
        m.insert("C".to_string(), raw(15.0, -2.0));
        let n = normalize_all(&m);
        assert_eq!(n["A"].volume, 0.0);
        assert_eq!(n["B"].volume, 1.0);
        assert!((n["C"].volume - 0.5).abs() < 1e-12);
        // all-equal growth flattens without touching volume
        for v in n.values() {
            assert_eq!(v.growth, 0.0);
        }
    }

    #[test]
    fn empty_input_has_no_range() {
        assert_eq!(min_max(Vec::<f64>::new()), None);
        assert!(normalize_all(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn random_populations_stay_within_unit_interval() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let n_articles = rng.random_range(1..30);
            let mut m = BTreeMap::new();
            for i in 0..n_articles {
                let r = RawIndicators {
                    volume: rng.random_range(0.0..500.0),
                    persistence: rng.random_range(0.0..1.0),
                    growth: rng.random_range(-5.0..50.0),
                    acceleration: rng.random_range(-50.0..50.0),
                    controversy: rng.random_range(0.0..100.0),
                    buzz: rng.random_range(0.0..1000.0),
                };
                m.insert(format!("art-{i}"), r);
            }
            for n in normalize_all(&m).values() {
                for v in [
                    n.volume,
                    n.persistence,
                    n.growth,
                    n.acceleration,
                    n.controversy,
                    n.buzz,
                ] {
                    assert!((0.0..=1.0).contains(&v), "out of bounds: {v}");
                }
            }
        }
    }
}
