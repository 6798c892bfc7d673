//! Hotness classification against the full candidate population.
//!
//! An article is hot when any of these hold:
//! 1. its IIS is within the top `iis_top_fraction` of the population,
//! 2. its normalized growth exceeds `growth_norm_min`,
//! 3. its normalized controversy is within the top `controversy_top_fraction`.

use super::composite::ScoredArticle;
use crate::config::HotConfig;

/// Percentile cut-offs of one population, computed once per scoring run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotThresholds {
    pub iis: f64,
    pub controversy: f64,
    pub growth_norm_min: f64,
}

/// Value at 1-indexed rank `ceil(n * fraction)` (clipped to `[1, n]`) of the
/// values sorted descending. `None` for an empty population.
pub fn top_fraction_threshold(mut values: Vec<f64>, fraction: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| b.total_cmp(a));
    let n = values.len();
    let rank = ((n as f64 * fraction).ceil() as usize).clamp(1, n);
    Some(values[rank - 1])
}

impl HotThresholds {
    /// `None` when the population is empty: classification is skipped.
    pub fn from_population(population: &[ScoredArticle], cfg: &HotConfig) -> Option<Self> {
        let iis = top_fraction_threshold(
            population.iter().map(|s| s.iis).collect(),
            cfg.iis_top_fraction,
        )?;
        let controversy = top_fraction_threshold(
            population.iter().map(|s| s.normalized.controversy).collect(),
            cfg.controversy_top_fraction,
        )?;
        Some(Self {
            iis,
            controversy,
            growth_norm_min: cfg.growth_norm_min,
        })
    }

    pub fn is_hot(&self, article: &ScoredArticle) -> bool {
        article.iis >= self.iis
            || article.normalized.growth > self.growth_norm_min
            || article.normalized.controversy >= self.controversy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::indicators::RawIndicators;
    use crate::score::normalize::NormalizedIndicators;

    fn art(key: &str, iis: f64, growth: f64, controversy: f64) -> ScoredArticle {
        ScoredArticle {
            article_key: key.into(),
            raw: RawIndicators::default(),
            normalized: NormalizedIndicators {
                growth,
                controversy,
                ..Default::default()
            },
            iis,
        }
    }

    #[test]
    fn threshold_rank_is_ceiling_of_fraction() {
        let v = vec![0.1, 0.9, 0.5, 0.7, 0.3, 0.2, 0.8, 0.4, 0.6, 0.0];
        // n=10, 30% → rank 3 → 0.7
        assert_eq!(top_fraction_threshold(v.clone(), 0.3), Some(0.7));
        // 20% → rank 2 → 0.8
        assert_eq!(top_fraction_threshold(v, 0.2), Some(0.8));
        // tiny population clips to rank 1
        assert_eq!(top_fraction_threshold(vec![0.4, 0.2], 0.1), Some(0.4));
        assert_eq!(top_fraction_threshold(vec![], 0.3), None);
    }

    #[test]
    fn empty_population_has_no_thresholds() {
        assert!(HotThresholds::from_population(&[], &HotConfig::default()).is_none());
    }

    #[test]
    fn any_of_three_conditions_makes_hot() {
        let population: Vec<_> = (0..10)
            .map(|i| art(&format!("a{i}"), i as f64 / 10.0, 0.0, i as f64 / 10.0))
            .collect();
        let t = HotThresholds::from_population(&population, &HotConfig::default()).unwrap();
        assert!((t.iis - 0.7).abs() < 1e-12);
        assert!((t.controversy - 0.8).abs() < 1e-12);

        assert!(t.is_hot(&art("top-iis", 0.75, 0.0, 0.0)));
        assert!(t.is_hot(&art("growth", 0.0, 0.71, 0.0)));
        assert!(t.is_hot(&art("controversy", 0.0, 0.0, 0.8)));
        assert!(!t.is_hot(&art("growth-at-bound", 0.0, 0.7, 0.0)));
        assert!(!t.is_hot(&art("cold", 0.69, 0.5, 0.79)));
    }
}
