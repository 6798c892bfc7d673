// src/config/scoring.rs
//! Scoring configuration, loaded from TOML.
//!
//! TOML shape (every key optional, defaults shown):
//! ```toml
//! [weights]
//! volume = 0.20
//! persistence = 0.10
//! growth = 0.15
//! acceleration = 0.10
//! controversy = 0.25
//! buzz = 0.20
//!
//! [decay]
//! half_life_days = 7.0
//!
//! [ranking]
//! top_n = 5
//!
//! [hot]
//! iis_top_fraction = 0.3
//! controversy_top_fraction = 0.2
//! growth_norm_min = 0.7
//!
//! [graph]
//! opinion_sample_cap = 5
//! ```

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SCORING_CONFIG_PATH: &str = "config/scoring.toml";
pub const ENV_SCORING_CONFIG_PATH: &str = "SCORING_CONFIG_PATH";

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Composite weights of the six indicators. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub volume: f64,
    pub persistence: f64,
    pub growth: f64,
    pub acceleration: f64,
    pub controversy: f64,
    pub buzz: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            volume: 0.20,
            persistence: 0.10,
            growth: 0.15,
            acceleration: 0.10,
            controversy: 0.25,
            buzz: 0.20,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.volume
            + self.persistence
            + self.growth
            + self.acceleration
            + self.controversy
            + self.buzz
    }

    fn as_named(&self) -> [(&'static str, f64); 6] {
        [
            ("volume", self.volume),
            ("persistence", self.persistence),
            ("growth", self.growth),
            ("acceleration", self.acceleration),
            ("controversy", self.controversy),
            ("buzz", self.buzz),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// News weight halves every `half_life_days` days of age.
    pub half_life_days: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            half_life_days: 7.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self { top_n: 5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotConfig {
    pub iis_top_fraction: f64,
    pub controversy_top_fraction: f64,
    /// Strict lower bound on normalized growth.
    pub growth_norm_min: f64,
}

impl Default for HotConfig {
    fn default() -> Self {
        Self {
            iis_top_fraction: 0.3,
            controversy_top_fraction: 0.2,
            growth_norm_min: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub opinion_sample_cap: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            opinion_sample_cap: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    pub decay: DecayConfig,
    pub ranking: RankingConfig,
    pub hot: HotConfig,
    pub graph: GraphConfig,
}

impl ScoringConfig {
    /// Reject configurations the engine cannot score with.
    pub fn validate(&self) -> Result<()> {
        for (name, w) in self.weights.as_named() {
            if !w.is_finite() || w < 0.0 {
                bail!("weight `{name}` must be a non-negative number, got {w}");
            }
        }
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            bail!("weights must sum to 1.0, got {sum}");
        }
        if !(self.decay.half_life_days.is_finite() && self.decay.half_life_days > 0.0) {
            bail!(
                "decay.half_life_days must be > 0, got {}",
                self.decay.half_life_days
            );
        }
        for (name, f) in [
            ("hot.iis_top_fraction", self.hot.iis_top_fraction),
            ("hot.controversy_top_fraction", self.hot.controversy_top_fraction),
        ] {
            if !(f > 0.0 && f <= 1.0) {
                bail!("{name} must be in (0, 1], got {f}");
            }
        }
        if self.ranking.top_n == 0 {
            bail!("ranking.top_n must be at least 1");
        }
        if self.graph.opinion_sample_cap == 0 {
            bail!("graph.opinion_sample_cap must be at least 1");
        }
        Ok(())
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: ScoringConfig = toml::from_str(s).context("parsing scoring config TOML")?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Load and validate a scoring config from an explicit path.
pub fn load_scoring_config_from(path: &Path) -> Result<ScoringConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading scoring config from {}", path.display()))?;
    ScoringConfig::from_toml_str(&content)
        .with_context(|| format!("invalid scoring config {}", path.display()))
}

/// Load scoring config using env var + fallbacks:
/// 1) $SCORING_CONFIG_PATH (must exist)
/// 2) config/scoring.toml
/// 3) built-in defaults
pub fn load_scoring_config_default() -> Result<ScoringConfig> {
    if let Ok(p) = std::env::var(ENV_SCORING_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_scoring_config_from(&pb);
        }
        return Err(anyhow!(
            "{ENV_SCORING_CONFIG_PATH} points to non-existent path {}",
            pb.display()
        ));
    }
    let default_p = PathBuf::from(DEFAULT_SCORING_CONFIG_PATH);
    if default_p.exists() {
        return load_scoring_config_from(&default_p);
    }
    tracing::debug!("no scoring config file found, using built-in defaults");
    Ok(ScoringConfig::default())
}
