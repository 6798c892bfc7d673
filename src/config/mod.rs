// src/config/mod.rs
pub mod scoring;

pub use scoring::{
    load_scoring_config_default, load_scoring_config_from, DecayConfig, GraphConfig,
    HotConfig, RankingConfig, ScoreWeights, ScoringConfig, DEFAULT_SCORING_CONFIG_PATH,
    ENV_SCORING_CONFIG_PATH,
};
