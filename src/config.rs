// src/config.rs
//! Engine configuration: component weights, interest topics, freshness decay,
//! sampling, low-priority thresholds, and fetch limits.
//!
//! Loaded from TOML. The config object is immutable once constructed and is
//! passed into the pipeline at construction time, so several differently
//! configured pipelines (e.g. per-user interest profiles) can coexist.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "config/prioritizer.toml";
pub const ENV_CONFIG_PATH: &str = "PRIORITIZER_CONFIG_PATH";

/// Built-in default config, used when no file is present.
const EMBEDDED_DEFAULT: &str = include_str!("../config/prioritizer.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct PrioritizerConfig {
    pub weights: ComponentWeights,
    #[serde(default)]
    pub freshness: FreshnessCfg,
    #[serde(default)]
    pub sampling: SamplingCfg,
    #[serde(default)]
    pub low_priority: LowPriorityCfg,
    #[serde(default)]
    pub fetch: FetchCfg,
    #[serde(default)]
    pub topics: Vec<TopicCfg>,
}

/// Fixed aggregation weights; must sum to 1.0.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ComponentWeights {
    pub quality: f64,
    pub info_density: f64,
    pub readability: f64,
    pub topic_relevance: f64,
    pub freshness: f64,
    pub engagement: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            quality: 0.25,
            info_density: 0.15,
            readability: 0.15,
            topic_relevance: 0.20,
            freshness: 0.10,
            engagement: 0.15,
        }
    }
}

impl ComponentWeights {
    pub fn sum(&self) -> f64 {
        self.quality
            + self.info_density
            + self.readability
            + self.topic_relevance
            + self.freshness
            + self.engagement
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FreshnessCfg {
    /// Exponential decay half-life, in days.
    pub half_life_days: f64,
    /// Minimum freshness score guaranteed regardless of age (score units).
    pub evergreen_floor: f64,
}

impl Default for FreshnessCfg {
    fn default() -> Self {
        Self {
            half_life_days: 30.0,
            evergreen_floor: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SamplingCfg {
    /// How many records to draw from the backlog per batch run.
    pub sample_size: usize,
    /// How many ranked articles to return (metadata still covers the whole batch).
    pub top_n: usize,
    /// Optional deterministic seed; absent means OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SamplingCfg {
    fn default() -> Self {
        Self {
            sample_size: 10,
            top_n: 10,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LowPriorityCfg {
    /// Default age filter for /prioritization/low-priority, in days.
    pub min_age_days: i64,
    /// Composite score below which `low_priority_score` applies.
    pub score_threshold: f64,
    /// Published longer ago than this → `old_publication_date`.
    pub stale_publication_days: i64,
    /// Saved but never opened for this long → `long_term_neglect`.
    pub neglect_days: i64,
    /// Last opened longer ago than this → `stale_interest`.
    pub stale_interest_days: i64,
    /// Partially read but untouched for this long → `abandoned_reading`.
    pub abandoned_days: i64,
}

impl Default for LowPriorityCfg {
    fn default() -> Self {
        Self {
            min_age_days: 30,
            score_threshold: 40.0,
            stale_publication_days: 365,
            neglect_days: 90,
            stale_interest_days: 120,
            abandoned_days: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FetchCfg {
    /// Per-fetch timeout.
    pub timeout_secs: u64,
    /// Max in-flight article pipelines per batch.
    pub concurrency: usize,
    /// Fetched text shorter than this (after trim) counts as a failed extraction.
    pub min_viable_chars: usize,
}

impl Default for FetchCfg {
    fn default() -> Self {
        Self {
            timeout_secs: 8,
            concurrency: 4,
            min_viable_chars: 120,
        }
    }
}

/// A named interest topic with its keyword list and importance weight.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicCfg {
    pub name: String,
    /// Importance weight in (0,1].
    pub importance: f64,
    pub keywords: Vec<String>,
}

impl PrioritizerConfig {
    /// Load using the env override, then the default path, then the embedded
    /// default shipped with the binary.
    pub fn load() -> Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading prioritizer config at {}", path.display()))?;
            return Self::from_toml_str(&content)
                .with_context(|| format!("parsing prioritizer config at {}", path.display()));
        }
        Self::from_toml_str(EMBEDDED_DEFAULT).context("parsing embedded default config")
    }

    /// Parse and validate a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let cfg: PrioritizerConfig = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(anyhow!("component weights must sum to 1.0, got {sum}"));
        }
        if self.freshness.half_life_days <= 0.0 {
            return Err(anyhow!("freshness.half_life_days must be positive"));
        }
        if !(1.0..=10.0).contains(&self.freshness.evergreen_floor) {
            return Err(anyhow!("freshness.evergreen_floor must lie in [1,10]"));
        }
        if self.fetch.concurrency == 0 {
            return Err(anyhow!("fetch.concurrency must be at least 1"));
        }
        for t in &self.topics {
            if t.keywords.is_empty() {
                return Err(anyhow!("topic `{}` has no keywords", t.name));
            }
            if !(0.0..=1.0).contains(&t.importance) {
                return Err(anyhow!("topic `{}` importance must lie in [0,1]", t.name));
            }
        }
        Ok(())
    }
}
