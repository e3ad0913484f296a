// src/analysis/freshness.rs
//! Freshness metric: exponential half-life decay over article age with an
//! evergreen floor so timeless content never collapses to the minimum.

use super::{clamp_score, Document, MetricScorer, ScoreContext};
use crate::types::ArticleRecord;

const MS_PER_DAY: f64 = 86_400_000.0;

pub struct FreshnessScorer;

impl MetricScorer for FreshnessScorer {
    fn name(&self) -> &'static str {
        "freshness"
    }

    fn score(&self, _doc: &Document, record: &ArticleRecord, cx: &ScoreContext<'_>) -> f64 {
        let age_days = age_days(record, cx.now_ms);
        let f = &cx.config.freshness;
        let decay = 0.5_f64.powf(age_days / f.half_life_days);
        clamp_score((1.0 + 9.0 * decay).max(f.evergreen_floor))
    }
}

/// Age in days from `published_date` when present, else `saved_at`.
/// Future-dated articles count as age zero.
pub fn age_days(record: &ArticleRecord, now_ms: i64) -> f64 {
    ((now_ms - record.reference_ts()).max(0)) as f64 / MS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrioritizerConfig;

    const DAY_MS: i64 = 86_400_000;
    const NOW: i64 = 1_700_000_000_000;

    fn cfg() -> PrioritizerConfig {
        PrioritizerConfig::from_toml_str(include_str!("../../config/prioritizer.toml")).unwrap()
    }

    fn record_aged(days: i64) -> ArticleRecord {
        ArticleRecord {
            id: "f".into(),
            saved_at: NOW,
            published_date: Some(NOW - days * DAY_MS),
            ..Default::default()
        }
    }

    fn score_at(days: i64) -> f64 {
        let cfg = cfg();
        let cx = ScoreContext {
            config: &cfg,
            now_ms: NOW,
        };
        FreshnessScorer.score(&Document::from_text(""), &record_aged(days), &cx)
    }

    #[test]
    fn brand_new_article_scores_max() {
        assert!((score_at(0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn older_never_outscores_younger() {
        let ages = [0, 1, 7, 30, 90, 365, 3650];
        for pair in ages.windows(2) {
            assert!(
                score_at(pair[1]) <= score_at(pair[0]),
                "freshness must be monotone non-increasing ({} vs {} days)",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn evergreen_floor_holds_for_ancient_content() {
        let s = score_at(3650);
        assert!((s - 3.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn half_life_halves_the_decay_component() {
        // at exactly one half-life, 1 + 9·0.5 = 5.5
        let s = score_at(30);
        assert!((s - 5.5).abs() < 1e-6, "got {s}");
    }

    #[test]
    fn falls_back_to_saved_at_without_published_date() {
        let cfg = cfg();
        let cx = ScoreContext {
            config: &cfg,
            now_ms: NOW,
        };
        let rec = ArticleRecord {
            id: "f".into(),
            saved_at: NOW - 30 * DAY_MS,
            ..Default::default()
        };
        let s = FreshnessScorer.score(&Document::from_text(""), &rec, &cx);
        assert!((s - 5.5).abs() < 1e-6, "got {s}");
    }
}
