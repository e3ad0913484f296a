// src/analysis/engagement.rs
//! Engagement metric: title hooks, scannable structure, list markers, and
//! reader-address patterns (questions, calls to action).

use once_cell::sync::Lazy;
use regex::Regex;

use super::{scale_unit, Document, MetricScorer, ScoreContext};
use crate::types::ArticleRecord;

static RE_LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(?:[-*•]|\d{1,2}[.)])\s+").expect("list marker regex"));

static RE_CALL_TO_ACTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(here's how|learn more|find out|check out|read on|sign up|try it|let's)\b")
        .expect("cta regex")
});

/// Title lengths outside this band read as either vague or unwieldy.
const TITLE_BAND_CHARS: (usize, usize) = (20, 90);
/// Paragraphs shorter than this many words count as scannable.
const SHORT_PARAGRAPH_WORDS: usize = 60;
const SHORT_RATIO_SATURATION: f64 = 0.5;
const PATTERN_SATURATION: f64 = 2.0;

pub struct EngagementScorer;

impl MetricScorer for EngagementScorer {
    fn name(&self) -> &'static str {
        "engagement_potential"
    }

    fn score(&self, doc: &Document, record: &ArticleRecord, _cx: &ScoreContext<'_>) -> f64 {
        if doc.is_empty() {
            return 1.0;
        }

        let title_signal = title_signal(&record.title);

        let structure_signal = if doc.paragraphs.is_empty() {
            0.0
        } else {
            let short = doc
                .paragraphs
                .iter()
                .filter(|p| p.split_whitespace().count() < SHORT_PARAGRAPH_WORDS)
                .count();
            let ratio = short as f64 / doc.paragraphs.len() as f64;
            (ratio / SHORT_RATIO_SATURATION).min(1.0)
        };

        let list_signal = if RE_LIST_MARKER.is_match(&doc.text) {
            1.0
        } else {
            0.0
        };

        let questions = doc.text.matches('?').count();
        let ctas = RE_CALL_TO_ACTION.find_iter(&doc.text).count();
        let pattern_signal = ((questions + ctas) as f64 / PATTERN_SATURATION).min(1.0);

        let mean = (title_signal + structure_signal + list_signal + pattern_signal) / 4.0;
        scale_unit(mean)
    }
}

fn title_signal(title: &str) -> f64 {
    let len = title.trim().chars().count();
    let in_band = (TITLE_BAND_CHARS.0..=TITLE_BAND_CHARS.1).contains(&len);
    let has_hook =
        title.contains('?') || title.contains(':') || title.chars().any(|c| c.is_ascii_digit());
    (if in_band { 0.5 } else { 0.0 }) + (if has_hook { 0.5 } else { 0.0 })
}
