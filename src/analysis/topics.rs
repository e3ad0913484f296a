// src/analysis/topics.rs
//! Topic-relevance metric: configurable interest topics matched by keyword
//! density, blended as an importance-weighted mean over the top three topics.

use super::{scale_unit, Document, MetricScorer, ScoreContext};
use crate::types::ArticleRecord;

/// Keyword hits per 100 words at which a topic counts as fully matched.
const TOPIC_SATURATION_PER_100: f64 = 1.5;

pub struct TopicRelevanceScorer;

impl MetricScorer for TopicRelevanceScorer {
    fn name(&self) -> &'static str {
        "topic_relevance"
    }

    fn score(&self, doc: &Document, _record: &ArticleRecord, cx: &ScoreContext<'_>) -> f64 {
        if doc.is_empty() || cx.config.topics.is_empty() {
            return 1.0;
        }

        let lower = doc.text.to_lowercase();
        let words = doc.word_count() as f64;

        // (raw match strength in [0,1], importance) per topic with any hits
        let mut matched: Vec<(f64, f64)> = Vec::new();
        for topic in &cx.config.topics {
            let hits: usize = topic
                .keywords
                .iter()
                .map(|kw| keyword_hits(doc, &lower, &kw.to_lowercase()))
                .sum();
            if hits == 0 {
                continue;
            }
            let per_100 = hits as f64 * 100.0 / words;
            let raw = (per_100 / TOPIC_SATURATION_PER_100).min(1.0);
            matched.push((raw, topic.importance));
        }

        if matched.is_empty() {
            return 1.0;
        }

        // Top 3 topics by weighted strength, then an importance-weighted mean.
        matched.sort_by(|a, b| (b.0 * b.1).total_cmp(&(a.0 * a.1)));
        matched.truncate(3);
        let num: f64 = matched.iter().map(|(raw, imp)| raw * imp).sum();
        let denom: f64 = matched.iter().map(|(_, imp)| imp).sum();
        if denom <= 0.0 {
            return 1.0;
        }
        scale_unit(num / denom)
    }
}

/// Count keyword occurrences: whole-token comparison for single words,
/// substring scan for multi-word phrases.
pub(crate) fn keyword_hits(doc: &Document, lower_text: &str, kw_lower: &str) -> usize {
    if kw_lower.contains(char::is_whitespace) {
        lower_text.matches(kw_lower).count()
    } else {
        doc.words.iter().filter(|w| w.as_str() == kw_lower).count()
    }
}
