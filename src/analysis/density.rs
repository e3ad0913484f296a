// src/analysis/density.rs
//! Information-density metric: lexical diversity, fact density, and
//! domain-concept density.

use std::collections::HashSet;

use super::{scale_unit, Document, MetricScorer, ScoreContext};
use crate::types::ArticleRecord;

/// Diversity is measured over a fixed window so long articles are not
/// penalized for natural vocabulary repetition.
const DIVERSITY_WINDOW_WORDS: usize = 500;
/// Unique-word ratio at or above this counts as fully diverse.
const DIVERSITY_SATURATION: f64 = 0.6;
/// Fraction of sentences carrying a numeric token that counts as fully factual.
const FACT_SATURATION: f64 = 0.3;
/// Topic-keyword hits per 100 words that count as fully concept-dense.
const CONCEPT_SATURATION_PER_100: f64 = 2.0;

pub struct DensityScorer;

impl MetricScorer for DensityScorer {
    fn name(&self) -> &'static str {
        "information_density"
    }

    fn score(&self, doc: &Document, _record: &ArticleRecord, cx: &ScoreContext<'_>) -> f64 {
        if doc.is_empty() {
            return 1.0;
        }

        let window = &doc.words[..doc.words.len().min(DIVERSITY_WINDOW_WORDS)];
        let unique = window.iter().map(String::as_str).collect::<HashSet<_>>().len();
        let diversity = unique as f64 / window.len() as f64;
        let diversity_signal = (diversity / DIVERSITY_SATURATION).min(1.0);

        let fact_signal = if doc.sentences.is_empty() {
            0.0
        } else {
            let numeric_sentences = doc
                .sentences
                .iter()
                .filter(|s| s.chars().any(|c| c.is_ascii_digit()))
                .count();
            (numeric_sentences as f64 / doc.sentences.len() as f64 / FACT_SATURATION).min(1.0)
        };

        let concept_signal = concept_signal(doc, cx);

        let mean = (diversity_signal + fact_signal + concept_signal) / 3.0;
        scale_unit(mean)
    }
}

/// Frequency of configured interest-topic keywords, per 100 words.
fn concept_signal(doc: &Document, cx: &ScoreContext<'_>) -> f64 {
    if cx.config.topics.is_empty() || doc.words.is_empty() {
        return 0.0;
    }
    let lower = doc.text.to_lowercase();
    let mut hits = 0usize;
    for topic in &cx.config.topics {
        for kw in &topic.keywords {
            hits += super::topics::keyword_hits(doc, &lower, &kw.to_lowercase());
        }
    }
    let per_100 = hits as f64 * 100.0 / doc.word_count() as f64;
    (per_100 / CONCEPT_SATURATION_PER_100).min(1.0)
}
