// src/analysis/mod.rs
//! Metric extraction pipeline: six independent scorers behind one trait,
//! registered in a fixed order, sharing one per-article `Document` of
//! precomputed text statistics.

pub mod density;
pub mod engagement;
pub mod freshness;
pub mod quality;
pub mod readability;
pub mod topics;

use crate::config::PrioritizerConfig;
use crate::types::{ArticleRecord, ComponentScores};

pub use density::DensityScorer;
pub use engagement::EngagementScorer;
pub use freshness::FreshnessScorer;
pub use quality::QualityScorer;
pub use readability::ReadabilityScorer;
pub use topics::TopicRelevanceScorer;

/// Upper bound on analyzed text; longer content is scored on this prefix.
pub const ANALYSIS_CAP_CHARS: usize = 60_000;

/// Shared, read-only inputs for one scoring pass.
pub struct ScoreContext<'a> {
    pub config: &'a PrioritizerConfig,
    /// Wall-clock "now" in Unix milliseconds, passed in explicitly so a batch
    /// is deterministic and repeatable.
    pub now_ms: i64,
}

/// One metric extractor: a pure, side-effect-free mapping from resolved text
/// plus record metadata to a score in [1,10].
pub trait MetricScorer: Send + Sync {
    fn name(&self) -> &'static str;
    fn score(&self, doc: &Document, record: &ArticleRecord, cx: &ScoreContext<'_>) -> f64;
}

/// The fixed, ordered scorer registry. New metrics slot in here without
/// touching the aggregator contract.
pub fn default_scorers() -> Vec<Box<dyn MetricScorer>> {
    vec![
        Box::new(QualityScorer),
        Box::new(DensityScorer),
        Box::new(ReadabilityScorer),
        Box::new(TopicRelevanceScorer),
        Box::new(FreshnessScorer),
        Box::new(EngagementScorer),
    ]
}

/// Run every registered scorer and assemble the named component set.
/// Unknown names are ignored; metrics a scorer never produced stay at the
/// defined minimum, so the aggregate is always computable.
pub fn run_scorers(
    scorers: &[Box<dyn MetricScorer>],
    doc: &Document,
    record: &ArticleRecord,
    cx: &ScoreContext<'_>,
) -> ComponentScores {
    let mut out = ComponentScores::floor();
    for s in scorers {
        let value = clamp_score(s.score(doc, record, cx));
        match s.name() {
            "quality" => out.quality = value,
            "information_density" => out.info_density = value,
            "readability" => out.readability = value,
            "topic_relevance" => out.topic_relevance = value,
            "freshness" => out.freshness = value,
            "engagement_potential" => out.engagement = value,
            other => tracing::warn!(metric = other, "unregistered metric name, dropped"),
        }
    }
    out
}

/// Clamp to the [1,10] contract; non-finite values collapse to the minimum.
pub fn clamp_score(x: f64) -> f64 {
    if x.is_finite() {
        x.clamp(1.0, 10.0)
    } else {
        1.0
    }
}

/// Scale a [0,1] signal onto the [1,10] score band.
pub(crate) fn scale_unit(signal: f64) -> f64 {
    clamp_score(1.0 + 9.0 * signal.clamp(0.0, 1.0))
}

/// Precomputed text statistics for one article, built once per scoring pass.
#[derive(Debug, Default)]
pub struct Document {
    pub text: String,
    /// Lowercased alphanumeric tokens.
    pub words: Vec<String>,
    pub unique_words: usize,
    /// Sentence texts, split on terminal punctuation.
    pub sentences: Vec<String>,
    /// Non-empty trimmed lines (stored and fetched content both separate
    /// paragraphs with newlines).
    pub paragraphs: Vec<String>,
    pub letters: usize,
    pub syllables: usize,
    /// Words with three or more syllables.
    pub polysyllables: usize,
}

impl Document {
    pub fn from_text(raw: &str) -> Self {
        let text: String = if raw.chars().count() > ANALYSIS_CAP_CHARS {
            raw.chars().take(ANALYSIS_CAP_CHARS).collect()
        } else {
            raw.to_string()
        };

        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect();

        let unique_words = {
            use std::collections::HashSet;
            words.iter().map(String::as_str).collect::<HashSet<_>>().len()
        };

        let sentences: Vec<String> = text
            .split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let paragraphs: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        let letters = text.chars().filter(|c| c.is_alphabetic()).count();

        let mut syllables = 0usize;
        let mut polysyllables = 0usize;
        for w in &words {
            let n = syllable_count(w);
            syllables += n;
            if n >= 3 {
                polysyllables += 1;
            }
        }

        Self {
            text,
            words,
            unique_words,
            sentences,
            paragraphs,
            letters,
            syllables,
            polysyllables,
        }
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Vowel-group syllable heuristic: counts maximal vowel runs, discounts a
/// trailing silent `e`, floors at one syllable per word.
pub(crate) fn syllable_count(word: &str) -> usize {
    let lower = word.to_lowercase();
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

    let mut groups = 0usize;
    let mut prev_vowel = false;
    for c in lower.chars() {
        let v = is_vowel(c);
        if v && !prev_vowel {
            groups += 1;
        }
        prev_vowel = v;
    }
    if groups > 1 && lower.ends_with('e') && !lower.ends_with("le") {
        groups -= 1;
    }
    groups.max(1)
}
