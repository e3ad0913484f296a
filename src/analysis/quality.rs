// src/analysis/quality.rs
//! Quality metric: citation patterns, numeric evidence, attributed quotes,
//! and paragraph structure, each normalized to [0,1] and averaged.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{scale_unit, Document, MetricScorer, ScoreContext};
use crate::types::ArticleRecord;

/// Numeric bracket references like `[1]`, `[23]`.
static RE_BRACKET_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d{1,3}\]").expect("bracket ref regex"));

/// Author-year parentheticals like `(Smith, 2021)` or `(Smith et al. 2019)`.
static RE_AUTHOR_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\([A-Z][A-Za-z-]+(?: et al\.?)?,? (?:19|20)\d{2}\)").expect("author-year regex")
});

/// Numeric / statistical tokens: percentages, magnitudes, plain figures.
static RE_NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+(?:[.,]\d+)?\s*(?:%|percent|million|billion|thousand)|\b\d+(?:[.,]\d+)?\b")
        .expect("numeric regex")
});

/// Quoted spans long enough to be substantive.
static RE_QUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""[^"]{20,400}""#).expect("quote regex"));

/// Attribution verbs signalling a sourced quote.
static RE_ATTRIBUTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(said|says|stated|noted|wrote|according to|told|explained)\b")
        .expect("attribution regex")
});

const CITATIONS_SATURATION: f64 = 5.0;
const NUMERICS_SATURATION: f64 = 10.0;
const QUOTES_SATURATION: f64 = 3.0;
const PARAGRAPH_BAND_WORDS: (f64, f64) = (40.0, 200.0);

pub struct QualityScorer;

impl MetricScorer for QualityScorer {
    fn name(&self) -> &'static str {
        "quality"
    }

    fn score(&self, doc: &Document, _record: &ArticleRecord, _cx: &ScoreContext<'_>) -> f64 {
        if doc.is_empty() {
            return 1.0;
        }

        let citations = RE_BRACKET_REF.find_iter(&doc.text).count()
            + RE_AUTHOR_YEAR.find_iter(&doc.text).count();
        let citation_signal = (citations as f64 / CITATIONS_SATURATION).min(1.0);

        let numerics = RE_NUMERIC.find_iter(&doc.text).count();
        let numeric_signal = (numerics as f64 / NUMERICS_SATURATION).min(1.0);

        let quotes = RE_QUOTE.find_iter(&doc.text).count();
        let mut quote_signal = (quotes as f64 / QUOTES_SATURATION).min(1.0);
        if !RE_ATTRIBUTION.is_match(&doc.text) {
            // quotes without any attribution verb count for half
            quote_signal *= 0.5;
        }

        let structure_signal = structure_signal(doc);

        let mean = (citation_signal + numeric_signal + quote_signal + structure_signal) / 4.0;
        scale_unit(mean)
    }
}

/// Paragraph-shape signal: several paragraphs with a mean length inside a
/// readable band score full marks; degenerate structure scores low.
fn structure_signal(doc: &Document) -> f64 {
    let n = doc.paragraphs.len();
    if n == 0 {
        return 0.0;
    }
    let mean_words = doc
        .paragraphs
        .iter()
        .map(|p| p.split_whitespace().count())
        .sum::<usize>() as f64
        / n as f64;

    let (lo, hi) = PARAGRAPH_BAND_WORDS;
    if n >= 3 && (lo..=hi).contains(&mean_words) {
        1.0
    } else if n >= 3 {
        0.5
    } else {
        0.25
    }
}
