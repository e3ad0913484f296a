// src/analysis/readability.rs
//! Readability metric: four standard indices blended into one grade level,
//! mapped to a complexity class, mapped to [1,10].
//!
//! No canonical grade→score mapping exists, so this module fixes one:
//! grade < 8 → Basic (7.0), 8–12 → Intermediate (10.0), 12–16 → Advanced
//! (6.5), ≥16 → Expert (4.0). The sweet spot rewards substantial but
//! accessible prose; both trivial and expert-dense texts rank lower.

use super::{Document, MetricScorer, ScoreContext};
use crate::types::ArticleRecord;

/// Grade clamping band; keeps degenerate inputs from skewing the blend.
const GRADE_RANGE: (f64, f64) = (0.0, 20.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityClass {
    Basic,
    Intermediate,
    Advanced,
    Expert,
}

impl ComplexityClass {
    pub fn from_grade(grade: f64) -> Self {
        if grade < 8.0 {
            Self::Basic
        } else if grade < 12.0 {
            Self::Intermediate
        } else if grade < 16.0 {
            Self::Advanced
        } else {
            Self::Expert
        }
    }

    pub fn score(self) -> f64 {
        match self {
            Self::Basic => 7.0,
            Self::Intermediate => 10.0,
            Self::Advanced => 6.5,
            Self::Expert => 4.0,
        }
    }
}

pub struct ReadabilityScorer;

impl MetricScorer for ReadabilityScorer {
    fn name(&self) -> &'static str {
        "readability"
    }

    fn score(&self, doc: &Document, _record: &ArticleRecord, _cx: &ScoreContext<'_>) -> f64 {
        if doc.is_empty() || doc.sentences.is_empty() {
            return 1.0;
        }
        ComplexityClass::from_grade(combined_grade(doc)).score()
    }
}

/// Mean of the four index grades, each clamped to a sane band.
pub fn combined_grade(doc: &Document) -> f64 {
    let words = doc.word_count() as f64;
    let sentences = doc.sentences.len() as f64;
    let syllables = doc.syllables as f64;
    let letters = doc.letters as f64;
    let polys = doc.polysyllables as f64;

    let fre = 206.835 - 1.015 * (words / sentences) - 84.6 * (syllables / words);
    // Flesch score is not a grade; fold it onto a grade-equivalent scale.
    let fre_grade = clamp_grade((100.0 - fre) * 0.2);

    let smog = clamp_grade(1.0430 * (polys * 30.0 / sentences).sqrt() + 3.1291);

    let letters_per_100 = letters / words * 100.0;
    let sentences_per_100 = sentences / words * 100.0;
    let coleman_liau = clamp_grade(0.0588 * letters_per_100 - 0.296 * sentences_per_100 - 15.8);

    let ari = clamp_grade(4.71 * (letters / words) + 0.5 * (words / sentences) - 21.43);

    (fre_grade + smog + coleman_liau + ari) / 4.0
}

fn clamp_grade(g: f64) -> f64 {
    if g.is_finite() {
        g.clamp(GRADE_RANGE.0, GRADE_RANGE.1)
    } else {
        GRADE_RANGE.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrioritizerConfig;

    fn cfg() -> PrioritizerConfig {
        PrioritizerConfig::from_toml_str(include_str!("../../config/prioritizer.toml")).unwrap()
    }

    #[test]
    fn class_thresholds_are_fixed() {
        assert_eq!(ComplexityClass::from_grade(0.0), ComplexityClass::Basic);
        assert_eq!(ComplexityClass::from_grade(7.99), ComplexityClass::Basic);
        assert_eq!(ComplexityClass::from_grade(8.0), ComplexityClass::Intermediate);
        assert_eq!(ComplexityClass::from_grade(11.99), ComplexityClass::Intermediate);
        assert_eq!(ComplexityClass::from_grade(12.0), ComplexityClass::Advanced);
        assert_eq!(ComplexityClass::from_grade(16.0), ComplexityClass::Expert);
    }

    #[test]
    fn class_scores_reward_the_sweet_spot() {
        assert_eq!(ComplexityClass::Intermediate.score(), 10.0);
        assert!(ComplexityClass::Basic.score() > ComplexityClass::Advanced.score());
        assert!(ComplexityClass::Advanced.score() > ComplexityClass::Expert.score());
    }

    #[test]
    fn simple_prose_grades_lower_than_dense_prose() {
        let simple = Document::from_text("The cat sat on the mat. The dog ran fast.");
        let dense = Document::from_text(
            "Notwithstanding considerable methodological heterogeneity, longitudinal \
             epidemiological investigations demonstrate statistically significant associations \
             between socioeconomic determinants and cardiovascular morbidity, necessitating \
             comprehensive multidisciplinary interventions across institutional boundaries.",
        );
        let g_simple = combined_grade(&simple);
        let g_dense = combined_grade(&dense);
        assert!(g_simple < g_dense, "{g_simple} !< {g_dense}");
        assert_eq!(ComplexityClass::from_grade(g_simple), ComplexityClass::Basic);
        assert_eq!(ComplexityClass::from_grade(g_dense), ComplexityClass::Expert);
    }

    #[test]
    fn empty_text_scores_minimum() {
        let cfg = cfg();
        let cx = ScoreContext {
            config: &cfg,
            now_ms: 0,
        };
        let record = ArticleRecord::default();
        assert_eq!(
            ReadabilityScorer.score(&Document::from_text(""), &record, &cx),
            1.0
        );
    }
}
