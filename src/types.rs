// src/types.rs
//! Core data shapes: input article records, resolved content, component
//! scores, and the response-shaped ranking types consumed by the dashboard.

use serde::{Deserialize, Serialize};

/// A saved-reading-list item as owned by the external storage layer.
/// All timestamps are Unix milliseconds. `saved_at` is always present;
/// `published_date` may predate it arbitrarily.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArticleRecord {
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub word_count: u32,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    pub saved_at: i64,
    #[serde(default)]
    pub published_date: Option<i64>,
    #[serde(default)]
    pub first_opened_at: Option<i64>,
    #[serde(default)]
    pub last_opened_at: Option<i64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    /// Fraction read so far, 0.0..=1.0.
    #[serde(default)]
    pub reading_progress: f32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Set by the archive mutation endpoint (external collaborator).
    /// Archived articles are never scored or ranked.
    #[serde(default)]
    pub archived_at: Option<i64>,
}

impl ArticleRecord {
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Best available publication-or-save instant, used for age computations.
    pub fn reference_ts(&self) -> i64 {
        self.published_date.unwrap_or(self.saved_at)
    }
}

/// Where the analyzable text for an article came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Fetched,
    StoredContent,
    Summary,
    None,
}

/// The text string used for analysis plus its provenance.
/// Computed once per scoring pass per article and discarded afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContent {
    pub text: String,
    pub provenance: Provenance,
}

impl ResolvedContent {
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            provenance: Provenance::None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The six [1,10] sub-scores feeding the composite. Field names on the wire
/// follow the dashboard contract (`information_density`, `engagement_potential`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ComponentScores {
    pub quality: f64,
    #[serde(rename = "information_density")]
    pub info_density: f64,
    pub readability: f64,
    pub topic_relevance: f64,
    pub freshness: f64,
    #[serde(rename = "engagement_potential")]
    pub engagement: f64,
}

impl ComponentScores {
    /// The defined minimum for every metric, used when no content is analyzable.
    pub fn floor() -> Self {
        Self {
            quality: 1.0,
            info_density: 1.0,
            readability: 1.0,
            topic_relevance: 1.0,
            freshness: 1.0,
            engagement: 1.0,
        }
    }
}

/// Externally-visible slice of a scored article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritizedArticle {
    pub id: String,
    pub title: String,
    pub url: String,
    pub word_count: u32,
    pub priority_score: f64,
    pub component_scores: ComponentScores,
}

/// Fixed vocabulary of reasons an article is flagged as an archive candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveReason {
    LowPriorityScore,
    OldPublicationDate,
    ContentExtractionFailed,
    LowReadability,
    LowInformationDensity,
    LowTopicRelevance,
    LongTermNeglect,
    StaleInterest,
    AbandonedReading,
    MissingCriticalMetadata,
}

/// A prioritized article flagged by the archive rules layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveCandidate {
    #[serde(flatten)]
    pub article: PrioritizedArticle,
    pub archive_reasons: Vec<ArchiveReason>,
}

/// Metadata covering the whole processed batch, not just the returned slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchMetadata {
    pub total_processed: usize,
    pub failed: usize,
    pub min_score: f64,
    pub max_score: f64,
    pub returned_count: usize,
}

/// Full ranked payload for `/prioritization/sample`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingResult {
    pub articles: Vec<PrioritizedArticle>,
    pub metadata: BatchMetadata,
}

/// Metadata for the low-priority report; echoes the age criterion back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    pub total_processed: usize,
    pub failed: usize,
    pub min_age_days: i64,
    pub returned_count: usize,
}

/// Payload for `/prioritization/low-priority`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveReport {
    pub articles: Vec<ArchiveCandidate>,
    pub metadata: ArchiveMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_scores_wire_names() {
        let scores = ComponentScores {
            quality: 9.5,
            info_density: 8.2,
            readability: 7.0,
            topic_relevance: 9.0,
            freshness: 8.8,
            engagement: 6.8,
        };
        let v = serde_json::to_value(&scores).unwrap();
        assert!(v.get("information_density").is_some());
        assert!(v.get("engagement_potential").is_some());
        assert!(v.get("info_density").is_none());
        assert!(v.get("engagement").is_none());
    }

    #[test]
    fn archive_reasons_serialize_snake_case() {
        let v = serde_json::to_value([
            ArchiveReason::LowPriorityScore,
            ArchiveReason::ContentExtractionFailed,
            ArchiveReason::LongTermNeglect,
        ])
        .unwrap();
        assert_eq!(
            v,
            serde_json::json!([
                "low_priority_score",
                "content_extraction_failed",
                "long_term_neglect"
            ])
        );
    }

    #[test]
    fn record_reference_ts_prefers_published_date() {
        let mut rec = ArticleRecord {
            id: "a1".into(),
            saved_at: 2_000,
            ..Default::default()
        };
        assert_eq!(rec.reference_ts(), 2_000);
        rec.published_date = Some(1_000);
        assert_eq!(rec.reference_ts(), 1_000);
    }

    #[test]
    fn record_deserializes_with_optional_fields_missing() {
        let json = r#"{"id":"a1","url":"https://ex.org/a","title":"T","saved_at":123}"#;
        let rec: ArticleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.word_count, 0);
        assert!(rec.tags.is_empty());
        assert!(!rec.is_archived());
    }
}
