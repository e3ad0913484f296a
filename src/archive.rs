// src/archive.rs
//! Archive-candidate rules: a separate layer over raw record metadata plus
//! the computed scores. Not part of the core scoring contract — reasons are
//! derived after scoring and never feed back into the composite.

use crate::config::LowPriorityCfg;
use crate::types::{ArchiveReason, ArticleRecord, ComponentScores, Provenance};

const MS_PER_DAY: i64 = 86_400_000;

/// Component score below this reads as a weak metric for reason derivation.
const WEAK_COMPONENT: f64 = 4.0;

/// Derive every applicable archive reason for one scored article.
pub fn derive_reasons(
    record: &ArticleRecord,
    scores: &ComponentScores,
    priority: f64,
    provenance: Provenance,
    now_ms: i64,
    cfg: &LowPriorityCfg,
) -> Vec<ArchiveReason> {
    let mut reasons = Vec::new();
    let days_since = |ts: i64| (now_ms - ts).max(0) / MS_PER_DAY;

    if priority < cfg.score_threshold {
        reasons.push(ArchiveReason::LowPriorityScore);
    }
    if let Some(published) = record.published_date {
        if days_since(published) >= cfg.stale_publication_days {
            reasons.push(ArchiveReason::OldPublicationDate);
        }
    }
    if provenance == Provenance::None {
        reasons.push(ArchiveReason::ContentExtractionFailed);
    }
    if scores.readability < WEAK_COMPONENT {
        reasons.push(ArchiveReason::LowReadability);
    }
    if scores.info_density < WEAK_COMPONENT {
        reasons.push(ArchiveReason::LowInformationDensity);
    }
    if scores.topic_relevance < WEAK_COMPONENT {
        reasons.push(ArchiveReason::LowTopicRelevance);
    }
    if record.first_opened_at.is_none() && days_since(record.saved_at) >= cfg.neglect_days {
        reasons.push(ArchiveReason::LongTermNeglect);
    }
    if let Some(last) = record.last_opened_at {
        if days_since(last) >= cfg.stale_interest_days {
            reasons.push(ArchiveReason::StaleInterest);
        }
        // started but clearly abandoned
        if record.reading_progress > 0.0
            && record.reading_progress < 0.9
            && days_since(last) >= cfg.abandoned_days
        {
            reasons.push(ArchiveReason::AbandonedReading);
        }
    }
    if record.title.trim().is_empty() || record.url.trim().is_empty() {
        reasons.push(ArchiveReason::MissingCriticalMetadata);
    }
    reasons
}
