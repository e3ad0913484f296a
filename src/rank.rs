// src/rank.rs
//! Ranking Reporter: scores a batch of records independently, sorts by
//! composite priority, and assembles whole-batch metadata plus the top-N
//! slice. One article failing never aborts the batch.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Result};
use futures::stream::{self, StreamExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::analysis::{self, Document, MetricScorer, ScoreContext};
use crate::archive::derive_reasons;
use crate::config::PrioritizerConfig;
use crate::resolver::{ContentFetcher, ContentResolver};
use crate::types::{
    ArchiveCandidate, ArchiveMetadata, ArchiveReport, ArticleRecord, BatchMetadata,
    PrioritizedArticle, Provenance, RankingResult,
};

/// One article's scoring outcome, kept internal until sorted and sliced.
struct Scored {
    article: PrioritizedArticle,
    saved_at: i64,
    provenance: Provenance,
}

pub struct Prioritizer {
    config: Arc<PrioritizerConfig>,
    resolver: ContentResolver,
    scorers: Vec<Box<dyn MetricScorer>>,
}

impl Prioritizer {
    pub fn new(config: Arc<PrioritizerConfig>, fetcher: Arc<dyn ContentFetcher>) -> Self {
        let resolver = ContentResolver::new(fetcher, config.fetch);
        Self {
            config,
            resolver,
            scorers: analysis::default_scorers(),
        }
    }

    pub fn config(&self) -> &PrioritizerConfig {
        &self.config
    }

    /// Score every record independently, sort descending by composite with a
    /// fixed tie-break (saved_at desc, then id asc), and return the top-N
    /// slice with metadata covering the whole processed batch.
    pub async fn rank(&self, records: Vec<ArticleRecord>, now_ms: i64) -> RankingResult {
        let started = Instant::now();
        let total = records.len();

        let (mut scored, failed) = self.score_batch(&records, now_ms).await;
        sort_ranked(&mut scored);

        let min_score = scored.last().map(|s| s.article.priority_score).unwrap_or(0.0);
        let max_score = scored.first().map(|s| s.article.priority_score).unwrap_or(0.0);

        let articles: Vec<PrioritizedArticle> = scored
            .into_iter()
            .take(self.config.sampling.top_n)
            .map(|s| s.article)
            .collect();

        metrics::counter!("prioritize_batches_total").increment(1);
        metrics::histogram!("prioritize_batch_ms").record(started.elapsed().as_millis() as f64);
        info!(
            total,
            failed,
            returned = articles.len(),
            "ranked article batch"
        );

        RankingResult {
            metadata: BatchMetadata {
                total_processed: total,
                failed,
                min_score,
                max_score,
                returned_count: articles.len(),
            },
            articles,
        }
    }

    /// Build the low-priority report: records at least `min_age_days` old are
    /// scored and those carrying at least one archive reason are returned,
    /// weakest composite first.
    pub async fn archive_candidates(
        &self,
        records: Vec<ArticleRecord>,
        now_ms: i64,
        min_age_days: i64,
    ) -> ArchiveReport {
        // min_age_days arrives from the query string; huge values must
        // saturate, not overflow.
        let min_age_ms = min_age_days.max(0).saturating_mul(86_400_000);
        let aged: Vec<ArticleRecord> = records
            .into_iter()
            .filter(|r| now_ms.saturating_sub(r.saved_at) >= min_age_ms)
            .collect();
        let total = aged.len();

        let (scored, failed) = self.score_batch(&aged, now_ms).await;

        // scored results arrive unordered; pair back up with their records by id
        let mut candidates: Vec<ArchiveCandidate> = Vec::new();
        for s in scored {
            let Some(record) = aged.iter().find(|r| r.id == s.article.id) else {
                continue;
            };
            let reasons = derive_reasons(
                record,
                &s.article.component_scores,
                s.article.priority_score,
                s.provenance,
                now_ms,
                &self.config.low_priority,
            );
            if !reasons.is_empty() {
                candidates.push(ArchiveCandidate {
                    article: s.article,
                    archive_reasons: reasons,
                });
            }
        }
        candidates.sort_by(|a, b| {
            a.article
                .priority_score
                .total_cmp(&b.article.priority_score)
                .then_with(|| a.article.id.cmp(&b.article.id))
        });

        ArchiveReport {
            metadata: ArchiveMetadata {
                total_processed: total,
                failed,
                min_age_days,
                returned_count: candidates.len(),
            },
            articles: candidates,
        }
    }

    /// Fan the batch out through the resolver + scorers with bounded
    /// concurrency. Per-article failures are counted, logged, and skipped.
    async fn score_batch(&self, records: &[ArticleRecord], now_ms: i64) -> (Vec<Scored>, usize) {
        // Build the futures up front; a closure handed to `map` would have to
        // be generic over the record borrow's lifetime, which rustc rejects.
        let futs: Vec<_> = records
            .iter()
            .map(|record| self.score_article(record, now_ms))
            .collect();
        let results: Vec<Result<Scored>> = stream::iter(futs)
            .buffer_unordered(self.config.fetch.concurrency.max(1))
            .collect()
            .await;

        let mut scored = Vec::with_capacity(results.len());
        let mut failed = 0usize;
        for r in results {
            match r {
                Ok(s) => scored.push(s),
                Err(e) => {
                    failed += 1;
                    metrics::counter!("prioritize_articles_failed_total").increment(1);
                    warn!(error = %e, "article excluded from ranking");
                }
            }
        }
        (scored, failed)
    }

    async fn score_article(&self, record: &ArticleRecord, now_ms: i64) -> Result<Scored> {
        if record.id.trim().is_empty() {
            bail!("article record has no identifier (url={})", record.url);
        }

        let resolved = self.resolver.resolve(record).await;
        let doc = Document::from_text(&resolved.text);
        let cx = ScoreContext {
            config: &self.config,
            now_ms,
        };
        let component_scores = analysis::run_scorers(&self.scorers, &doc, record, &cx);
        let priority_score = aggregate(&component_scores, &self.config.weights);

        Ok(Scored {
            article: PrioritizedArticle {
                id: record.id.clone(),
                title: record.title.clone(),
                url: record.url.clone(),
                word_count: record.word_count,
                priority_score,
                component_scores,
            },
            saved_at: record.saved_at,
            provenance: resolved.provenance,
        })
    }
}

fn sort_ranked(scored: &mut [Scored]) {
    scored.sort_by(|a, b| {
        b.article
            .priority_score
            .total_cmp(&a.article.priority_score)
            .then_with(|| b.saved_at.cmp(&a.saved_at))
            .then_with(|| a.article.id.cmp(&b.article.id))
    });
}

/// Explicit, seedable batch sampling. Unseeded runs draw from OS entropy;
/// seeded runs are fully reproducible. Selection keeps the records' original
/// relative order.
pub fn sample_records(
    records: Vec<ArticleRecord>,
    size: usize,
    seed: Option<u64>,
) -> Vec<ArticleRecord> {
    if records.len() <= size {
        return records;
    }
    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    let mut picked: Vec<usize> = rand::seq::index::sample(&mut rng, records.len(), size).into_vec();
    picked.sort_unstable();

    let mut keep = vec![false; records.len()];
    for i in picked {
        keep[i] = true;
    }
    records
        .into_iter()
        .zip(keep)
        .filter_map(|(r, k)| k.then_some(r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str) -> ArticleRecord {
        ArticleRecord {
            id: id.into(),
            saved_at: 1,
            ..Default::default()
        }
    }

    #[test]
    fn seeded_sampling_is_deterministic_and_order_preserving() {
        let records: Vec<ArticleRecord> = (0..50).map(|i| rec(&format!("a{i:02}"))).collect();
        let a = sample_records(records.clone(), 10, Some(7));
        let b = sample_records(records.clone(), 10, Some(7));
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);

        let mut ids: Vec<&str> = a.iter().map(|r| r.id.as_str()).collect();
        let sorted = {
            let mut v = ids.clone();
            v.sort();
            v
        };
        ids.sort();
        assert_eq!(ids, sorted);

        let c = sample_records(records, 10, Some(8));
        assert_ne!(a, c, "different seeds should draw different samples");
    }

    #[test]
    fn sampling_smaller_input_returns_everything() {
        let records: Vec<ArticleRecord> = (0..3).map(|i| rec(&format!("a{i}"))).collect();
        let out = sample_records(records.clone(), 10, Some(1));
        assert_eq!(out, records);
    }

    #[test]
    fn tie_break_is_saved_at_desc_then_id_asc() {
        let mk = |id: &str, saved_at: i64, score: f64| Scored {
            article: PrioritizedArticle {
                id: id.into(),
                title: String::new(),
                url: String::new(),
                word_count: 0,
                priority_score: score,
                component_scores: crate::types::ComponentScores::floor(),
            },
            saved_at,
            provenance: Provenance::None,
        };
        let mut v = vec![
            mk("b", 100, 50.0),
            mk("a", 100, 50.0),
            mk("c", 200, 50.0),
            mk("d", 0, 60.0),
        ];
        sort_ranked(&mut v);
        let ids: Vec<&str> = v.iter().map(|s| s.article.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "c", "a", "b"]);
    }
}
