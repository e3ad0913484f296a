// src/resolver.rs
//! Content Resolver: obtains analyzable text for an article.
//!
//! Attempt order, stopping at the first success:
//! 1. fetch `source_url` and extract main body prose,
//! 2. the record's stored `content`,
//! 3. the record's `summary`,
//! 4. empty text with provenance `none`.
//!
//! Network errors, non-2xx responses, and thin extractions are soft failures
//! that trigger fallback; they are never fatal for the batch. Resolutions are
//! cached per article id and invalidated when `source_url` or `updated_at`
//! changes.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::config::FetchCfg;
use crate::types::{ArticleRecord, Provenance, ResolvedContent};

/// Fetches raw page bodies. Seam for tests and alternative transports.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// reqwest-backed fetcher with a per-request timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("readrank/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow!("fetch {url}: status {}", resp.status()));
        }
        Ok(resp.text().await?)
    }
}

#[derive(Clone)]
struct CacheEntry {
    source_url: Option<String>,
    updated_at: i64,
    resolved: ResolvedContent,
}

pub struct ContentResolver {
    fetcher: Arc<dyn ContentFetcher>,
    cache: RwLock<HashMap<String, CacheEntry>>,
    cfg: FetchCfg,
}

impl ContentResolver {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, cfg: FetchCfg) -> Self {
        Self {
            fetcher,
            cache: RwLock::new(HashMap::new()),
            cfg,
        }
    }

    /// Resolve analyzable text for one record. Infallible by design: every
    /// failure mode degrades to the next fallback.
    pub async fn resolve(&self, record: &ArticleRecord) -> ResolvedContent {
        if let Some(hit) = self.cache_lookup(record) {
            debug!(article = %record.id, "content cache hit");
            return hit;
        }

        let resolved = self.resolve_uncached(record).await;
        self.cache_store(record, resolved.clone());
        resolved
    }

    async fn resolve_uncached(&self, record: &ArticleRecord) -> ResolvedContent {
        if let Some(url) = record.source_url.as_deref() {
            match self.fetcher.fetch(url).await {
                Ok(html) => {
                    let text = extract_body_text(&html);
                    if text.trim().chars().count() >= self.cfg.min_viable_chars {
                        return ResolvedContent {
                            text,
                            provenance: Provenance::Fetched,
                        };
                    }
                    debug!(article = %record.id, "fetched page too thin, falling back");
                }
                Err(e) => {
                    metrics::counter!("resolver_fetch_failures_total").increment(1);
                    warn!(article = %record.id, error = %e, "content fetch failed, falling back");
                }
            }
        }

        if let Some(content) = non_empty(record.content.as_deref()) {
            return ResolvedContent {
                text: normalize_stored_text(content),
                provenance: Provenance::StoredContent,
            };
        }
        if let Some(summary) = non_empty(record.summary.as_deref()) {
            return ResolvedContent {
                text: normalize_stored_text(summary),
                provenance: Provenance::Summary,
            };
        }
        ResolvedContent::empty()
    }

    fn cache_lookup(&self, record: &ArticleRecord) -> Option<ResolvedContent> {
        let cache = self.cache.read().ok()?;
        let entry = cache.get(&record.id)?;
        if entry.source_url.as_deref() == record.source_url.as_deref()
            && entry.updated_at == record.updated_at
        {
            Some(entry.resolved.clone())
        } else {
            None
        }
    }

    fn cache_store(&self, record: &ArticleRecord, resolved: ResolvedContent) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(
                record.id.clone(),
                CacheEntry {
                    source_url: record.source_url.clone(),
                    updated_at: record.updated_at,
                    resolved,
                },
            );
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|t| !t.is_empty())
}

/// Extract main body prose from an HTML page: prefer paragraphs inside
/// `<article>` or `<main>`, fall back to all paragraphs. Navigation, scripts,
/// and other boilerplate never live in `<p>` content we keep.
pub fn extract_body_text(html: &str) -> String {
    static SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
        ["article p", "main p", "p"]
            .iter()
            .map(|s| Selector::parse(s).expect("static selector"))
            .collect()
    });

    let doc = Html::parse_document(html);
    for sel in SELECTORS.iter() {
        let paragraphs: Vec<String> = doc
            .select(sel)
            .map(|el| collapse_spaces(&el.text().collect::<String>()))
            .filter(|p| p.split_whitespace().count() >= 4)
            .collect();
        if !paragraphs.is_empty() {
            return paragraphs.join("\n");
        }
    }
    String::new()
}

/// Normalize stored content/summaries: decode entities, strip stray tags,
/// collapse horizontal whitespace while keeping paragraph breaks.
pub fn normalize_stored_text(s: &str) -> String {
    static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));

    let decoded = html_escape::decode_html_entities(s);
    let stripped = RE_TAGS.replace_all(&decoded, " ");
    stripped
        .lines()
        .map(collapse_spaces)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubFetcher {
        body: Option<String>,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        fn ok(body: &str) -> Self {
            Self {
                body: Some(body.to_string()),
                calls: AtomicUsize::new(0),
            }
        }
        fn failing() -> Self {
            Self {
                body: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ContentFetcher for StubFetcher {
        async fn fetch(&self, _url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.body
                .clone()
                .ok_or_else(|| anyhow!("connection refused"))
        }
    }

    fn record() -> ArticleRecord {
        ArticleRecord {
            id: "r1".into(),
            url: "https://ex.org/a".into(),
            title: "t".into(),
            saved_at: 1,
            updated_at: 1,
            source_url: Some("https://ex.org/a".into()),
            content: None,
            summary: Some("A short summary of the article.".into()),
            ..Default::default()
        }
    }

    fn article_html() -> String {
        let para = "This paragraph carries enough prose to clear the minimum viable length \
                    gate used by the resolver during extraction checks."
            .to_string();
        format!(
            "<html><nav><p>home about contact links menu</p></nav>\
             <article><p>{para}</p><p>{para}</p></article></html>"
        )
    }

    #[tokio::test]
    async fn fetched_content_wins_when_viable() {
        let resolver = ContentResolver::new(
            Arc::new(StubFetcher::ok(&article_html())),
            FetchCfg::default(),
        );
        let r = resolver.resolve(&record()).await;
        assert_eq!(r.provenance, Provenance::Fetched);
        assert!(r.text.contains("minimum viable length"));
        // nav boilerplate was dropped by the article-scoped selector
        assert!(!r.text.contains("home about"));
    }

    #[tokio::test]
    async fn unreachable_url_falls_back_to_summary() {
        let resolver =
            ContentResolver::new(Arc::new(StubFetcher::failing()), FetchCfg::default());
        let r = resolver.resolve(&record()).await;
        assert_eq!(r.provenance, Provenance::Summary);
        assert_eq!(r.text, "A short summary of the article.");
    }

    #[tokio::test]
    async fn thin_extraction_falls_back_to_stored_content() {
        let mut rec = record();
        rec.content = Some("Stored body text, good enough to analyze.".into());
        let resolver = ContentResolver::new(
            Arc::new(StubFetcher::ok("<p>too little prose here honestly</p>")),
            FetchCfg::default(),
        );
        let r = resolver.resolve(&rec).await;
        assert_eq!(r.provenance, Provenance::StoredContent);
    }

    #[tokio::test]
    async fn nothing_available_resolves_to_none() {
        let mut rec = record();
        rec.source_url = None;
        rec.summary = None;
        let resolver =
            ContentResolver::new(Arc::new(StubFetcher::failing()), FetchCfg::default());
        let r = resolver.resolve(&rec).await;
        assert_eq!(r.provenance, Provenance::None);
        assert!(r.is_empty());
    }

    #[tokio::test]
    async fn cache_skips_refetch_until_record_changes() {
        let fetcher = Arc::new(StubFetcher::ok(&article_html()));
        let resolver = ContentResolver::new(fetcher.clone(), FetchCfg::default());
        let rec = record();

        resolver.resolve(&rec).await;
        resolver.resolve(&rec).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

        let mut updated = rec.clone();
        updated.updated_at = 2;
        resolver.resolve(&updated).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn stored_text_normalization_strips_tags_and_entities() {
        let out = normalize_stored_text("<p>Ben &amp; Jerry</p>\n<div>  spaced   out </div>");
        assert_eq!(out, "Ben & Jerry\nspaced out");
    }
}
