// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregate;
pub mod api;
pub mod archive;
pub mod config;
pub mod metrics;
pub mod rank;
pub mod resolver;
pub mod store;
pub mod types;

// Metric extraction pipeline (quality, density, readability, topics,
// freshness, engagement)
pub mod analysis;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::PrioritizerConfig;
pub use crate::rank::{sample_records, Prioritizer};
pub use crate::types::{
    ArchiveReason, ArticleRecord, ComponentScores, PrioritizedArticle, RankingResult,
};
