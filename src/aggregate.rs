// src/aggregate.rs
//! Priority aggregation: a fixed-weight linear combination of the six
//! component scores, scaled ×10.
//!
//! Components are bounded below by 1, so with weights summing to 1.0 the
//! composite lives in [10,100]. That floor is preserved (not renormalized):
//! renormalizing would break the documented `priority == 10 × weighted sum`
//! identity the dashboard relies on.

use crate::config::ComponentWeights;
use crate::types::ComponentScores;

/// Deterministic weighted composite. No hidden state; same inputs, same output.
pub fn aggregate(scores: &ComponentScores, w: &ComponentWeights) -> f64 {
    let weighted = scores.quality * w.quality
        + scores.info_density * w.info_density
        + scores.readability * w.readability
        + scores.topic_relevance * w.topic_relevance
        + scores.freshness * w.freshness
        + scores.engagement * w.engagement;
    10.0 * weighted
}
