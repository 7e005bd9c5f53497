//! Hybrid result fusion.
//!
//! Merges the vector and keyword branches into one ranked list, keyed by
//! creator id. A creator present in both branches gets the average of its
//! two scores (averaged, not summed, so the scale stays bounded) and the
//! `Hybrid` tag. Vector-only scores are boosted before merging (vector
//! relevance is trusted more than keyword rank) and clamped back into
//! [0, 1]. The merge is commutative in its score inputs: reordering either
//! branch never changes a creator's combined score.

use std::collections::HashMap;

use crate::storage::CreatorRecord;

use super::{MatchSource, MergedResult, SearchMatch};

/// Merge the two hybrid branches into a ranked, deduplicated list.
pub fn merge_results(
    vector: &[SearchMatch],
    keyword: &[SearchMatch],
    vector_boost: f32,
) -> Vec<MergedResult> {
    // Insertion order is tracked separately so ranking stays deterministic
    // regardless of map iteration order.
    let mut order: Vec<String> = Vec::new();
    let mut scores: HashMap<String, (Option<f32>, Option<f32>)> = HashMap::new();

    for m in vector {
        let slot = scores.entry(m.creator_id.clone()).or_insert_with(|| {
            order.push(m.creator_id.clone());
            (None, None)
        });
        // Duplicate ids within one branch keep their best score.
        slot.0 = Some(slot.0.map_or(m.score, |s| s.max(m.score)));
    }
    for m in keyword {
        let slot = scores.entry(m.creator_id.clone()).or_insert_with(|| {
            order.push(m.creator_id.clone());
            (None, None)
        });
        slot.1 = Some(slot.1.map_or(m.score, |s| s.max(m.score)));
    }

    let mut merged: Vec<MergedResult> = order
        .into_iter()
        .map(|creator_id| {
            let (vector_score, keyword_score) = scores[&creator_id];
            let (combined_score, source) = match (vector_score, keyword_score) {
                (Some(v), Some(k)) => ((v + k) / 2.0, MatchSource::Hybrid),
                (Some(v), None) => ((v * vector_boost).min(1.0), MatchSource::Vector),
                (None, Some(k)) => (k, MatchSource::Keyword),
                (None, None) => unreachable!("entry without any score"),
            };
            MergedResult {
                creator_id,
                combined_score,
                source,
                vector_score,
                keyword_score,
            }
        })
        .collect();

    merged.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    merged
}

/// Score relational keyword hits by reciprocal rank: position `i` in the
/// relevance-ordered row list maps to `1 / (1 + i)`, keeping keyword
/// scores in (0, 1] on the same scale as vector similarities.
pub fn keyword_matches(records: &[CreatorRecord]) -> Vec<SearchMatch> {
    records
        .iter()
        .enumerate()
        .map(|(rank, record)| SearchMatch {
            creator_id: record.id.clone(),
            score: 1.0 / (1.0 + rank as f32),
            metadata: None,
        })
        .collect()
}
