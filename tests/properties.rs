//! Property tests for the fusion and scoring invariants.

use proptest::collection::vec;
use proptest::prelude::*;

use scout::scoring;
use scout::search::fusion::merge_results;
use scout::search::{EnrichedResult, MatchSource, SearchMatch};
use scout::test_utils::creator;

fn search_match() -> impl Strategy<Value = SearchMatch> {
    ("[a-f]", 0.0f32..=1.0).prop_map(|(id, score)| SearchMatch {
        creator_id: id,
        score,
        metadata: None,
    })
}

fn enriched(
    similarity: f32,
    engagement: f64,
    followers: u64,
    satisfaction: f64,
    collaborations: u32,
) -> EnrichedResult {
    let mut record = creator("p", "Prop", "education", "youtube", followers, engagement);
    record.satisfaction = satisfaction;
    record.collaborations = collaborations;
    EnrichedResult {
        creator: record,
        combined_score: similarity,
        source: MatchSource::Hybrid,
    }
}

proptest! {
    /// Reordering either branch never changes a creator's combined score.
    #[test]
    fn merge_is_commutative_under_reordering(
        vector in vec(search_match(), 0..12),
        keyword in vec(search_match(), 0..12),
        boost in 1.0f32..=1.5,
    ) {
        let mut vector_rev = vector.clone();
        vector_rev.reverse();
        let mut keyword_rev = keyword.clone();
        keyword_rev.reverse();

        let forward = merge_results(&vector, &keyword, boost);
        let reversed = merge_results(&vector_rev, &keyword_rev, boost);

        prop_assert_eq!(forward.len(), reversed.len());
        for result in &forward {
            let twin = reversed
                .iter()
                .find(|r| r.creator_id == result.creator_id)
                .expect("same creator set");
            prop_assert!((result.combined_score - twin.combined_score).abs() < 1e-6);
        }
    }

    /// Merged scores stay in [0, 1] and each creator id appears once.
    #[test]
    fn merge_bounds_and_uniqueness(
        vector in vec(search_match(), 0..12),
        keyword in vec(search_match(), 0..12),
        boost in 1.0f32..=1.5,
    ) {
        let merged = merge_results(&vector, &keyword, boost);

        let mut ids: Vec<&str> = merged.iter().map(|r| r.creator_id.as_str()).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        prop_assert_eq!(before, ids.len());

        for result in &merged {
            prop_assert!(result.combined_score >= 0.0);
            prop_assert!(result.combined_score <= 1.0);
        }
    }

    /// Merged output is sorted by combined score, descending.
    #[test]
    fn merge_sorted_descending(
        vector in vec(search_match(), 0..12),
        keyword in vec(search_match(), 0..12),
    ) {
        let merged = merge_results(&vector, &keyword, 1.2);
        for pair in merged.windows(2) {
            prop_assert!(pair[0].combined_score >= pair[1].combined_score);
        }
    }

    /// The rubric total is always inside [0, 100] and matches its own
    /// breakdown.
    #[test]
    fn scorer_total_bounded(
        similarity in 0.0f32..=1.0,
        engagement in 0.0f64..=50.0,
        followers in 0u64..=10_000_000,
        satisfaction in 0.0f64..=5.0,
        collaborations in 0u32..=500,
    ) {
        let scored = scoring::score(&enriched(
            similarity,
            engagement,
            followers,
            satisfaction,
            collaborations,
        ));

        prop_assert!(scored.total_score >= 0.0);
        prop_assert!(scored.total_score <= 100.0);

        let sum = scored.breakdown.similarity
            + scored.breakdown.engagement
            + scored.breakdown.followers
            + scored.breakdown.satisfaction
            + scored.breakdown.experience;
        prop_assert!((scored.total_score - sum.clamp(0.0, 100.0)).abs() < 1e-9);
    }

    /// More of any one component never lowers the total.
    #[test]
    fn scorer_monotone_in_followers(
        base in 0u64..=1_000_000,
        extra in 0u64..=1_000_000,
    ) {
        let lower = scoring::score(&enriched(0.5, 4.0, base, 3.0, 10));
        let higher = scoring::score(&enriched(0.5, 4.0, base + extra, 3.0, 10));
        prop_assert!(higher.total_score >= lower.total_score);
    }
}
