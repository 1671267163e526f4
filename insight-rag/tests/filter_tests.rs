//! Property tests for noise filtering over the look-ahead window.

use insight_rag::{
    Candidate, CandidateFilter, DEFAULT_NOISE_MARKERS, NoiseFilter, Record, RecordCatalog,
    RecordId, Zone,
};
use proptest::prelude::*;

/// Build a ranked list and its catalog; `noise[i]` marks candidate `i` as boilerplate.
fn fixture(noise: &[bool]) -> (Vec<Candidate>, RecordCatalog) {
    let candidates = noise
        .iter()
        .enumerate()
        .map(|(i, _)| Candidate {
            id: RecordId::from(i as u64),
            score: 1.0 - i as f32 / 100.0,
            position: i,
        })
        .collect();
    let records = noise.iter().enumerate().map(|(i, is_noise)| {
        let text = if *is_noise {
            format!("Copyright {i} the authors")
        } else {
            format!("clinical staffing report {i}")
        };
        Record::new(i as u64, text, Zone::A)
    });
    (candidates, RecordCatalog::new(records))
}

fn default_filter(lookahead: usize) -> CandidateFilter {
    CandidateFilter::new(NoiseFilter::new(DEFAULT_NOISE_MARKERS), lookahead)
}

/// **Noise rejection**
/// *For any* ranked list, no accepted hit SHALL contain a noise marker, and
/// the number accepted SHALL equal the clean candidates in the window, capped
/// at `top_k`.
mod prop_noise_rejection {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn accepted_hits_are_clean_and_counted_exactly(
            noise in proptest::collection::vec(any::<bool>(), 0..40),
            top_k in 1usize..10,
            lookahead in 1usize..30,
        ) {
            let (ranked, catalog) = fixture(&noise);
            let filter = default_filter(lookahead);
            let outcome = filter.filter(&ranked, top_k, &catalog);

            for hit in &outcome.accepted {
                prop_assert!(!filter.noise().is_noise(&hit.record.text));
                prop_assert!(hit.rank <= filter.window(top_k));
            }
            for pair in outcome.accepted.windows(2) {
                prop_assert!(pair[0].rank < pair[1].rank);
            }

            let clean_in_window =
                noise.iter().take(filter.window(top_k)).filter(|is_noise| !**is_noise).count();
            prop_assert_eq!(outcome.accepted.len(), clean_in_window.min(top_k));
            prop_assert!(outcome.unresolved.is_empty());
        }
    }
}

/// **Window monotonicity**
/// *For any* ranked list, widening the look-ahead window SHALL never reduce
/// the number of accepted hits, and the narrower result SHALL be a prefix of
/// the wider one.
mod prop_window_monotonicity {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn wider_window_extends_the_result(
            noise in proptest::collection::vec(any::<bool>(), 0..40),
            top_k in 1usize..10,
            lookahead in 1usize..30,
            extra in 0usize..20,
        ) {
            let (ranked, catalog) = fixture(&noise);
            let narrow = default_filter(lookahead).filter(&ranked, top_k, &catalog);
            let wide = default_filter(lookahead + extra).filter(&ranked, top_k, &catalog);

            prop_assert!(wide.accepted.len() >= narrow.accepted.len());
            prop_assert_eq!(&wide.accepted[..narrow.accepted.len()], &narrow.accepted[..]);
        }
    }
}

#[test]
fn all_noise_window_returns_nothing() {
    let (ranked, catalog) = fixture(&[true; 25]);
    let outcome = default_filter(20).filter(&ranked, 3, &catalog);
    assert!(outcome.accepted.is_empty());
    assert_eq!(outcome.rejected, 20);
    assert_eq!(outcome.examined, 20);
}
