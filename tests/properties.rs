// SPDX-License-Identifier: MIT
// Property tests for the q-gram merge, the distances and the modifiers.

use std::num::NonZeroUsize;

use proptest::prelude::*;
use qfuzz::{
    compare, count_pairs, evaluate, Cosine, Jaccard, Partial, QGram, QGrams, RatcliffObershelp,
    Similarity, TokenMax, TokenSet, TokenSort,
};

fn words() -> impl Strategy<Value = String> {
    "[abcé ]{0,16}"
}

proptest! {
    #[test]
    fn qgram_count_law(s in "[a-c]{0,12}", q in 1usize..6) {
        let units: Vec<char> = s.chars().collect();
        let grams = QGrams::new(&units[..], NonZeroUsize::new(q).unwrap());
        let full = (units.len() + 1).saturating_sub(q);
        prop_assert_eq!(grams.len(), full);
        prop_assert_eq!(grams.iter().count(), full.max(1));
        // the view is restartable
        prop_assert_eq!(grams.iter().count(), grams.iter().count());
    }

    #[test]
    fn merge_accounts_for_every_element(
        mut a in prop::collection::vec(0u8..6, 0..24),
        mut b in prop::collection::vec(0u8..6, 0..24),
    ) {
        a.sort_unstable();
        b.sort_unstable();
        let pairs: Vec<(usize, usize)> = count_pairs(&a[..], &b[..]).collect();

        prop_assert_eq!(pairs.iter().map(|p| p.0).sum::<usize>(), a.len());
        prop_assert_eq!(pairs.iter().map(|p| p.1).sum::<usize>(), b.len());
        prop_assert!(pairs.iter().all(|&p| p != (0, 0)));

        let mut distinct: Vec<u8> = a.iter().chain(&b).copied().collect();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(pairs.len(), distinct.len());
    }

    #[test]
    fn distances_vanish_on_identity(s in words(), q in 1usize..4) {
        prop_assert_eq!(evaluate(&QGram::new(q).unwrap(), &s, &s), 0);
        prop_assert_eq!(evaluate(&Cosine::new(q).unwrap(), &s, &s), 0.0);
        prop_assert_eq!(evaluate(&Jaccard::new(q).unwrap(), &s, &s), 0.0);
    }

    #[test]
    fn distances_are_symmetric(s1 in words(), s2 in words(), q in 1usize..4) {
        let qgram = QGram::new(q).unwrap();
        let cosine = Cosine::new(q).unwrap();
        let jaccard = Jaccard::new(q).unwrap();
        prop_assert_eq!(evaluate(&qgram, &s1, &s2), evaluate(&qgram, &s2, &s1));
        prop_assert!((evaluate(&cosine, &s1, &s2) - evaluate(&cosine, &s2, &s1)).abs() < 1e-12);
        prop_assert!((evaluate(&jaccard, &s1, &s2) - evaluate(&jaccard, &s2, &s1)).abs() < 1e-12);
    }

    #[test]
    fn normalized_distances_stay_in_unit_range(s1 in words(), s2 in words(), q in 1usize..4) {
        let cosine = evaluate(&Cosine::new(q).unwrap(), &s1, &s2);
        let jaccard = evaluate(&Jaccard::new(q).unwrap(), &s1, &s2);
        for d in [cosine, jaccard] {
            prop_assert!((0.0..=1.0).contains(&d), "distance {} out of range", d);
        }
    }

    #[test]
    fn modifier_scores_stay_in_unit_range(s1 in words(), s2 in words()) {
        let ro = RatcliffObershelp;
        let jaccard = Jaccard::new(2).unwrap();
        let scores = [
            compare(&Partial::new(ro), &s1, &s2),
            compare(&Partial::new(jaccard), &s1, &s2),
            compare(&TokenSort::new(ro), &s1, &s2),
            compare(&TokenSet::new(ro), &s1, &s2),
            compare(&TokenSet::new(jaccard), &s1, &s2),
            compare(&TokenMax::new(ro), &s1, &s2),
            compare(&TokenMax::new(jaccard), &s1, &s2),
        ];
        for score in scores {
            prop_assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
        }
    }

    #[test]
    fn token_max_is_at_least_plain(s1 in words(), s2 in words()) {
        let (short, long) = if s1.chars().count() <= s2.chars().count() {
            (&s1, &s2)
        } else {
            (&s2, &s1)
        };
        let ro = RatcliffObershelp;
        prop_assert!(compare(&TokenMax::new(ro), &s1, &s2) >= compare(&ro, short, long));
    }

    #[test]
    fn partial_fast_path_matches_sliding_on_substrings(
        long in "[abc]{4,14}",
        start in 0usize..4,
        width in 1usize..4,
    ) {
        let units: Vec<u8> = long.bytes().collect();
        let start = start.min(units.len() - 1);
        let end = (start + width).min(units.len());
        let short = &units[start..end];

        // a verbatim occurrence scores 1.0 on both paths
        let ro = RatcliffObershelp;
        prop_assert_eq!(ro.compare_partial(short, &units[..]), 1.0);
        prop_assert_eq!(Partial::new(ro).compare(short, &units[..]), 1.0);
    }
}
