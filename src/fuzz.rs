// SPDX-License-Identifier: MIT
// Fuzz modifiers: Partial, TokenSort, TokenSet and TokenMax.
// Each wraps another similarity and is itself a similarity, so they nest.

use std::borrow::Cow;

use tracing::trace;

use crate::distance::Similarity;
use crate::types::HashableChar;
use crate::utils::{join, Tokenizer};

const UNBASE_SCALE: f64 = 0.95;
const PARTIAL_SCALE: f64 = 0.9;
const PARTIAL_SCALE_FAR: f64 = 0.6;
const PARTIAL_LEN_RATIO: f64 = 1.5;
const FAR_LEN_RATIO: usize = 8;

/// Shorter sequence first; on equal lengths the order is kept.
#[inline]
fn reorder<'a, T>(s1: &'a [T], s2: &'a [T]) -> (&'a [T], &'a [T]) {
    if s1.len() <= s2.len() {
        (s1, s2)
    } else {
        (s2, s1)
    }
}

// ===========================================================================
// Partial
// ===========================================================================

/// Scores the shorter input against its best-aligned window of the longer one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Partial<M> {
    inner: M,
}

impl<M: Similarity> Partial<M> {
    pub fn new(inner: M) -> Self {
        Partial { inner }
    }
}

impl<M: Similarity> Similarity for Partial<M> {
    fn compare<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> f64 {
        let (shorter, longer) = reorder(s1, s2);
        if shorter.len() == longer.len() {
            return self.inner.compare(s1, s2);
        }
        if shorter.is_empty() {
            return self.inner.compare::<T>(&[], &[]);
        }
        self.inner.compare_partial(shorter, longer)
    }
}

// ===========================================================================
// TokenSort
// ===========================================================================

/// Tokens sorted and re-joined with single spaces. Input without any
/// delimiter is returned untouched.
pub fn sort_tokens<'a, T: HashableChar>(tokenizer: &Tokenizer, s: &'a [T]) -> Cow<'a, [T]> {
    if !tokenizer.contains_delimiter(s) {
        return Cow::Borrowed(s);
    }
    let mut tokens = tokenizer.split(s);
    tokens.sort_unstable();
    Cow::Owned(join(&tokens))
}

/// Compares the inputs after sorting their tokens, which makes the score
/// insensitive to word order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenSort<M> {
    inner: M,
    tokenizer: Tokenizer,
}

impl<M: Similarity> TokenSort<M> {
    pub fn new(inner: M) -> Self {
        TokenSort { inner, tokenizer: Tokenizer::default() }
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }
}

fn token_sort_compare<M: Similarity, T: HashableChar>(
    inner: &M,
    tokenizer: &Tokenizer,
    s1: &[T],
    s2: &[T],
) -> f64 {
    let sorted1 = sort_tokens(tokenizer, s1);
    let sorted2 = sort_tokens(tokenizer, s2);
    inner.compare(&*sorted1, &*sorted2)
}

impl<M: Similarity> Similarity for TokenSort<M> {
    fn compare<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> f64 {
        token_sort_compare(&self.inner, &self.tokenizer, s1, s2)
    }
}

// ===========================================================================
// TokenSet
// ===========================================================================

/// Tokens of two inputs split into what they share and what is left over.
///
/// Multiset semantics: a token occurring twice on the left and once on the
/// right is shared once and left over once on the left. All three lists are
/// sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenPartition<'a, T> {
    pub shared: Vec<&'a [T]>,
    pub only_left: Vec<&'a [T]>,
    pub only_right: Vec<&'a [T]>,
}

impl<'a, T: HashableChar> TokenPartition<'a, T> {
    pub fn new(mut left: Vec<&'a [T]>, mut right: Vec<&'a [T]>) -> Self {
        left.sort_unstable();
        right.sort_unstable();

        let mut taken = vec![false; right.len()];
        let mut shared = Vec::new();
        let mut only_left = Vec::new();
        // right[..from] is either matched or smaller than every remaining left token
        let mut from = 0;
        for token in left {
            let rest = &right[from..];
            let pos = rest.partition_point(|t| *t < token);
            if rest.get(pos) == Some(&token) {
                taken[from + pos] = true;
                shared.push(token);
                from += pos + 1;
            } else {
                only_left.push(token);
                from += pos;
            }
        }
        let only_right = right
            .into_iter()
            .zip(taken)
            .filter_map(|(token, used)| (!used).then_some(token))
            .collect();

        TokenPartition { shared, only_left, only_right }
    }

    pub fn from_seqs(tokenizer: &Tokenizer, s1: &'a [T], s2: &'a [T]) -> Self {
        Self::new(tokenizer.split(s1), tokenizer.split(s2))
    }

    /// `shared` followed by `only_left`, space-joined.
    pub fn combined_left(&self) -> Vec<T> {
        join(&[&self.shared[..], &self.only_left[..]].concat())
    }

    /// `shared` followed by `only_right`, space-joined.
    pub fn combined_right(&self) -> Vec<T> {
        join(&[&self.shared[..], &self.only_right[..]].concat())
    }
}

fn token_set_compare<M: Similarity, T: HashableChar>(
    inner: &M,
    tokenizer: &Tokenizer,
    s1: &[T],
    s2: &[T],
) -> f64 {
    let partition = TokenPartition::from_seqs(tokenizer, s1, s2);
    let combined1 = partition.combined_left();
    let combined2 = partition.combined_right();
    // an empty base would match the empty prefix of anything
    if partition.shared.is_empty() {
        return inner.compare(&combined1[..], &combined2[..]);
    }
    let base = join(&partition.shared);
    inner
        .compare(&base[..], &combined1[..])
        .max(inner.compare(&combined1[..], &combined2[..]))
        .max(inner.compare(&base[..], &combined2[..]))
}

/// Best score among the shared tokens and each side's full token set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenSet<M> {
    inner: M,
    tokenizer: Tokenizer,
}

impl<M: Similarity> TokenSet<M> {
    pub fn new(inner: M) -> Self {
        TokenSet { inner, tokenizer: Tokenizer::default() }
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }
}

impl<M: Similarity> Similarity for TokenSet<M> {
    fn compare<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> f64 {
        token_set_compare(&self.inner, &self.tokenizer, s1, s2)
    }
}

// ===========================================================================
// TokenMax
// ===========================================================================

/// Maximum of the plain score and scaled token-sort / token-set scores.
///
/// When one input is at least 1.5 times longer than the other, the partial
/// variants are used and scaled by 0.9, or by 0.6 beyond 8 times. Token
/// scores are further scaled by 0.95. Inputs are ordered shorter first, so the
/// score only depends on argument order when both lengths are equal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenMax<M> {
    inner: M,
    tokenizer: Tokenizer,
}

impl<M: Similarity> TokenMax<M> {
    pub fn new(inner: M) -> Self {
        TokenMax { inner, tokenizer: Tokenizer::default() }
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }
}

impl<M: Similarity> Similarity for TokenMax<M> {
    fn compare<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> f64 {
        let (s1, s2) = reorder(s1, s2);
        let base = self.inner.compare(s1, s2);
        let (len1, len2) = (s1.len(), s2.len());

        if len2 as f64 >= PARTIAL_LEN_RATIO * len1 as f64 {
            let partial_scale =
                if len2 > FAR_LEN_RATIO * len1 { PARTIAL_SCALE_FAR } else { PARTIAL_SCALE };
            trace!(len1, len2, partial_scale, "token max: partial branch");
            let partial = Partial::new(&self.inner);
            let pratio = partial.compare(s1, s2);
            let ptsor = token_sort_compare(&partial, &self.tokenizer, s1, s2);
            let ptser = token_set_compare(&partial, &self.tokenizer, s1, s2);
            base.max(pratio * partial_scale)
                .max(ptsor * UNBASE_SCALE * partial_scale)
                .max(ptser * UNBASE_SCALE * partial_scale)
        } else {
            trace!(len1, len2, "token max: full-length branch");
            let tsor = token_sort_compare(&self.inner, &self.tokenizer, s1, s2);
            let tser = token_set_compare(&self.inner, &self.tokenizer, s1, s2);
            base.max(tsor * UNBASE_SCALE).max(tser * UNBASE_SCALE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::RatcliffObershelp;
    use crate::distance::metrics::{Jaccard, QGram};
    use crate::distance::qgram::QGrams;
    use std::num::NonZeroUsize;

    const EPS: f64 = 1e-12;
    const RO: RatcliffObershelp = RatcliffObershelp;

    #[test]
    fn test_partial_finds_verbatim_window() {
        assert_eq!(Partial::new(RO).compare(b"abc", b"xxabcxx"), 1.0);
        assert_eq!(Partial::new(QGram::new(2).unwrap()).compare(b"abc", b"xxabcxx"), 1.0);
    }

    #[test]
    fn test_partial_is_max_over_windows() {
        let metric = Jaccard::new(1).unwrap();
        let (short, long): (&[u8], &[u8]) = (b"abz", b"xxabcxx");
        let expected = QGrams::new(long, NonZeroUsize::new(short.len()).unwrap())
            .iter()
            .map(|w| metric.compare(short, w))
            .fold(0.0, f64::max);
        assert!((Partial::new(metric).compare(short, long) - expected).abs() < EPS);
        assert!((expected - 0.5).abs() < EPS);
    }

    #[test]
    fn test_partial_equal_lengths_delegates() {
        let p = Partial::new(RO);
        assert_eq!(p.compare(b"abcd", b"abdc"), RO.compare(b"abcd", b"abdc"));
    }

    #[test]
    fn test_partial_empty_shorter() {
        assert_eq!(Partial::new(RO).compare(b"", b"abc"), 1.0);
        assert_eq!(Partial::new(RO).compare(b"", b""), 1.0);
    }

    #[test]
    fn test_partial_symmetric() {
        let p = Partial::new(RO);
        assert_eq!(p.compare(b"hello", b"say hello world"), p.compare(b"say hello world", b"hello"));
    }

    #[test]
    fn test_sort_tokens() {
        let t = Tokenizer::default();
        assert!(matches!(sort_tokens(&t, b"abc"), Cow::Borrowed(_)));
        assert_eq!(&*sort_tokens(&t, b"  was a  bear"), &b"a bear was"[..]);
    }

    #[test]
    fn test_token_sort_ignores_order() {
        let ts = TokenSort::new(RO);
        assert_eq!(ts.compare(b"fuzzy wuzzy was a bear", b"wuzzy fuzzy was a bear"), 1.0);
        assert!(RO.compare(b"fuzzy wuzzy was a bear", b"wuzzy fuzzy was a bear") < 1.0);
    }

    #[test]
    fn test_token_sort_custom_tokenizer() {
        let ts = TokenSort::new(RO).with_tokenizer(Tokenizer::with_delimiters([',']));
        assert_eq!(ts.compare(b"b,a", b"a,b"), 1.0);
    }

    #[test]
    fn test_token_partition_multiset() {
        let t = Tokenizer::default();
        let p = TokenPartition::from_seqs(&t, b"b a a", b"c b a b");
        assert_eq!(p.shared, vec![&b"a"[..], b"b"]);
        assert_eq!(p.only_left, vec![&b"a"[..]]);
        assert_eq!(p.only_right, vec![&b"b"[..], b"c"]);
        assert_eq!(p.combined_left(), b"a b a".to_vec());
        assert_eq!(p.combined_right(), b"a b b c".to_vec());
    }

    #[test]
    fn test_token_partition_disjoint() {
        let t = Tokenizer::default();
        let p = TokenPartition::from_seqs(&t, b"x y", b"a b");
        assert!(p.shared.is_empty());
        assert_eq!(p.only_left.len(), 2);
        assert_eq!(p.only_right.len(), 2);
    }

    #[test]
    fn test_token_set_reordered_is_perfect() {
        let s1 = b"fuzzy wuzzy was a bear";
        let s2 = b"wuzzy fuzzy was a bear";
        let score = TokenSet::new(RO).compare(s1, s2);
        assert_eq!(score, 1.0);
        assert!(score >= RO.compare(s1, s2));
    }

    #[test]
    fn test_token_set_subset_scores_high() {
        // shared "new york" against the left side's full set is exact
        assert_eq!(TokenSet::new(RO).compare(b"new york", b"new york mets"), 1.0);
    }

    #[test]
    fn test_token_set_without_shared_tokens() {
        let ts = TokenSet::new(RO);
        assert_eq!(ts.compare(b"abc", b"xyz"), 0.0);
        // no shared tokens: never the spurious 1.0 an empty base would give
        assert_eq!(ts.compare(b"", b"abc"), 0.0);
    }

    #[test]
    fn test_token_max_comparable_lengths() {
        let tm = TokenMax::new(RO);
        let score = tm.compare(b"new york mets", b"mets new york");
        assert!((score - 0.95).abs() < EPS);
        assert!(RO.compare(b"new york mets", b"mets new york") < 0.95);
    }

    #[test]
    fn test_token_max_partial_branch() {
        let tm = TokenMax::new(RO);
        // 13 >= 1.5 * 4 and 13 <= 8 * 4
        let score = tm.compare(b"york", b"new york mets");
        assert!((score - 0.9).abs() < EPS);
    }

    #[test]
    fn test_token_max_far_partial_branch() {
        let tm = TokenMax::new(RO);
        // 17 > 8 * 2
        let score = tm.compare(b"ab", b"xxxxxxxxabxxxxxxx");
        assert!((score - 0.6).abs() < EPS);
    }

    #[test]
    fn test_token_max_symmetric() {
        let tm = TokenMax::new(RO);
        assert_eq!(tm.compare(b"york", b"new york mets"), tm.compare(b"new york mets", b"york"));
    }

    #[test]
    fn test_token_max_empty_shorter_takes_far_partial_branch() {
        // partial on an empty input compares "" with "", scaled by 0.6
        let metric = Jaccard::new(2).unwrap();
        let (s1, s2): (&[u8], &[u8]) = (b"", b"abc");
        let base = metric.compare(s1, s2);
        let partial = Partial::new(metric).compare(s1, s2);
        assert_eq!(base, 0.0);
        assert_eq!(partial, 1.0);
        let expected = base.max(partial * 0.6).max(partial * 0.95 * 0.6);
        assert!((TokenMax::new(metric).compare(s1, s2) - expected).abs() < EPS);
        assert!((TokenMax::new(metric).compare(s2, s1) - 0.6).abs() < EPS);
        assert!((TokenMax::new(RO).compare(b"", b"abc") - 0.6).abs() < EPS);
        assert_eq!(TokenMax::new(RO).compare(b"", b""), 1.0);
    }

    #[test]
    fn test_modifiers_nest() {
        let nested = TokenSort::new(Partial::new(RO));
        assert_eq!(nested.compare(b"york new", b"new york mets"), 1.0);
    }
}
