// SPDX-License-Identifier: MIT
// Q-gram distances: QGram (count), Cosine, Jaccard, SorensenDice, Overlap.
// Every one of them folds the pair-count stream of two sorted q-gram lists.

use std::num::NonZeroUsize;

use crate::distance::qgram::{count_pairs, QGrams};
use crate::distance::{Distance, Similarity};
use crate::error::{Error, Result};
use crate::types::HashableChar;

fn checked_q(q: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(q).ok_or(Error::InvalidQ(q))
}

/// Folds `f` over the `(c1, c2)` stream of the q-gram multisets of `s1` and `s2`.
fn fold_counts<T, A>(
    q: NonZeroUsize,
    s1: &[T],
    s2: &[T],
    init: A,
    f: impl FnMut(A, (usize, usize)) -> A,
) -> A
where
    T: HashableChar,
{
    let grams1 = QGrams::new(s1, q).sorted();
    let grams2 = QGrams::new(s2, q).sorted();
    count_pairs(&grams1, &grams2).fold(init, f)
}

/// Presence counts: distinct q-grams of s1, of s2, and of both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Presence {
    distinct1: usize,
    distinct2: usize,
    shared: usize,
}

fn presence<T: HashableChar>(q: NonZeroUsize, s1: &[T], s2: &[T]) -> Presence {
    fold_counts(q, s1, s2, Presence::default(), |mut acc, (c1, c2)| {
        acc.distinct1 += usize::from(c1 > 0);
        acc.distinct2 += usize::from(c2 > 0);
        acc.shared += usize::from(c1 > 0 && c2 > 0);
        acc
    })
}

/// `s1` too short to form a single q-gram: only equality is meaningful.
#[inline]
fn short_circuit<T: HashableChar>(q: NonZeroUsize, s1: &[T], s2: &[T]) -> Option<f64> {
    (s1.len() < q.get()).then(|| if s1 == s2 { 0.0 } else { 1.0 })
}

macro_rules! qgram_metric {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub struct $name {
            q: NonZeroUsize,
        }

        impl $name {
            pub fn new(q: usize) -> Result<Self> {
                Ok($name { q: checked_q(q)? })
            }

            pub fn q(&self) -> usize {
                self.q.get()
            }
        }
    };
}

qgram_metric!(
    /// Sum over distinct q-grams of `|c1 - c2|`.
    QGram
);
qgram_metric!(
    /// One minus the cosine of the two q-gram count vectors.
    Cosine
);
qgram_metric!(
    /// One minus distinct shared q-grams over distinct q-grams of either side.
    Jaccard
);
qgram_metric!(
    /// One minus twice the distinct shared q-grams over the sum of distinct counts.
    SorensenDice
);
qgram_metric!(
    /// One minus distinct shared q-grams over the smaller distinct count.
    Overlap
);

// ---------------------------------------------------------------------------
// QGram
// ---------------------------------------------------------------------------

impl QGram {
    /// Distance together with the number of q-grams emitted for both inputs,
    /// which is the largest distance the pair could have.
    fn distance_and_total<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> (usize, usize) {
        fold_counts(self.q, s1, s2, (0, 0), |(dist, total), (c1, c2)| {
            (dist + c1.abs_diff(c2), total + c1 + c2)
        })
    }
}

impl Distance for QGram {
    type Output = usize;

    fn evaluate<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> usize {
        self.distance_and_total(s1, s2).0
    }
}

impl Similarity for QGram {
    fn compare<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> f64 {
        let (dist, total) = self.distance_and_total(s1, s2);
        if total == 0 {
            return 1.0;
        }
        1.0 - dist as f64 / total as f64
    }
}

// ---------------------------------------------------------------------------
// Cosine
// ---------------------------------------------------------------------------

impl Distance for Cosine {
    type Output = f64;

    fn evaluate<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> f64 {
        if let Some(d) = short_circuit(self.q, s1, s2) {
            return d;
        }
        let (norm1, norm2, dot) =
            fold_counts(self.q, s1, s2, (0usize, 0usize, 0usize), |(n1, n2, dot), (c1, c2)| {
                (n1 + c1 * c1, n2 + c2 * c2, dot + c1 * c2)
            });
        // Unreachable past the short circuit: a short s2 still contributes its
        // degenerate whole-string q-gram.
        if norm1 == 0 || norm2 == 0 {
            return 1.0;
        }
        let denom = (norm1 as f64 * norm2 as f64).sqrt();
        (1.0 - dot as f64 / denom).clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Presence-based distances
// ---------------------------------------------------------------------------

impl Distance for Jaccard {
    type Output = f64;

    fn evaluate<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> f64 {
        if let Some(d) = short_circuit(self.q, s1, s2) {
            return d;
        }
        let p = presence(self.q, s1, s2);
        let union = p.distinct1 + p.distinct2 - p.shared;
        if union == 0 {
            return 1.0;
        }
        1.0 - p.shared as f64 / union as f64
    }
}

impl Distance for SorensenDice {
    type Output = f64;

    fn evaluate<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> f64 {
        if let Some(d) = short_circuit(self.q, s1, s2) {
            return d;
        }
        let p = presence(self.q, s1, s2);
        let total = p.distinct1 + p.distinct2;
        if total == 0 {
            return 1.0;
        }
        1.0 - 2.0 * p.shared as f64 / total as f64
    }
}

impl Distance for Overlap {
    type Output = f64;

    fn evaluate<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> f64 {
        if let Some(d) = short_circuit(self.q, s1, s2) {
            return d;
        }
        let p = presence(self.q, s1, s2);
        let smaller = p.distinct1.min(p.distinct2);
        if smaller == 0 {
            return 1.0;
        }
        1.0 - p.shared as f64 / smaller as f64
    }
}

macro_rules! similarity_from_distance {
    ($($name:ident),*) => {
        $(
            impl Similarity for $name {
                #[inline]
                fn compare<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> f64 {
                    1.0 - self.evaluate(s1, s2)
                }
            }
        )*
    };
}

similarity_from_distance!(Cosine, Jaccard, SorensenDice, Overlap);
