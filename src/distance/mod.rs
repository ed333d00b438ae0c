// SPDX-License-Identifier: MIT
// Metric capability traits shared by the q-gram distances, the Ratcliff-Obershelp
// matcher and every fuzz modifier.
pub mod metrics;
pub mod qgram;

use std::num::NonZeroUsize;

use crate::types::HashableChar;
use qgram::QGrams;

/// A distance between two sequences, 0 meaning identical.
pub trait Distance: Send + Sync {
    type Output: Copy + PartialOrd;

    fn evaluate<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> Self::Output;
}

/// A similarity in `[0, 1]`, 1 meaning identical.
///
/// Modifiers implement this trait too, so they nest freely:
/// `TokenSort::new(Partial::new(RatcliffObershelp))` is itself a `Similarity`.
pub trait Similarity: Send + Sync {
    fn compare<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> f64;

    /// Best score of `shorter` against any `shorter.len()`-long window of `longer`.
    ///
    /// Callers guarantee `0 < shorter.len() < longer.len()`. The default slides
    /// every window; metrics with a cheaper alignment strategy override it.
    fn compare_partial<T: HashableChar>(&self, shorter: &[T], longer: &[T]) -> f64 {
        let Some(width) = NonZeroUsize::new(shorter.len()) else {
            return self.compare::<T>(&[], &[]);
        };
        let mut best = 0.0f64;
        for window in QGrams::new(longer, width).iter() {
            best = best.max(self.compare(shorter, window));
            if best >= 1.0 {
                break;
            }
        }
        best
    }
}

impl<M: Similarity> Similarity for &M {
    #[inline]
    fn compare<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> f64 {
        (**self).compare(s1, s2)
    }

    #[inline]
    fn compare_partial<T: HashableChar>(&self, shorter: &[T], longer: &[T]) -> f64 {
        (**self).compare_partial(shorter, longer)
    }
}

impl<M: Distance> Distance for &M {
    type Output = M::Output;

    #[inline]
    fn evaluate<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> Self::Output {
        (**self).evaluate(s1, s2)
    }
}
