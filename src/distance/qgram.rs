// SPDX-License-Identifier: MIT
// Q-gram extraction and the sorted-merge multiset comparison every q-gram
// distance is built on.

use std::cmp::Ordering;
use std::num::NonZeroUsize;

use crate::error::{Error, Result};

/// The overlapping length-`q` windows of a sequence, left to right.
///
/// The view is `Copy` and holds no cursor, so it can be traversed any number
/// of times. A source shorter than `q` yields exactly one degenerate element,
/// the whole source, so short inputs still compare whole against whole.
#[derive(Clone, Copy, Debug)]
pub struct QGrams<'a, T> {
    seq: &'a [T],
    q: usize,
}

impl<'a, T> QGrams<'a, T> {
    pub fn new(seq: &'a [T], q: NonZeroUsize) -> Self {
        QGrams { seq, q: q.get() }
    }

    /// Number of full q-grams, `max(len - q + 1, 0)`. The degenerate element
    /// produced for short sources is not counted.
    pub fn len(&self) -> usize {
        (self.seq.len() + 1).saturating_sub(self.q)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a [T]> + 'a {
        let degenerate = (self.seq.len() < self.q).then_some(self.seq);
        degenerate.into_iter().chain(self.seq.windows(self.q))
    }
}

impl<'a, T: Ord> QGrams<'a, T> {
    /// All q-grams in lexicographic order, duplicates kept.
    pub fn sorted(&self) -> Vec<&'a [T]> {
        let mut grams: Vec<&'a [T]> = self.iter().collect();
        grams.sort_unstable();
        grams
    }
}

/// Validating constructor for callers holding a plain `usize`.
pub fn qgrams<T>(seq: &[T], q: usize) -> Result<QGrams<'_, T>> {
    NonZeroUsize::new(q)
        .map(|q| QGrams::new(seq, q))
        .ok_or(Error::InvalidQ(q))
}

// ---------------------------------------------------------------------------
// Multiset merge
// ---------------------------------------------------------------------------

/// Merge-join over two sorted multisets.
///
/// Yields `(c1, c2)` once per distinct key present in either input: its
/// multiplicity in `a` and in `b`. Keys are visited in ascending order and
/// `(0, 0)` is never produced.
#[derive(Clone, Debug)]
pub struct CountPairs<'s, K> {
    a: &'s [K],
    b: &'s [K],
}

pub fn count_pairs<'s, K: Ord>(a: &'s [K], b: &'s [K]) -> CountPairs<'s, K> {
    debug_assert!(a.windows(2).all(|w| w[0] <= w[1]), "left input must be sorted");
    debug_assert!(b.windows(2).all(|w| w[0] <= w[1]), "right input must be sorted");
    CountPairs { a, b }
}

#[inline]
fn run_len<K: Eq>(xs: &[K]) -> usize {
    match xs.first() {
        Some(head) => xs.iter().take_while(|x| *x == head).count(),
        None => 0,
    }
}

impl<K: Ord> Iterator for CountPairs<'_, K> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (a, b) = (self.a, self.b);
        let (c1, c2) = match (a.first(), b.first()) {
            (None, None) => return None,
            (Some(_), None) => (run_len(a), 0),
            (None, Some(_)) => (0, run_len(b)),
            (Some(x), Some(y)) => match x.cmp(y) {
                Ordering::Less => (run_len(a), 0),
                Ordering::Greater => (0, run_len(b)),
                Ordering::Equal => (run_len(a), run_len(b)),
            },
        };
        self.a = &a[c1..];
        self.b = &b[c2..];
        Some((c1, c2))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower = usize::from(!self.a.is_empty() || !self.b.is_empty());
        (lower, Some(self.a.len() + self.b.len()))
    }
}
