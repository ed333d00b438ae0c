// SPDX-License-Identifier: MIT
// Ratcliff-Obershelp pattern matching: longest common blocks found by
// divide-and-conquer, and the similarity built on them.

use std::ops::Range;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::distance::{Distance, Similarity};
use crate::types::HashableChar;

/// A maximal common run: `s1[a..a + size] == s2[b..b + size]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchingBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Positions of every unit in `s2`, ascending.
fn position_index<T: HashableChar>(s2: &[T]) -> FxHashMap<T, Vec<usize>> {
    let mut b2j: FxHashMap<T, Vec<usize>> = FxHashMap::default();
    for (j, &c) in s2.iter().enumerate() {
        b2j.entry(c).or_default().push(j);
    }
    b2j
}

fn longest_match_indexed<T: HashableChar>(
    s1: &[T],
    b2j: &FxHashMap<T, Vec<usize>>,
    range1: Range<usize>,
    range2: Range<usize>,
) -> MatchingBlock {
    let mut best = MatchingBlock { a: range1.start, b: range2.start, size: 0 };
    // j2len[j]: length of the common run ending at s1[i - 1] and s2[j]
    let mut j2len: FxHashMap<usize, usize> = FxHashMap::default();

    for i in range1 {
        let mut next_j2len: FxHashMap<usize, usize> = FxHashMap::default();
        if let Some(positions) = b2j.get(&s1[i]) {
            for &j in positions {
                if j < range2.start {
                    continue;
                }
                if j >= range2.end {
                    break;
                }
                let prev = if j > 0 { j2len.get(&(j - 1)).copied().unwrap_or(0) } else { 0 };
                let k = prev + 1;
                next_j2len.insert(j, k);
                if k > best.size {
                    best = MatchingBlock { a: i + 1 - k, b: j + 1 - k, size: k };
                }
            }
        }
        j2len = next_j2len;
    }
    best
}

/// Longest common contiguous block of `s1[range1]` and `s2[range2]`.
///
/// Ties go to the block starting earliest in `s1`, then earliest in `s2`.
/// A zero-sized block means the ranges share nothing.
pub fn find_longest_match<T: HashableChar>(
    s1: &[T],
    s2: &[T],
    range1: Range<usize>,
    range2: Range<usize>,
) -> MatchingBlock {
    longest_match_indexed(s1, &position_index(s2), range1, range2)
}

/// All matching blocks of `s1` and `s2`, ordered by position.
///
/// The longest block is taken first and the regions to its left and right are
/// searched recursively. Blocks that touch are merged, so the result never
/// contains two adjacent runs.
pub fn matching_blocks<T: HashableChar>(s1: &[T], s2: &[T]) -> Vec<MatchingBlock> {
    if s1.is_empty() || s2.is_empty() {
        return Vec::new();
    }
    let b2j = position_index(s2);
    let mut queue = vec![(0, s1.len(), 0, s2.len())];
    let mut blocks = Vec::new();

    while let Some((lo1, hi1, lo2, hi2)) = queue.pop() {
        let m = longest_match_indexed(s1, &b2j, lo1..hi1, lo2..hi2);
        if m.size == 0 {
            continue;
        }
        blocks.push(m);
        if lo1 < m.a && lo2 < m.b {
            queue.push((lo1, m.a, lo2, m.b));
        }
        if m.a + m.size < hi1 && m.b + m.size < hi2 {
            queue.push((m.a + m.size, hi1, m.b + m.size, hi2));
        }
    }
    blocks.sort_unstable();

    let mut merged: Vec<MatchingBlock> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match merged.last_mut() {
            Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                last.size += block.size;
            }
            _ => merged.push(block),
        }
    }
    merged
}

/// Gestalt pattern matching: `2 * M / (len1 + len2)` where `M` is the number
/// of units covered by the matching blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RatcliffObershelp;

impl Similarity for RatcliffObershelp {
    fn compare<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> f64 {
        let total = s1.len() + s2.len();
        if total == 0 {
            return 1.0;
        }
        let matched: usize = matching_blocks(s1, s2).iter().map(|m| m.size).sum();
        2.0 * matched as f64 / total as f64
    }

    /// Only the windows anchored on a matching block are scored: each block
    /// places a `shorter.len()` window over `longer` so the block lines up,
    /// shifted back inside `longer` when it would overhang either end.
    fn compare_partial<T: HashableChar>(&self, shorter: &[T], longer: &[T]) -> f64 {
        let blocks = matching_blocks(shorter, longer);
        trace!(blocks = blocks.len(), "anchoring partial windows on matching blocks");
        let width = shorter.len();
        let last_start = longer.len().saturating_sub(width);
        let mut best = 0.0f64;
        for block in &blocks {
            let start = block.b.saturating_sub(block.a).min(last_start);
            let end = (start + width).min(longer.len());
            best = best.max(self.compare(shorter, &longer[start..end]));
            if best >= 1.0 {
                break;
            }
        }
        best
    }
}

impl Distance for RatcliffObershelp {
    type Output = f64;

    fn evaluate<T: HashableChar>(&self, s1: &[T], s2: &[T]) -> f64 {
        1.0 - self.compare(s1, s2)
    }
}
