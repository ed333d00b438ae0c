// SPDX-License-Identifier: MIT
// Q-gram distances and composable fuzzy-matching modifiers.
//
// Slice-level algorithms are generic over the character unit (`HashableChar`);
// the functions below are the `&str` entry points that pick the unit.

pub mod algorithms;
pub mod distance;
pub mod error;
pub mod fuzz;
pub mod process;
pub mod types;
pub mod utils;

pub use algorithms::{find_longest_match, matching_blocks, MatchingBlock, RatcliffObershelp};
pub use distance::metrics::{Cosine, Jaccard, Overlap, QGram, SorensenDice};
pub use distance::qgram::{count_pairs, qgrams, CountPairs, QGrams};
pub use distance::{Distance, Similarity};
pub use error::{Error, Result};
pub use fuzz::{Partial, TokenMax, TokenPartition, TokenSet, TokenSort};
pub use process::{cdist, extract, extract_one, ExtractOptions, Match};
pub use types::{HashableChar, Seq};
pub use utils::{default_process, Tokenizer};

/// Similarity of two strings in `[0, 1]`, 1 meaning identical.
pub fn compare<M: Similarity>(metric: &M, s1: &str, s2: &str) -> f64 {
    crate::dispatch_seq!(s1, s2, |a, b| metric.compare(a, b))
}

/// Distance between two strings: a q-gram count for [`QGram`], a value in
/// `[0, 1]` for the normalized metrics.
pub fn evaluate<D: Distance>(metric: &D, s1: &str, s2: &str) -> D::Output {
    crate::dispatch_seq!(s1, s2, |a, b| metric.evaluate(a, b))
}
