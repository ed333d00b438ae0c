// SPDX-License-Identifier: MIT
// Crate error type. Degenerate inputs are not errors; only bad parameters are.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("q-gram length must be a positive integer, got {0}")]
    InvalidQ(usize),

    #[error("score cutoff must lie in [0, 1], got {0}")]
    InvalidScoreCutoff(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
