// SPDX-License-Identifier: MIT
// Batch scoring: one query against many choices, or a full score matrix.
// Choices are scored in parallel with Rayon; the metric is shared by reference.

use std::borrow::Cow;

use rayon::prelude::*;
use tracing::debug;

use crate::distance::Similarity;
use crate::error::{Error, Result};

/// Preprocessing applied to the query and every choice before scoring.
pub type Processor = fn(&str) -> String;

#[derive(Clone, Copy, Debug, Default)]
pub struct ExtractOptions {
    limit: Option<usize>,
    score_cutoff: Option<f64>,
    processor: Option<Processor>,
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Minimum similarity, in `[0, 1]`, a choice needs to be reported.
    pub fn score_cutoff(mut self, cutoff: f64) -> Self {
        self.score_cutoff = Some(cutoff);
        self
    }

    pub fn processor(mut self, processor: Processor) -> Self {
        self.processor = Some(processor);
        self
    }

    fn validate(&self) -> Result<()> {
        match self.score_cutoff {
            Some(c) if !(0.0..=1.0).contains(&c) => Err(Error::InvalidScoreCutoff(c)),
            _ => Ok(()),
        }
    }

    fn prepare<'s>(&self, s: &'s str) -> Cow<'s, str> {
        match self.processor {
            Some(p) => Cow::Owned(p(s)),
            None => Cow::Borrowed(s),
        }
    }
}

/// A scored choice. `index` is its position in the input slice.
#[derive(Clone, Debug, PartialEq)]
pub struct Match<'c> {
    pub choice: &'c str,
    pub score: f64,
    pub index: usize,
}

fn score_cutoff_check(score: f64, cutoff: Option<f64>) -> f64 {
    match cutoff {
        Some(c) if score < c => 0.0,
        _ => score,
    }
}

/// Scores every choice against `query`, best first.
///
/// Choices under the cutoff are dropped; ties keep input order; at most
/// `limit` matches are returned.
pub fn extract<'c, M, S>(
    metric: &M,
    query: &str,
    choices: &'c [S],
    opts: &ExtractOptions,
) -> Result<Vec<Match<'c>>>
where
    M: Similarity,
    S: AsRef<str> + Sync,
{
    opts.validate()?;
    let query = opts.prepare(query);

    let mut matches: Vec<Match<'c>> = choices
        .par_iter()
        .enumerate()
        .filter_map(|(index, choice)| {
            let choice = choice.as_ref();
            let score = crate::compare(metric, &query, &opts.prepare(choice));
            match opts.score_cutoff {
                Some(c) if score < c => None,
                _ => Some(Match { choice, score, index }),
            }
        })
        .collect();
    debug!(choices = choices.len(), kept = matches.len(), "scored choices");

    matches.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));
    if let Some(limit) = opts.limit {
        matches.truncate(limit);
    }
    Ok(matches)
}

/// The single best choice, if any clears the cutoff.
pub fn extract_one<'c, M, S>(
    metric: &M,
    query: &str,
    choices: &'c [S],
    opts: &ExtractOptions,
) -> Result<Option<Match<'c>>>
where
    M: Similarity,
    S: AsRef<str> + Sync,
{
    let opts = opts.limit(1);
    Ok(extract(metric, query, choices, &opts)?.into_iter().next())
}

/// Score matrix: `result[i][j]` compares `queries[i]` with `choices[j]`.
/// Scores under the cutoff are reported as `0.0`.
pub fn cdist<M, Q, C>(
    metric: &M,
    queries: &[Q],
    choices: &[C],
    opts: &ExtractOptions,
) -> Result<Vec<Vec<f64>>>
where
    M: Similarity,
    Q: AsRef<str> + Sync,
    C: AsRef<str> + Sync,
{
    opts.validate()?;
    let choices: Vec<Cow<'_, str>> = choices.iter().map(|c| opts.prepare(c.as_ref())).collect();
    debug!(rows = queries.len(), cols = choices.len(), "computing score matrix");

    let matrix = queries
        .par_iter()
        .map(|q| {
            let q = opts.prepare(q.as_ref());
            choices
                .iter()
                .map(|c| score_cutoff_check(crate::compare(metric, &q, c), opts.score_cutoff))
                .collect::<Vec<f64>>()
        })
        .collect();
    Ok(matrix)
}
