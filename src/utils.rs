// SPDX-License-Identifier: MIT
// Tokenizing and preprocessing helpers shared by the token modifiers and the
// batch scorers.

use crate::types::HashableChar;

/// Splits a unit sequence into tokens.
///
/// The default splits on Unicode whitespace. Runs of delimiters never produce
/// empty tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tokenizer {
    delimiters: Option<Vec<char>>,
}

impl Tokenizer {
    pub fn whitespace() -> Self {
        Tokenizer { delimiters: None }
    }

    pub fn with_delimiters(delimiters: impl IntoIterator<Item = char>) -> Self {
        Tokenizer { delimiters: Some(delimiters.into_iter().collect()) }
    }

    #[inline]
    pub fn is_delimiter(&self, c: char) -> bool {
        match &self.delimiters {
            Some(set) => set.contains(&c),
            None => c.is_whitespace(),
        }
    }

    pub fn contains_delimiter<T: HashableChar>(&self, s: &[T]) -> bool {
        s.iter().any(|&c| self.is_delimiter(c.to_char()))
    }

    /// Tokens in their original order.
    pub fn split<'a, T: HashableChar>(&self, s: &'a [T]) -> Vec<&'a [T]> {
        s.split(|&c| self.is_delimiter(c.to_char()))
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Concatenates tokens with a single space between them.
pub fn join<T: HashableChar>(tokens: &[&[T]]) -> Vec<T> {
    let len = tokens.iter().map(|t| t.len()).sum::<usize>() + tokens.len().saturating_sub(1);
    let mut out = Vec::with_capacity(len);
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(T::space());
        }
        out.extend_from_slice(token);
    }
    out
}

/// Lowercases, replaces every non-alphanumeric character with a space and
/// trims the ends.
pub fn default_process(s: &str) -> String {
    let result: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();
    result.trim().to_string()
}
