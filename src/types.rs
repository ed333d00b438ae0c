// SPDX-License-Identifier: MIT
// Character units and the borrowed/owned sequence wrapper used by the &str entry points.

use std::borrow::Cow;
use std::hash::Hash;

/// One element of a compared sequence.
///
/// Every algorithm in the crate is generic over this trait so that ASCII input
/// can be compared as raw bytes while everything else goes through `char`.
pub trait HashableChar: Copy + Eq + Hash + Ord + Send + Sync {
    fn to_char(self) -> char;
    fn space() -> Self;
}

impl HashableChar for u8 {
    #[inline] fn to_char(self) -> char { self as char }
    #[inline] fn space() -> Self { b' ' }
}

impl HashableChar for char {
    #[inline] fn to_char(self) -> char { self }
    #[inline] fn space() -> Self { ' ' }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Seq<'a> {
    Ascii(&'a [u8]),
    Chars(Vec<char>),
}

impl<'a> Seq<'a> {
    pub fn new(s: &'a str) -> Self {
        if s.is_ascii() {
            Seq::Ascii(s.as_bytes())
        } else {
            Seq::Chars(s.chars().collect())
        }
    }

    pub fn to_chars(&self) -> Cow<'_, [char]> {
        match self {
            Seq::Ascii(v) => Cow::Owned(v.iter().map(|&c| c as char).collect()),
            Seq::Chars(v) => Cow::Borrowed(v.as_slice()),
        }
    }
}

/// Runs `$body` with `$a`/`$b` bound to the character units of two `&str`s.
///
/// Both ASCII: `&[u8]`. Otherwise both are widened to `&[char]` so the two
/// sides always share a unit type.
#[macro_export]
macro_rules! dispatch_seq {
    ($s1:expr, $s2:expr, |$a:ident, $b:ident| $body:expr) => {{
        let seq1 = $crate::types::Seq::new($s1);
        let seq2 = $crate::types::Seq::new($s2);
        match (&seq1, &seq2) {
            ($crate::types::Seq::Ascii($a), $crate::types::Seq::Ascii($b)) => {
                let ($a, $b): (&[u8], &[u8]) = (*$a, *$b);
                $body
            }
            _ => {
                let chars1 = seq1.to_chars();
                let chars2 = seq2.to_chars();
                let ($a, $b): (&[char], &[char]) = (&*chars1, &*chars2);
                $body
            }
        }
    }};
}
