//! N-gram (shingle) enumeration over token spans.

use crate::error::{QualityError, QualityResult};
use crate::span::TextSpan;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::ops::RangeInclusive;

/// An inclusive range of n-gram sizes, `1 <= lo <= hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(usize, usize)", into = "(usize, usize)")]
pub struct NgramRange {
    lo: usize,
    hi: usize,
}

impl NgramRange {
    pub fn new(lo: usize, hi: usize) -> QualityResult<Self> {
        if lo == 0 || lo > hi {
            return Err(QualityError::InvalidNgramRange { lo, hi });
        }
        Ok(NgramRange { lo, hi })
    }

    /// Callers guarantee `1 <= lo <= hi`.
    pub(crate) const fn new_unchecked(lo: usize, hi: usize) -> Self {
        NgramRange { lo, hi }
    }

    pub fn lo(&self) -> usize {
        self.lo
    }

    pub fn hi(&self) -> usize {
        self.hi
    }

    /// Number of sizes in the range. Never overflows since `lo >= 1`.
    pub fn size_count(&self) -> usize {
        self.hi - self.lo + 1
    }

    pub fn sizes(&self) -> RangeInclusive<usize> {
        self.lo..=self.hi
    }

    pub fn contains(&self, n: usize) -> bool {
        self.sizes().contains(&n)
    }
}

impl TryFrom<(usize, usize)> for NgramRange {
    type Error = QualityError;

    fn try_from((lo, hi): (usize, usize)) -> Result<Self, Self::Error> {
        NgramRange::new(lo, hi)
    }
}

impl From<NgramRange> for (usize, usize) {
    fn from(range: NgramRange) -> Self {
        (range.lo, range.hi)
    }
}

/// One occurrence of an n-gram.
///
/// Token indices are relative to the indexed span; character offsets are the
/// first token's start and the last token's end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NgramOccurrence {
    pub start_token: usize,
    pub end_token: usize,
    pub start_char: usize,
    pub end_char: usize,
}

impl NgramOccurrence {
    pub fn char_len(&self) -> usize {
        self.end_char - self.start_char
    }
}

/// Occurrences keyed by lower-cased n-gram text, in first-seen order.
pub type NgramOccurrences = IndexMap<String, Vec<NgramOccurrence>>;

/// Every n-gram of a span for each size of an [`NgramRange`].
///
/// For a fixed size the occurrence lists partition the span's windows of that
/// size: each window is listed exactly once. Only sizes that fit the span are
/// stored; larger sizes inside the range share one empty map.
#[derive(Debug, Clone)]
pub struct ShingleTable {
    range: NgramRange,
    token_bounds: Vec<(usize, usize)>,
    by_size: BTreeMap<usize, NgramOccurrences>,
    empty: NgramOccurrences,
}

impl ShingleTable {
    pub fn range(&self) -> NgramRange {
        self.range
    }

    /// Number of tokens in the indexed span.
    pub fn token_count(&self) -> usize {
        self.token_bounds.len()
    }

    /// Character offsets of token `index`.
    pub fn token_bounds(&self, index: usize) -> Option<(usize, usize)> {
        self.token_bounds.get(index).copied()
    }

    /// N-grams of size `n`, or `None` when `n` is outside the range.
    pub fn ngrams(&self, n: usize) -> Option<&NgramOccurrences> {
        if !self.range.contains(n) {
            return None;
        }
        Some(self.by_size.get(&n).unwrap_or(&self.empty))
    }

    pub fn occurrences(&self, n: usize, key: &str) -> &[NgramOccurrence] {
        self.ngrams(n)
            .and_then(|ngrams| ngrams.get(key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Sizes that fit the span, with their n-grams. Larger sizes in the range
    /// have no n-grams and are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &NgramOccurrences)> {
        self.by_size.iter().map(|(n, ngrams)| (*n, ngrams))
    }
}

/// Enumerate every contiguous n-gram of `span` for each size in `range`.
///
/// Sizes larger than the span get an empty map.
pub fn build_shingles<S: TextSpan + ?Sized>(span: &S, range: NgramRange) -> ShingleTable {
    let tokens = span.tokens();
    let fitting_hi = range.hi().min(tokens.len());
    let mut by_size: BTreeMap<usize, NgramOccurrences> =
        (range.lo()..=fitting_hi).map(|n| (n, IndexMap::new())).collect();

    for start in 0..tokens.len() {
        for (&n, ngrams) in by_size.iter_mut() {
            if n > tokens.len() - start {
                continue;
            }
            let end = start + n;
            let key = span.token_range_text(start, end).to_lowercase();
            ngrams.entry(key).or_default().push(NgramOccurrence {
                start_token: start,
                end_token: end,
                start_char: tokens[start].start_char,
                end_char: tokens[end - 1].end_char,
            });
        }
    }

    tracing::trace!(
        lo = range.lo(),
        hi = range.hi(),
        tokens = tokens.len(),
        "built shingle table"
    );

    ShingleTable {
        range,
        token_bounds: tokens.iter().map(|t| (t.start_char, t.end_char)).collect(),
        by_size,
        empty: IndexMap::new(),
    }
}
