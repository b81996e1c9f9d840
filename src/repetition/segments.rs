//! Character fraction of duplicated lines and paragraphs.

use crate::span::TextSpan;
use indexmap::IndexMap;

/// Fraction of `text_len` taken by repeated copies of `segments`.
///
/// Each distinct segment seen `c > 1` times contributes `len * (c - 1)`: the
/// first copy is the original. Segments never overlap, so the result is
/// within `[0, 1]`.
pub fn duplicate_segment_chr_fraction<'s>(
    segments: impl IntoIterator<Item = &'s str>,
    text_len: usize,
) -> f64 {
    if text_len == 0 {
        return 0.0;
    }
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for segment in segments {
        *counts.entry(segment).or_default() += 1;
    }
    let duplicate_chars: usize = counts
        .iter()
        .filter(|(_, &count)| count > 1)
        .map(|(segment, &count)| segment.len() * (count - 1))
        .sum();
    duplicate_chars as f64 / text_len as f64
}

pub fn duplicate_line_chr_fraction<S: TextSpan + ?Sized>(span: &S) -> f64 {
    duplicate_segment_chr_fraction(span.lines(), span.text().len())
}

pub fn duplicate_paragraph_chr_fraction<S: TextSpan + ?Sized>(span: &S) -> f64 {
    duplicate_segment_chr_fraction(span.paragraphs(), span.text().len())
}
