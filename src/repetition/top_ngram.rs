//! Character fraction covered by the most frequent n-gram.
//!
//! Occurrences of the winning n-gram are not merged: the fraction is
//! `len * count / doc_char_len`, so a self-overlapping n-gram (`"a a"` in
//! `"a a a a"`) can report more than 1.0. This matches the published
//! corpus-filtering heuristic and differs from [`duplicate_chr_fraction`],
//! which is exact.
//!
//! [`duplicate_chr_fraction`]: super::duplicate_chr_fraction

use super::ShingleTable;
use std::collections::BTreeMap;

/// The most frequent n-gram of one size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopNgram<'t> {
    pub key: &'t str,
    pub count: usize,
    /// Byte length of the n-gram's text.
    pub char_len: usize,
}

/// The most frequent n-gram of size `n` occurring at least `min_count`
/// times. Ties go to the n-gram seen first.
pub fn top_ngram(table: &ShingleTable, n: usize, min_count: usize) -> Option<TopNgram<'_>> {
    let mut best: Option<TopNgram<'_>> = None;
    for (key, occurrences) in table.ngrams(n)? {
        let count = occurrences.len();
        if best.map_or(true, |b| count > b.count) {
            best = occurrences.first().map(|first| TopNgram {
                key,
                count,
                char_len: first.char_len(),
            });
        }
    }
    best.filter(|top| top.count >= min_count)
}

/// For each n-gram size, the character fraction covered by the top n-gram,
/// or `0.0` when none reaches `min_count`.
pub fn top_ngram_chr_fraction(
    table: &ShingleTable,
    doc_char_len: usize,
    min_count: usize,
) -> BTreeMap<usize, f64> {
    table
        .range()
        .sizes()
        .map(|n| {
            let fraction = match top_ngram(table, n, min_count) {
                Some(top) if doc_char_len > 0 => {
                    (top.char_len * top.count) as f64 / doc_char_len as f64
                }
                _ => 0.0,
            };
            (n, fraction)
        })
        .collect()
}
