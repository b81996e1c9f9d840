//! Character fraction covered by duplicated n-grams.
//!
//! Summing `len(ngram) * (count - 1)` over-counts whenever duplicate
//! occurrences overlap, which is the common case for small `n`. Instead every
//! occurrence of a repeated n-gram is marked on a coverage array and the
//! maximal covered runs are measured once each.

use super::ShingleTable;
use std::collections::BTreeMap;
use std::ops::Range;

/// Maximal runs of `true` in `flags`, as half-open index ranges.
pub fn covered_runs(flags: &[bool]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &flag) in flags.iter().enumerate() {
        match (flag, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(s..flags.len());
    }
    runs
}

/// Token runs covered by some n-gram of size `n` that occurs more than once.
pub fn duplicate_token_runs(table: &ShingleTable, n: usize) -> Vec<Range<usize>> {
    let ngrams = match table.ngrams(n) {
        Some(ngrams) => ngrams,
        None => return Vec::new(),
    };

    let mut covered = vec![false; table.token_count()];
    for occurrences in ngrams.values().filter(|occurrences| occurrences.len() > 1) {
        for occurrence in occurrences {
            covered[occurrence.start_token..occurrence.end_token]
                .iter_mut()
                .for_each(|flag| *flag = true);
        }
    }
    covered_runs(&covered)
}

/// Merged character ranges of duplicated n-grams of size `n`.
///
/// A run spans from its first token's start to its last token's end, so the
/// whitespace between adjacent duplicated tokens belongs to the run.
pub fn duplicate_ranges(table: &ShingleTable, n: usize) -> Vec<Range<usize>> {
    duplicate_token_runs(table, n)
        .into_iter()
        .filter_map(|run| {
            let (start, _) = table.token_bounds(run.start)?;
            let (_, end) = table.token_bounds(run.end - 1)?;
            Some(start..end)
        })
        .collect()
}

/// For each n-gram size, the fraction of `doc_char_len` lying inside an
/// n-gram that occurs at least twice. No character is counted twice, so the
/// result is within `[0, 1]`.
pub fn duplicate_chr_fraction(table: &ShingleTable, doc_char_len: usize) -> BTreeMap<usize, f64> {
    table
        .range()
        .sizes()
        .map(|n| {
            if doc_char_len == 0 {
                return (n, 0.0);
            }
            let duplicate_chars: usize = duplicate_ranges(table, n)
                .iter()
                .map(|range| range.end - range.start)
                .sum();
            (n, duplicate_chars as f64 / doc_char_len as f64)
        })
        .collect()
}
