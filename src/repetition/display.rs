use super::{duplicate_token_runs, top_ngram, ShingleTable};
use crate::span::TextSpan;
use std::fmt::Write;
use std::ops::Range;
use unicode_width::UnicodeWidthStr;

/// A token run to underline, with its label.
struct Mark {
    tokens: Range<usize>,
    label: String,
}

/// Renders a span's tokens with the repeated n-grams underlined.
///
/// ```text
/// a  b  c  a  b
/// ╰──╯duplicate(n=2)
///          ╰──╯duplicate(n=2)
/// ```
pub struct RepetitionDisplay<'a, S: TextSpan + ?Sized> {
    span: &'a S,
    table: &'a ShingleTable,
    marks: Vec<Mark>,
}

impl<'a, S: TextSpan + ?Sized> RepetitionDisplay<'a, S> {
    /// `table` must have been built from `span`.
    pub fn new(span: &'a S, table: &'a ShingleTable) -> Self {
        RepetitionDisplay {
            span,
            table,
            marks: Vec::new(),
        }
    }

    /// Underline every merged run of duplicated n-grams of size `n`.
    pub fn include_duplicates(&mut self, n: usize) {
        for run in duplicate_token_runs(self.table, n) {
            self.marks.push(Mark {
                tokens: run,
                label: format!("duplicate(n={})", n),
            });
        }
    }

    /// Underline each occurrence of the top n-gram of size `n`.
    pub fn include_top(&mut self, n: usize, min_count: usize) {
        let top = match top_ngram(self.table, n, min_count) {
            Some(top) => top,
            None => return,
        };
        for occurrence in self.table.occurrences(n, top.key) {
            self.marks.push(Mark {
                tokens: occurrence.start_token..occurrence.end_token,
                label: format!("top(n={}) {:?} x{}", n, top.key, top.count),
            });
        }
    }

    /// Takes self
    pub fn with_duplicates(mut self, n: usize) -> Self {
        self.include_duplicates(n);
        self
    }

    /// Takes self
    pub fn with_top(mut self, n: usize, min_count: usize) -> Self {
        self.include_top(n, min_count);
        self
    }
}

impl<'a, S: TextSpan + ?Sized> std::fmt::Display for RepetitionDisplay<'a, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SPACE_PADDING: usize = 2;
        let mut token_idx_to_start_display_char_idx = Vec::new();
        let mut token_idx_to_end_display_char_idx = Vec::new();

        let mut opening_line = String::new();
        for (i, token) in self.span.tokens().iter().enumerate() {
            if i > 0 {
                opening_line.extend(std::iter::repeat(' ').take(SPACE_PADDING));
            }
            token_idx_to_start_display_char_idx.push(UnicodeWidthStr::width(&*opening_line));
            if token.is_space {
                write!(&mut opening_line, "{}", token.text.escape_debug())?;
            } else {
                opening_line.push_str(&token.text);
            }
            token_idx_to_end_display_char_idx.push(UnicodeWidthStr::width(&*opening_line));
        }

        f.write_str(&opening_line)?;

        for mark in self.marks.iter().filter(|mark| !mark.tokens.is_empty()) {
            f.write_char('\n')?;

            let start_char_idx = token_idx_to_start_display_char_idx[mark.tokens.start];
            for _ in 0..start_char_idx {
                f.write_char(' ')?;
            }

            f.write_char('╰')?;

            let end_char_idx = token_idx_to_end_display_char_idx[mark.tokens.end - 1];
            let char_len = end_char_idx - start_char_idx;
            for _ in (start_char_idx + 1)..end_char_idx.saturating_sub(1) {
                f.write_char('─')?;
            }

            if char_len > 1 {
                f.write_char('╯')?;
            }

            f.write_str(&mark.label)?;
        }

        Ok(())
    }
}
