//! Repetition engines: n-gram shingles, duplicate and top n-gram character
//! fractions, and duplicated lines and paragraphs.
//!
//! All fractions are measured in bytes of the span text, the same unit as
//! token offsets.

mod display;
mod duplicate;
mod segments;
mod shingles;
mod top_ngram;

pub use display::RepetitionDisplay;
pub use duplicate::{covered_runs, duplicate_chr_fraction, duplicate_ranges, duplicate_token_runs};
pub use segments::{
    duplicate_line_chr_fraction, duplicate_paragraph_chr_fraction, duplicate_segment_chr_fraction,
};
pub use shingles::{build_shingles, NgramOccurrence, NgramOccurrences, NgramRange, ShingleTable};
pub use top_ngram::{top_ngram, top_ngram_chr_fraction, TopNgram};
