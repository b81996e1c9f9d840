#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Document quality and repetition diagnostics for corpus filtering.
//!
//! Scores a tokenized span with heuristic metrics (stop words, alphabetic
//! tokens, word length, bullet and ellipsis lines) and repetition metrics
//! (duplicate lines, paragraphs, and n-grams), then checks each value
//! against a threshold to decide whether the span passes.
//!
//! ## Core Types
//!
//! - [`TextSpan`] - Read-only view of tokens and text, implemented by
//!   [`Document`] and [`Span`]
//! - [`ShingleTable`] - Every n-gram of a span for a range of sizes
//! - [`QualityScorer`] - Computes every metric and checks the thresholds
//! - [`QualityRecord`] - Named outcomes with the overall verdict
//!
//! ## Example
//!
//! ```
//! use layered_quality::{QualityConfig, QualityScorer};
//!
//! let scorer = QualityScorer::new(QualityConfig::default()).unwrap();
//! let record = scorer.score_text("This is a test. This is a test.").unwrap();
//! assert!(!record.passed());
//! assert!(record.failures().contains(&"duplicate_ngram_chr_fraction_5".to_string()));
//! ```

mod config;
mod error;
mod heuristics;
mod repetition;
mod scorer;
mod span;
mod threshold;

pub use config::{QualityConfig, QualityThresholds, MAX_NGRAM_SIZES};
pub use error::{QualityError, QualityResult};
pub use heuristics::{
    alpha_ratio, contains_string, doc_length, mean_word_length, n_stop_words, oov_ratio,
    proportion_bullet_points, proportion_ellipsis, symbol_to_word_ratio, Vocabulary,
};
pub use repetition::{
    build_shingles, covered_runs, duplicate_chr_fraction, duplicate_line_chr_fraction,
    duplicate_paragraph_chr_fraction, duplicate_ranges, duplicate_segment_chr_fraction,
    duplicate_token_runs, top_ngram, top_ngram_chr_fraction, NgramOccurrence, NgramOccurrences,
    NgramRange, RepetitionDisplay, ShingleTable, TopNgram,
};
pub use scorer::{GroupMetric, Metric, QualityScorer, ScalarMetric};
pub use span::{
    create_document_from_string, is_stop_word, Document, Segmentation, Span, TextSpan, Token,
    Tokenizer,
};
pub use threshold::{
    evaluate, FlatRecord, Interval, MetricBag, MetricEntry, MetricOutcome, MetricValue,
    QualityRecord, ThresholdBag, ThresholdSpec, PASSED_COLUMN,
};
