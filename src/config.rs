//! Scorer configuration and threshold defaults, loadable from TOML or RON.
//!
//! ```toml
//! symbols = ["#", "@"]
//! n_gram_range_top = [2, 4]
//!
//! [thresholds]
//! n_stop_words = { low = 3 }
//! top_ngram_chr_fraction = { "2" = { high = 0.25 } }
//! ```

use crate::error::{QualityError, QualityResult};
use crate::repetition::NgramRange;
use crate::threshold::{Interval, ThresholdBag};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Most n-gram sizes one range may span. Each size is reported as its own
/// column.
pub const MAX_NGRAM_SIZES: usize = 64;

/// What a [`QualityScorer`](crate::QualityScorer) measures and the thresholds
/// it checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityConfig {
    /// Symbols counted by `symbol_to_word_ratio`.
    pub symbols: Vec<String>,
    /// Strings looked for by `contains`.
    pub contains: Vec<String>,
    /// N-gram sizes for `top_ngram_chr_fraction`.
    pub n_gram_range_top: NgramRange,
    /// Occurrences an n-gram needs before it can be the top n-gram.
    pub top_ngram_min_count: usize,
    /// N-gram sizes for `duplicate_ngram_chr_fraction`.
    pub n_gram_range_duplicate: NgramRange,
    /// Line prefixes counted by `proportion_bullet_points`.
    pub bullet_points: Vec<String>,
    /// Line suffixes counted by `proportion_ellipsis`.
    pub ellipses: Vec<String>,
    pub thresholds: QualityThresholds,
}

impl Default for QualityConfig {
    fn default() -> Self {
        QualityConfig {
            symbols: vec!["#".to_string()],
            contains: vec!["lorem ipsum".to_string()],
            n_gram_range_top: NgramRange::new_unchecked(2, 4),
            top_ngram_min_count: 3,
            n_gram_range_duplicate: NgramRange::new_unchecked(5, 10),
            bullet_points: vec!["-".to_string(), "*".to_string()],
            ellipses: vec!["…".to_string(), "...".to_string()],
            thresholds: QualityThresholds::default(),
        }
    }
}

impl QualityConfig {
    pub fn from_toml_str(s: &str) -> QualityResult<Self> {
        let config: QualityConfig =
            toml::from_str(s).map_err(|e| QualityError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse RON; `Option` fields may omit `Some(..)`.
    pub fn from_ron_str(s: &str) -> QualityResult<Self> {
        let config: QualityConfig = ron_options()
            .from_str(s)
            .map_err(|e| QualityError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a `.toml` or `.ron` file.
    pub fn load(path: impl AsRef<Path>) -> QualityResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| QualityError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |message: String| QualityError::ConfigParse {
            path: path.to_path_buf(),
            message,
        };

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        let config: QualityConfig = match extension {
            "toml" => toml::from_str(&contents).map_err(|e| parse_error(e.to_string()))?,
            "ron" => ron_options()
                .from_str(&contents)
                .map_err(|e| parse_error(e.to_string()))?,
            _ => {
                return Err(parse_error(format!(
                    "unsupported config format {:?}, use .toml or .ron",
                    extension
                )))
            }
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded quality config");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> QualityResult<String> {
        toml::to_string_pretty(self).map_err(|e| QualityError::InvalidConfig(e.to_string()))
    }

    /// Reject unusable values and warn about thresholds that are never
    /// checked.
    pub fn validate(&self) -> QualityResult<()> {
        if self.symbols.iter().any(String::is_empty) {
            return Err(QualityError::InvalidConfig(
                "symbols must not contain an empty string".to_string(),
            ));
        }
        if self.contains.iter().any(String::is_empty) {
            return Err(QualityError::InvalidConfig(
                "contains must not contain an empty string".to_string(),
            ));
        }

        for (option, range) in [
            ("n_gram_range_top", self.n_gram_range_top),
            ("n_gram_range_duplicate", self.n_gram_range_duplicate),
        ] {
            if range.size_count() > MAX_NGRAM_SIZES {
                return Err(QualityError::InvalidConfig(format!(
                    "{} ({}, {}) spans more than {} n-gram sizes",
                    option,
                    range.lo(),
                    range.hi(),
                    MAX_NGRAM_SIZES
                )));
            }
        }

        let thresholds = &self.thresholds;
        check_ngram_keys(
            "top_ngram_chr_fraction",
            &thresholds.top_ngram_chr_fraction,
            self.n_gram_range_top,
        )?;
        check_ngram_keys(
            "duplicate_ngram_chr_fraction",
            &thresholds.duplicate_ngram_chr_fraction,
            self.n_gram_range_duplicate,
        )?;
        for symbol in thresholds.symbol_to_word_ratio.keys() {
            if !self.symbols.contains(symbol) {
                tracing::warn!(symbol = %symbol, "symbol_to_word_ratio threshold for a symbol that is not counted");
            }
        }
        for needle in thresholds.contains.keys() {
            if !self.contains.contains(needle) {
                tracing::warn!(needle = %needle, "contains threshold for a string that is not searched");
            }
        }
        Ok(())
    }
}

fn ron_options() -> ron::Options {
    ron::Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

fn check_ngram_keys(
    metric: &str,
    thresholds: &IndexMap<String, Interval>,
    range: NgramRange,
) -> QualityResult<()> {
    for key in thresholds.keys() {
        let n: usize = key.parse().map_err(|_| {
            QualityError::InvalidConfig(format!("{} threshold key {:?} is not an n-gram size", metric, key))
        })?;
        if !range.contains(n) {
            tracing::warn!(
                metric,
                n,
                lo = range.lo(),
                hi = range.hi(),
                "threshold for an n-gram size outside the configured range"
            );
        }
    }
    Ok(())
}

/// Threshold for every metric the scorer reports.
///
/// Grouped thresholds are keyed by symbol, searched string, or n-gram size;
/// keys missing from a group are not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityThresholds {
    pub n_stop_words: Interval,
    pub alpha_ratio: Interval,
    pub mean_word_length: Interval,
    /// Bounds on the number of tokens.
    pub doc_length: Interval,
    pub symbol_to_word_ratio: IndexMap<String, Interval>,
    pub proportion_ellipsis: Interval,
    pub proportion_bullet_points: Interval,
    /// Whether each string is expected in the text.
    pub contains: IndexMap<String, bool>,
    pub duplicate_line_chr_fraction: Interval,
    pub duplicate_paragraph_chr_fraction: Interval,
    pub duplicate_ngram_chr_fraction: IndexMap<String, Interval>,
    pub top_ngram_chr_fraction: IndexMap<String, Interval>,
    pub oov_ratio: Interval,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        fn upper_bounds(bounds: &[(usize, f64)]) -> IndexMap<String, Interval> {
            bounds
                .iter()
                .map(|&(n, high)| (n.to_string(), Interval::at_most(high)))
                .collect()
        }

        QualityThresholds {
            n_stop_words: Interval::at_least(2.0),
            alpha_ratio: Interval::at_least(0.7),
            mean_word_length: Interval::between(3.0, 10.0),
            doc_length: Interval::between(10.0, 100_000.0),
            symbol_to_word_ratio: IndexMap::from([("#".to_string(), Interval::at_most(0.1))]),
            proportion_ellipsis: Interval::at_most(0.3),
            proportion_bullet_points: Interval::at_most(0.8),
            contains: IndexMap::from([("lorem ipsum".to_string(), false)]),
            duplicate_line_chr_fraction: Interval::at_most(0.2),
            duplicate_paragraph_chr_fraction: Interval::at_most(0.2),
            duplicate_ngram_chr_fraction: upper_bounds(&[
                (5, 0.15),
                (6, 0.14),
                (7, 0.13),
                (8, 0.12),
                (9, 0.11),
                (10, 0.10),
            ]),
            top_ngram_chr_fraction: upper_bounds(&[(2, 0.20), (3, 0.18), (4, 0.16)]),
            oov_ratio: Interval::at_most(0.2),
        }
    }
}

impl QualityThresholds {
    /// The thresholds as a bag keyed by metric name, in metric order.
    pub fn to_bag(&self) -> ThresholdBag {
        ThresholdBag::new()
            .with_scalar("n_stop_words", self.n_stop_words)
            .with_scalar("alpha_ratio", self.alpha_ratio)
            .with_scalar("mean_word_length", self.mean_word_length)
            .with_scalar("doc_length", self.doc_length)
            .with_scalar("proportion_ellipsis", self.proportion_ellipsis)
            .with_scalar("proportion_bullet_points", self.proportion_bullet_points)
            .with_scalar("duplicate_line_chr_fraction", self.duplicate_line_chr_fraction)
            .with_scalar(
                "duplicate_paragraph_chr_fraction",
                self.duplicate_paragraph_chr_fraction,
            )
            .with_group("contains", self.contains.clone())
            .with_group("symbol_to_word_ratio", self.symbol_to_word_ratio.clone())
            .with_group("top_ngram_chr_fraction", self.top_ngram_chr_fraction.clone())
            .with_group(
                "duplicate_ngram_chr_fraction",
                self.duplicate_ngram_chr_fraction.clone(),
            )
            .with_scalar("oov_ratio", self.oov_ratio)
    }
}
