//! Composes every metric of a span into a [`QualityRecord`].

use crate::config::QualityConfig;
use crate::error::{QualityError, QualityResult};
use crate::heuristics::{self, Vocabulary};
use crate::repetition::{
    build_shingles, duplicate_chr_fraction, duplicate_line_chr_fraction,
    duplicate_paragraph_chr_fraction, top_ngram_chr_fraction,
};
use crate::span::{create_document_from_string, TextSpan};
use crate::threshold::{
    evaluate, MetricBag, MetricEntry, MetricValue, QualityRecord, ThresholdBag, ThresholdSpec,
};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Metrics reporting a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarMetric {
    NStopWords,
    AlphaRatio,
    MeanWordLength,
    DocLength,
    ProportionEllipsis,
    ProportionBulletPoints,
    DuplicateLineChrFraction,
    DuplicateParagraphChrFraction,
    OovRatio,
}

impl ScalarMetric {
    pub const ALL: [ScalarMetric; 9] = [
        ScalarMetric::NStopWords,
        ScalarMetric::AlphaRatio,
        ScalarMetric::MeanWordLength,
        ScalarMetric::DocLength,
        ScalarMetric::ProportionEllipsis,
        ScalarMetric::ProportionBulletPoints,
        ScalarMetric::DuplicateLineChrFraction,
        ScalarMetric::DuplicateParagraphChrFraction,
        ScalarMetric::OovRatio,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScalarMetric::NStopWords => "n_stop_words",
            ScalarMetric::AlphaRatio => "alpha_ratio",
            ScalarMetric::MeanWordLength => "mean_word_length",
            ScalarMetric::DocLength => "doc_length",
            ScalarMetric::ProportionEllipsis => "proportion_ellipsis",
            ScalarMetric::ProportionBulletPoints => "proportion_bullet_points",
            ScalarMetric::DuplicateLineChrFraction => "duplicate_line_chr_fraction",
            ScalarMetric::DuplicateParagraphChrFraction => "duplicate_paragraph_chr_fraction",
            ScalarMetric::OovRatio => "oov_ratio",
        }
    }
}

/// Metrics reporting a group of values keyed by a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupMetric {
    /// Keyed by searched string.
    Contains,
    /// Keyed by symbol.
    SymbolToWordRatio,
    /// Keyed by n-gram size.
    TopNgramChrFraction,
    /// Keyed by n-gram size.
    DuplicateNgramChrFraction,
}

impl GroupMetric {
    pub const ALL: [GroupMetric; 4] = [
        GroupMetric::Contains,
        GroupMetric::SymbolToWordRatio,
        GroupMetric::TopNgramChrFraction,
        GroupMetric::DuplicateNgramChrFraction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GroupMetric::Contains => "contains",
            GroupMetric::SymbolToWordRatio => "symbol_to_word_ratio",
            GroupMetric::TopNgramChrFraction => "top_ngram_chr_fraction",
            GroupMetric::DuplicateNgramChrFraction => "duplicate_ngram_chr_fraction",
        }
    }
}

/// Every reported metric, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Scalar(ScalarMetric),
    Group(GroupMetric),
}

impl Metric {
    pub const ALL: [Metric; 13] = [
        Metric::Scalar(ScalarMetric::NStopWords),
        Metric::Scalar(ScalarMetric::AlphaRatio),
        Metric::Scalar(ScalarMetric::MeanWordLength),
        Metric::Scalar(ScalarMetric::DocLength),
        Metric::Scalar(ScalarMetric::ProportionEllipsis),
        Metric::Scalar(ScalarMetric::ProportionBulletPoints),
        Metric::Scalar(ScalarMetric::DuplicateLineChrFraction),
        Metric::Scalar(ScalarMetric::DuplicateParagraphChrFraction),
        Metric::Group(GroupMetric::Contains),
        Metric::Group(GroupMetric::SymbolToWordRatio),
        Metric::Group(GroupMetric::TopNgramChrFraction),
        Metric::Group(GroupMetric::DuplicateNgramChrFraction),
        Metric::Scalar(ScalarMetric::OovRatio),
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Scalar(metric) => metric.name(),
            Metric::Group(metric) => metric.name(),
        }
    }

    pub fn from_name(name: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|metric| metric.name() == name)
    }

    /// Whether values are booleans checked against `Expect` thresholds.
    pub fn is_boolean(self) -> bool {
        self == Metric::Group(GroupMetric::Contains)
    }

    /// Check that `entry` has this metric's shape and threshold kind.
    pub fn check_threshold(self, entry: &MetricEntry<ThresholdSpec>) -> QualityResult<()> {
        match (self, entry) {
            (Metric::Scalar(metric), MetricEntry::Scalar(threshold)) => {
                self.check_kind(metric.name(), threshold)
            }
            (Metric::Group(metric), MetricEntry::Group(group)) => {
                for (key, threshold) in group {
                    self.check_kind(&format!("{}_{}", metric.name(), key), threshold)?;
                }
                Ok(())
            }
            (Metric::Scalar(metric), MetricEntry::Group(_)) => Err(QualityError::mismatch(
                metric.name(),
                "grouped thresholds for a scalar metric",
            )),
            (Metric::Group(metric), MetricEntry::Scalar(_)) => Err(QualityError::mismatch(
                metric.name(),
                "a single threshold for a grouped metric",
            )),
        }
    }

    fn check_kind(self, column: &str, threshold: &ThresholdSpec) -> QualityResult<()> {
        match (self.is_boolean(), threshold) {
            (true, ThresholdSpec::Expect(_)) | (false, ThresholdSpec::Interval(_)) => Ok(()),
            (true, ThresholdSpec::Interval(interval)) => Err(QualityError::mismatch(
                column,
                format!("interval {} for a boolean metric", interval),
            )),
            (false, ThresholdSpec::Expect(expected)) => Err(QualityError::mismatch(
                column,
                format!("boolean threshold == {} for a numeric metric", expected),
            )),
        }
    }
}

/// Scores spans against a [`QualityConfig`].
///
/// The scorer is read-only once built and can be shared across threads.
#[derive(Debug, Clone)]
pub struct QualityScorer {
    config: QualityConfig,
    thresholds: ThresholdBag,
    vocabulary: Option<Vocabulary>,
}

impl QualityScorer {
    pub fn new(config: QualityConfig) -> QualityResult<Self> {
        config.validate()?;
        let thresholds = config.thresholds.to_bag();
        Ok(QualityScorer {
            config,
            thresholds,
            vocabulary: None,
        })
    }

    /// Replace the thresholds. Every name must be a metric this scorer
    /// reports, with that metric's shape and threshold kind.
    pub fn with_thresholds(mut self, thresholds: ThresholdBag) -> QualityResult<Self> {
        for (name, entry) in thresholds.iter() {
            let metric =
                Metric::from_name(name).ok_or_else(|| QualityError::UnknownMetric(name.to_string()))?;
            metric.check_threshold(entry)?;
        }
        self.thresholds = thresholds;
        Ok(self)
    }

    /// Compute `oov_ratio` against `vocabulary` instead of the tokens' flags.
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    /// Names of every metric, in reporting order.
    pub fn metric_names() -> impl Iterator<Item = &'static str> {
        Metric::ALL.iter().map(|metric| metric.name())
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    pub fn thresholds(&self) -> &ThresholdBag {
        &self.thresholds
    }

    pub fn scalar<S: TextSpan + ?Sized>(&self, metric: ScalarMetric, span: &S) -> Option<MetricValue> {
        let value: MetricValue = match metric {
            ScalarMetric::NStopWords => heuristics::n_stop_words(span).into(),
            ScalarMetric::AlphaRatio => heuristics::alpha_ratio(span).into(),
            ScalarMetric::MeanWordLength => heuristics::mean_word_length(span).into(),
            ScalarMetric::DocLength => heuristics::doc_length(span).into(),
            ScalarMetric::ProportionEllipsis => {
                heuristics::proportion_ellipsis(span, self.config.ellipses.as_slice()).into()
            }
            ScalarMetric::ProportionBulletPoints => {
                heuristics::proportion_bullet_points(span, self.config.bullet_points.as_slice()).into()
            }
            ScalarMetric::DuplicateLineChrFraction => duplicate_line_chr_fraction(span).into(),
            ScalarMetric::DuplicateParagraphChrFraction => {
                duplicate_paragraph_chr_fraction(span).into()
            }
            ScalarMetric::OovRatio => {
                return heuristics::oov_ratio(span, self.vocabulary.as_ref()).map(MetricValue::Ratio)
            }
        };
        Some(value)
    }

    pub fn group<S: TextSpan + ?Sized>(
        &self,
        metric: GroupMetric,
        span: &S,
    ) -> IndexMap<String, Option<MetricValue>> {
        let doc_char_len = span.text().len();
        match metric {
            GroupMetric::Contains => self
                .config
                .contains
                .iter()
                .map(|needle| {
                    let found = heuristics::contains_string(span, needle);
                    (needle.clone(), Some(MetricValue::Bool(found)))
                })
                .collect(),
            GroupMetric::SymbolToWordRatio => self
                .config
                .symbols
                .iter()
                .map(|symbol| {
                    let ratio = heuristics::symbol_to_word_ratio(span, symbol);
                    (symbol.clone(), Some(MetricValue::Ratio(ratio)))
                })
                .collect(),
            GroupMetric::TopNgramChrFraction => {
                let table = build_shingles(span, self.config.n_gram_range_top);
                by_size(top_ngram_chr_fraction(
                    &table,
                    doc_char_len,
                    self.config.top_ngram_min_count,
                ))
            }
            GroupMetric::DuplicateNgramChrFraction => {
                let table = build_shingles(span, self.config.n_gram_range_duplicate);
                by_size(duplicate_chr_fraction(&table, doc_char_len))
            }
        }
    }

    /// Every metric value of `span`, in reporting order.
    pub fn metrics<S: TextSpan + ?Sized>(&self, span: &S) -> MetricBag {
        let mut bag = MetricBag::new();
        for metric in Metric::ALL {
            match metric {
                Metric::Scalar(metric) => bag.insert_scalar(metric.name(), self.scalar(metric, span)),
                Metric::Group(metric) => bag.insert_group(metric.name(), self.group(metric, span)),
            }
        }
        bag
    }

    /// Check every metric of `span` against the thresholds.
    pub fn score<S: TextSpan + ?Sized>(&self, span: &S) -> QualityResult<QualityRecord> {
        let record = evaluate(&self.metrics(span), &self.thresholds)?;
        tracing::debug!(
            tokens = span.tokens().len(),
            passed = record.passed(),
            failures = ?record.failures(),
            "scored span"
        );
        Ok(record)
    }

    pub fn passed_quality_check<S: TextSpan + ?Sized>(&self, span: &S) -> QualityResult<bool> {
        Ok(self.score(span)?.passed())
    }

    /// Tokenize `text` with the reference tokenizer and score it.
    pub fn score_text(&self, text: &str) -> QualityResult<QualityRecord> {
        self.score(&create_document_from_string(text))
    }
}

fn by_size(fractions: BTreeMap<usize, f64>) -> IndexMap<String, Option<MetricValue>> {
    fractions
        .into_iter()
        .map(|(n, fraction)| (n.to_string(), Some(MetricValue::Ratio(fraction))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::Interval;
    use crate::Tokenizer;

    #[test]
    fn reports_every_metric_in_order() {
        let scorer = QualityScorer::new(QualityConfig::default()).unwrap();
        let bag = scorer.metrics(&create_document_from_string("This is a test."));
        assert_eq!(bag.names().collect::<Vec<_>>(), QualityScorer::metric_names().collect::<Vec<_>>());
    }

    #[test]
    fn metric_enums_match_names() {
        let mut names: Vec<&str> = ScalarMetric::ALL.iter().map(|m| m.name()).collect();
        names.extend(GroupMetric::ALL.iter().map(|m| m.name()));
        names.sort_unstable();
        let mut expected: Vec<&str> = QualityScorer::metric_names().collect();
        expected.sort_unstable();
        assert_eq!(names, expected);
    }

    #[test]
    fn unknown_threshold_names_are_rejected() {
        let scorer = QualityScorer::new(QualityConfig::default()).unwrap();
        let thresholds = ThresholdBag::new().with_scalar("n_stopwords", Interval::at_least(3.0));
        let err = scorer.with_thresholds(thresholds).unwrap_err();
        assert!(matches!(err, QualityError::UnknownMetric(ref name) if name == "n_stopwords"));
    }

    #[test]
    fn mistyped_thresholds_fail_before_scoring() {
        let scorer = || QualityScorer::new(QualityConfig::default()).unwrap();

        let err = scorer()
            .with_thresholds(ThresholdBag::new().with_scalar("n_stop_words", ThresholdSpec::Expect(true)))
            .unwrap_err();
        assert!(matches!(err, QualityError::ThresholdMismatch { ref metric, .. } if metric == "n_stop_words"));

        let err = scorer()
            .with_thresholds(ThresholdBag::new().with_scalar("contains", Interval::at_most(1.0)))
            .unwrap_err();
        assert!(matches!(err, QualityError::ThresholdMismatch { ref metric, .. } if metric == "contains"));

        let err = scorer()
            .with_thresholds(
                ThresholdBag::new().with_group("alpha_ratio", vec![("x", Interval::at_least(0.5))]),
            )
            .unwrap_err();
        assert!(matches!(err, QualityError::ThresholdMismatch { ref metric, .. } if metric == "alpha_ratio"));

        let err = scorer()
            .with_thresholds(
                ThresholdBag::new().with_group("contains", vec![("lorem ipsum", Interval::at_most(0.0))]),
            )
            .unwrap_err();
        assert!(
            matches!(err, QualityError::ThresholdMismatch { ref metric, .. } if metric == "contains_lorem ipsum")
        );

        let err = scorer()
            .with_thresholds(
                ThresholdBag::new().with_group("top_ngram_chr_fraction", vec![("2", false)]),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            QualityError::ThresholdMismatch { ref metric, .. } if metric == "top_ngram_chr_fraction_2"
        ));
    }

    #[test]
    fn default_thresholds_pass_their_own_check() {
        let bag = QualityConfig::default().thresholds.to_bag();
        for (name, entry) in bag.iter() {
            Metric::from_name(name).unwrap().check_threshold(entry).unwrap();
        }
        let scorer = QualityScorer::new(QualityConfig::default()).unwrap();
        assert!(scorer.with_thresholds(bag).is_ok());
    }

    #[test]
    fn custom_thresholds_replace_defaults() {
        let scorer = QualityScorer::new(QualityConfig::default())
            .unwrap()
            .with_thresholds(ThresholdBag::new().with_scalar("n_stop_words", Interval::at_least(3.0)))
            .unwrap();
        let record = scorer.score_text("This is a test. This is a test.").unwrap();
        assert!(record.passed());
        assert_eq!(record.scalar("n_stop_words").unwrap().value, Some(MetricValue::Count(6)));
        assert_eq!(record.scalar("alpha_ratio").unwrap().threshold, None);
    }

    #[test]
    fn oov_ratio_sources() {
        let scorer = QualityScorer::new(QualityConfig::default()).unwrap();
        let doc = create_document_from_string("This is a nonwrod");
        assert_eq!(scorer.scalar(ScalarMetric::OovRatio, &doc), None);

        let flagged = Tokenizer::new()
            .with_vocabulary(Vocabulary::from_words(vec!["This", "is", "a"]))
            .tokenize("This is a nonwrod");
        assert_eq!(
            scorer.scalar(ScalarMetric::OovRatio, &flagged),
            Some(MetricValue::Ratio(0.25))
        );

        let scorer = scorer.with_vocabulary(Vocabulary::from_words(vec!["This", "is"]));
        assert_eq!(
            scorer.scalar(ScalarMetric::OovRatio, &doc),
            Some(MetricValue::Ratio(0.5))
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = QualityConfig {
            contains: vec![String::new()],
            ..QualityConfig::default()
        };
        assert!(matches!(
            QualityScorer::new(config),
            Err(QualityError::InvalidConfig(_))
        ));
    }

    #[test]
    fn scores_sub_spans() {
        let scorer = QualityScorer::new(QualityConfig::default()).unwrap();
        let doc = create_document_from_string("lorem ipsum dolor. A clean sentence here.");
        let first = doc.span_range(0..4).unwrap();
        let second = doc.span_range(4..9).unwrap();
        let contains = |span: &crate::Span<'_>| {
            scorer.score(span).unwrap().group("contains").unwrap()["lorem ipsum"].value
        };
        assert_eq!(contains(&first), Some(MetricValue::Bool(true)));
        assert_eq!(contains(&second), Some(MetricValue::Bool(false)));
    }
}
