use super::{MetricBag, MetricEntry, MetricOutcome, MetricValue, QualityRecord, ThresholdBag, ThresholdSpec};
use crate::error::{QualityError, QualityResult};
use indexmap::IndexMap;

/// Check every value in `values` against its threshold in `thresholds`.
///
/// Thresholds for metrics (or group keys) missing from `values` are skipped.
/// A value without a threshold passes. A boolean checked against an interval,
/// or a scalar checked against a group, is an error.
pub fn evaluate(values: &MetricBag, thresholds: &ThresholdBag) -> QualityResult<QualityRecord> {
    let mut entries = IndexMap::with_capacity(values.len());

    for (name, entry) in values.iter() {
        let outcome = match (entry, thresholds.get(name)) {
            (MetricEntry::Scalar(value), None) => {
                MetricEntry::Scalar(MetricOutcome::new(name, *value, None)?)
            }
            (MetricEntry::Scalar(value), Some(MetricEntry::Scalar(threshold))) => {
                MetricEntry::Scalar(MetricOutcome::new(name, *value, Some(*threshold))?)
            }
            (MetricEntry::Group(group), None) => MetricEntry::Group(check_group(name, group, None)?),
            (MetricEntry::Group(group), Some(MetricEntry::Group(group_thresholds))) => {
                MetricEntry::Group(check_group(name, group, Some(group_thresholds))?)
            }
            (MetricEntry::Scalar(_), Some(MetricEntry::Group(_))) => {
                return Err(QualityError::mismatch(
                    name,
                    "grouped thresholds for a scalar metric",
                ))
            }
            (MetricEntry::Group(_), Some(MetricEntry::Scalar(_))) => {
                return Err(QualityError::mismatch(
                    name,
                    "a single threshold for a grouped metric",
                ))
            }
        };
        entries.insert(name.to_string(), outcome);
    }

    let record = QualityRecord::from_entries(entries);
    tracing::trace!(metrics = record.len(), passed = record.passed(), "evaluated thresholds");
    Ok(record)
}

fn check_group(
    name: &str,
    group: &IndexMap<String, Option<MetricValue>>,
    thresholds: Option<&IndexMap<String, ThresholdSpec>>,
) -> QualityResult<IndexMap<String, MetricOutcome>> {
    let mut outcomes = IndexMap::with_capacity(group.len());
    for (key, value) in group {
        let column = format!("{}_{}", name, key);
        let threshold = thresholds.and_then(|thresholds| thresholds.get(key)).copied();
        outcomes.insert(key.clone(), MetricOutcome::new(&column, *value, threshold)?);
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::Interval;

    fn stop_words(value: usize) -> MetricBag {
        MetricBag::new().with_scalar("n_stop_words", MetricValue::Count(value))
    }

    #[test]
    fn lower_bound_on_counts() {
        let thresholds = ThresholdBag::new().with_scalar("n_stop_words", Interval::at_least(3.0));
        assert!(evaluate(&stop_words(9), &thresholds).unwrap().passed());
        assert!(!evaluate(&stop_words(2), &thresholds).unwrap().passed());
    }

    #[test]
    fn thresholds_without_values_are_skipped() {
        let thresholds = ThresholdBag::new()
            .with_scalar("n_stop_words", Interval::at_least(3.0))
            .with_scalar("alpha_ratio", Interval::at_least(0.99))
            .with_group("contains", vec![("lorem ipsum", false)]);
        let record = evaluate(&stop_words(9), &thresholds).unwrap();
        assert!(record.passed());
        assert!(record.get("alpha_ratio").is_none());
    }

    #[test]
    fn group_keys_without_thresholds_pass() {
        let values = MetricBag::new().with_group(
            "top_ngram_chr_fraction",
            vec![("2", MetricValue::Ratio(0.9)), ("3", MetricValue::Ratio(0.1))],
        );
        let thresholds = ThresholdBag::new().with_group(
            "top_ngram_chr_fraction",
            vec![("3", Interval::at_most(0.18)), ("7", Interval::at_most(0.0))],
        );
        let record = evaluate(&values, &thresholds).unwrap();
        let group = record.group("top_ngram_chr_fraction").unwrap();
        assert_eq!(group["2"].threshold, None);
        assert_eq!(group["2"].passed, Some(true));
        assert_eq!(group["3"].passed, Some(true));
        assert!(!group.contains_key("7"));
        assert!(record.passed());
    }

    #[test]
    fn unavailable_values_never_fail() {
        let values = MetricBag::new()
            .with_scalar("n_stop_words", MetricValue::Count(9))
            .with_scalar("oov_ratio", None::<MetricValue>);
        let thresholds = ThresholdBag::new().with_scalar("oov_ratio", Interval::at_most(0.2));
        let record = evaluate(&values, &thresholds).unwrap();
        assert_eq!(record.scalar("oov_ratio").unwrap().passed, None);
        assert!(record.passed());
    }

    #[test]
    fn one_failing_key_fails_the_group() {
        let values = MetricBag::new().with_group(
            "contains",
            vec![
                ("lorem ipsum", MetricValue::Bool(true)),
                ("click here", MetricValue::Bool(false)),
            ],
        );
        let thresholds = ThresholdBag::new().with_group(
            "contains",
            vec![("lorem ipsum", false), ("click here", false)],
        );
        let record = evaluate(&values, &thresholds).unwrap();
        assert!(!record.passed());
        assert_eq!(record.failures(), vec!["contains_lorem ipsum"]);
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let thresholds = ThresholdBag::new().with_group("n_stop_words", vec![("3", Interval::at_least(1.0))]);
        let err = evaluate(&stop_words(9), &thresholds).unwrap_err();
        assert!(matches!(err, QualityError::ThresholdMismatch { ref metric, .. } if metric == "n_stop_words"));

        let values = MetricBag::new().with_group("contains", vec![("x", MetricValue::Bool(true))]);
        let thresholds = ThresholdBag::new().with_scalar("contains", ThresholdSpec::Expect(false));
        assert!(evaluate(&values, &thresholds).is_err());
    }

    #[test]
    fn kind_mismatch_names_the_column() {
        let values = MetricBag::new().with_group("contains", vec![("x", MetricValue::Bool(true))]);
        let thresholds = ThresholdBag::new().with_group("contains", vec![("x", Interval::at_most(1.0))]);
        let err = evaluate(&values, &thresholds).unwrap_err();
        assert!(matches!(err, QualityError::ThresholdMismatch { ref metric, .. } if metric == "contains_x"));
    }
}
