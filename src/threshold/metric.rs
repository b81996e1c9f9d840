use crate::error::{QualityError, QualityResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A metric value in its native type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Bool(bool),
    Count(usize),
    Ratio(f64),
}

impl MetricValue {
    /// The value as a number, or `None` for booleans.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            MetricValue::Bool(_) => None,
            MetricValue::Count(count) => Some(count as f64),
            MetricValue::Ratio(ratio) => Some(ratio),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            MetricValue::Bool(value) => Some(value),
            _ => None,
        }
    }
}

impl From<bool> for MetricValue {
    fn from(value: bool) -> Self {
        MetricValue::Bool(value)
    }
}

impl From<usize> for MetricValue {
    fn from(value: usize) -> Self {
        MetricValue::Count(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Ratio(value)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Bool(value) => write!(f, "{}", value),
            MetricValue::Count(count) => write!(f, "{}", count),
            MetricValue::Ratio(ratio) => write!(f, "{:.3}", ratio),
        }
    }
}

/// A closed interval with optional bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Interval {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
}

impl Interval {
    pub fn new(low: Option<f64>, high: Option<f64>) -> Self {
        Interval { low, high }
    }

    pub fn at_least(low: f64) -> Self {
        Interval::new(Some(low), None)
    }

    pub fn at_most(high: f64) -> Self {
        Interval::new(None, Some(high))
    }

    pub fn between(low: f64, high: f64) -> Self {
        Interval::new(Some(low), Some(high))
    }

    /// Both bounds are inclusive; a missing bound is unbounded.
    pub fn contains(&self, value: f64) -> bool {
        self.low.map_or(true, |low| value >= low) && self.high.map_or(true, |high| value <= high)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        match self.low {
            Some(low) => write!(f, "{}", low)?,
            None => f.write_str("-inf")?,
        }
        f.write_str(", ")?;
        match self.high {
            Some(high) => write!(f, "{}", high)?,
            None => f.write_str("inf")?,
        }
        f.write_str("]")
    }
}

/// What a metric value is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdSpec {
    /// The value must equal this boolean.
    Expect(bool),
    Interval(Interval),
}

impl ThresholdSpec {
    /// Check `value`, failing when a boolean meets an interval or the other
    /// way around.
    pub fn check(&self, metric: &str, value: &MetricValue) -> QualityResult<bool> {
        match (self, value) {
            (ThresholdSpec::Expect(expected), MetricValue::Bool(actual)) => Ok(expected == actual),
            (ThresholdSpec::Interval(interval), MetricValue::Count(count)) => {
                Ok(interval.contains(*count as f64))
            }
            (ThresholdSpec::Interval(interval), MetricValue::Ratio(ratio)) => {
                Ok(interval.contains(*ratio))
            }
            (ThresholdSpec::Expect(_), numeric) => Err(QualityError::mismatch(
                metric,
                format!("boolean threshold for numeric value {}", numeric),
            )),
            (ThresholdSpec::Interval(interval), MetricValue::Bool(_)) => Err(QualityError::mismatch(
                metric,
                format!("interval {} for a boolean value", interval),
            )),
        }
    }
}

impl From<Interval> for ThresholdSpec {
    fn from(interval: Interval) -> Self {
        ThresholdSpec::Interval(interval)
    }
}

impl From<bool> for ThresholdSpec {
    fn from(expected: bool) -> Self {
        ThresholdSpec::Expect(expected)
    }
}

impl fmt::Display for ThresholdSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdSpec::Expect(expected) => write!(f, "== {}", expected),
            ThresholdSpec::Interval(interval) => write!(f, "{}", interval),
        }
    }
}

/// The value of one metric, its threshold, and the verdict.
///
/// `passed` is `None` exactly when `value` is `None`. A value without a
/// threshold passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricOutcome {
    pub value: Option<MetricValue>,
    pub threshold: Option<ThresholdSpec>,
    pub passed: Option<bool>,
}

impl MetricOutcome {
    pub fn new(
        metric: &str,
        value: Option<MetricValue>,
        threshold: Option<ThresholdSpec>,
    ) -> QualityResult<Self> {
        let passed = match (&value, &threshold) {
            (None, _) => None,
            (Some(_), None) => Some(true),
            (Some(value), Some(threshold)) => Some(threshold.check(metric, value)?),
        };
        Ok(MetricOutcome {
            value,
            threshold,
            passed,
        })
    }

    /// `false` only when the value was checked and failed.
    pub fn is_failure(&self) -> bool {
        self.passed == Some(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_bounds_are_inclusive() {
        let interval = Interval::between(3.0, 10.0);
        assert!(interval.contains(3.0));
        assert!(interval.contains(10.0));
        assert!(!interval.contains(2.999));
        assert!(Interval::default().contains(f64::MAX));
        assert!(Interval::at_least(2.0).contains(9.0));
        assert!(!Interval::at_most(0.2).contains(0.25));
    }

    #[test]
    fn counts_compare_exactly() {
        let spec = ThresholdSpec::from(Interval::at_least(3.0));
        assert!(spec.check("n_stop_words", &MetricValue::Count(9)).unwrap());
        assert!(!spec.check("n_stop_words", &MetricValue::Count(2)).unwrap());
    }

    #[test]
    fn boolean_expectations() {
        let spec = ThresholdSpec::Expect(false);
        assert!(spec.check("contains", &MetricValue::Bool(false)).unwrap());
        assert!(!spec.check("contains", &MetricValue::Bool(true)).unwrap());
    }

    #[test]
    fn kind_mismatch_is_an_error() {
        let err = ThresholdSpec::Expect(true)
            .check("alpha_ratio", &MetricValue::Ratio(0.5))
            .unwrap_err();
        assert!(matches!(err, QualityError::ThresholdMismatch { ref metric, .. } if metric == "alpha_ratio"));

        let err = ThresholdSpec::from(Interval::at_most(1.0))
            .check("contains", &MetricValue::Bool(true))
            .unwrap_err();
        assert!(matches!(err, QualityError::ThresholdMismatch { .. }));
    }

    #[test]
    fn outcome_invariants() {
        let missing = MetricOutcome::new("oov_ratio", None, Some(Interval::at_most(0.2).into())).unwrap();
        assert_eq!(missing.passed, None);
        assert!(!missing.is_failure());

        let unchecked = MetricOutcome::new("doc_length", Some(MetricValue::Count(4)), None).unwrap();
        assert_eq!(unchecked.passed, Some(true));

        let failed = MetricOutcome::new(
            "alpha_ratio",
            Some(MetricValue::Ratio(0.5)),
            Some(Interval::at_least(0.7).into()),
        )
        .unwrap();
        assert!(failed.is_failure());
    }

    #[test]
    fn display() {
        assert_eq!(Interval::at_least(2.0).to_string(), "[2, inf]");
        assert_eq!(Interval::at_most(0.15).to_string(), "[-inf, 0.15]");
        assert_eq!(ThresholdSpec::Expect(false).to_string(), "== false");
        assert_eq!(MetricValue::Ratio(0.44681).to_string(), "0.447");
        assert_eq!(MetricValue::Count(9).to_string(), "9");
    }

    #[test]
    fn deserializes_either_threshold_kind() {
        let spec: ThresholdSpec = parse_toml_value("false");
        assert_eq!(spec, ThresholdSpec::Expect(false));
        let spec: ThresholdSpec = parse_toml_value("{ high = 0.2 }");
        assert_eq!(spec, ThresholdSpec::Interval(Interval::at_most(0.2)));
    }

    /// Parse a TOML inline value through a one-key table.
    fn parse_toml_value(value: &str) -> ThresholdSpec {
        #[derive(Deserialize)]
        struct Wrapper {
            spec: ThresholdSpec,
        }
        let wrapper: Wrapper = toml::from_str(&format!("spec = {}", value)).unwrap();
        wrapper.spec
    }
}
