use super::{MetricValue, ThresholdSpec};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named entry: one value, or a group of values keyed by a parameter such
/// as the n-gram size or the searched string.
///
/// When deserializing, a map is read as a group first, so `{}` is an empty
/// group rather than an unbounded interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricEntry<T> {
    Group(IndexMap<String, T>),
    Scalar(T),
}

impl<T> MetricEntry<T> {
    pub fn as_scalar(&self) -> Option<&T> {
        match self {
            MetricEntry::Scalar(value) => Some(value),
            MetricEntry::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&IndexMap<String, T>> {
        match self {
            MetricEntry::Scalar(_) => None,
            MetricEntry::Group(group) => Some(group),
        }
    }

    /// Every leaf with its flat column name: `{name}` or `{name}_{key}`.
    pub fn leaves<'a>(&'a self, name: &'a str) -> Vec<(String, &'a T)> {
        match self {
            MetricEntry::Scalar(value) => vec![(name.to_string(), value)],
            MetricEntry::Group(group) => group
                .iter()
                .map(|(key, value)| (format!("{}_{}", name, key), value))
                .collect(),
        }
    }
}

macro_rules! named_bag {
    ($(#[$meta:meta])* $bag:ident, $leaf:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $bag {
            entries: IndexMap<String, MetricEntry<$leaf>>,
        }

        impl $bag {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn insert_scalar(&mut self, name: impl Into<String>, value: impl Into<$leaf>) {
                self.entries
                    .insert(name.into(), MetricEntry::Scalar(value.into()));
            }

            pub fn insert_group<K, V>(
                &mut self,
                name: impl Into<String>,
                group: impl IntoIterator<Item = (K, V)>,
            ) where
                K: Into<String>,
                V: Into<$leaf>,
            {
                let group = group
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect();
                self.entries.insert(name.into(), MetricEntry::Group(group));
            }

            /// Builder form of [`insert_scalar`](Self::insert_scalar).
            pub fn with_scalar(mut self, name: impl Into<String>, value: impl Into<$leaf>) -> Self {
                self.insert_scalar(name, value);
                self
            }

            /// Builder form of [`insert_group`](Self::insert_group).
            pub fn with_group<K, V>(
                mut self,
                name: impl Into<String>,
                group: impl IntoIterator<Item = (K, V)>,
            ) -> Self
            where
                K: Into<String>,
                V: Into<$leaf>,
            {
                self.insert_group(name, group);
                self
            }

            pub fn get(&self, name: &str) -> Option<&MetricEntry<$leaf>> {
                self.entries.get(name)
            }

            pub fn remove(&mut self, name: &str) -> Option<MetricEntry<$leaf>> {
                self.entries.shift_remove(name)
            }

            pub fn names(&self) -> impl Iterator<Item = &str> {
                self.entries.keys().map(String::as_str)
            }

            pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricEntry<$leaf>)> {
                self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
            }

            pub fn len(&self) -> usize {
                self.entries.len()
            }

            pub fn is_empty(&self) -> bool {
                self.entries.is_empty()
            }
        }

        impl FromIterator<(String, MetricEntry<$leaf>)> for $bag {
            fn from_iter<I: IntoIterator<Item = (String, MetricEntry<$leaf>)>>(iter: I) -> Self {
                $bag {
                    entries: iter.into_iter().collect(),
                }
            }
        }
    };
}

named_bag!(
    /// Metric values by name, in insertion order. `None` marks a metric that
    /// could not be computed.
    MetricBag,
    Option<MetricValue>
);

named_bag!(
    /// Thresholds by metric name, in insertion order.
    ThresholdBag,
    ThresholdSpec
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::Interval;

    #[test]
    fn builds_scalars_and_groups() {
        let bag = MetricBag::new()
            .with_scalar("n_stop_words", MetricValue::Count(9))
            .with_scalar("oov_ratio", None::<MetricValue>)
            .with_group("contains", vec![("lorem ipsum", Some(MetricValue::Bool(false)))]);

        assert_eq!(bag.names().collect::<Vec<_>>(), vec!["n_stop_words", "oov_ratio", "contains"]);
        assert_eq!(
            bag.get("n_stop_words").and_then(MetricEntry::as_scalar),
            Some(&Some(MetricValue::Count(9)))
        );
        assert!(bag.get("contains").and_then(MetricEntry::as_group).is_some());
    }

    #[test]
    fn flat_leaf_names() {
        let thresholds = ThresholdBag::new().with_group(
            "top_ngram_chr_fraction",
            vec![("2", Interval::at_most(0.2)), ("3", Interval::at_most(0.18))],
        );
        let entry = thresholds.get("top_ngram_chr_fraction").unwrap();
        let names: Vec<String> = entry
            .leaves("top_ngram_chr_fraction")
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["top_ngram_chr_fraction_2", "top_ngram_chr_fraction_3"]);
    }

    #[test]
    fn deserializes_from_toml() {
        let thresholds: ThresholdBag = toml::from_str(
            r#"
            n_stop_words = { low = 3 }
            contains = { "lorem ipsum" = false }
            "#,
        )
        .unwrap();
        assert_eq!(
            thresholds.get("n_stop_words"),
            Some(&MetricEntry::Scalar(ThresholdSpec::Interval(Interval::at_least(3.0))))
        );
        assert_eq!(
            thresholds
                .get("contains")
                .and_then(MetricEntry::as_group)
                .and_then(|group| group.get("lorem ipsum")),
            Some(&ThresholdSpec::Expect(false))
        );
    }

    #[test]
    fn empty_table_is_an_empty_group() {
        let thresholds: ThresholdBag = toml::from_str(
            r#"
            top_ngram_chr_fraction = {}
            alpha_ratio = { low = 0.5, high = 1.0 }
            "#,
        )
        .unwrap();
        assert_eq!(
            thresholds.get("top_ngram_chr_fraction"),
            Some(&MetricEntry::Group(IndexMap::new()))
        );
        assert_eq!(
            thresholds.get("alpha_ratio"),
            Some(&MetricEntry::Scalar(ThresholdSpec::Interval(Interval::between(0.5, 1.0))))
        );

        let values = MetricBag::new()
            .with_group("top_ngram_chr_fraction", vec![("2", MetricValue::Ratio(0.9))]);
        let record = crate::threshold::evaluate(&values, &thresholds).unwrap();
        assert!(record.passed());
        assert_eq!(record.failures(), Vec::<String>::new());
    }
}
