use super::{MetricEntry, MetricOutcome, MetricValue};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Name of the overall verdict column in [`QualityRecord::to_flat`].
pub const PASSED_COLUMN: &str = "passed_overall";

/// One row of flat columns: the overall verdict, then `{metric}` or
/// `{metric}_{key}` values. `None` serializes as null.
pub type FlatRecord = IndexMap<String, Option<MetricValue>>;

/// Every metric outcome of one span, with the overall verdict.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QualityRecord {
    entries: IndexMap<String, MetricEntry<MetricOutcome>>,
}

impl QualityRecord {
    pub(crate) fn from_entries(entries: IndexMap<String, MetricEntry<MetricOutcome>>) -> Self {
        QualityRecord { entries }
    }

    /// `true` unless some checked value failed. Unavailable values never
    /// fail.
    pub fn passed(&self) -> bool {
        self.leaves().all(|(_, outcome)| !outcome.is_failure())
    }

    pub fn get(&self, name: &str) -> Option<&MetricEntry<MetricOutcome>> {
        self.entries.get(name)
    }

    pub fn scalar(&self, name: &str) -> Option<&MetricOutcome> {
        self.get(name).and_then(MetricEntry::as_scalar)
    }

    pub fn group(&self, name: &str) -> Option<&IndexMap<String, MetricOutcome>> {
        self.get(name).and_then(MetricEntry::as_group)
    }

    /// Whether metric `name` passed; a group passes when none of its keys
    /// failed.
    pub fn metric_passed(&self, name: &str) -> Option<bool> {
        self.get(name).map(|entry| match entry {
            MetricEntry::Scalar(outcome) => !outcome.is_failure(),
            MetricEntry::Group(group) => group.values().all(|outcome| !outcome.is_failure()),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every leaf outcome with its flat column name.
    pub fn leaves(&self) -> impl Iterator<Item = (String, &MetricOutcome)> + '_ {
        self.entries
            .iter()
            .flat_map(|(name, entry)| entry.leaves(name))
    }

    /// Flat column names of the failed leaves, in metric order.
    pub fn failures(&self) -> Vec<String> {
        self.leaves()
            .filter(|(_, outcome)| outcome.is_failure())
            .map(|(column, _)| column)
            .collect()
    }

    /// One flat row: [`PASSED_COLUMN`] first, then every leaf value.
    pub fn to_flat(&self) -> FlatRecord {
        let mut flat = FlatRecord::with_capacity(self.entries.len() + 1);
        flat.insert(PASSED_COLUMN.to_string(), Some(MetricValue::Bool(self.passed())));
        for (column, outcome) in self.leaves() {
            flat.insert(column, outcome.value);
        }
        flat
    }
}

impl fmt::Display for QualityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", PASSED_COLUMN, self.passed())?;
        for (column, outcome) in self.leaves() {
            write!(f, "\n{} = ", column)?;
            match outcome.value {
                Some(value) => write!(f, "{}", value)?,
                None => f.write_str("n/a")?,
            }
            match outcome.threshold {
                Some(threshold) => write!(f, " {}", threshold)?,
                None => f.write_str(" -")?,
            }
            f.write_str(match outcome.passed {
                Some(true) => " pass",
                Some(false) => " FAIL",
                None => " n/a",
            })?;
        }
        Ok(())
    }
}
