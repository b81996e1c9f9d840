//! Threshold checking and the quality record it produces.

mod bag;
mod evaluate;
mod metric;
mod record;

pub use bag::{MetricBag, MetricEntry, ThresholdBag};
pub use evaluate::evaluate;
pub use metric::{Interval, MetricOutcome, MetricValue, ThresholdSpec};
pub use record::{FlatRecord, QualityRecord, PASSED_COLUMN};
