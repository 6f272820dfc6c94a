use std::fmt;

use serde::{Deserialize, Serialize};

use super::enums::{RangeKind, Severity, TestStatus};
use super::ModelError;

/// Reference interval for one test.
///
/// Constructors keep the bounds consistent with the kind: `Between` has both
/// bounds with `low <= high`, `LessThan` only `high`, `GreaterThan` only
/// `low`, `None` neither. Deserialization enforces the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct ReferenceRange {
    low: Option<f64>,
    high: Option<f64>,
    kind: RangeKind,
}

#[derive(Deserialize)]
struct RawRange {
    low: Option<f64>,
    high: Option<f64>,
    kind: RangeKind,
}

impl TryFrom<RawRange> for ReferenceRange {
    type Error = ModelError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        match (raw.kind, raw.low, raw.high) {
            (RangeKind::Between, Some(lo), Some(hi)) if lo <= hi => Ok(Self::between(lo, hi)),
            (RangeKind::Between, Some(lo), Some(hi)) => Err(ModelError::InvalidRange(format!(
                "between has low {lo} above high {hi}"
            ))),
            (RangeKind::LessThan, None, Some(hi)) => Ok(Self::less_than(hi)),
            (RangeKind::GreaterThan, Some(lo), None) => Ok(Self::greater_than(lo)),
            (RangeKind::None, None, None) => Ok(Self::none()),
            (kind, low, high) => Err(ModelError::InvalidRange(format!(
                "{} with low {low:?} and high {high:?}",
                kind.as_str()
            ))),
        }
    }
}

impl ReferenceRange {
    /// Closed interval. Reversed bounds are swapped.
    pub fn between(a: f64, b: f64) -> Self {
        Self {
            low: Some(a.min(b)),
            high: Some(a.max(b)),
            kind: RangeKind::Between,
        }
    }

    pub fn less_than(high: f64) -> Self {
        Self {
            low: None,
            high: Some(high),
            kind: RangeKind::LessThan,
        }
    }

    pub fn greater_than(low: f64) -> Self {
        Self {
            low: Some(low),
            high: None,
            kind: RangeKind::GreaterThan,
        }
    }

    pub fn none() -> Self {
        Self {
            low: None,
            high: None,
            kind: RangeKind::None,
        }
    }

    /// Build from knowledge-base bounds, either of which may be missing.
    pub fn from_bounds(low: Option<f64>, high: Option<f64>) -> Self {
        match (low, high) {
            (Some(lo), Some(hi)) => Self::between(lo, hi),
            (None, Some(hi)) => Self::less_than(hi),
            (Some(lo), None) => Self::greater_than(lo),
            (None, None) => Self::none(),
        }
    }

    pub fn low(&self) -> Option<f64> {
        self.low
    }

    pub fn high(&self) -> Option<f64> {
        self.high
    }

    pub fn kind(&self) -> RangeKind {
        self.kind
    }

    pub fn is_none(&self) -> bool {
        self.kind == RangeKind::None
    }

    /// True when `value` lies inside a closed `Between` interval.
    pub fn contains(&self, value: f64) -> bool {
        match (self.kind, self.low, self.high) {
            (RangeKind::Between, Some(lo), Some(hi)) => lo <= value && value <= hi,
            _ => false,
        }
    }
}

impl fmt::Display for ReferenceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.low, self.high) {
            (RangeKind::Between, Some(lo), Some(hi)) => write!(f, "{lo} - {hi}"),
            (RangeKind::LessThan, _, Some(hi)) => write!(f, "< {hi}"),
            (RangeKind::GreaterThan, Some(lo), _) => write!(f, "> {lo}"),
            _ => f.write_str("N/A"),
        }
    }
}

/// One classified lab value, keyed by canonical test name within a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub display_range: String,
    pub range: ReferenceRange,
    pub status: TestStatus,
    pub severity: Severity,
}

impl TestRecord {
    /// Unclassified record as produced by the resolver.
    pub fn new(name: String, value: f64, unit: String, range: ReferenceRange) -> Self {
        Self {
            display_range: range.to_string(),
            name,
            value,
            unit,
            range,
            status: TestStatus::Unknown,
            severity: Severity::None,
        }
    }
}
