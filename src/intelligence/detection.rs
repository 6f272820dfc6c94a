use crate::config::AnalysisConfig;
use crate::models::{RangeKind, ReferenceRange, Severity, TestRecord, TestStatus};

/// Deviation cut-offs for severity buckets, as fractions of the range span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityThresholds {
    pub mild: f64,
    pub moderate: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for SeverityThresholds {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            mild: config.mild_deviation,
            moderate: config.moderate_deviation,
        }
    }
}

/// Compare a value against its range.
pub fn compute_status(value: f64, range: &ReferenceRange) -> TestStatus {
    match (range.kind(), range.low(), range.high()) {
        (RangeKind::Between, Some(lo), Some(hi)) => {
            if value < lo {
                TestStatus::Low
            } else if value > hi {
                TestStatus::High
            } else {
                TestStatus::Normal
            }
        }
        (RangeKind::LessThan, _, Some(hi)) => {
            if value < hi {
                TestStatus::Normal
            } else {
                TestStatus::High
            }
        }
        (RangeKind::GreaterThan, Some(lo), _) => {
            if value > lo {
                TestStatus::Normal
            } else {
                TestStatus::Low
            }
        }
        _ => TestStatus::Unknown,
    }
}

/// Distance from the violated boundary divided by the range span, or `None`
/// when it cannot be normalized (one-sided range or zero span).
pub fn normalized_deviation(value: f64, range: &ReferenceRange, status: TestStatus) -> Option<f64> {
    let (lo, hi) = (range.low()?, range.high()?);
    let span = (hi - lo).abs();
    if span == 0.0 {
        return None;
    }
    let boundary = match status {
        TestStatus::Low => lo,
        TestStatus::High => hi,
        TestStatus::Normal | TestStatus::Unknown => return None,
    };
    Some((value - boundary).abs() / span)
}

pub fn compute_severity(
    value: f64,
    range: &ReferenceRange,
    status: TestStatus,
    thresholds: &SeverityThresholds,
) -> Severity {
    if !status.is_abnormal() {
        return Severity::None;
    }
    match normalized_deviation(value, range, status) {
        None => Severity::Moderate,
        Some(d) if d < thresholds.mild => Severity::Mild,
        Some(d) if d < thresholds.moderate => Severity::Moderate,
        Some(_) => Severity::Severe,
    }
}

/// Status and severity for one value.
pub fn classify(
    value: f64,
    range: &ReferenceRange,
    thresholds: &SeverityThresholds,
) -> (TestStatus, Severity) {
    let status = compute_status(value, range);
    let severity = compute_severity(value, range, status, thresholds);
    (status, severity)
}

/// Fill in status and severity on every record.
pub fn classify_records(records: &mut [TestRecord], thresholds: &SeverityThresholds) {
    for record in records.iter_mut() {
        let (status, severity) = classify(record.value, &record.range, thresholds);
        record.status = status;
        record.severity = severity;
    }
    tracing::debug!(
        records = records.len(),
        abnormal = records.iter().filter(|r| r.status.is_abnormal()).count(),
        "Classified test records"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(value: f64, range: ReferenceRange) -> (TestStatus, Severity) {
        classify(value, &range, &SeverityThresholds::default())
    }

    #[test]
    fn hemoglobin_low_is_moderate() {
        // |9.5 - 12.0| / 5.5 ≈ 0.45
        let (status, severity) = run(9.5, ReferenceRange::between(12.0, 17.5));
        assert_eq!(status, TestStatus::Low);
        assert_eq!(severity, Severity::Moderate);
    }

    #[test]
    fn glucose_far_above_is_severe() {
        // |250 - 100| / 30 = 5.0
        let (status, severity) = run(250.0, ReferenceRange::between(70.0, 100.0));
        assert_eq!(status, TestStatus::High);
        assert_eq!(severity, Severity::Severe);
    }

    #[test]
    fn slightly_above_is_mild() {
        let (status, severity) = run(105.0, ReferenceRange::between(70.0, 100.0));
        assert_eq!(status, TestStatus::High);
        assert_eq!(severity, Severity::Mild);
    }

    #[test]
    fn between_bounds_are_inclusive() {
        let range = ReferenceRange::between(70.0, 100.0);
        assert_eq!(run(70.0, range).0, TestStatus::Normal);
        assert_eq!(run(100.0, range).0, TestStatus::Normal);
        assert_eq!(run(85.0, range), (TestStatus::Normal, Severity::None));
    }

    #[test]
    fn normal_iff_within_between_range() {
        let range = ReferenceRange::between(3.5, 5.0);
        for tenth in 0..100 {
            let value = tenth as f64 / 10.0;
            let (status, _) = run(value, range);
            assert_eq!(status == TestStatus::Normal, range.contains(value), "value {value}");
        }
    }

    #[test]
    fn less_than_range() {
        let range = ReferenceRange::less_than(200.0);
        assert_eq!(run(180.0, range).0, TestStatus::Normal);
        // One-sided ranges cannot be normalized.
        assert_eq!(run(200.0, range), (TestStatus::High, Severity::Moderate));
        assert_eq!(run(900.0, range), (TestStatus::High, Severity::Moderate));
    }

    #[test]
    fn greater_than_range() {
        let range = ReferenceRange::greater_than(40.0);
        assert_eq!(run(55.0, range).0, TestStatus::Normal);
        assert_eq!(run(40.0, range), (TestStatus::Low, Severity::Moderate));
    }

    #[test]
    fn no_range_is_unknown() {
        assert_eq!(
            run(42.0, ReferenceRange::none()),
            (TestStatus::Unknown, Severity::None)
        );
    }

    #[test]
    fn zero_span_defaults_to_moderate() {
        let range = ReferenceRange::between(5.0, 5.0);
        assert_eq!(run(9.0, range), (TestStatus::High, Severity::Moderate));
        assert_eq!(run(1.0, range), (TestStatus::Low, Severity::Moderate));
    }

    #[test]
    fn severity_grows_with_deviation() {
        let range = ReferenceRange::between(10.0, 20.0);
        let rank = |s: Severity| match s {
            Severity::Mild => 1,
            Severity::Moderate => 2,
            Severity::Severe => 3,
            Severity::None => 0,
        };
        let mut last = 0;
        for step in 1..200 {
            let value = 20.0 + step as f64 * 0.05;
            let (status, severity) = run(value, range);
            assert_eq!(status, TestStatus::High);
            assert!(rank(severity) >= last, "severity dropped at {value}");
            last = rank(severity);
        }
        assert_eq!(last, 3);
    }

    #[test]
    fn thresholds_follow_config() {
        let config = AnalysisConfig {
            mild_deviation: 0.05,
            moderate_deviation: 0.1,
            ..AnalysisConfig::default()
        };
        let thresholds = SeverityThresholds::from(&config);
        let (_, severity) = classify(105.0, &ReferenceRange::between(70.0, 100.0), &thresholds);
        // 5 / 30 ≈ 0.17, past both custom cut-offs.
        assert_eq!(severity, Severity::Severe);
    }

    #[test]
    fn classify_records_updates_in_place() {
        let mut records = vec![
            TestRecord::new("A".into(), 1.0, String::new(), ReferenceRange::between(2.0, 3.0)),
            TestRecord::new("B".into(), 2.5, String::new(), ReferenceRange::between(2.0, 3.0)),
            TestRecord::new("C".into(), 2.5, String::new(), ReferenceRange::none()),
        ];
        classify_records(&mut records, &SeverityThresholds::default());
        assert_eq!(records[0].status, TestStatus::Low);
        assert_eq!(records[0].severity, Severity::Severe);
        assert_eq!(records[1].status, TestStatus::Normal);
        assert_eq!(records[2].status, TestStatus::Unknown);
    }
}
