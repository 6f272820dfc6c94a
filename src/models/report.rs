use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lab::TestRecord;
use super::risk::RiskCategoryScore;
use super::summary::ReportSummary;

/// Everything produced for one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabReport {
    /// Derived from the cleaned text, stable across runs.
    pub report_id: Uuid,
    pub records: Vec<TestRecord>,
    pub risk_scores: Vec<RiskCategoryScore>,
    pub summary: ReportSummary,
}

/// A previously analyzed report, supplied by the host for comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalVisit {
    pub visit_date: NaiveDate,
    pub records: Vec<TestRecord>,
}
