use serde::{Deserialize, Serialize};

use super::enums::{Direction, Gender, Severity, TestStatus};

/// Patient attributes that shape the narrative tone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Gender,
}

impl PatientProfile {
    pub fn new(age: Option<u32>, gender: Gender) -> Self {
        Self { age, gender }
    }
}

/// Plain-language note for one abnormal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub name: String,
    pub status: TestStatus,
    pub value: f64,
    pub unit: String,
    pub ref_range: String,
    pub direction: Direction,
    pub severity: Severity,
    /// "slightly" / "notably" / "significantly".
    pub severity_word: String,
    /// Empty when no explanation entry matches the test name.
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub heading: String,
    pub description: String,
    pub findings: Vec<Finding>,
    pub lifestyle: Vec<String>,
    pub total: usize,
    pub abnormal_count: usize,
    /// `total - abnormal_count`.
    pub normal_count: usize,
    /// Records without a resolvable reference range.
    pub unranged_count: usize,
}
