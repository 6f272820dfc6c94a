use std::collections::HashMap;

use crate::config::AnalysisConfig;
use crate::models::{RiskCategoryScore, RiskLevel, TestRecord, TestStatus};

/// A clinical grouping of canonical test names.
#[derive(Debug, Clone, Copy)]
pub struct RiskCategory {
    pub name: &'static str,
    pub icon: &'static str,
    pub tests: &'static [&'static str],
    pub insight: &'static str,
}

pub const RISK_CATEGORIES: &[RiskCategory] = &[
    RiskCategory {
        name: "Diabetes Risk",
        icon: "🩸",
        tests: &[
            "Blood Glucose",
            "Fasting Blood Glucose",
            "Fasting Blood Sugar",
            "Random Blood Sugar",
            "HbA1c",
            "Glycated Hemoglobin",
        ],
        insight: "Elevated glucose or HbA1c values may indicate impaired glucose tolerance.",
    },
    RiskCategory {
        name: "Cardiovascular Risk",
        icon: "❤️",
        tests: &[
            "Total Cholesterol",
            "LDL Cholesterol",
            "HDL Cholesterol",
            "Triglycerides",
            "VLDL",
        ],
        insight: "Abnormal lipid values are associated with increased cardiovascular risk.",
    },
    RiskCategory {
        name: "Kidney Function",
        icon: "🫘",
        tests: &[
            "Creatinine",
            "Serum Creatinine",
            "BUN",
            "Blood Urea",
            "Uric Acid",
            "eGFR",
        ],
        insight: "Out-of-range kidney markers may indicate reduced kidney filtration.",
    },
    RiskCategory {
        name: "Liver Function",
        icon: "🫀",
        tests: &[
            "SGPT (ALT)",
            "ALT",
            "SGOT (AST)",
            "AST",
            "Alkaline Phosphatase",
            "ALP",
            "Bilirubin Total",
            "GGT",
        ],
        insight: "Elevated liver enzymes may reflect liver stress or inflammation.",
    },
    RiskCategory {
        name: "Thyroid Health",
        icon: "🦋",
        tests: &["TSH", "Free T3", "Free T4", "T3", "T4"],
        insight: "Thyroid imbalances affect metabolism, energy, and mood.",
    },
    RiskCategory {
        name: "Anaemia Risk",
        icon: "💉",
        tests: &[
            "Hemoglobin",
            "Red Blood Cells",
            "Hematocrit",
            "Ferritin",
            "Serum Iron",
            "MCV",
        ],
        insight: "Low blood cell or iron values may indicate anaemia.",
    },
];

/// Score buckets for category levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskLevelThresholds {
    pub medium_from: u32,
    pub high_from: u32,
}

impl Default for RiskLevelThresholds {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for RiskLevelThresholds {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            medium_from: config.risk_medium_from,
            high_from: config.risk_high_from,
        }
    }
}

impl RiskLevelThresholds {
    pub fn level(&self, score: u32) -> RiskLevel {
        if score < self.medium_from {
            RiskLevel::Low
        } else if score < self.high_from {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

/// `round(100 * abnormal / relevant)`, for `relevant > 0`.
pub fn category_score(abnormal: usize, relevant: usize) -> u32 {
    (100.0 * abnormal as f64 / relevant as f64).round() as u32
}

/// Score every category that has at least one classified record.
///
/// Categories with no matching records are omitted. Output is ordered by score,
/// highest first; equal scores keep category table order.
pub fn compute_risk_scores(
    records: &[TestRecord],
    thresholds: &RiskLevelThresholds,
) -> Vec<RiskCategoryScore> {
    if records.is_empty() {
        return Vec::new();
    }

    let status_by_name: HashMap<String, TestStatus> = records
        .iter()
        .map(|r| (r.name.to_lowercase(), r.status))
        .collect();

    let mut scores: Vec<RiskCategoryScore> = RISK_CATEGORIES
        .iter()
        .filter_map(|category| {
            let statuses: Vec<TestStatus> = category
                .tests
                .iter()
                .filter_map(|t| status_by_name.get(&t.to_lowercase()).copied())
                .collect();
            if statuses.is_empty() {
                return None;
            }

            let abnormal = statuses.iter().filter(|s| s.is_abnormal()).count();
            let score = category_score(abnormal, statuses.len());

            Some(RiskCategoryScore {
                category: category.name.into(),
                icon: category.icon.into(),
                score,
                level: thresholds.level(score),
                tests_found: statuses.len(),
                tests_abnormal: abnormal,
                insight: category.insight.into(),
            })
        })
        .collect();

    // sort_by is stable, so ties stay in table order.
    scores.sort_by(|a, b| b.score.cmp(&a.score));

    tracing::debug!(categories = scores.len(), "Computed risk scores");
    scores
}
