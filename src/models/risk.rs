use serde::{Deserialize, Serialize};

use super::enums::RiskLevel;

/// Fraction of one clinical category's panel that is out of range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskCategoryScore {
    pub category: String,
    pub icon: String,
    /// 0-100.
    pub score: u32,
    pub level: RiskLevel,
    pub tests_found: usize,
    pub tests_abnormal: usize,
    pub insight: String,
}
