use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::*;

/// Plain-text context handed to the conversational assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledContext {
    pub text: String,
    pub current_records: usize,
    pub visits_included: usize,
    pub trends: Vec<TrendPoint>,
}

/// How one current value compares to its most recent prior reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub name: String,
    pub unit: String,
    pub previous_date: NaiveDate,
    pub previous_value: f64,
    pub current_value: f64,
    /// `current_value - previous_value`.
    pub change: f64,
    pub direction: TrendDirection,
    pub previous_status: TestStatus,
    pub current_status: TestStatus,
    /// Out of range before, within range now.
    pub improved: bool,
    /// Within range before, out of range now.
    pub worsened: bool,
}
