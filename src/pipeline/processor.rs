//! Report analysis orchestrator.
//!
//! Single entry point that drives the full lab-report pipeline:
//! parse → resolve → classify → aggregate risk → narrate.
//!
//! Every stage is a pure function over the previous stage's output, so one
//! analyzer can serve concurrent calls without locking.

use uuid::Uuid;

use crate::config::AnalysisConfig;
use crate::intelligence::{
    classify_records, compute_risk_scores, generate_summary, ReferenceTable,
    RiskLevelThresholds, SeverityThresholds,
};
use crate::models::{LabReport, PatientProfile};
use crate::pipeline::extraction::clean_ocr_text;
use crate::pipeline::structuring::{parse_lines, resolve_matches};

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Runs one report's text through every stage.
///
/// Holds only read-only state: the reference table and thresholds.
#[derive(Debug, Clone)]
pub struct ReportAnalyzer<'a> {
    reference: &'a ReferenceTable,
    config: AnalysisConfig,
}

impl ReportAnalyzer<'static> {
    /// Analyzer over the bundled reference table.
    pub fn with_builtin(config: AnalysisConfig) -> Self {
        Self::new(ReferenceTable::builtin(), config)
    }
}

impl Default for ReportAnalyzer<'static> {
    fn default() -> Self {
        Self::with_builtin(AnalysisConfig::default())
    }
}

impl<'a> ReportAnalyzer<'a> {
    pub fn new(reference: &'a ReferenceTable, config: AnalysisConfig) -> Self {
        Self { reference, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceTable {
        self.reference
    }

    /// Analyze already-cleaned text.
    ///
    /// Never fails: text with no recognizable rows yields an empty record list
    /// and the "no data" summary.
    pub fn analyze(&self, cleaned_text: &str, patient: &PatientProfile) -> LabReport {
        let mut records = resolve_matches(parse_lines(cleaned_text), self.reference);

        classify_records(&mut records, &SeverityThresholds::from(&self.config));
        let risk_scores = compute_risk_scores(&records, &RiskLevelThresholds::from(&self.config));
        let summary = generate_summary(&records, patient, self.config.senior_age);

        let report_id = report_id_for(cleaned_text);
        tracing::info!(
            report_id = %report_id,
            records = records.len(),
            abnormal = summary.abnormal_count,
            categories = risk_scores.len(),
            "Analyzed lab report"
        );

        LabReport {
            report_id,
            records,
            risk_scores,
            summary,
        }
    }

    /// Clean raw OCR output, then analyze it.
    pub fn analyze_raw(&self, raw_text: &str, patient: &PatientProfile) -> LabReport {
        self.analyze(&clean_ocr_text(raw_text), patient)
    }
}

/// Content-derived id: identical text always gets the same id.
pub fn report_id_for(cleaned_text: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, cleaned_text.as_bytes())
}

/// Analyze cleaned text with the bundled table and default thresholds.
pub fn analyze_report(cleaned_text: &str, patient: &PatientProfile) -> LabReport {
    ReportAnalyzer::default().analyze(cleaned_text, patient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::ReferenceEntry;
    use crate::models::{Gender, RiskLevel, Severity, TestStatus};

    const SAMPLE_REPORT: &str = "\
CITY DIAGNOSTICS LAB
Patient Name: John Smith
Patient ID: 10423
Age: 64 Sex: Male
Date: 12/03/2024

COMPLETE BLOOD COUNT
Hemoglobin   9.5 g/dL   12.0 - 17.5
WBC Count 7.2 K/µL 4.0 - 11.0
Platelet Count 250 K/µL 150 - 400

BIOCHEMISTRY
Glucose: 250 mg/dL (70-100)
HbA1c: 8.1 % (4.0 - 5.6)
Serum Creatinine: 1.0 mg/dL (0.6 - 1.2)
TSH 2.1 mIU/L 0.4 - 4.0
Lactate Dehydrogenase 310 U/L
Haemoglobin 14.0 g/dL
Page 1 of 1";

    fn adult() -> PatientProfile {
        PatientProfile::new(Some(40), Gender::Male)
    }

    #[test]
    fn hemoglobin_line_end_to_end() {
        let report = analyze_report("Hemoglobin   9.5 g/dL   12.0 - 17.5", &adult());
        assert_eq!(report.records.len(), 1);
        let hb = &report.records[0];
        assert_eq!(hb.name, "Hemoglobin");
        assert_eq!(hb.value, 9.5);
        assert_eq!(hb.unit, "g/dL");
        assert_eq!(hb.status, TestStatus::Low);
        assert_eq!(hb.severity, Severity::Moderate);
    }

    #[test]
    fn glucose_line_end_to_end() {
        let report = analyze_report("Glucose: 250 mg/dL (70-100)", &adult());
        assert_eq!(report.records[0].status, TestStatus::High);
        assert_eq!(report.records[0].severity, Severity::Severe);
        assert_eq!(report.risk_scores[0].category, "Diabetes Risk");
        assert_eq!(report.risk_scores[0].score, 100);
    }

    #[test]
    fn empty_text_gives_no_data_report() {
        let report = analyze_report("", &adult());
        assert!(report.records.is_empty());
        assert!(report.risk_scores.is_empty());
        assert_eq!(report.summary.heading, "No Data Extracted");
        assert_eq!(report.summary.abnormal_count, 0);
    }

    #[test]
    fn all_normal_report() {
        let text = "Hemoglobin 14.2 g/dL 12.0 - 17.5\nGlucose: 88 mg/dL (70-100)\nTSH 2.0";
        let report = analyze_report(text, &adult());
        assert_eq!(report.summary.heading, "All Values Within Normal Range");
        assert_eq!(report.risk_scores.len(), 3);
        for score in &report.risk_scores {
            assert_eq!(score.score, 0);
            assert_eq!(score.level, RiskLevel::Low);
        }
    }

    #[test]
    fn metadata_only_text_yields_nothing() {
        let report = analyze_report("Patient Name: John Smith", &adult());
        assert!(report.records.is_empty());
        assert_eq!(report.summary.heading, "No Data Extracted");
    }

    #[test]
    fn full_report_pipeline() {
        let report = ReportAnalyzer::default().analyze_raw(SAMPLE_REPORT, &adult());
        let names: Vec<&str> = report.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Hemoglobin",
                "White Blood Cells",
                "Platelets",
                "Blood Glucose",
                "HbA1c",
                "Serum Creatinine",
                "TSH",
                "Lactate Dehydrogenase",
            ]
        );

        // Haemoglobin repeats Hemoglobin; the first reading is kept.
        assert_eq!(report.records[0].value, 9.5);

        let summary = &report.summary;
        assert_eq!(summary.total, 8);
        assert_eq!(summary.abnormal_count, 3);
        assert_eq!(summary.normal_count, 5);
        assert_eq!(summary.unranged_count, 1);
        assert_eq!(summary.heading, "3 Values Need Attention");
        assert_eq!(summary.findings.len(), 3);

        assert_eq!(report.risk_scores[0].category, "Diabetes Risk");
        assert_eq!(report.risk_scores[0].score, 100);
        assert_eq!(report.risk_scores[0].tests_found, 2);
    }

    #[test]
    fn analysis_is_idempotent() {
        let analyzer = ReportAnalyzer::default();
        let first = analyzer.analyze_raw(SAMPLE_REPORT, &adult());
        let second = analyzer.analyze_raw(SAMPLE_REPORT, &adult());
        assert_eq!(first, second);
        assert_eq!(first.report_id, report_id_for(&clean_ocr_text(SAMPLE_REPORT)));
    }

    #[test]
    fn different_text_gets_different_id() {
        assert_ne!(report_id_for("Hemoglobin 13.0"), report_id_for("Hemoglobin 13.1"));
    }

    #[test]
    fn senior_patients_get_plain_language() {
        let senior = PatientProfile::new(Some(72), Gender::Female);
        let report = analyze_report("TSH 2.0", &senior);
        assert!(report.summary.description.starts_with("In simple terms: "));
    }

    #[test]
    fn config_changes_thresholds() {
        let config = AnalysisConfig {
            senior_age: 30,
            risk_high_from: 101,
            ..AnalysisConfig::default()
        };
        let analyzer = ReportAnalyzer::with_builtin(config);
        let report = analyzer.analyze("TSH 9.0", &adult());
        assert_eq!(report.risk_scores[0].level, RiskLevel::Medium);
        assert!(report.summary.description.starts_with("In simple terms: "));
    }

    #[test]
    fn custom_reference_table() {
        let table = ReferenceTable::from_entries(vec![ReferenceEntry {
            alias: "lactate".into(),
            canonical_name: "Lactate".into(),
            low: Some(0.5),
            high: Some(2.2),
            unit: "mmol/L".into(),
        }]);
        let analyzer = ReportAnalyzer::new(&table, AnalysisConfig::default());
        let report = analyzer.analyze("Lactate: 3.1", &adult());
        assert_eq!(report.records[0].status, TestStatus::High);
        assert_eq!(report.records[0].unit, "mmol/L");
    }

    #[test]
    fn value_is_read_after_a_name_holding_numbers() {
        let report = analyze_report("Glucose 2 hr PP: 140 mg/dL", &adult());
        assert_eq!(report.records.len(), 1);
        let glucose = &report.records[0];
        assert_eq!(glucose.name, "Blood Glucose");
        assert_eq!(glucose.value, 140.0);
        assert_eq!(glucose.status, TestStatus::High);
    }
}
