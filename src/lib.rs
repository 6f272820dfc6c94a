pub mod config;
pub mod models;
pub mod pipeline;
pub mod intelligence; // Knowledge base, classification, risk, narrative

pub use config::AnalysisConfig;
pub use intelligence::ReferenceTable;
pub use models::{LabReport, PatientProfile};
pub use pipeline::processor::{analyze_report, ReportAnalyzer};
