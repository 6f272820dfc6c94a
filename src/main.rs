//! LabSight host runner: analyze one report file and print the result as JSON.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use labsight::config::{self, ConfigError};
use labsight::intelligence::{ReferenceDataError, ReferenceTable};
use labsight::models::{Gender, HistoricalVisit, LabReport, PatientProfile};
use labsight::pipeline::rag::{build_assistant_context, AssembledContext};
use labsight::{AnalysisConfig, ReportAnalyzer};

#[derive(Parser)]
#[command(
    name = "labsight",
    version,
    about = "Turn lab report text into classified results, risk scores and a plain-language summary"
)]
struct Cli {
    /// Text file holding the report (OCR output).
    #[arg(value_name = "REPORT")]
    report: PathBuf,

    /// Patient age in years. Older patients get plainer wording.
    #[arg(long)]
    age: Option<u32>,

    /// male, female or not_specified.
    #[arg(long, default_value = "not_specified")]
    gender: Gender,

    /// JSON array of previous visits; adds the assistant context to the output.
    #[arg(long, value_name = "PATH")]
    history: Option<PathBuf>,

    /// JSON file overriding analysis thresholds.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON array of reference entries replacing the bundled table.
    #[arg(long, value_name = "PATH")]
    reference: Option<PathBuf>,

    /// Clean the input as raw OCR output before parsing.
    #[arg(long)]
    raw: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Cannot read {0}: {1}")]
    Read(String, String),

    #[error("Invalid history file {0}: {1}")]
    History(String, String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Reference(#[from] ReferenceDataError),

    #[error("Cannot serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Output<'a> {
    report: &'a LabReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    assistant_context: Option<AssembledContext>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    match run(&cli) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Analysis failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };

    let custom_table = cli
        .reference
        .as_deref()
        .map(ReferenceTable::from_json_file)
        .transpose()?;
    let table: &ReferenceTable = match custom_table.as_ref() {
        Some(t) => t,
        None => ReferenceTable::builtin(),
    };

    let text = read_text(&cli.report)?;
    let patient = PatientProfile::new(cli.age, cli.gender);
    let analyzer = ReportAnalyzer::new(table, config);

    let report = if cli.raw {
        analyzer.analyze_raw(&text, &patient)
    } else {
        analyzer.analyze(&text, &patient)
    };

    let assistant_context = match &cli.history {
        Some(path) => {
            let history = read_history(path)?;
            Some(build_assistant_context(
                &report.records,
                &history,
                analyzer.config().history_visits,
            ))
        }
        None => None,
    };

    let output = Output {
        report: &report,
        assistant_context,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn read_text(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::Read(path.display().to_string(), e.to_string()))
}

fn read_history(path: &Path) -> Result<Vec<HistoricalVisit>, CliError> {
    let json = read_text(path)?;
    serde_json::from_str(&json)
        .map_err(|e| CliError::History(path.display().to_string(), e.to_string()))
}
