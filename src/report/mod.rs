pub mod csv;
pub mod html;
pub mod json;
pub mod junit;
pub mod types;

use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

pub use types::TestResults;

/// Formats accepted by the `report` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Csv,
    Html,
    Junit,
    Json,
}

/// Files written at the end of a run
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub csv: PathBuf,
    pub html: PathBuf,
    pub json: PathBuf,
    pub junit: PathBuf,
}

impl ReportFiles {
    pub fn all(&self) -> [&Path; 4] {
        [
            self.csv.as_path(),
            self.html.as_path(),
            self.json.as_path(),
            self.junit.as_path(),
        ]
    }
}

/// `attendance_test_results_<YYYYmmdd_HHMMSS>`
pub fn report_stem(at: &DateTime<Local>) -> String {
    format!("attendance_test_results_{}", at.format("%Y%m%d_%H%M%S"))
}

/// Write every report for `results` into `output_dir`, sharing one timestamp
pub fn export_all(results: &TestResults, output_dir: &Path) -> Result<ReportFiles> {
    std::fs::create_dir_all(output_dir)?;
    let stem = report_stem(&Local::now());
    let files = ReportFiles {
        csv: output_dir.join(format!("{}.csv", stem)),
        html: output_dir.join(format!("{}.html", stem)),
        json: output_dir.join(format!("{}.json", stem)),
        junit: output_dir.join(format!("{}.xml", stem)),
    };

    csv::generate(results, Some(&files.csv))?;
    html::generate(results, Some(&files.html))?;
    json::generate(results, Some(&files.json))?;
    junit::generate(results, Some(&files.junit))?;

    log::info!("Reports written to {}", output_dir.display());
    Ok(files)
}

/// Generate report from saved test results
pub fn generate_report(
    results_path: &Path,
    format: ReportFormat,
    output: Option<&Path>,
) -> Result<()> {
    let test_results = json::load(results_path)?;

    match format {
        ReportFormat::Csv => csv::generate(&test_results, output),
        ReportFormat::Html => html::generate(&test_results, output),
        ReportFormat::Junit => junit::generate(&test_results, output),
        ReportFormat::Json => json::generate(&test_results, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::sample_results;
    use chrono::TimeZone;

    #[test]
    fn test_report_stem() {
        let at = Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(report_stem(&at), "attendance_test_results_20240301_090507");
    }

    #[test]
    fn test_export_all_shares_stem() {
        let dir = std::env::temp_dir().join(format!("attendance-report-{}", uuid::Uuid::new_v4()));
        let files = export_all(&sample_results(), &dir).unwrap();

        for path in files.all() {
            assert!(path.exists(), "{} missing", path.display());
            assert_eq!(
                path.file_stem(),
                files.csv.file_stem(),
                "reports should share one timestamp"
            );
        }

        let rerendered = dir.join("again.csv");
        generate_report(&files.json, ReportFormat::Csv, Some(&rerendered)).unwrap();
        assert_eq!(
            std::fs::read_to_string(&rerendered).unwrap(),
            std::fs::read_to_string(&files.csv).unwrap()
        );

        std::fs::remove_dir_all(&dir).ok();
    }
}
