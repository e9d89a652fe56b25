use super::types::TestResults;
use anyhow::Result;
use std::path::Path;

const HEADERS: [&str; 5] = ["Test ID", "Test Name", "Status", "Timestamp", "Comments"];

/// Write the header and one row per case outcome
///
/// The header is written up front so a run with no cases still yields a
/// well-formed file.
pub fn write_csv<W: std::io::Write>(results: &TestResults, writer: W) -> Result<()> {
    let mut wtr = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(HEADERS)?;
    for outcome in results.case_outcomes() {
        wtr.serialize(outcome)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn generate_csv(results: &TestResults) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(results, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// Generate CSV report
pub fn generate(results: &TestResults, output: Option<&Path>) -> Result<()> {
    let csv = generate_csv(results)?;

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!("CSV report saved to: {}", path.display());
    } else {
        print!("{}", csv);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::sample_results;

    #[test]
    fn test_rows_exclude_summary() {
        let csv = generate_csv(&sample_results()).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines[0], "Test ID,Test Name,Status,Timestamp,Comments");
        assert_eq!(lines.len(), 5);
        assert!(lines[2].starts_with("TC_03,Sign In Test,FAIL,"));
        assert!(!csv.contains("SUMMARY"));
    }

    #[test]
    fn test_comments_with_commas_are_quoted() {
        let mut results = sample_results();
        results.outcomes[0].comments = "one, two".to_string();

        let csv = generate_csv(&results).unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with(",\"one, two\""));
    }

    #[test]
    fn test_empty_run_keeps_header() {
        let mut results = sample_results();
        results.outcomes.retain(|o| o.is_summary());

        let csv = generate_csv(&results).unwrap();
        assert_eq!(csv, "Test ID,Test Name,Status,Timestamp,Comments\n");
    }
}
