use super::types::TestResults;
use crate::runner::state::OutcomeStatus;
use anyhow::Result;
use std::path::Path;

/// Generate HTML report
pub fn generate(results: &TestResults, output: Option<&Path>) -> Result<()> {
    let html = generate_html(results);

    if let Some(path) = output {
        std::fs::write(path, html)?;
        println!("HTML report saved to: {}", path.display());
    } else {
        println!("{}", html);
    }

    Ok(())
}

pub fn generate_html(results: &TestResults) -> String {
    let mut rows_html = String::new();
    for outcome in results.case_outcomes() {
        let row_class = match outcome.status {
            OutcomeStatus::Pass => "pass",
            _ => "fail",
        };
        rows_html.push_str(&format!(
            r##"
            <tr class="{row_class}">
                <td>{id}</td>
                <td>{name}</td>
                <td>{status}</td>
                <td>{timestamp}</td>
                <td>{comments}</td>
            </tr>"##,
            row_class = row_class,
            id = html_escape(&outcome.test_id),
            name = html_escape(&outcome.test_name),
            status = outcome.status,
            timestamp = html_escape(&outcome.timestamp),
            comments = html_escape(&outcome.comments),
        ));
    }

    let totals = &results.totals;

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Attendance System Test Results</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; }}
        h1 {{ color: #333; }}
        .meta {{ color: #666; margin-bottom: 16px; }}
        table {{ border-collapse: collapse; width: 100%; }}
        th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}
        th {{ background-color: #f2f2f2; }}
        tr.pass {{ background-color: #dff0d8; }}
        tr.fail {{ background-color: #f2dede; }}
    </style>
</head>
<body>
    <h1>Attendance System Test Results</h1>
    <p class="meta">Execution Time: {generated_at} ({duration})</p>
    <p class="meta">{totals}</p>
    <table>
        <tr>
            <th>Test ID</th>
            <th>Test Name</th>
            <th>Status</th>
            <th>Timestamp</th>
            <th>Comments</th>
        </tr>{rows}
    </table>
</body>
</html>
"##,
        generated_at = html_escape(&results.generated_at),
        duration = format_duration(results.duration_ms),
        totals = totals,
        rows = rows_html,
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60000;
        let seconds = (ms % 60000) as f64 / 1000.0;
        format!("{}m {:.0}s", minutes, seconds)
    }
}
