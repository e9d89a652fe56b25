use super::types::TestResults;
use crate::runner::state::{OutcomeStatus, TestOutcome};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;

/// Generate JUnit XML report string from TestResults
pub fn generate_junit_xml(results: &TestResults) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let total_tests = results.case_outcomes().count();
    let failures = results
        .case_outcomes()
        .filter(|o| o.status != OutcomeStatus::Pass && !results.is_error(o))
        .count();
    let time = (results.duration_ms as f64 / 1000.0).to_string();

    // <testsuites>
    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "attendance-tester"));
    suites_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suites_start.push_attribute(("failures", failures.to_string().as_str()));
    suites_start.push_attribute(("errors", results.totals.errors.to_string().as_str()));
    suites_start.push_attribute(("time", time.as_str()));
    writer.write_event(Event::Start(suites_start))?;

    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", "AttendanceSystemTest"));
    suite_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suite_start.push_attribute(("failures", failures.to_string().as_str()));
    suite_start.push_attribute(("errors", results.totals.errors.to_string().as_str()));
    suite_start.push_attribute(("id", results.session_id.as_str()));
    suite_start.push_attribute(("time", time.as_str()));
    suite_start.push_attribute(("timestamp", results.generated_at.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    for outcome in results.case_outcomes() {
        write_test_case(&mut writer, outcome, results.is_error(outcome))?;
    }

    if let Some(summary) = results.outcomes.iter().find(|o| o.is_summary()) {
        writer.write_event(Event::Start(BytesStart::new("system-out")))?;
        writer.write_event(Event::Text(BytesText::new(&summary.comments)))?;
        writer.write_event(Event::End(BytesEnd::new("system-out")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let result = writer.into_inner().into_inner();
    let xml = String::from_utf8(result)?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(
    writer: &mut Writer<W>,
    outcome: &TestOutcome,
    errored: bool,
) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", outcome.test_name.as_str()));
    case_start.push_attribute(("classname", outcome.test_id.as_str()));
    case_start.push_attribute(("timestamp", outcome.timestamp.as_str()));

    if outcome.status == OutcomeStatus::Pass {
        writer.write_event(Event::Empty(case_start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(case_start))?;

    let message = if outcome.comments.is_empty() {
        "Unknown error"
    } else {
        outcome.comments.as_str()
    };
    // JUnit keeps failed assertions and errors in different elements
    let (tag, kind) = if errored {
        ("error", "Error")
    } else {
        ("failure", "AssertionError")
    };
    let mut problem_start = BytesStart::new(tag);
    problem_start.push_attribute(("message", message));
    problem_start.push_attribute(("type", kind));
    writer.write_event(Event::Start(problem_start))?;
    writer.write_event(Event::Text(BytesText::new(message)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Generate JUnit report
pub fn generate(results: &TestResults, output: Option<&Path>) -> Result<()> {
    let xml = generate_junit_xml(results)?;

    if let Some(path) = output {
        std::fs::write(path, xml)?;
        println!("JUnit report saved to: {}", path.display());
    } else {
        println!("{}", xml);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::sample_results;

    #[test]
    fn test_generate_junit_xml() {
        let xml = generate_junit_xml(&sample_results()).expect("Failed to generate XML");

        assert!(xml.contains(r#"<testsuites name="attendance-tester""#));
        assert!(xml.contains(r#"tests="4""#));
        assert!(xml.contains(r#"failures="1""#));
        assert!(xml.contains(r#"errors="1""#));
        assert!(xml.contains(r#"<testcase name="Page Loading Test" classname="TC_01""#));
        assert!(xml.contains(
            r#"<failure message="Sign In status message not found" type="AssertionError">"#
        ));
        assert!(xml.contains(
            r#"<error message="Timed out after 10000ms waiting for id=Email" type="Error">"#
        ));
        assert_eq!(xml.matches("<failure ").count(), 1);
        assert!(xml.contains("<system-out>Total: 4, Passed: 2, Failed: 1, Errors: 1</system-out>"));
        assert!(!xml.contains(r#"classname="SUMMARY""#));
    }
}
