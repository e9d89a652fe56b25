use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SUMMARY_ID: &str = "SUMMARY";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome status as written to the reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutcomeStatus {
    Pass,
    Fail,
    /// Reserved for the run summary entry
    Info,
}

impl OutcomeStatus {
    /// Anything other than PASS or FAIL is recorded as FAIL
    pub fn normalize(status: &str) -> Self {
        match status {
            "PASS" => OutcomeStatus::Pass,
            _ => OutcomeStatus::Fail,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Pass => "PASS",
            OutcomeStatus::Fail => "FAIL",
            OutcomeStatus::Info => "INFO",
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    #[serde(rename = "Test ID")]
    pub test_id: String,
    #[serde(rename = "Test Name")]
    pub test_name: String,
    #[serde(rename = "Status")]
    pub status: OutcomeStatus,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Comments")]
    pub comments: String,
}

impl TestOutcome {
    pub fn is_summary(&self) -> bool {
        self.test_id == SUMMARY_ID
    }
}

/// Case counts in unittest terms: a failure is a failed assertion, an error is
/// anything else that stopped the case
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteTotals {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub errors: u32,
}

impl SuiteTotals {
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

impl fmt::Display for SuiteTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {}, Passed: {}, Failed: {}, Errors: {}",
            self.total, self.passed, self.failed, self.errors
        )
    }
}

/// Append-only log of outcomes for one run
#[derive(Debug, Clone, Default)]
pub struct ResultRecorder {
    outcomes: Vec<TestOutcome>,
    /// Ids of FAIL rows caused by something other than a failed assertion
    errored: Vec<String>,
}

impl ResultRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a case outcome stamped with the current local time
    pub fn record(&mut self, test_id: &str, test_name: &str, status: &str, comments: &str) {
        self.push(
            test_id,
            test_name,
            OutcomeStatus::normalize(status),
            comments,
        );
    }

    pub fn pass(&mut self, test_id: &str, test_name: &str, comments: &str) {
        self.record(test_id, test_name, OutcomeStatus::Pass.as_str(), comments);
    }

    /// A failed assertion
    pub fn fail(&mut self, test_id: &str, test_name: &str, comments: &str) {
        self.record(test_id, test_name, OutcomeStatus::Fail.as_str(), comments);
    }

    /// The case stopped before reaching its assertion; still a FAIL row
    pub fn error(&mut self, test_id: &str, test_name: &str, comments: &str) {
        self.fail(test_id, test_name, comments);
        self.errored.push(test_id.to_string());
    }

    /// Append the single INFO entry describing the whole run
    pub fn record_summary(&mut self, totals: &SuiteTotals) {
        self.push(
            SUMMARY_ID,
            "Test Execution Summary",
            OutcomeStatus::Info,
            &totals.to_string(),
        );
    }

    fn push(&mut self, test_id: &str, test_name: &str, status: OutcomeStatus, comments: &str) {
        self.outcomes.push(TestOutcome {
            test_id: test_id.to_string(),
            test_name: test_name.to_string(),
            status,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            comments: comments.to_string(),
        });
    }

    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    /// Per-case rows, summary excluded
    pub fn case_outcomes(&self) -> impl Iterator<Item = &TestOutcome> {
        self.outcomes.iter().filter(|o| !o.is_summary())
    }

    pub fn errored_ids(&self) -> &[String] {
        &self.errored
    }

    pub fn into_outcomes(self) -> Vec<TestOutcome> {
        self.outcomes
    }
}
