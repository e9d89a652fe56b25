use crate::runner::context::RunContext;
use crate::runner::state::{SuiteTotals, TestOutcome, TIMESTAMP_FORMAT};
use crate::runner::SuiteOutcome;
use crate::utils::config::HarnessConfig;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Test results for report generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResults {
    pub session_id: String,
    pub app_url: String,
    pub browser: String,
    pub generated_at: String,
    pub duration_ms: u64,
    pub totals: SuiteTotals,
    /// Every recorded outcome, summary entry last
    pub outcomes: Vec<TestOutcome>,
    /// FAIL rows that were errors rather than failed assertions
    #[serde(default)]
    pub errored: Vec<String>,
}

impl TestResults {
    pub fn from_run(
        context: &RunContext,
        config: &HarnessConfig,
        browser: &str,
        outcome: SuiteOutcome,
    ) -> Self {
        Self {
            session_id: context.session_id.clone(),
            app_url: config.app_url.clone(),
            browser: browser.to_string(),
            generated_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            duration_ms: outcome.duration_ms,
            totals: outcome.totals,
            errored: outcome.recorder.errored_ids().to_vec(),
            outcomes: outcome.recorder.into_outcomes(),
        }
    }

    /// Rows that belong in tabular reports
    pub fn case_outcomes(&self) -> impl Iterator<Item = &TestOutcome> {
        self.outcomes.iter().filter(|o| !o.is_summary())
    }

    pub fn is_error(&self, outcome: &TestOutcome) -> bool {
        self.errored.contains(&outcome.test_id)
    }
}

#[cfg(test)]
pub(crate) fn sample_results() -> TestResults {
    use crate::runner::state::ResultRecorder;

    let mut recorder = ResultRecorder::new();
    recorder.pass("TC_01", "Page Loading Test", "");
    recorder.fail(
        "TC_03",
        "Sign In Test",
        "Sign In status message not found",
    );
    recorder.error(
        "TC_04",
        "Sign Out Test",
        "Timed out after 10000ms waiting for id=Email",
    );
    recorder.pass(
        "TC_11",
        "Page Load Performance Test",
        "Load time: 1.23s (Threshold: 5.0s)",
    );
    let totals = SuiteTotals {
        total: 4,
        passed: 2,
        failed: 1,
        errors: 1,
    };
    recorder.record_summary(&totals);

    TestResults {
        session_id: "test-session".to_string(),
        app_url: "http://localhost/exec".to_string(),
        browser: "chromium".to_string(),
        generated_at: "2024-03-01 09:30:00".to_string(),
        duration_ms: 4200,
        totals,
        errored: recorder.errored_ids().to_vec(),
        outcomes: recorder.into_outcomes(),
    }
}
