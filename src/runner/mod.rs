pub mod cases;
pub mod context;
pub mod events;
pub mod fixtures;
pub mod state;

use anyhow::Result;
use colored::Colorize;
use log::{debug, error, info, warn};
use regex::Regex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::driver::traits::BrowserSession;
use crate::driver::web::WebDriver;
use crate::error::HarnessResult;
use crate::page::diagnostics::{self, CASE_SETUP_ERROR, INITIAL_LOAD, SUITE_SETUP_ERROR};
use crate::page::{AttendanceForm, FrameNavigator};
use crate::report::{self, ReportFiles, TestResults};
use crate::utils::config::HarnessConfig;

pub use cases::{CaseContext, CaseKind, TestCase, TEST_CASES};
pub use context::RunContext;
pub use events::*;
pub use state::*;

/// Everything one suite run produced
#[derive(Debug, Clone)]
pub struct SuiteOutcome {
    pub recorder: ResultRecorder,
    pub totals: SuiteTotals,
    pub duration_ms: u64,
    /// Set when the form could not be reached before any case ran
    pub setup_error: Option<String>,
}

/// Drives the selected cases against one browser session
pub struct SuiteRunner<'a> {
    session: &'a dyn BrowserSession,
    config: &'a HarnessConfig,
    context: &'a RunContext,
    emitter: &'a EventEmitter,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(
        session: &'a dyn BrowserSession,
        config: &'a HarnessConfig,
        context: &'a RunContext,
        emitter: &'a EventEmitter,
    ) -> Self {
        Self {
            session,
            config,
            context,
            emitter,
        }
    }

    /// Run `cases` in order, checking `stop` before each one
    ///
    /// Every case that starts contributes exactly one row; the summary row is
    /// appended last, including when suite setup failed.
    pub async fn run(&self, cases: &[&TestCase], stop: &AtomicBool) -> SuiteOutcome {
        let start = Instant::now();
        let mut recorder = ResultRecorder::new();
        let mut totals = SuiteTotals::default();
        let mut setup_error = None;

        self.emitter.emit(TestEvent::SuiteStarted {
            session_id: self.context.session_id.clone(),
            app_url: self.config.app_url.clone(),
            browser: self.session.browser_name().to_string(),
            case_count: cases.len(),
        });

        match self.set_up_suite().await {
            Err(e) => {
                error!("Suite setup failed: {}", e);
                totals.errors += 1;
                self.emitter.emit(TestEvent::SetupFailed {
                    error: e.to_string(),
                });
                setup_error = Some(e.to_string());
            }
            Ok(()) => {
                for (index, case) in cases.iter().enumerate() {
                    if stop.load(Ordering::SeqCst) {
                        warn!("Stop requested, skipping {} case(s)", cases.len() - index);
                        self.emitter.emit(TestEvent::Interrupted {
                            remaining: cases.len() - index,
                        });
                        break;
                    }
                    self.run_case(case, &mut recorder, &mut totals).await;
                }
            }
        }

        recorder.record_summary(&totals);
        info!("Test Execution Summary: {}", totals);

        let duration_ms = start.elapsed().as_millis() as u64;
        self.emitter.emit(TestEvent::SuiteFinished {
            totals,
            duration_ms,
        });

        SuiteOutcome {
            recorder,
            totals,
            duration_ms,
            setup_error,
        }
    }

    /// First load: snapshot the page, then make sure the form is reachable
    async fn set_up_suite(&self) -> HarnessResult<()> {
        info!("Opening {}", self.config.app_url);
        self.session.navigate(&self.config.app_url).await?;

        diagnostics::capture_screenshot(self.session, &self.context.output_dir, INITIAL_LOAD).await;
        if let Ok(source) = self.session.page_source().await {
            debug!("=== INITIAL PAGE SOURCE ===\n{}", source);
        }

        if let Err(e) = FrameNavigator::new(self.session, self.config)
            .enter_form()
            .await
        {
            diagnostics::capture(self.session, &self.context.output_dir, SUITE_SETUP_ERROR).await;
            return Err(e);
        }
        Ok(())
    }

    /// Fresh navigation and empty fields before every case
    async fn set_up_case(&self) -> HarnessResult<()> {
        if let Err(e) = FrameNavigator::new(self.session, self.config)
            .open(&self.config.app_url)
            .await
        {
            diagnostics::capture(self.session, &self.context.output_dir, CASE_SETUP_ERROR).await;
            return Err(e);
        }
        AttendanceForm::new(self.session, self.config)
            .clear_all_fields()
            .await;
        Ok(())
    }

    async fn run_case(
        &self,
        case: &TestCase,
        recorder: &mut ResultRecorder,
        totals: &mut SuiteTotals,
    ) {
        self.emitter.emit(TestEvent::CaseStarted {
            id: case.id.to_string(),
            name: case.name.to_string(),
            method: case.method.to_string(),
        });
        let start = Instant::now();
        totals.total += 1;

        let ctx = CaseContext {
            session: self.session,
            config: self.config,
            output_dir: &self.context.output_dir,
        };
        let result = match self.set_up_case().await {
            Ok(()) => case.run(&ctx).await,
            Err(e) => Err(e),
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(comment) => {
                info!("{} {} passed", case.id, case.name);
                recorder.pass(case.id, case.name, &comment);
                totals.passed += 1;
                self.emitter.emit(TestEvent::CasePassed {
                    id: case.id.to_string(),
                    comment,
                    duration_ms,
                });
            }
            Err(e) => {
                let message = e.to_string();
                error!("{} {} failed: {}", case.id, case.name, message);
                if e.is_assertion() {
                    recorder.fail(case.id, case.name, &message);
                    totals.failed += 1;
                    self.emitter.emit(TestEvent::CaseFailed {
                        id: case.id.to_string(),
                        error: message,
                        duration_ms,
                    });
                } else {
                    recorder.error(case.id, case.name, &message);
                    totals.errors += 1;
                    self.emitter.emit(TestEvent::CaseErrored {
                        id: case.id.to_string(),
                        error: message,
                        duration_ms,
                    });
                }
            }
        }
    }
}

/// Options for one `run` invocation
pub struct RunOptions {
    pub config: HarnessConfig,
    pub output: PathBuf,
    /// Only run cases whose id matches
    pub only: Option<Regex>,
}

/// Result of a finished run, after reports were written
pub struct RunSummary {
    pub totals: SuiteTotals,
    pub files: ReportFiles,
    pub setup_error: Option<String>,
}

/// Launch the browser, run the suite and export every report
pub async fn run_suite(options: RunOptions) -> Result<RunSummary> {
    let RunOptions {
        config,
        output,
        only,
    } = options;

    let selected = cases::select(only.as_ref());
    if selected.is_empty() {
        anyhow::bail!("No test cases match the given filter");
    }

    let context = RunContext::new(&output);

    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        eprintln!(
            "\n{} Stopping after the current case (press Ctrl+C again to abort)",
            "■".yellow().bold()
        );
    }) {
        warn!("Could not install Ctrl+C handler: {}", e);
    }

    let driver = WebDriver::new(config.browser.to_driver_config()).await?;

    let (emitter, receiver) = EventEmitter::new();
    let listener = tokio::spawn(ConsoleEventListener::listen(receiver));

    let outcome = SuiteRunner::new(&driver, &config, &context, &emitter)
        .run(&selected, &stop)
        .await;

    if let Err(e) = driver.close().await {
        warn!("Failed to close browser: {}", e);
    }
    drop(emitter);
    let _ = listener.await;

    let totals = outcome.totals;
    let setup_error = outcome.setup_error.clone();
    let results = TestResults::from_run(&context, &config, driver.browser_name(), outcome);
    let files = report::export_all(&results, &context.output_dir)?;

    Ok(RunSummary {
        totals,
        files,
        setup_error,
    })
}
