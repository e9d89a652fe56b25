use super::state::SuiteTotals;
use tokio::sync::broadcast;

/// Suite execution events for real-time console output
#[derive(Debug, Clone)]
pub enum TestEvent {
    // Suite events
    SuiteStarted {
        session_id: String,
        app_url: String,
        browser: String,
        case_count: usize,
    },
    SetupFailed {
        error: String,
    },
    SuiteFinished {
        totals: SuiteTotals,
        duration_ms: u64,
    },
    Interrupted {
        remaining: usize,
    },

    // Case events
    CaseStarted {
        id: String,
        name: String,
        method: String,
    },
    CasePassed {
        id: String,
        comment: String,
        duration_ms: u64,
    },
    /// Assertion did not hold
    CaseFailed {
        id: String,
        error: String,
        duration_ms: u64,
    },
    /// Case stopped before reaching its assertion
    CaseErrored {
        id: String,
        error: String,
        duration_ms: u64,
    },
}

/// Event emitter for broadcasting test events
pub struct EventEmitter {
    sender: broadcast::Sender<TestEvent>,
}

impl EventEmitter {
    pub fn new() -> (Self, broadcast::Receiver<TestEvent>) {
        let (sender, receiver) = broadcast::channel(100);
        (Self { sender }, receiver)
    }

    pub fn emit(&self, event: TestEvent) {
        let _ = self.sender.send(event);
    }
}

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration as StdDuration;

/// Console event listener printing unittest-style verbose progress
///
/// Runs until every sender is dropped, so awaiting its task guarantees the
/// summary has been printed.
pub struct ConsoleEventListener;

struct Problem {
    kind: &'static str,
    label: String,
    error: String,
}

impl ConsoleEventListener {
    pub async fn listen(mut receiver: broadcast::Receiver<TestEvent>) {
        use colored::Colorize;
        use std::io::IsTerminal;

        let interactive = std::io::stdout().is_terminal();
        let mut spinner: Option<ProgressBar> = None;
        let mut current_label = String::new();
        let mut problems: Vec<Problem> = Vec::new();

        while let Ok(event) = receiver.recv().await {
            match event {
                TestEvent::SuiteStarted {
                    session_id,
                    app_url,
                    browser,
                    case_count,
                } => {
                    println!(
                        "\n{} Attendance suite started: {}",
                        "▶".green().bold(),
                        session_id.cyan()
                    );
                    println!("  URL: {}", app_url.cyan());
                    println!("  Browser: {}", browser.cyan());
                    println!("  Cases: {}\n", case_count);
                }

                TestEvent::SetupFailed { error } => {
                    println!(
                        "{} Suite setup failed: {}",
                        "✗".red().bold(),
                        error.red()
                    );
                    problems.push(Problem {
                        kind: "ERROR",
                        label: "setUpClass".to_string(),
                        error,
                    });
                }

                TestEvent::CaseStarted { id, name, method } => {
                    current_label = format!("{} ({} {})", method, id, name);
                    let pb = if interactive {
                        ProgressBar::new_spinner()
                    } else {
                        ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
                    };
                    pb.set_style(
                        ProgressStyle::default_spinner()
                            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                            .template("  {spinner} {msg}")
                            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                    );
                    pb.set_message(format!("{} ...", current_label));
                    pb.enable_steady_tick(StdDuration::from_millis(80));
                    spinner = Some(pb);
                }

                TestEvent::CasePassed {
                    comment,
                    duration_ms,
                    ..
                } => {
                    finish(&mut spinner);
                    let note = if comment.is_empty() {
                        String::new()
                    } else {
                        format!(" - {}", comment)
                    };
                    println!(
                        "  {} {} ... {} ({}ms){}",
                        "✓".green(),
                        current_label,
                        "ok".green().bold(),
                        duration_ms,
                        note.dimmed()
                    );
                }

                TestEvent::CaseFailed {
                    error, duration_ms, ..
                } => {
                    finish(&mut spinner);
                    println!(
                        "  {} {} ... {} ({}ms)",
                        "✗".red(),
                        current_label,
                        "FAIL".red().bold(),
                        duration_ms
                    );
                    problems.push(Problem {
                        kind: "FAIL",
                        label: current_label.clone(),
                        error,
                    });
                }

                TestEvent::CaseErrored {
                    error, duration_ms, ..
                } => {
                    finish(&mut spinner);
                    println!(
                        "  {} {} ... {} ({}ms)",
                        "!".yellow(),
                        current_label,
                        "ERROR".yellow().bold(),
                        duration_ms
                    );
                    problems.push(Problem {
                        kind: "ERROR",
                        label: current_label.clone(),
                        error,
                    });
                }

                TestEvent::Interrupted { remaining } => {
                    finish(&mut spinner);
                    println!(
                        "\n{} Interrupted, {} case(s) not run",
                        "■".yellow().bold(),
                        remaining
                    );
                }

                TestEvent::SuiteFinished {
                    totals,
                    duration_ms,
                } => {
                    finish(&mut spinner);

                    for problem in &problems {
                        println!("\n{}", "=".repeat(70));
                        println!("{}: {}", problem.kind.red().bold(), problem.label);
                        println!("{}", "-".repeat(70));
                        println!("{}", problem.error);
                    }

                    println!("\n{}", "-".repeat(70));
                    println!(
                        "Ran {} test{} in {:.3}s\n",
                        totals.total,
                        if totals.total == 1 { "" } else { "s" },
                        duration_ms as f64 / 1000.0
                    );
                    if totals.is_success() {
                        println!("{}", "OK".green().bold());
                    } else {
                        println!(
                            "{} (failures={}, errors={})",
                            "FAILED".red().bold(),
                            totals.failed,
                            totals.errors
                        );
                    }
                    println!(
                        "  {} passed, {} failed, {} errors",
                        totals.passed.to_string().green(),
                        totals.failed.to_string().red(),
                        totals.errors.to_string().yellow()
                    );
                }
            }
        }
    }
}

fn finish(spinner: &mut Option<ProgressBar>) {
    if let Some(pb) = spinner.take() {
        pb.finish_and_clear();
    }
}
