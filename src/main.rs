use clap::{Parser, Subcommand};
use colored::Colorize;
use regex::Regex;
use std::path::PathBuf;

use attendance_tester::driver::web::BrowserType;
use attendance_tester::report::{self, ReportFormat};
use attendance_tester::runner::{self, RunOptions, TEST_CASES};
use attendance_tester::utils::config::HarnessConfig;

#[derive(Parser)]
#[command(name = "attendance-tester")]
#[command(version = "0.1.0")]
#[command(about = "UI test suite for the attendance sign-in form", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the attendance test suite
    Run {
        /// Deployed form URL (overrides config and ATTENDANCE_APP_URL)
        #[arg(short, long)]
        url: Option<String>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory for reports and diagnostic snapshots
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Run the browser without a window
        #[arg(long, default_value = "false")]
        headless: bool,

        /// Browser engine (chromium, firefox, webkit)
        #[arg(short, long)]
        browser: Option<String>,

        /// Only run these case ids (comma-separated, e.g. TC_01,TC_03)
        #[arg(long, value_delimiter = ',')]
        only: Option<Vec<String>>,

        /// Exit with a non-zero code when any case fails
        #[arg(long, default_value = "false")]
        strict: bool,
    },

    /// List test cases
    List,

    /// Generate report from saved test results
    Report {
        /// Path to test results JSON
        results: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "html")]
        format: ReportFormat,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            url,
            config,
            output,
            headless,
            browser,
            only,
            strict,
        } => {
            let mut harness = HarnessConfig::load(config.as_deref())?;
            if let Some(url) = url {
                harness.app_url = url;
            }
            if headless {
                harness.browser.headless = true;
            }
            if let Some(ref b) = browser {
                harness.browser.browser = BrowserType::parse(b);
            }

            let only = match only {
                Some(ids) if !ids.is_empty() => Some(id_filter(&ids)?),
                _ => None,
            };

            println!(
                "{} Output: {}",
                "▶".green().bold(),
                output.display().to_string().cyan()
            );

            let summary = runner::run_suite(RunOptions {
                config: harness,
                output,
                only,
            })
            .await?;

            println!();
            for path in summary.files.all() {
                println!("  {} {}", "📄".to_string().blue(), path.display());
            }

            if let Some(error) = summary.setup_error {
                anyhow::bail!("Suite setup failed: {}", error);
            }
            if strict && !summary.totals.is_success() {
                std::process::exit(1);
            }
        }

        Commands::List => {
            for case in TEST_CASES.iter() {
                println!("{}  {}", case.id.cyan(), case.name);
            }
        }

        Commands::Report {
            results,
            format,
            output,
        } => {
            println!(
                "{} Generating {:?} report from: {}",
                "📊".to_string().blue(),
                format,
                results.display()
            );
            report::generate_report(&results, format, output.as_deref())?;
        }
    }

    Ok(())
}

/// Exact-match regex over the given case ids
fn id_filter(ids: &[String]) -> anyhow::Result<Regex> {
    let alternatives: Vec<_> = ids.iter().map(|id| regex::escape(id.trim())).collect();
    Ok(Regex::new(&format!("^(?:{})$", alternatives.join("|")))?)
}
