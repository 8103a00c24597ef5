//! Command-line interface for portsweep.
//!
//! Uses `clap` derive macros for declarative argument parsing.

use crate::config::AppSettings;
use crate::error::{CliError, CliResult, SpecError};
use crate::output::{self, ConsoleReporter};
use crate::resolver::{self, DnsResolver};
use crate::scanner::{self, ScanConfig, ScanOptions, ScanReport, TcpProber};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A concurrent TCP connect port scanner.
#[derive(Parser, Debug)]
#[command(name = "portsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A fast, concurrent TCP port scanner", long_about = None)]
pub struct Args {
    /// Target IP(s) or hostname(s), comma-separated
    #[arg(short, long, value_name = "HOSTS")]
    pub target: String,

    /// Ports to scan (e.g., "80", "22,80,443", "1-1000", "20-25,8080")
    #[arg(short, long, value_name = "PORTS")]
    pub ports: String,

    /// Base name for result files; writes <BASENAME>.json and <BASENAME>.csv
    #[arg(short, long, value_name = "BASENAME")]
    pub output: Option<PathBuf>,

    /// Connection timeout in seconds [default: 1.0]
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Maximum number of concurrent connection attempts [default: 100]
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Do not read banners from open ports
    #[arg(long)]
    pub no_banner: bool,

    /// List closed, filtered and failed ports in the summary too
    #[arg(short, long)]
    pub all: bool,

    /// Show a progress bar and more log output (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print findings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a JSON settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Merge flags over `settings` into a validated scan configuration.
    ///
    /// The port spec is parsed before anything else so that a bad port
    /// list is always reported first.
    pub fn scan_config(&self, settings: &AppSettings) -> Result<ScanConfig, SpecError> {
        let config = ScanConfig::from_specs(&self.target, &self.ports)?;

        let timeout_secs = self.timeout.unwrap_or(settings.timeout_secs);
        let timeout = Duration::try_from_secs_f64(timeout_secs)
            .ok()
            .filter(|t| !t.is_zero())
            .ok_or_else(|| {
                SpecError::InvalidConfig(format!(
                    "timeout must be a positive number of seconds, got {timeout_secs}"
                ))
            })?;

        let config = config
            .with_timeout(timeout)
            .with_concurrency(self.threads.unwrap_or(settings.threads))
            .with_banners(settings.grab_banners && !self.no_banner)
            .with_all_outcomes(self.all || settings.show_all);
        config.validate()?;
        Ok(config)
    }

    /// Run the scan described by these arguments.
    pub async fn execute(&self) -> CliResult<ScanReport> {
        let settings = AppSettings::load(self.config.as_deref())?;
        let config = self.scan_config(&settings)?;
        debug!(?config, "scan configuration");

        let dns = DnsResolver::from_system();
        let plan = resolver::plan(&config, &dns).await?;
        for skipped in &plan.skipped {
            output::print_warning(&format!("skipping {}: {}", skipped.host, skipped.reason));
        }

        if !self.quiet {
            let names: Vec<String> = plan.targets.iter().map(ToString::to_string).collect();
            output::print_scan_header(&names, plan.ports.len(), config.concurrency);
        }

        let cancel = CancellationToken::new();
        let interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                interrupt.cancel();
            }
        });

        let mut reporter = ConsoleReporter::new(plan.len(), self.verbose > 0 && !self.quiet);
        let prober = Arc::new(TcpProber::new(config.grab_banners));
        let report = scanner::execute(
            plan,
            prober,
            &ScanOptions::from(&config),
            &cancel,
            &mut reporter,
        )
        .await;
        reporter.finish();

        self.conclude(report, config.include_all)
    }

    /// Summarize a finished scan and export it.
    ///
    /// Partial results from an interrupted run are never written to disk.
    pub fn conclude(&self, report: ScanReport, show_all: bool) -> CliResult<ScanReport> {
        if !self.quiet {
            output::print_summary(&report, show_all)?;
            if report.stats.open == 0 && !report.interrupted {
                output::print_info("No open ports found");
            }
        }

        if report.interrupted {
            output::print_warning("scan interrupted by user");
            return Err(CliError::Interrupted);
        }

        if let Some(base) = &self.output {
            let paths = output::export_report(base, &report)?;
            if !self.quiet {
                output::print_success(&format!(
                    "Results saved to {} and {}",
                    paths.json.display(),
                    paths.csv.display()
                ));
            }
        }

        Ok(report)
    }
}
