//! Plain text console output.
//!
//! Streams open ports as they are found and prints a summary at the end.

use crate::scanner::{PortStatus, ScanObserver, ScanOutcome, ScanReport};
use crate::services;
use console::{style, Style};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Streams findings to stdout, optionally behind a progress bar.
pub struct ConsoleReporter {
    progress: Option<ProgressBar>,
}

impl ConsoleReporter {
    /// `total` is the number of work items; a progress bar is drawn only
    /// when `show_progress` is set.
    pub fn new(total: usize, show_progress: bool) -> Self {
        let progress = show_progress.then(|| {
            let pb = ProgressBar::new(total as u64);
            if let Ok(style) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            ) {
                pb.set_style(style.progress_chars("=>-"));
            }
            pb
        });
        Self { progress }
    }

    /// Remove the progress bar, if any.
    pub fn finish(&self) {
        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }
    }
}

impl ScanObserver for ConsoleReporter {
    fn on_outcome(&mut self, outcome: &ScanOutcome) {
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
        if !outcome.is_open() {
            return;
        }

        let line = finding_line(outcome);
        match &self.progress {
            Some(pb) => {
                pb.set_message(format!("found {}:{}", outcome.host, outcome.port));
                pb.println(line);
            }
            None => println!("{line}"),
        }
    }
}

/// Format one open port, with its banner on a second line.
pub fn finding_line(outcome: &ScanOutcome) -> String {
    let service = outcome.service.as_deref().unwrap_or("unknown");
    let mut line = format!(
        "{} {}:{} ({}) is open",
        style("[+]").green().bold(),
        outcome.host,
        style(outcome.port).bold(),
        service
    );
    if let Some(banner) = &outcome.banner {
        line.push_str(&format!("\n    Banner: {}", style(banner).dim()));
    }
    line
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(targets: &[String], ports: usize, concurrency: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portsweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Targets: {}",
        style("•").dim(),
        style(targets.join(", ")).white().bold()
    );
    println!(
        "{} Scanning {} port(s) per host with {} concurrent connections",
        style("•").dim(),
        style(ports).white().bold(),
        concurrency
    );
    println!("{} Press Ctrl+C to stop the scan", style("•").dim());
    println!();
}

/// Print the final summary. With `show_all`, every kept outcome is listed
/// in a table, not just the open ones.
pub fn print_summary(report: &ScanReport, show_all: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out, "                    {} Scan Summary", style("portsweep").cyan().bold())?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    if show_all && !report.results.is_empty() {
        writeln!(out, "  {}", style(THIN_RULE).dim())?;
        writeln!(
            out,
            "  {:<20}  {:>6}  {:^10}  {:<15}  {}",
            style("HOST").bold(),
            style("PORT").bold(),
            style("STATE").bold(),
            style("SERVICE").bold(),
            style("BANNER").bold()
        )?;
        writeln!(out, "  {}", style(THIN_RULE).dim())?;

        for result in &report.results {
            let status_style = match result.status {
                PortStatus::Open => Style::new().green().bold(),
                PortStatus::Closed => Style::new().red(),
                PortStatus::Filtered => Style::new().yellow(),
                PortStatus::Error => Style::new().magenta(),
            };
            let detail = result
                .banner
                .as_deref()
                .or(result.error.as_deref())
                .map(|b| truncate_string(b, 35))
                .unwrap_or_default();

            writeln!(
                out,
                "  {:<20}  {:>6}  {:^10}  {:<15}  {}",
                truncate_string(&result.host, 20),
                result.port,
                status_style.apply_to(result.status.to_string()),
                services::describe(result.port.as_u16()),
                style(detail).dim()
            )?;
        }
        writeln!(out, "  {}", style(THIN_RULE).dim())?;
        writeln!(out)?;
    }

    let stats = &report.stats;
    writeln!(out, "  {} {}", style("Hosts scanned:").bold(), stats.hosts)?;
    writeln!(out, "  {} {}", style("Ports scanned:").bold(), stats.scanned)?;
    writeln!(
        out,
        "  {} {}",
        style("Open ports:").bold(),
        style(stats.open).green().bold()
    )?;
    writeln!(
        out,
        "               {} closed, {} filtered, {} errors",
        style(stats.closed).red(),
        style(stats.filtered).yellow(),
        style(stats.errors).magenta()
    )?;
    writeln!(
        out,
        "  {} {:.2}s",
        style("Elapsed:").bold(),
        stats.elapsed.as_secs_f64()
    )?;

    if !report.skipped.is_empty() {
        let names: Vec<&str> = report.skipped.iter().map(|s| s.host.as_str()).collect();
        writeln!(out, "  {} {}", style("Skipped:").bold(), names.join(", "))?;
    }
    if report.interrupted {
        writeln!(
            out,
            "  {} {} of {} probes completed",
            style("Interrupted:").yellow().bold(),
            stats.scanned,
            stats.planned
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    Ok(())
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Truncate a string to at most `max_len` characters, adding an ellipsis
/// if truncated.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Port, Target, WorkItem};
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_finding_line() {
        console::set_colors_enabled(false);
        let target = Target::new("127.0.0.1", IpAddr::V4(Ipv4Addr::LOCALHOST));
        let item = WorkItem::new(&target, Port::new(22).unwrap());
        let mut outcome = ScanOutcome::new(&item, PortStatus::Open)
            .with_banner(Some("SSH-2.0-OpenSSH_9.6".to_string()));
        outcome.service = Some("SSH".to_string());

        assert_eq!(
            finding_line(&outcome),
            "[+] 127.0.0.1:22 (SSH) is open\n    Banner: SSH-2.0-OpenSSH_9.6"
        );
    }
}
