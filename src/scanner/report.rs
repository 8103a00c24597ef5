//! Scan results and the accumulator that builds them.

use crate::resolver::SkippedHost;
use crate::scanner::traits::{PortStatus, ScanObserver, ScanOutcome};
use crate::services;
use crate::types::Target;
use std::collections::HashMap;
use std::time::Duration;

/// Totals for one scan run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Hosts that were resolved and scanned.
    pub hosts: usize,
    /// Distinct ports per host.
    pub ports: usize,
    /// Work items in the plan.
    pub planned: usize,
    /// Work items that produced an outcome.
    pub scanned: usize,
    pub open: usize,
    pub closed: usize,
    pub filtered: usize,
    pub errors: usize,
    pub elapsed: Duration,
}

impl ScanStats {
    fn record(&mut self, status: PortStatus) {
        self.scanned += 1;
        match status {
            PortStatus::Open => self.open += 1,
            PortStatus::Closed => self.closed += 1,
            PortStatus::Filtered => self.filtered += 1,
            PortStatus::Error => self.errors += 1,
        }
    }
}

/// Complete result of a scan run.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub targets: Vec<Target>,
    pub skipped: Vec<SkippedHost>,
    /// Open outcomes, or every outcome when the scan kept them all.
    /// Sorted by host (in input order) then port.
    pub results: Vec<ScanOutcome>,
    pub stats: ScanStats,
    /// True when the run was cancelled before every item was probed.
    pub interrupted: bool,
}

impl ScanReport {
    /// Only the open results.
    pub fn open_results(&self) -> impl Iterator<Item = &ScanOutcome> {
        self.results.iter().filter(|r| r.is_open())
    }
}

/// Accumulates outcomes; owned by the coordinator alone.
pub(crate) struct Collector<'a> {
    include_all: bool,
    stats: ScanStats,
    results: Vec<ScanOutcome>,
    observer: &'a mut dyn ScanObserver,
}

impl<'a> Collector<'a> {
    pub(crate) fn new(include_all: bool, observer: &'a mut dyn ScanObserver) -> Self {
        Self {
            include_all,
            stats: ScanStats::default(),
            results: Vec::new(),
            observer,
        }
    }

    /// Tally one outcome, annotate it when open, and keep it if wanted.
    pub(crate) fn accept(&mut self, mut outcome: ScanOutcome) {
        self.stats.record(outcome.status);
        if outcome.is_open() {
            outcome.service = services::lookup(outcome.port.as_u16()).map(str::to_string);
        }
        self.observer.on_outcome(&outcome);
        if outcome.is_open() || self.include_all {
            self.results.push(outcome);
        }
    }

    /// Build the report. A run counts as interrupted when any planned
    /// item is missing an outcome.
    pub(crate) fn finish(
        self,
        targets: Vec<Target>,
        skipped: Vec<SkippedHost>,
        mut stats: ScanStats,
    ) -> ScanReport {
        let interrupted = self.stats.scanned < stats.planned;
        let mut results = self.results;
        {
            let rank: HashMap<&str, usize> = targets
                .iter()
                .enumerate()
                .map(|(i, t)| (t.host.as_str(), i))
                .collect();
            results.sort_by_key(|r| {
                let host_rank = rank.get(r.host.as_str()).copied().unwrap_or(usize::MAX);
                (host_rank, r.port)
            });
        }

        stats.scanned = self.stats.scanned;
        stats.open = self.stats.open;
        stats.closed = self.stats.closed;
        stats.filtered = self.stats.filtered;
        stats.errors = self.stats.errors;

        ScanReport {
            targets,
            skipped,
            results,
            stats,
            interrupted,
        }
    }
}
