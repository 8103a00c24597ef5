//! Scanner module - the scan coordinator.
//!
//! Work items are dispatched to a [`Prober`] under a semaphore with
//! exactly `concurrency` permits. A permit is taken before a probe task is
//! spawned and released when the task finishes, so the number of attempts
//! in flight can never exceed the bound. The coordinator is the single
//! consumer of outcomes; nothing else touches the result set.

pub mod report;
pub mod tcp;
pub mod traits;

use crate::error::SpecError;
use crate::resolver::{DnsResolver, HostResolver, WorkPlan};
use futures::FutureExt;
use report::Collector;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use report::{ScanReport, ScanStats};
pub use tcp::TcpProber;
pub use traits::{PortStatus, Prober, ScanConfig, ScanObserver, ScanOutcome};

/// Execution settings for [`execute`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub timeout: Duration,
    pub concurrency: usize,
    pub include_all: bool,
}

impl From<&ScanConfig> for ScanOptions {
    fn from(config: &ScanConfig) -> Self {
        Self {
            timeout: config.timeout,
            concurrency: config.concurrency,
            include_all: config.include_all,
        }
    }
}

/// Used in place of deadlines that would overflow `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `start + timeout`, saturating to a far-future instant on overflow.
pub(crate) fn deadline_after(start: Instant, timeout: Duration) -> Instant {
    start
        .checked_add(timeout)
        .unwrap_or_else(|| start + FAR_FUTURE)
}

/// Execute a complete TCP connect scan with the system resolver.
pub async fn run_scan(config: ScanConfig) -> Result<ScanReport, SpecError> {
    let resolver = DnsResolver::from_system();
    let prober = Arc::new(TcpProber::new(config.grab_banners));
    run(&config, &resolver, prober, &CancellationToken::new(), &mut ()).await
}

/// Validate, resolve and execute a scan.
///
/// Fails only on specification problems, before any probe is sent.
pub async fn run<R, P>(
    config: &ScanConfig,
    resolver: &R,
    prober: Arc<P>,
    cancel: &CancellationToken,
    observer: &mut dyn ScanObserver,
) -> Result<ScanReport, SpecError>
where
    R: HostResolver + ?Sized,
    P: Prober + ?Sized + 'static,
{
    config.validate()?;
    let plan = crate::resolver::plan(config, resolver).await?;
    Ok(execute(plan, prober, &ScanOptions::from(config), cancel, observer).await)
}

/// Probe every item of `plan` with bounded concurrency.
///
/// On cancellation, dispatch stops, in-flight probes get one timeout
/// interval to finish, and the report holds whatever completed.
pub async fn execute<P>(
    plan: WorkPlan,
    prober: Arc<P>,
    options: &ScanOptions,
    cancel: &CancellationToken,
    observer: &mut dyn ScanObserver,
) -> ScanReport
where
    P: Prober + ?Sized + 'static,
{
    let started = Instant::now();
    let mut stats = ScanStats {
        hosts: plan.targets.len(),
        ports: plan.ports.len(),
        planned: plan.len(),
        ..ScanStats::default()
    };
    let (targets, skipped, items) = plan.into_parts();

    let concurrency = options.concurrency.clamp(1, Semaphore::MAX_PERMITS);
    info!(
        hosts = stats.hosts,
        ports = stats.ports,
        items = stats.planned,
        concurrency,
        timeout = ?options.timeout,
        "starting scan"
    );

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut tasks: JoinSet<ScanOutcome> = JoinSet::new();
    let mut collector = Collector::new(options.include_all, observer);
    let mut grace: Option<Instant> = None;

    for item in items {
        // Drain finished probes while waiting for a free slot.
        let permit = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break None,
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => absorb(&mut collector, joined),
                permit = Arc::clone(&semaphore).acquire_owned() => break permit.ok(),
            }
        };
        // The semaphore is never closed, so only cancellation lands here.
        let Some(permit) = permit else {
            grace = Some(deadline_after(Instant::now(), options.timeout));
            break;
        };

        let prober = Arc::clone(&prober);
        let timeout = options.timeout;
        tasks.spawn(async move {
            let _permit = permit;
            match AssertUnwindSafe(prober.probe(&item, timeout)).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(target_addr = %item, "probe panicked");
                    ScanOutcome::failed(&item, "probe panicked")
                }
            }
        });
    }

    loop {
        let joined = match grace {
            Some(deadline) => match time::timeout_at(deadline, tasks.join_next()).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(abandoned = tasks.len(), "probes still running after cancellation");
                    tasks.abort_all();
                    break;
                }
            },
            None => tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    grace = Some(deadline_after(Instant::now(), options.timeout));
                    continue;
                }
                joined = tasks.join_next() => joined,
            },
        };
        let Some(joined) = joined else { break };
        absorb(&mut collector, joined);
    }

    stats.elapsed = started.elapsed();
    let report = collector.finish(targets, skipped, stats);
    info!(
        scanned = report.stats.scanned,
        open = report.stats.open,
        interrupted = report.interrupted,
        elapsed = ?report.stats.elapsed,
        "scan finished"
    );
    report
}

fn absorb(collector: &mut Collector<'_>, joined: Result<ScanOutcome, JoinError>) {
    match joined {
        Ok(outcome) => collector.accept(outcome),
        Err(e) => debug!(error = %e, "probe task did not complete"),
    }
}
