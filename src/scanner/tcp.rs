//! TCP connect prober.
//!
//! Performs a full TCP handshake using the operating system's socket API.
//! No elevated privileges are needed.

use crate::banner::{grab_banner, probe_payload};
use crate::error::{ScanError, ScanResult};
use crate::scanner::deadline_after;
use crate::scanner::traits::{PortStatus, Prober, ScanOutcome};
use crate::types::WorkItem;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};
use tracing::debug;

/// TCP connect prober.
///
/// Every attempt gets a single deadline of `timeout` from its start. The
/// banner read shares that deadline and is further limited to half the
/// timeout, so a silent service costs at most one timeout interval.
#[derive(Debug, Clone)]
pub struct TcpProber {
    grab_banners: bool,
}

impl TcpProber {
    /// Create a new prober.
    ///
    /// # Arguments
    /// * `grab_banners` - Whether to attempt banner grabbing on open ports
    pub fn new(grab_banners: bool) -> Self {
        Self { grab_banners }
    }

    /// Connect to `addr`, classifying failures.
    async fn attempt_connect(&self, addr: SocketAddr, deadline: Instant) -> ScanResult<TcpStream> {
        match timeout_at(deadline, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(classify_connect_error(&e)),
            Err(_) => Err(ScanError::Timeout),
        }
    }
}

impl Default for TcpProber {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Map an OS connect error onto the scan error taxonomy.
fn classify_connect_error(e: &std::io::Error) -> ScanError {
    match e.kind() {
        ErrorKind::ConnectionRefused | ErrorKind::ConnectionReset => ScanError::ConnectionRefused,
        ErrorKind::TimedOut => ScanError::Timeout,
        _ => {
            let message = e.to_string();
            let lower = message.to_lowercase();
            if lower.contains("host") && lower.contains("unreachable") {
                ScanError::HostUnreachable(message)
            } else if lower.contains("unreachable") {
                ScanError::NetworkUnreachable(message)
            } else {
                ScanError::ConnectionFailed(message)
            }
        }
    }
}

/// Status a failed connection attempt maps to.
fn status_for(error: &ScanError) -> PortStatus {
    match error {
        ScanError::ConnectionRefused => PortStatus::Closed,
        ScanError::Timeout => PortStatus::Filtered,
        ScanError::HostUnreachable(_)
        | ScanError::NetworkUnreachable(_)
        | ScanError::ConnectionFailed(_) => PortStatus::Error,
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, item: &WorkItem, timeout: Duration) -> ScanOutcome {
        let started = Instant::now();
        let deadline = deadline_after(started, timeout);

        match self.attempt_connect(item.addr(), deadline).await {
            Ok(mut stream) => {
                let banner = if self.grab_banners {
                    let window = deadline_after(Instant::now(), timeout / 2).min(deadline);
                    grab_banner(&mut stream, probe_payload(item.port.as_u16()), window).await
                } else {
                    None
                };
                drop(stream);

                debug!(target_addr = %item, elapsed = ?started.elapsed(), "open");
                ScanOutcome::new(item, PortStatus::Open).with_banner(banner)
            }
            Err(e) => {
                let status = status_for(&e);
                debug!(target_addr = %item, %status, reason = %e, "not open");
                let outcome = ScanOutcome::new(item, status);
                if status == PortStatus::Error {
                    outcome.with_error(e.to_string())
                } else {
                    outcome
                }
            }
        }
    }
}
