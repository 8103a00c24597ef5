//! Prober trait abstraction and the values that flow through a scan.
//!
//! Probers are the only place network I/O happens; the coordinator is
//! written against the trait so tests can drop in instrumented fakes.

use crate::error::SpecError;
use crate::types::{HostSpec, Port, PortSpec, WorkItem};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Status of a scanned port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    /// Connection established; something is listening.
    Open,
    /// Actively refused (RST).
    Closed,
    /// Nothing answered within the timeout.
    Filtered,
    /// Transport-level failure other than refusal or timeout.
    Error,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Filtered => write!(f, "filtered"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Result of probing a single work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub host: String,
    pub ip: IpAddr,
    pub port: Port,
    pub status: PortStatus,
    /// Well-known service name, filled in for open ports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// First line the service sent, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    /// Failure reason for `Error` outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When this attempt completed.
    pub scan_time: DateTime<Local>,
}

impl ScanOutcome {
    /// Create an outcome for `item`, stamped with the current time.
    pub fn new(item: &WorkItem, status: PortStatus) -> Self {
        Self {
            host: item.host.clone(),
            ip: item.ip,
            port: item.port,
            status,
            service: None,
            banner: None,
            error: None,
            scan_time: Local::now(),
        }
    }

    /// Create an `Error` outcome carrying `reason`.
    pub fn failed(item: &WorkItem, reason: impl Into<String>) -> Self {
        Self::new(item, PortStatus::Error).with_error(reason)
    }

    pub fn with_banner(mut self, banner: Option<String>) -> Self {
        self.banner = banner;
        self
    }

    pub fn with_error(mut self, reason: impl Into<String>) -> Self {
        self.error = Some(reason.into());
        self
    }

    pub fn is_open(&self) -> bool {
        self.status == PortStatus::Open
    }
}

/// Configuration for a scan run. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub hosts: HostSpec,
    pub ports: PortSpec,
    /// Per-attempt timeout, covering connect and banner capture.
    pub timeout: Duration,
    /// Maximum number of attempts in flight at once.
    pub concurrency: usize,
    pub grab_banners: bool,
    /// Keep closed, filtered and error outcomes in the report.
    pub include_all: bool,
}

impl ScanConfig {
    /// Default per-attempt timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
    /// Default concurrency bound.
    pub const DEFAULT_CONCURRENCY: usize = 100;
    /// Longest accepted per-attempt timeout.
    pub const MAX_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);
    /// Largest accepted concurrency bound.
    pub const MAX_CONCURRENCY: usize = Semaphore::MAX_PERMITS;

    /// Create a configuration with default timeout and concurrency.
    pub fn new(hosts: HostSpec, ports: PortSpec) -> Self {
        Self {
            hosts,
            ports,
            timeout: Self::DEFAULT_TIMEOUT,
            concurrency: Self::DEFAULT_CONCURRENCY,
            grab_banners: true,
            include_all: false,
        }
    }

    /// Parse both specifications. The port spec is checked first so a bad
    /// port list is reported even when the host list is also wrong.
    pub fn from_specs(host_spec: &str, port_spec: &str) -> Result<Self, SpecError> {
        let ports: PortSpec = port_spec.parse()?;
        let hosts: HostSpec = host_spec.parse()?;
        Ok(Self::new(hosts, ports))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_banners(mut self, enabled: bool) -> Self {
        self.grab_banners = enabled;
        self
    }

    pub fn with_all_outcomes(mut self, enabled: bool) -> Self {
        self.include_all = enabled;
        self
    }

    /// Reject settings the pool cannot run with.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.concurrency == 0 {
            return Err(SpecError::InvalidConfig(
                "concurrency must be greater than zero".to_string(),
            ));
        }
        if self.concurrency > Self::MAX_CONCURRENCY {
            return Err(SpecError::InvalidConfig(format!(
                "concurrency must be at most {}, got {}",
                Self::MAX_CONCURRENCY,
                self.concurrency
            )));
        }
        if self.timeout.is_zero() {
            return Err(SpecError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.timeout > Self::MAX_TIMEOUT {
            return Err(SpecError::InvalidConfig(format!(
                "timeout must be at most {}s, got {}s",
                Self::MAX_TIMEOUT.as_secs(),
                self.timeout.as_secs_f64()
            )));
        }
        Ok(())
    }
}

/// Trait for connection probers.
///
/// Implementations must capture every failure in the returned outcome;
/// a probe never fails as a whole.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe one work item, taking no longer than `timeout`.
    async fn probe(&self, item: &WorkItem, timeout: Duration) -> ScanOutcome;
}

/// Receives outcomes as the coordinator consumes them.
pub trait ScanObserver: Send {
    fn on_outcome(&mut self, outcome: &ScanOutcome);
}

/// Observer that ignores everything.
impl ScanObserver for () {
    fn on_outcome(&mut self, _outcome: &ScanOutcome) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Target;
    use std::net::Ipv4Addr;

    fn item() -> WorkItem {
        let target = Target::new("127.0.0.1", IpAddr::V4(Ipv4Addr::LOCALHOST));
        WorkItem::new(&target, Port::new(22).unwrap())
    }

    #[test]
    fn test_port_status_display() {
        assert_eq!(PortStatus::Open.to_string(), "open");
        assert_eq!(PortStatus::Closed.to_string(), "closed");
        assert_eq!(PortStatus::Filtered.to_string(), "filtered");
        assert_eq!(PortStatus::Error.to_string(), "error");
    }

    #[test]
    fn test_outcome_builders() {
        let outcome = ScanOutcome::new(&item(), PortStatus::Open)
            .with_banner(Some("SSH-2.0-OpenSSH_9.6".to_string()));
        assert!(outcome.is_open());
        assert_eq!(outcome.host, "127.0.0.1");
        assert_eq!(outcome.banner.as_deref(), Some("SSH-2.0-OpenSSH_9.6"));

        let failed = ScanOutcome::failed(&item(), "no route to host");
        assert_eq!(failed.status, PortStatus::Error);
        assert_eq!(failed.error.as_deref(), Some("no route to host"));
    }

    #[test]
    fn test_config_from_specs_checks_ports_first() {
        let err = ScanConfig::from_specs("", "abc").unwrap_err();
        assert!(matches!(err, SpecError::Ports(_)));

        let err = ScanConfig::from_specs("", "80").unwrap_err();
        assert!(matches!(err, SpecError::Hosts(_)));
    }

    #[test]
    fn test_config_validation() {
        let config = ScanConfig::from_specs("127.0.0.1", "80").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.concurrency, 100);

        assert!(config.clone().with_concurrency(0).validate().is_err());
        assert!(config.clone().with_timeout(Duration::ZERO).validate().is_err());
    }

    #[test]
    fn test_config_rejects_values_the_pool_cannot_hold() {
        let config = ScanConfig::from_specs("127.0.0.1", "80").unwrap();

        let err = config.clone().with_concurrency(usize::MAX).validate().unwrap_err();
        assert!(matches!(err, SpecError::InvalidConfig(_)));
        assert!(config
            .clone()
            .with_concurrency(ScanConfig::MAX_CONCURRENCY)
            .validate()
            .is_ok());

        let err = config
            .clone()
            .with_timeout(Duration::from_secs_f64(1e19))
            .validate()
            .unwrap_err();
        assert!(matches!(err, SpecError::InvalidConfig(_)));
        assert!(config.with_timeout(ScanConfig::MAX_TIMEOUT).validate().is_ok());
    }
}
