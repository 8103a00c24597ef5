//! Target resolution: host and port specs in, work items out.
//!
//! Port specs are validated before any name is looked up, so a typo in
//! the port list fails the run without touching the network. Hosts that
//! cannot be resolved are skipped and reported, never fatal on their own.

use crate::error::SpecError;
use crate::scanner::ScanConfig;
use crate::types::{HostSpec, HostToken, Port, PortSpec, Target, TargetError, WorkItem};
use async_trait::async_trait;
use futures::future::join_all;
use std::net::IpAddr;
use tracing::{debug, warn};
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// Resolves hostnames to addresses.
#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn lookup(&self, host: &str) -> Result<IpAddr, TargetError>;
}

/// DNS-backed resolver using the system configuration.
pub struct DnsResolver {
    inner: TokioAsyncResolver,
}

impl DnsResolver {
    /// Build from `/etc/resolv.conf` (or platform equivalent), falling back
    /// to the library defaults when the system configuration is unusable.
    pub fn from_system() -> Self {
        let inner = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            debug!(error = %e, "system resolver config unavailable, using defaults");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self { inner }
    }
}

#[async_trait]
impl HostResolver for DnsResolver {
    async fn lookup(&self, host: &str) -> Result<IpAddr, TargetError> {
        let response = self
            .inner
            .lookup_ip(host)
            .await
            .map_err(|e| TargetError::DnsResolutionFailed(host.to_string(), e.to_string()))?;

        response
            .iter()
            .next()
            .ok_or_else(|| TargetError::NoAddressesFound(host.to_string()))
    }
}

/// A host token that was dropped from the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedHost {
    pub host: String,
    pub reason: TargetError,
}

/// The expanded set of work for one scan.
#[derive(Debug, Clone, Default)]
pub struct WorkPlan {
    pub targets: Vec<Target>,
    pub ports: Vec<Port>,
    pub skipped: Vec<SkippedHost>,
    items: Vec<WorkItem>,
}

impl WorkPlan {
    /// Cross product of targets and ports, host-major.
    pub fn new(targets: Vec<Target>, ports: Vec<Port>, skipped: Vec<SkippedHost>) -> Self {
        let items = targets
            .iter()
            .flat_map(|target| ports.iter().map(move |&port| WorkItem::new(target, port)))
            .collect();
        Self {
            targets,
            ports,
            skipped,
            items,
        }
    }

    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    pub(crate) fn into_parts(self) -> (Vec<Target>, Vec<SkippedHost>, Vec<WorkItem>) {
        (self.targets, self.skipped, self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Parse and expand raw host and port specs.
pub async fn resolve<R>(host_spec: &str, port_spec: &str, resolver: &R) -> Result<WorkPlan, SpecError>
where
    R: HostResolver + ?Sized,
{
    let ports: PortSpec = port_spec.parse()?;
    let hosts: HostSpec = host_spec.parse()?;
    expand(&hosts, &ports, resolver).await
}

/// Expand the specs held by a scan configuration.
pub async fn plan<R>(config: &ScanConfig, resolver: &R) -> Result<WorkPlan, SpecError>
where
    R: HostResolver + ?Sized,
{
    expand(&config.hosts, &config.ports, resolver).await
}

async fn expand<R>(hosts: &HostSpec, ports: &PortSpec, resolver: &R) -> Result<WorkPlan, SpecError>
where
    R: HostResolver + ?Sized,
{
    let ports = ports.expand();
    if ports.is_empty() {
        return Err(SpecError::Ports(crate::types::PortError::Empty));
    }

    let lookups = hosts.tokens().iter().map(|(raw, token)| async move {
        let resolved = match token {
            HostToken::Address(ip) => Ok(*ip),
            HostToken::Name(name) => resolver.lookup(name).await,
            HostToken::Invalid(text) => Err(TargetError::InvalidFormat(text.clone())),
        };
        (raw.clone(), resolved)
    });

    let mut targets = Vec::new();
    let mut skipped = Vec::new();
    for (host, resolved) in join_all(lookups).await {
        match resolved {
            Ok(ip) => {
                debug!(%host, %ip, "resolved target");
                targets.push(Target::new(host, ip));
            }
            Err(reason) => {
                warn!(%host, %reason, "skipping unresolvable target");
                skipped.push(SkippedHost { host, reason });
            }
        }
    }

    if targets.is_empty() {
        return Err(SpecError::NoTargets);
    }

    Ok(WorkPlan::new(targets, ports, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::net::Ipv4Addr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Resolves only names in a fixed table and counts lookups.
    #[derive(Default)]
    struct StaticResolver {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HostResolver for StaticResolver {
        async fn lookup(&self, host: &str) -> Result<IpAddr, TargetError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match host {
                "web.test" => Ok(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 80))),
                "db.test" => Ok(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 54))),
                _ => Err(TargetError::DnsResolutionFailed(
                    host.to_string(),
                    "no such host".to_string(),
                )),
            }
        }
    }

    #[tokio::test]
    async fn test_cross_product_size() {
        let resolver = StaticResolver::default();
        let plan = resolve("127.0.0.1,web.test,db.test", "20-22,25", &resolver)
            .await
            .unwrap();

        assert_eq!(plan.targets.len(), 3);
        assert_eq!(plan.ports.len(), 4);
        assert_eq!(plan.len(), 12);

        let distinct: HashSet<(String, u16)> = plan
            .items()
            .iter()
            .map(|i| (i.host.clone(), i.port.as_u16()))
            .collect();
        assert_eq!(distinct.len(), 12);
    }

    #[tokio::test]
    async fn test_duplicate_hosts_collapse() {
        let resolver = StaticResolver::default();
        let plan = resolve("web.test, web.test,127.0.0.1", "80,80", &resolver)
            .await
            .unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_items_are_host_major() {
        let resolver = StaticResolver::default();
        let plan = resolve("web.test,127.0.0.1", "2,1", &resolver).await.unwrap();
        let order: Vec<String> = plan.items().iter().map(ToString::to_string).collect();
        assert_eq!(
            order,
            vec!["web.test:1", "web.test:2", "127.0.0.1:1", "127.0.0.1:2"]
        );
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_skipped() {
        let resolver = StaticResolver::default();
        let plan = resolve("missing.test,web.test,bad host!", "80", &resolver)
            .await
            .unwrap();

        assert_eq!(plan.targets.len(), 1);
        assert_eq!(plan.targets[0].host, "web.test");
        assert_eq!(plan.skipped.len(), 2);
        assert_eq!(plan.skipped[0].host, "missing.test");
        assert!(matches!(
            plan.skipped[1].reason,
            TargetError::InvalidFormat(_)
        ));
    }

    #[tokio::test]
    async fn test_all_hosts_unresolvable() {
        let resolver = StaticResolver::default();
        let err = resolve("missing.test", "80", &resolver).await.unwrap_err();
        assert!(matches!(err, SpecError::NoTargets));
    }

    #[tokio::test]
    async fn test_bad_port_spec_fails_before_lookup() {
        let resolver = StaticResolver::default();
        let err = resolve("web.test", "abc", &resolver).await.unwrap_err();
        assert!(matches!(err, SpecError::Ports(_)));
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_literal_addresses_skip_dns() {
        let resolver = StaticResolver::default();
        let plan = resolve("127.0.0.1,::1", "1-100", &resolver).await.unwrap();
        assert_eq!(plan.len(), 200);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }
}
