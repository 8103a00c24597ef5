//! The unit of work handed to a prober.

use super::{Port, Target};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// One (host, port) pair, probed exactly once per scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkItem {
    pub host: String,
    pub ip: IpAddr,
    pub port: Port,
}

impl WorkItem {
    pub fn new(target: &Target, port: Port) -> Self {
        Self {
            host: target.host.clone(),
            ip: target.ip,
            port,
        }
    }

    /// Socket address to connect to.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port.as_u16())
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
