//! Host specification types.
//!
//! A host spec is a comma-separated list of hostnames and literal
//! IPv4/IPv6 addresses. Parsing only splits and classifies tokens;
//! name resolution happens later in [`crate::resolver`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// A host that has been resolved to an address and is ready to scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// The token as the user wrote it.
    pub host: String,
    /// The address connections are made to.
    pub ip: IpAddr,
}

impl Target {
    pub fn new(host: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            host: host.into(),
            ip,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host == self.ip.to_string() {
            write!(f, "{}", self.ip)
        } else {
            write!(f, "{} ({})", self.host, self.ip)
        }
    }
}

/// Error type for host parsing and resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("invalid host '{0}'")]
    InvalidFormat(String),
    #[error("failed to resolve hostname '{0}': {1}")]
    DnsResolutionFailed(String, String),
    #[error("no IP addresses found for hostname '{0}'")]
    NoAddressesFound(String),
    #[error("empty host specification")]
    Empty,
}

/// One token of a host specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostToken {
    /// A literal address; never sent to DNS.
    Address(IpAddr),
    /// A syntactically valid hostname awaiting resolution.
    Name(String),
    /// Something that is neither; skipped at resolution time.
    Invalid(String),
}

impl HostToken {
    /// Classify a single trimmed token.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        // Bracketed IPv6 literals are accepted too: "[::1]"
        let unbracketed = token
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .unwrap_or(token);

        if let Ok(ip) = unbracketed.parse::<IpAddr>() {
            Self::Address(ip)
        } else if is_valid_hostname(token) {
            Self::Name(token.to_string())
        } else {
            Self::Invalid(token.to_string())
        }
    }
}

/// A parsed host specification: distinct tokens in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSpec {
    tokens: Vec<(String, HostToken)>,
}

impl HostSpec {
    /// Tokens paired with their original text.
    pub fn tokens(&self) -> &[(String, HostToken)] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromStr for HostSpec {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens: Vec<(String, HostToken)> = Vec::new();

        for raw in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if tokens.iter().any(|(seen, _)| seen == raw) {
                continue;
            }
            tokens.push((raw.to_string(), HostToken::parse(raw)));
        }

        if tokens.is_empty() {
            return Err(TargetError::Empty);
        }
        Ok(Self { tokens })
    }
}

impl fmt::Display for HostSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.tokens.iter().map(|(raw, _)| raw.as_str()).collect();
        write!(f, "{}", names.join(","))
    }
}

/// Check if a string is a valid hostname.
fn is_valid_hostname(s: &str) -> bool {
    let s = s.strip_suffix('.').unwrap_or(s);
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    s.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && label.starts_with(|c: char| c.is_ascii_alphanumeric())
            && label.ends_with(|c: char| c.is_ascii_alphanumeric())
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_parse_literal_addresses() {
        assert_eq!(
            HostToken::parse("192.168.1.1"),
            HostToken::Address(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)))
        );
        assert_eq!(
            HostToken::parse("::1"),
            HostToken::Address(IpAddr::V6(Ipv6Addr::LOCALHOST))
        );
        assert_eq!(
            HostToken::parse("[::1]"),
            HostToken::Address(IpAddr::V6(Ipv6Addr::LOCALHOST))
        );
    }

    #[test]
    fn test_parse_hostname() {
        assert_eq!(
            HostToken::parse("example.com"),
            HostToken::Name("example.com".into())
        );
        assert_eq!(HostToken::parse("localhost"), HostToken::Name("localhost".into()));
    }

    #[test]
    fn test_parse_invalid_token() {
        assert!(matches!(HostToken::parse("bad host!"), HostToken::Invalid(_)));
        assert!(matches!(HostToken::parse("-invalid.com"), HostToken::Invalid(_)));
    }

    #[test]
    fn test_spec_trims_and_deduplicates() {
        let spec: HostSpec = " 10.0.0.1, example.com ,10.0.0.1,,example.com"
            .parse()
            .unwrap();
        let raw: Vec<&str> = spec.tokens().iter().map(|(r, _)| r.as_str()).collect();
        assert_eq!(raw, vec!["10.0.0.1", "example.com"]);
        assert_eq!(spec.to_string(), "10.0.0.1,example.com");
    }

    #[test]
    fn test_empty_spec_is_rejected() {
        assert_eq!("".parse::<HostSpec>(), Err(TargetError::Empty));
        assert_eq!(" , ,".parse::<HostSpec>(), Err(TargetError::Empty));
    }

    #[test]
    fn test_valid_hostname() {
        assert!(is_valid_hostname("example.com"));
        assert!(is_valid_hostname("sub.example.com."));
        assert!(is_valid_hostname("my-server"));
        assert!(!is_valid_hostname(""));
        assert!(!is_valid_hostname("a..b"));
        assert!(!is_valid_hostname(&"a".repeat(64)));
    }

    #[test]
    fn test_target_display() {
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert_eq!(Target::new("127.0.0.1", ip).to_string(), "127.0.0.1");
        assert_eq!(Target::new("localhost", ip).to_string(), "localhost (127.0.0.1)");
    }
}
