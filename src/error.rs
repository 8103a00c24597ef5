//! Error types for portsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-attempt network
//! failures (`ScanError`) never leave the prober; they become outcome
//! statuses. Everything else surfaces to the user as a run-level error.

use crate::types::{PortError, TargetError};
use std::path::PathBuf;
use thiserror::Error;

/// Why a single connection attempt did not produce an open port.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("connection refused")]
    ConnectionRefused,

    #[error("connection timed out")]
    Timeout,

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("host unreachable: {0}")]
    HostUnreachable(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),
}

/// Invalid scan specification; fatal before any network activity.
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("invalid port specification: {0}")]
    Ports(#[from] PortError),

    #[error("invalid host specification: {0}")]
    Hosts(#[from] TargetError),

    #[error("none of the targets could be resolved")]
    NoTargets,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failure writing scan results to disk.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode JSON for {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode CSV for {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Errors related to the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file {path}: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },
}

/// Top-level error for the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("scan interrupted; results were not exported")]
    Interrupted,

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Spec(_) | Self::Config(_) => 2,
            Self::Interrupted => 130,
            Self::Export(_) | Self::Io(_) => 1,
        }
    }
}

/// Result type alias for connection attempts.
pub type ScanResult<T> = Result<T, ScanError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let spec = CliError::from(SpecError::Ports(PortError::Empty));
        assert_eq!(spec.exit_code(), 2);
        assert_eq!(CliError::Interrupted.exit_code(), 130);

        let export = CliError::from(ExportError::Io {
            path: PathBuf::from("out.json"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        assert_eq!(export.exit_code(), 1);
    }

    #[test]
    fn test_spec_error_message() {
        let err = SpecError::from(PortError::InvalidFormat("abc".into()));
        assert_eq!(
            err.to_string(),
            "invalid port specification: invalid port number: 'abc'"
        );
    }
}
