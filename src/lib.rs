//! # portsweep - A Concurrent TCP Port Scanner
//!
//! portsweep resolves a list of hosts, attempts a full TCP connection to
//! every requested port on each of them with a bounded number of attempts
//! in flight, and reports open ports together with a best-effort service
//! name and banner.
//!
//! ## Features
//!
//! - **Bounded Concurrency**: A semaphore caps simultaneous connection attempts
//! - **Flexible Targeting**: IPv4/IPv6 literals and hostnames, comma-separated
//! - **Port Specs**: Single ports, lists and inclusive ranges (`20-25,80,443`)
//! - **Banner Grabbing**: Passive reads plus light probes for HTTP-like services
//! - **Cancellation**: Ctrl+C stops dispatch and keeps completed results
//! - **Export**: JSON and CSV files with identical content
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portsweep::scanner::{run_scan, ScanConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ScanConfig::from_specs("127.0.0.1", "22,80,8000-8100").unwrap();
//!     let report = run_scan(config).await.unwrap();
//!
//!     for result in report.open_results() {
//!         println!("{}:{} is open", result.host, result.port);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Ports, port specs, hosts and work items
//! - [`resolver`] - Host resolution into a work plan
//! - [`scanner`] - Connection prober and scan coordinator
//! - [`banner`] - Banner capture and sanitizing
//! - [`services`] - Well-known port names
//! - [`output`] - Console output and JSON/CSV export
//! - [`config`] - Optional settings file
//! - [`error`] - Error types

pub mod banner;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod resolver;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ExportError, ScanError, SpecError};
pub use scanner::{PortStatus, ScanConfig, ScanOutcome, ScanReport};
pub use types::{HostSpec, Port, PortSpec, Target};
