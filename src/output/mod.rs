//! Output formatting module.
//!
//! Console reporting plus the JSON and CSV encodings used for file export.

mod csv_format;
pub mod export;
mod json_format;
mod plain;

pub use csv_format::{read_csv, write_csv};
pub use export::{export_report, ExportPaths};
pub use json_format::{read_json, write_json};
pub use plain::{
    finding_line, print_error, print_info, print_scan_header, print_success, print_summary,
    print_warning, ConsoleReporter,
};

use crate::scanner::ScanOutcome;
use serde::{Deserialize, Serialize};

/// Timestamp layout used in exported files.
pub const SCAN_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One exported open port, shared by the JSON and CSV encodings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub host: String,
    pub port: u16,
    pub service: Option<String>,
    pub banner: Option<String>,
    pub scan_time: String,
}

impl From<&ScanOutcome> for ExportRecord {
    fn from(outcome: &ScanOutcome) -> Self {
        Self {
            host: outcome.host.clone(),
            port: outcome.port.as_u16(),
            service: outcome.service.clone(),
            banner: outcome.banner.clone(),
            scan_time: outcome.scan_time.format(SCAN_TIME_FORMAT).to_string(),
        }
    }
}
