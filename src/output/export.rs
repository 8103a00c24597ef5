//! Writing scan results to `<base>.json` and `<base>.csv`.

use super::{write_csv, write_json, ExportRecord};
use crate::error::ExportError;
use crate::scanner::ScanReport;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Files produced by [`export_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

impl ExportPaths {
    /// Append `.json` / `.csv` to `base` without touching any existing
    /// extension, so `scan.v1` becomes `scan.v1.json`.
    pub fn from_base(base: &Path) -> Self {
        let with_ext = |ext: &str| {
            let mut name = OsString::from(base.as_os_str());
            name.push(ext);
            PathBuf::from(name)
        };
        Self {
            json: with_ext(".json"),
            csv: with_ext(".csv"),
        }
    }
}

/// Export the open results of `report` in both formats.
pub fn export_report(base: &Path, report: &ScanReport) -> Result<ExportPaths, ExportError> {
    let paths = ExportPaths::from_base(base);
    let records: Vec<ExportRecord> = report.open_results().map(ExportRecord::from).collect();

    let mut json = create(&paths.json)?;
    write_json(&mut json, &records).map_err(|source| ExportError::Json {
        path: paths.json.clone(),
        source,
    })?;
    flush(json, &paths.json)?;

    let mut csv = create(&paths.csv)?;
    write_csv(&mut csv, &records).map_err(|source| ExportError::Csv {
        path: paths.csv.clone(),
        source,
    })?;
    flush(csv, &paths.csv)?;

    info!(records = records.len(), json = %paths.json.display(), csv = %paths.csv.display(), "exported results");
    Ok(paths)
}

fn flush(mut writer: BufWriter<File>, path: &Path) -> Result<(), ExportError> {
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn create(path: &Path) -> Result<BufWriter<File>, ExportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{read_csv, read_json};
    use crate::scanner::{PortStatus, ScanOutcome};
    use crate::types::{Port, Target, WorkItem};
    use std::collections::HashSet;
    use std::net::{IpAddr, Ipv4Addr};

    fn outcome(host: &str, port: u16, status: PortStatus, banner: Option<&str>) -> ScanOutcome {
        let target = Target::new(host, IpAddr::V4(Ipv4Addr::new(10, 1, 1, 1)));
        let item = WorkItem::new(&target, Port::new(port).unwrap());
        let mut outcome =
            ScanOutcome::new(&item, status).with_banner(banner.map(str::to_string));
        outcome.service = crate::services::lookup(port).map(str::to_string);
        outcome
    }

    fn report() -> ScanReport {
        ScanReport {
            results: vec![
                outcome("10.1.1.1", 22, PortStatus::Open, Some("SSH-2.0-OpenSSH_9.6")),
                outcome("10.1.1.1", 25, PortStatus::Open, Some("220 mx, ESMTP\tready")),
                outcome("10.1.1.1", 80, PortStatus::Closed, None),
                outcome("web", 31337, PortStatus::Open, None),
            ],
            ..ScanReport::default()
        }
    }

    #[test]
    fn test_paths_append_extension() {
        let paths = ExportPaths::from_base(Path::new("out/scan.v1"));
        assert_eq!(paths.json, PathBuf::from("out/scan.v1.json"));
        assert_eq!(paths.csv, PathBuf::from("out/scan.v1.csv"));
    }

    #[test]
    fn test_json_and_csv_agree() {
        let dir = tempfile::tempdir().unwrap();
        let paths = export_report(&dir.path().join("results"), &report()).unwrap();

        let from_json = read_json(File::open(&paths.json).unwrap()).unwrap();
        let from_csv = read_csv(File::open(&paths.csv).unwrap()).unwrap();

        let triples = |records: &[ExportRecord]| -> HashSet<(String, u16, Option<String>)> {
            records
                .iter()
                .map(|r| (r.host.clone(), r.port, r.service.clone()))
                .collect()
        };
        assert_eq!(from_json.len(), 3);
        assert_eq!(triples(&from_json), triples(&from_csv));
        assert!(triples(&from_json).contains(&("10.1.1.1".to_string(), 22, Some("SSH".to_string()))));
        assert!(triples(&from_json).contains(&("web".to_string(), 31337, None)));
        assert_eq!(from_json, from_csv);
    }

    #[test]
    fn test_unwritable_location_is_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("missing-dir").join("results");
        let err = export_report(&base, &report()).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
