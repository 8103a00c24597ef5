//! CSV output formatting.

use super::ExportRecord;
use std::io::{Read, Write};

const HEADER: [&str; 5] = ["host", "port", "service", "banner", "scan_time"];

/// Write records with a header row. The header is written even when there
/// are no records so the file is always self-describing.
pub fn write_csv<W: Write>(writer: W, records: &[ExportRecord]) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Parse records previously written by [`write_csv`].
pub fn read_csv<R: Read>(reader: R) -> csv::Result<Vec<ExportRecord>> {
    csv::Reader::from_reader(reader).deserialize().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(banner: Option<&str>) -> ExportRecord {
        ExportRecord {
            host: "192.168.1.10".to_string(),
            port: 25,
            service: Some("SMTP".to_string()),
            banner: banner.map(str::to_string),
            scan_time: "2024-05-01 12:00:00".to_string(),
        }
    }

    #[test]
    fn test_header_only_when_empty() {
        let mut out = Vec::new();
        write_csv(&mut out, &[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "host,port,service,banner,scan_time\n"
        );
    }

    #[test]
    fn test_banner_with_comma_and_quote_is_quoted() {
        let mut out = Vec::new();
        write_csv(&mut out, &[record(Some("220 mail, \"ESMTP\" ready"))]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"220 mail, \"\"ESMTP\"\" ready\""));

        let parsed = read_csv(text.as_bytes()).unwrap();
        assert_eq!(parsed, vec![record(Some("220 mail, \"ESMTP\" ready"))]);
    }

    #[test]
    fn test_missing_banner_is_empty_field() {
        let mut out = Vec::new();
        write_csv(&mut out, &[record(None)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("192.168.1.10,25,SMTP,,2024-05-01 12:00:00\n"));
        assert_eq!(read_csv(text.as_bytes()).unwrap()[0].banner, None);
    }
}
