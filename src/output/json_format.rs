//! JSON output formatting.

use super::ExportRecord;
use std::io::{Read, Write};

/// Write records as a pretty-printed JSON array.
pub fn write_json<W: Write>(mut writer: W, records: &[ExportRecord]) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)
}

/// Parse records previously written by [`write_json`].
pub fn read_json<R: Read>(reader: R) -> serde_json::Result<Vec<ExportRecord>> {
    serde_json::from_reader(reader)
}
