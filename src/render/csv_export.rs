//! Flat CSV export of every parsed record, unknown ones included

use crate::error::{Result, TranslatorError};
use crate::parser::DeviceRecord;

/// Fixed header row
pub const CSV_HEADER: [&str; 4] = ["Address", "Name", "Classification", "Action"];

/// Render records as CSV with CRLF record terminators
pub fn render_csv(records: &[DeviceRecord]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([
            record.address.as_str(),
            record.name.as_str(),
            record.classification.as_str(),
            record.action.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV output: {}", e.error()))?;
    String::from_utf8(bytes).map_err(|e| TranslatorError::Generic(e.into()))
}
