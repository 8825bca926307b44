//! File boundary: reading ESF exports and persisting rendered artifacts

use crate::error::{Result, TranslatorError};
use crate::render::OutputFormat;
use encoding_rs::WINDOWS_1252;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// UTF-8 byte-order mark
pub const UTF8_BOM: &str = "\u{feff}";

/// Read an ESF export into lines
///
/// See [`decode_text`] for the accepted encodings. Line terminators are
/// removed; tabs are left untouched.
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let lines = split_lines(&decode_text(&bytes));
    debug!("Read {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Decode an export as UTF-8, falling back to Windows-1252
///
/// ETS writes exports in the Windows code page unless told otherwise. A
/// leading UTF-8 BOM is dropped.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM.as_bytes()).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            debug!(
                "Input is not UTF-8 (offset {}), decoding as Windows-1252",
                e.valid_up_to()
            );
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            text.into_owned()
        }
    }
}

/// Split text into lines, accepting both LF and CRLF
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Encode an artifact the way Home Assistant users expect it on disk
///
/// Every artifact gets a BOM. Text artifacts get CRLF line endings.
pub fn encode_artifact(content: &str, format: OutputFormat) -> String {
    let body = if format.uses_crlf_conversion() {
        content.replace("\r\n", "\n").replace('\n', "\r\n")
    } else {
        content.to_string()
    };
    format!("{UTF8_BOM}{body}")
}

/// Write a rendered artifact to `path`
pub fn write_artifact<P: AsRef<Path>>(path: P, content: &str, format: OutputFormat) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, encode_artifact(content, format))?;
    debug!("Wrote {} artifact to {}", format, path.display());
    Ok(())
}

/// Check that a path carries the expected extension, case-insensitively
pub fn ensure_extension(path: &Path, extension: &str, what: &str) -> Result<()> {
    let name = path.to_string_lossy().to_lowercase();
    if name.ends_with(extension) {
        Ok(())
    } else {
        Err(TranslatorError::invalid_input(format!(
            "{what} must have {extension} extension (got '{}')",
            path.display()
        )))
    }
}

/// Output path for a format: the explicit path if valid, else the default
/// file name next to the input
pub fn resolve_output_path(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<PathBuf> {
    match output {
        Some(path) => {
            ensure_extension(path, format.extension(), &format!("Output file for {format} mode"))?;
            Ok(path.to_path_buf())
        }
        None => {
            let stem = input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    TranslatorError::invalid_input(format!(
                        "Cannot derive an output name from '{}'",
                        input.display()
                    ))
                })?;
            let dir = input.parent().unwrap_or_else(|| Path::new(""));
            Ok(dir.join(format.default_file_name(&stem)))
        }
    }
}
