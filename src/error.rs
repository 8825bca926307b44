//! Error types for the KNX to Home Assistant translator
//!
//! Per-line problems in the ESF export never surface as errors to the caller;
//! the parser skips those lines. Only structural problems with the name and
//! configuration tables, and I/O, abort an operation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for translator operations
pub type Result<T> = std::result::Result<T, TranslatorError>;

/// Error types for translator operations
#[derive(Error, Debug)]
pub enum TranslatorError {
    /// A single ESF line could not be turned into a record
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// The name override table is structurally invalid
    #[error("Invalid names file: {0}")]
    InvalidNameTable(String),

    /// The configuration table is structurally invalid
    #[error("Invalid config file: {0}")]
    InvalidConfigTable(String),

    /// Requested output format is not known
    #[error("Unsupported output format '{0}'. Supported formats are csv, ha, yaml, and buttons")]
    UnsupportedFormat(String),

    /// Invalid input errors (paths, extensions)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader/writer errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

/// Structured error code for machine-readable error handling
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Configuration errors (1200-1299)
    ConfigurationInvalid,
    NameTableInvalid,

    // Data errors (1400-1499)
    MessageMalformed,
    InvalidInput,
    UnsupportedFormat,

    // Internal errors (1900-1999)
    IoFailure,
    SerializationFailed,
    InternalError,
}

impl ErrorCode {
    /// Get numeric error code
    pub fn as_number(&self) -> u32 {
        match self {
            ErrorCode::ConfigurationInvalid => 1201,
            ErrorCode::NameTableInvalid => 1202,

            ErrorCode::MessageMalformed => 1401,
            ErrorCode::InvalidInput => 1402,
            ErrorCode::UnsupportedFormat => 1403,

            ErrorCode::IoFailure => 1901,
            ErrorCode::SerializationFailed => 1902,
            ErrorCode::InternalError => 1903,
        }
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        match self.as_number() {
            1200..=1299 => "configuration",
            1400..=1499 => "data",
            1900..=1999 => "internal",
            _ => "unknown",
        }
    }

    /// Process exit status reported by the command line tool
    pub fn exit_status(&self) -> u8 {
        match self.category() {
            "configuration" => 2,
            "data" => 3,
            _ => 1,
        }
    }
}

impl TranslatorError {
    /// Create a malformed record error
    pub fn malformed<S: Into<String>>(line: usize, reason: S) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Create a name table error
    pub fn invalid_name_table<S: Into<String>>(msg: S) -> Self {
        Self::InvalidNameTable(msg.into())
    }

    /// Create a config table error
    pub fn invalid_config_table<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfigTable(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an unsupported format error
    pub fn unsupported_format<S: Into<String>>(format: S) -> Self {
        Self::UnsupportedFormat(format.into())
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedRecord { .. } => ErrorCode::MessageMalformed,
            Self::InvalidNameTable(_) => ErrorCode::NameTableInvalid,
            Self::InvalidConfigTable(_) => ErrorCode::ConfigurationInvalid,
            Self::UnsupportedFormat(_) => ErrorCode::UnsupportedFormat,
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::Io(_) => ErrorCode::IoFailure,
            Self::Csv(_) | Self::Json(_) => ErrorCode::SerializationFailed,
            Self::Generic(_) => ErrorCode::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_categories() {
        let err = TranslatorError::invalid_config_table("bad header");
        assert_eq!(err.code(), ErrorCode::ConfigurationInvalid);
        assert_eq!(err.code().as_number(), 1201);
        assert_eq!(err.code().category(), "configuration");

        let err = TranslatorError::malformed(3, "too few fields");
        assert_eq!(err.code().category(), "data");
        assert_eq!(
            err.to_string(),
            "Malformed record on line 3: too few fields"
        );
    }

    #[test]
    fn test_exit_status_follows_category() {
        assert_eq!(TranslatorError::invalid_name_table("x").code().exit_status(), 2);
        assert_eq!(TranslatorError::unsupported_format("xml").code().exit_status(), 3);
        assert_eq!(TranslatorError::invalid_input("a.txt").code().exit_status(), 3);
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(TranslatorError::from(io).code().exit_status(), 1);
    }
}
