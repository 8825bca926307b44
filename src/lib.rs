//! KNX ESF to Home Assistant translator
//!
//! This crate turns the tab-separated ESF export of a KNX project into
//! artifacts Home Assistant can consume directly.
//!
//! # Features
//!
//! - Classification of group addresses into lights, tilt covers and roller shutters
//! - Label cleanup with optional per-address name overrides (`names.csv`)
//! - Folding of the several group addresses of a cover into one device
//! - Output as CSV, `knx:` configuration block, or dashboard button cards
//! - Configurable markers and role tokens (`config.csv`)
//!
//! ```no_run
//! use knx_ha_translator::{parse, render, OutputFormat, TranslatorConfig};
//!
//! let config = TranslatorConfig::default();
//! let lines = knx_ha_translator::io::read_lines("haus.esf")?;
//! let records = parse(&lines, None, &config);
//! let yaml = render(OutputFormat::Yaml, &records, &config)?;
//! # Ok::<(), knx_ha_translator::TranslatorError>(())
//! ```

pub mod config;
pub mod covers;
pub mod error;
pub mod io;
pub mod parser;
pub mod render;

// Re-export main types for convenience
pub use config::{NameTable, TranslatorConfig};
pub use covers::{aggregate_covers, CoverGroup, CoverRole, MISSING};
pub use error::{ErrorCode, Result, TranslatorError};
pub use parser::{parse, parse_with_summary, Classification, DeviceRecord, ParseSummary};
pub use render::{render, OutputFormat};
