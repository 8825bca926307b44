//! Artifact renderers
//!
//! Every renderer is a pure function from parsed records (and the cover
//! groups derived from them) to text. Writing that text to disk is left to
//! [`crate::io`].

pub mod buttons;
pub mod csv_export;
pub mod yaml;

use crate::config::{ClassifierMarkers, TranslatorConfig};
use crate::covers::{aggregate_covers, CoverGroup};
use crate::error::{Result, TranslatorError};
use crate::parser::{truncate_after_marker, DeviceRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use buttons::render_buttons;
pub use csv_export::render_csv;
pub use yaml::render_config;

/// Artifact kinds the translator can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Flat CSV of every parsed record
    Csv,
    /// KNX config block for copying into `configuration.yaml`
    Ha,
    /// KNX config block as a standalone file for `!include`
    Yaml,
    /// Dashboard card declarations
    Buttons,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Csv,
        OutputFormat::Ha,
        OutputFormat::Yaml,
        OutputFormat::Buttons,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Ha => "ha",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Buttons => "buttons",
        }
    }

    /// File extension the output path must carry, including the dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => ".csv",
            OutputFormat::Ha | OutputFormat::Buttons => ".txt",
            OutputFormat::Yaml => ".yaml",
        }
    }

    /// Output file name used when none is given
    pub fn default_file_name(&self, input_stem: &str) -> String {
        match self {
            OutputFormat::Csv => format!("{input_stem}_translated.csv"),
            OutputFormat::Ha => format!("{input_stem}_config.txt"),
            OutputFormat::Yaml => "knx_config.yaml".to_string(),
            OutputFormat::Buttons => format!("{input_stem}_buttons.txt"),
        }
    }

    /// Whether the artifact is line-oriented text written with CRLF endings
    ///
    /// The CSV writer emits its own record terminators.
    pub fn uses_crlf_conversion(&self) -> bool {
        !matches!(self, OutputFormat::Csv)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = TranslatorError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == wanted)
            .ok_or_else(|| TranslatorError::unsupported_format(s))
    }
}

/// Render parsed records into the requested format
pub fn render(
    format: OutputFormat,
    records: &[DeviceRecord],
    config: &TranslatorConfig,
) -> Result<String> {
    let groups = match format {
        OutputFormat::Csv => Vec::new(),
        _ => aggregate_covers(records, config),
    };
    render_with_groups(format, records, &groups, config)
}

/// Render with cover groups that were already aggregated from `records`
pub fn render_with_groups(
    format: OutputFormat,
    records: &[DeviceRecord],
    groups: &[CoverGroup],
    config: &TranslatorConfig,
) -> Result<String> {
    match format {
        OutputFormat::Csv => render_csv(records),
        OutputFormat::Ha | OutputFormat::Yaml => Ok(render_config(records, groups, config)),
        OutputFormat::Buttons => Ok(render_buttons(records, groups, config)),
    }
}

/// Turn a display name into a Home Assistant entity id suffix
///
/// Lowercases, replaces spaces, dots and slashes with underscores,
/// transliterates umlauts and cuts after the first tilt/roll marker.
pub fn entity_slug(name: &str, markers: &ClassifierMarkers) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '.' | '/' => '_',
            'ä' => 'a',
            'ö' => 'o',
            'ü' => 'u',
            other => other,
        })
        .collect();

    let tilt = markers.tilt.to_lowercase();
    let roll = markers.roll.to_lowercase();
    truncate_after_marker(&slug, &[tilt.as_str(), roll.as_str()]).to_string()
}
