//! Translator configuration
//!
//! All classifier markers, cover role tokens and output defaults live in one
//! immutable [`TranslatorConfig`] value. It is built once per run, either from
//! the built-in defaults or from a `Key,Value` table, and then only borrowed.

pub mod names;

use crate::error::{Result, TranslatorError};
use crate::render::OutputFormat;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

pub use names::{NameLookup, NameTable};

/// Header of the configuration table
pub const CONFIG_TABLE_HEADER: [&str; 2] = ["Key", "Value"];

/// Separator for list-valued keys such as `LIGHT_EXCLUDED_PREFIXES`
pub const LIST_SEPARATOR: char = '|';

/// Recognised configuration keys
pub mod keys {
    pub const DEFAULT_OUTPUT_FORMAT: &str = "DEFAULT_OUTPUT_FORMAT";
    pub const DEFAULT_JUNK_FIRST_COL: &str = "DEFAULT_JUNK_FIRST_COL";
    pub const KNX_CLASSIFIER_LIGHT: &str = "KNX_CLASSIFIER_LIGHT";
    pub const KNX_CLASSIFIER_COVER: &str = "KNX_CLASSIFIER_COVER";
    pub const KNX_CLASSIFIER_JALOUSIE: &str = "KNX_CLASSIFIER_JALOUSIE";
    pub const KNX_CLASSIFIER_ROLLO: &str = "KNX_CLASSIFIER_ROLLO";
    pub const LIGHT_EXCLUDED_PREFIXES: &str = "LIGHT_EXCLUDED_PREFIXES";
    pub const MOVE_LONG_ADDRESS: &str = "MOVE_LONG_ADDRESS";
    pub const STOP_ADDRESS: &str = "STOP_ADDRESS";
    pub const POSITION_STATE_ADDRESS: &str = "POSITION_STATE_ADDRESS";
    pub const POSITION_ADDRESS: &str = "POSITION_ADDRESS";
    pub const ANGLE_STATE_ADDRESS: &str = "ANGLE_STATE_ADDRESS";
    pub const ANGLE_ADDRESS: &str = "ANGLE_ADDRESS";
    pub const STANDARD_TRAVELLING_TIME_LONG: &str = "STANDARD_TRAVELLING_TIME_LONG";
    pub const STANDARD_TRAVELLING_TIME_SHORT: &str = "STANDARD_TRAVELLING_TIME_SHORT";

    /// Every key with a built-in default
    pub const ALL: [&str; 15] = [
        DEFAULT_OUTPUT_FORMAT,
        DEFAULT_JUNK_FIRST_COL,
        KNX_CLASSIFIER_LIGHT,
        KNX_CLASSIFIER_COVER,
        KNX_CLASSIFIER_JALOUSIE,
        KNX_CLASSIFIER_ROLLO,
        LIGHT_EXCLUDED_PREFIXES,
        MOVE_LONG_ADDRESS,
        STOP_ADDRESS,
        POSITION_STATE_ADDRESS,
        POSITION_ADDRESS,
        ANGLE_STATE_ADDRESS,
        ANGLE_ADDRESS,
        STANDARD_TRAVELLING_TIME_LONG,
        STANDARD_TRAVELLING_TIME_SHORT,
    ];
}

/// Substring markers used by the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierMarkers {
    /// Marker in the first address segment for lighting addresses
    pub light: String,

    /// Marker in the first address segment for cover addresses
    pub cover: String,

    /// Label marker for covers with slats (tilt)
    pub tilt: String,

    /// Label marker for roller shutters
    pub roll: String,

    /// Label prefixes that disqualify a lighting address
    pub light_excluded_prefixes: Vec<String>,
}

/// Action substrings that identify each cover role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTokens {
    pub move_long: String,
    pub stop: String,
    pub position_state: String,
    pub position: String,
    pub angle_state: String,
    pub angle: String,
}

/// Immutable translator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorConfig {
    /// Format used when none is requested explicitly
    pub default_output_format: OutputFormat,

    /// Number of leading ESF lines to skip
    pub junk_lines: usize,

    /// Classifier markers
    pub markers: ClassifierMarkers,

    /// Cover role tokens
    pub roles: RoleTokens,

    /// Travelling time in seconds for long covers, rendered as given
    pub travelling_time_long: String,

    /// Travelling time in seconds for short covers
    pub travelling_time_short: String,

    /// Unrecognised keys, passed through untouched
    pub extras: BTreeMap<String, String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            default_output_format: OutputFormat::Ha,
            junk_lines: 1,
            markers: ClassifierMarkers {
                light: "beleuchtung".to_string(),
                cover: "jalousien".to_string(),
                tilt: "jal".to_string(),
                roll: "rollo".to_string(),
                light_excluded_prefixes: ["w/", "rd/", "st/", "st_w/"]
                    .iter()
                    .map(|p| p.to_string())
                    .collect(),
            },
            roles: RoleTokens {
                move_long: "Auf/Ab".to_string(),
                stop: "Stopp".to_string(),
                position_state: "Status Position".to_string(),
                position: "Position".to_string(),
                angle_state: "Status Lamelle".to_string(),
                angle: "Lamelle".to_string(),
            },
            travelling_time_long: "60".to_string(),
            travelling_time_short: "30".to_string(),
            extras: BTreeMap::new(),
        }
    }
}

impl TranslatorConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration overrides from a `Key,Value` CSV file
    pub fn from_table_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            TranslatorError::invalid_config_table(format!(
                "Failed to open '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_reader(file)?;
        info!(
            "Loaded configuration from {} ({} pass-through keys)",
            path.display(),
            config.extras.len()
        );
        Ok(config)
    }

    /// Load configuration overrides from any `Key,Value` CSV source
    ///
    /// Keys missing from the table keep their defaults.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let rows = read_two_column_table(reader, CONFIG_TABLE_HEADER, |msg| {
            TranslatorError::invalid_config_table(msg)
        })?;

        let mut config = Self::default();
        for (key, value) in rows {
            config.apply(key.trim(), value.trim())?;
        }
        Ok(config)
    }

    /// Apply a single override
    fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            keys::DEFAULT_OUTPUT_FORMAT => {
                self.default_output_format = value.parse().map_err(|_| {
                    TranslatorError::invalid_config_table(format!(
                        "{key} must be one of csv, ha, yaml, buttons (got '{value}')"
                    ))
                })?;
            }
            keys::DEFAULT_JUNK_FIRST_COL => self.junk_lines = parse_integer(key, value)?,
            keys::KNX_CLASSIFIER_LIGHT => self.markers.light = value.to_string(),
            keys::KNX_CLASSIFIER_COVER => self.markers.cover = value.to_string(),
            keys::KNX_CLASSIFIER_JALOUSIE => self.markers.tilt = value.to_string(),
            keys::KNX_CLASSIFIER_ROLLO => self.markers.roll = value.to_string(),
            keys::LIGHT_EXCLUDED_PREFIXES => {
                self.markers.light_excluded_prefixes = value
                    .split(LIST_SEPARATOR)
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            keys::MOVE_LONG_ADDRESS => self.roles.move_long = value.to_string(),
            keys::STOP_ADDRESS => self.roles.stop = value.to_string(),
            keys::POSITION_STATE_ADDRESS => self.roles.position_state = value.to_string(),
            keys::POSITION_ADDRESS => self.roles.position = value.to_string(),
            keys::ANGLE_STATE_ADDRESS => self.roles.angle_state = value.to_string(),
            keys::ANGLE_ADDRESS => self.roles.angle = value.to_string(),
            keys::STANDARD_TRAVELLING_TIME_LONG => self.travelling_time_long = value.to_string(),
            keys::STANDARD_TRAVELLING_TIME_SHORT => self.travelling_time_short = value.to_string(),
            _ => {
                self.extras.insert(key.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    /// Look up any key, recognised or pass-through, as text
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            keys::DEFAULT_OUTPUT_FORMAT => self.default_output_format.to_string(),
            keys::DEFAULT_JUNK_FIRST_COL => self.junk_lines.to_string(),
            keys::KNX_CLASSIFIER_LIGHT => self.markers.light.clone(),
            keys::KNX_CLASSIFIER_COVER => self.markers.cover.clone(),
            keys::KNX_CLASSIFIER_JALOUSIE => self.markers.tilt.clone(),
            keys::KNX_CLASSIFIER_ROLLO => self.markers.roll.clone(),
            keys::LIGHT_EXCLUDED_PREFIXES => self
                .markers
                .light_excluded_prefixes
                .join(&LIST_SEPARATOR.to_string()),
            keys::MOVE_LONG_ADDRESS => self.roles.move_long.clone(),
            keys::STOP_ADDRESS => self.roles.stop.clone(),
            keys::POSITION_STATE_ADDRESS => self.roles.position_state.clone(),
            keys::POSITION_ADDRESS => self.roles.position.clone(),
            keys::ANGLE_STATE_ADDRESS => self.roles.angle_state.clone(),
            keys::ANGLE_ADDRESS => self.roles.angle.clone(),
            keys::STANDARD_TRAVELLING_TIME_LONG => self.travelling_time_long.clone(),
            keys::STANDARD_TRAVELLING_TIME_SHORT => self.travelling_time_short.clone(),
            other => return self.extras.get(other).cloned(),
        };
        Some(value)
    }

    /// Check the configuration for values that parse but will misbehave
    ///
    /// Role resolution excludes the plain position/angle token whenever the
    /// state token is present, which only works while the state token
    /// contains the plain token.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let markers = [
            (keys::KNX_CLASSIFIER_LIGHT, &self.markers.light),
            (keys::KNX_CLASSIFIER_COVER, &self.markers.cover),
            (keys::KNX_CLASSIFIER_JALOUSIE, &self.markers.tilt),
            (keys::KNX_CLASSIFIER_ROLLO, &self.markers.roll),
        ];
        for (key, marker) in markers {
            if marker.is_empty() {
                warnings.push(format!("{key} is empty and matches every record"));
            }
        }

        let pairs = [
            (
                keys::POSITION_STATE_ADDRESS,
                &self.roles.position_state,
                keys::POSITION_ADDRESS,
                &self.roles.position,
            ),
            (
                keys::ANGLE_STATE_ADDRESS,
                &self.roles.angle_state,
                keys::ANGLE_ADDRESS,
                &self.roles.angle,
            ),
        ];
        for (state_key, state, plain_key, plain) in pairs {
            if !state.contains(plain.as_str()) {
                warnings.push(format!(
                    "{state_key} ('{state}') does not contain {plain_key} ('{plain}'); \
                     cover roles may be assigned to the wrong address"
                ));
            }
        }

        for warning in &warnings {
            warn!("{}", warning);
        }
        warnings
    }
}

fn parse_integer<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        TranslatorError::invalid_config_table(format!("{key} must be an integer (got '{value}')"))
    })
}

/// Read a two-column CSV table with a fixed header row
///
/// The header is compared after stripping a UTF-8 BOM and surrounding
/// whitespace. Every data row must have exactly two columns.
pub(crate) fn read_two_column_table<R, F>(
    reader: R,
    header: [&str; 2],
    error: F,
) -> Result<Vec<(String, String)>>
where
    R: Read,
    F: Fn(String) -> TranslatorError,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = csv_reader.records();

    let first = match records.next() {
        Some(record) => record.map_err(|e| error(format!("Failed to read header: {e}")))?,
        None => return Err(error("File is empty".to_string())),
    };
    let found: Vec<&str> = first
        .iter()
        .map(|col| col.trim_start_matches('\u{feff}').trim())
        .collect();
    if found != header {
        return Err(error(format!(
            "The first row must be: {}, {}",
            header[0], header[1]
        )));
    }

    let mut rows = Vec::new();
    for (index, record) in records.enumerate() {
        let record = record.map_err(|e| error(format!("Failed to read row {}: {e}", index + 2)))?;
        if record.len() != 2 {
            return Err(error(format!(
                "Row {} has {} columns, expected exactly two",
                index + 2,
                record.len()
            )));
        }
        rows.push((record[0].to_string(), record[1].to_string()));
    }
    Ok(rows)
}
