//! ESF record parser
//!
//! Turns the raw lines of an ESF export into typed [`DeviceRecord`]s. Each
//! line looks like
//!
//! ```text
//! GA.jalousien.OG.Status Position.3/1/7<TAB>Wohnzimmer jal Status Position<TAB>...
//! ```
//!
//! where the first field is a dotted address path whose last segment is the
//! group address and whose second-to-last segment names the action.
//! Malformed lines are skipped and never abort the parse.

pub mod classifier;
pub mod normalizer;

use crate::config::{NameLookup, NameTable, TranslatorConfig};
use crate::covers::CoverGroup;
use crate::error::{Result, TranslatorError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use classifier::{classify, Classification};
pub use normalizer::{base_name, normalize, truncate_after_marker};

/// Minimum number of tab-separated fields per line
pub const MIN_FIELDS: usize = 3;

/// Minimum number of dot-separated segments in the address path
pub const MIN_ADDRESS_SEGMENTS: usize = 2;

/// One ESF line split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Full first field, the key for name overrides
    pub first_field: String,

    /// Dot-separated segments of the first field
    pub segments: Vec<String>,

    /// Free-text label
    pub label: String,
}

impl RawRecord {
    /// Split a line into a raw record
    pub fn from_line(line: &str, line_number: usize) -> Result<Self> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < MIN_FIELDS {
            return Err(TranslatorError::malformed(
                line_number,
                format!("expected at least {MIN_FIELDS} fields, found {}", fields.len()),
            ));
        }

        let segments: Vec<String> = fields[0].split('.').map(str::to_string).collect();
        if segments.len() < MIN_ADDRESS_SEGMENTS {
            return Err(TranslatorError::malformed(
                line_number,
                format!("address '{}' has fewer than {MIN_ADDRESS_SEGMENTS} segments", fields[0]),
            ));
        }

        Ok(Self {
            first_field: fields[0].to_string(),
            segments,
            label: fields[1].to_string(),
        })
    }

    /// Leaf group address
    pub fn address(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Action hint, the second-to-last segment
    pub fn action(&self) -> &str {
        &self.segments[self.segments.len() - 2]
    }

    /// Address path without the leaf group address
    pub fn group_path(&self) -> &str {
        let leaf_len = self.address().len() + 1;
        &self.first_field[..self.first_field.len() - leaf_len]
    }
}

/// A classified group address with its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(rename = "Address")]
    pub address: String,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Classification")]
    pub classification: Classification,

    #[serde(rename = "Action")]
    pub action: String,
}

impl DeviceRecord {
    /// Build a record from a raw line
    pub fn from_raw(raw: &RawRecord, names: Option<&NameTable>, config: &TranslatorConfig) -> Self {
        let classification = classify(raw.group_path(), &raw.label, &config.markers);

        let exact_match = match names.map(|table| table.lookup(&raw.first_field)) {
            Some(NameLookup::Unique(name)) => Some(name),
            Some(NameLookup::Ambiguous(count)) => {
                warn!(
                    "{} name overrides match '{}', using the label instead",
                    count, raw.first_field
                );
                None
            }
            Some(NameLookup::Missing) | None => None,
        };

        Self {
            address: raw.address().to_string(),
            name: normalize(&raw.label, exact_match, &config.markers),
            classification,
            action: raw.action().to_string(),
        }
    }
}

/// Parse ESF lines into device records, in file order
pub fn parse<I, S>(lines: I, names: Option<&NameTable>, config: &TranslatorConfig) -> Vec<DeviceRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_lines(lines, names, config).records
}

/// Parse ESF lines and collect statistics about the run
///
/// Cover statistics stay empty until [`ParseSummary::with_covers`] is
/// applied to the aggregated groups.
pub fn parse_with_summary<I, S>(
    lines: I,
    names: Option<&NameTable>,
    config: &TranslatorConfig,
) -> (Vec<DeviceRecord>, ParseSummary)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let outcome = parse_lines(lines, names, config);
    let summary = ParseSummary::collect(
        outcome.lines_read,
        outcome.junk_lines,
        outcome.malformed_lines,
        &outcome.records,
    );
    (outcome.records, summary)
}

struct ParseOutcome {
    records: Vec<DeviceRecord>,
    lines_read: usize,
    junk_lines: usize,
    malformed_lines: usize,
}

fn parse_lines<I, S>(lines: I, names: Option<&NameTable>, config: &TranslatorConfig) -> ParseOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut outcome = ParseOutcome {
        records: Vec::new(),
        lines_read: 0,
        junk_lines: 0,
        malformed_lines: 0,
    };

    for (index, line) in lines.into_iter().enumerate() {
        let line_number = index + 1;
        outcome.lines_read += 1;

        if line_number <= config.junk_lines {
            outcome.junk_lines += 1;
            continue;
        }

        // Tabs are significant for the field count, so only strip terminators
        let line = line.as_ref().trim_end_matches(['\r', '\n']);
        match RawRecord::from_line(line, line_number) {
            Ok(raw) => outcome
                .records
                .push(DeviceRecord::from_raw(&raw, names, config)),
            Err(e) => {
                debug!("Skipping line: {}", e);
                outcome.malformed_lines += 1;
            }
        }
    }

    info!(
        "Parsed {} records from {} lines ({} malformed)",
        outcome.records.len(),
        outcome.lines_read,
        outcome.malformed_lines
    );
    outcome
}

/// Statistics about a parse run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseSummary {
    pub lines_read: usize,
    pub junk_lines: usize,
    pub malformed_lines: usize,
    pub records: usize,
    pub lights: usize,
    pub cover_tilt: usize,
    pub cover_roll: usize,
    pub unknown: usize,
    pub cover_groups: usize,
    /// `"<cover>: <role>"` for every role that resolved to `MISSING`
    pub unresolved_roles: Vec<String>,
}

impl ParseSummary {
    pub fn collect(
        lines_read: usize,
        junk_lines: usize,
        malformed_lines: usize,
        records: &[DeviceRecord],
    ) -> Self {
        let count = |wanted: Classification| {
            records
                .iter()
                .filter(|record| record.classification == wanted)
                .count()
        };

        Self {
            lines_read,
            junk_lines,
            malformed_lines,
            records: records.len(),
            lights: count(Classification::Light),
            cover_tilt: count(Classification::CoverTilt),
            cover_roll: count(Classification::CoverRoll),
            unknown: count(Classification::Unknown),
            cover_groups: 0,
            unresolved_roles: Vec::new(),
        }
    }

    /// Add cover group statistics
    pub fn with_covers(mut self, groups: &[CoverGroup]) -> Self {
        self.cover_groups = groups.len();
        self.unresolved_roles = groups
            .iter()
            .flat_map(|group| {
                group
                    .unresolved_roles()
                    .into_iter()
                    .map(move |role| format!("{}: {}", group.name, role))
            })
            .collect();
        self
    }
}
