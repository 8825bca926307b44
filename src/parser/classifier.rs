//! Device classification from address path and label

use crate::config::ClassifierMarkers;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Device category of a single group address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    Light,
    CoverTilt,
    CoverRoll,
    Unknown,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Light => "light",
            Classification::CoverTilt => "cover-tilt",
            Classification::CoverRoll => "cover-roll",
            Classification::Unknown => "unknown",
        }
    }

    /// Whether this is one of the cover categories
    pub fn is_cover(&self) -> bool {
        matches!(self, Classification::CoverTilt | Classification::CoverRoll)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a record by its group path and its label
///
/// `group_path` is the dotted address without the leaf group address, e.g.
/// `Beleuchtung.EG.Schalten`. Rules are checked in order and the first match
/// wins. All comparisons are case-insensitive. A lighting address whose label
/// starts with one of the excluded prefixes falls through to the remaining
/// rules.
pub fn classify(group_path: &str, label: &str, markers: &ClassifierMarkers) -> Classification {
    let path = group_path.to_lowercase();
    let label_lower = label.to_lowercase();
    let contains = |haystack: &str, marker: &str| haystack.contains(&marker.to_lowercase());

    let trimmed_label = label_lower.trim();
    let excluded = markers
        .light_excluded_prefixes
        .iter()
        .any(|prefix| trimmed_label.starts_with(&prefix.to_lowercase()));

    let rules: [(bool, Classification); 3] = [
        (
            contains(&path, &markers.light) && !excluded,
            Classification::Light,
        ),
        (
            contains(&path, &markers.cover) && contains(&label_lower, &markers.tilt),
            Classification::CoverTilt,
        ),
        (
            contains(&path, &markers.cover) && contains(&label_lower, &markers.roll),
            Classification::CoverRoll,
        ),
    ];

    rules
        .into_iter()
        .find_map(|(matched, classification)| matched.then_some(classification))
        .unwrap_or(Classification::Unknown)
}
