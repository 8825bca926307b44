//! Display name cleanup
//!
//! Every group address of a cover carries a label such as
//! `"Wohnzimmer jal Status Position"`. Cutting the label right after the
//! tilt/roll marker leaves a name shared by all addresses of that device.

use crate::config::ClassifierMarkers;

/// Normalize a raw ESF label into a display name
///
/// An override from the names table is used verbatim. Otherwise surrounding
/// whitespace and underscores are stripped and the name is truncated after
/// the first tilt or roll marker.
pub fn normalize(label: &str, exact_match: Option<&str>, markers: &ClassifierMarkers) -> String {
    if let Some(name) = exact_match {
        return name.to_string();
    }

    let cleaned = label.trim().trim_matches('_');
    truncate_after_marker(cleaned, &[markers.tilt.as_str(), markers.roll.as_str()]).to_string()
}

/// Truncate `name` right after the first marker that occurs in it
///
/// Markers are tried in order; the first one found wins even if a later
/// marker occurs earlier in the string. Matching is case-sensitive.
pub fn truncate_after_marker<'a>(name: &'a str, markers: &[&str]) -> &'a str {
    markers
        .iter()
        .filter(|marker| !marker.is_empty())
        .find_map(|marker| name.find(*marker).map(|idx| &name[..idx + marker.len()]))
        .unwrap_or(name)
}

/// Grouping key of a cover: the name without its last space-delimited word
pub fn base_name(name: &str) -> &str {
    match name.rsplit_once(' ') {
        Some((head, _)) => head,
        None => name,
    }
}
