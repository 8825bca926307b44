//! Home Assistant `knx:` configuration block
//!
//! The text layout (two-space indentation, quoted scalars, blank line between
//! sections) is what users paste into `configuration.yaml`, so it is
//! produced by hand rather than through a YAML serializer.

use crate::config::TranslatorConfig;
use crate::covers::CoverGroup;
use crate::parser::{Classification, DeviceRecord};

/// Render the `knx:` block with `light:` and `cover:` sections
///
/// A section is omitted when it has no entries.
pub fn render_config(
    records: &[DeviceRecord],
    groups: &[CoverGroup],
    config: &TranslatorConfig,
) -> String {
    let mut out = String::from("knx:\n");

    let lights: Vec<&DeviceRecord> = records
        .iter()
        .filter(|record| record.classification == Classification::Light)
        .collect();
    if !lights.is_empty() {
        out.push_str("  light:\n");
        for light in lights {
            out.push_str(&format!("    - name: \"{}\"\n", light.name));
            out.push_str(&format!("      address: \"{}\"\n", light.address));
        }
    }

    out.push('\n');

    if !groups.is_empty() {
        out.push_str("  cover:\n");
        for group in groups {
            push_cover(&mut out, group, config);
        }
    }

    out
}

fn push_cover(out: &mut String, group: &CoverGroup, config: &TranslatorConfig) {
    out.push_str(&format!("    - name: \"{}\"\n", group.name));

    let mut field = |key: &str, value: &str| {
        out.push_str(&format!("      {key}: \"{value}\"\n"));
    };
    field("move_long_address", &group.move_long_address);
    field("move_short_address", &group.stop_address);
    field("stop_address", &group.stop_address);
    field("position_address", &group.position_address);
    field("position_state_address", &group.position_state_address);
    if group.is_tilt() {
        if let (Some(angle), Some(angle_state)) =
            (&group.angle_address, &group.angle_state_address)
        {
            field("angle_address", angle);
            field("angle_state_address", angle_state);
        }
    }
    field("travelling_time_down", &config.travelling_time_long);
    field("travelling_time_up", &config.travelling_time_long);
}
