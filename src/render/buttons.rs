//! Dashboard card declarations for every light and cover

use super::entity_slug;
use crate::config::TranslatorConfig;
use crate::covers::CoverGroup;
use crate::parser::{Classification, DeviceRecord};

/// Render button cards: one per light record, one per cover group
pub fn render_buttons(
    records: &[DeviceRecord],
    groups: &[CoverGroup],
    config: &TranslatorConfig,
) -> String {
    let mut out = String::from("##### Buttons for KNX entities #####\n");

    out.push_str("\n# Buttons for lights\n");
    for light in records
        .iter()
        .filter(|record| record.classification == Classification::Light)
    {
        out.push_str(&format!(
            "- type: button\n  show_icon: true\n  show_name: true\n  entity: light.{}\n",
            entity_slug(&light.name, &config.markers)
        ));
    }

    out.push_str("\n# Buttons for covers\n");
    for group in groups {
        let slug = entity_slug(&group.name, &config.markers);
        if group.is_tilt() {
            out.push_str(&format!(
                "- type: tile\n  entity: cover.{slug}\n  features_position: bottom\n  vertical: false\n"
            ));
        } else {
            out.push_str(&format!("- type: entity\n  entity: cover.{slug}\n"));
        }
    }

    out
}
