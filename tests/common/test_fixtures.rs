//! Test fixtures and utilities for consistent test setup
//!
//! Provides a small ESF export, name tables and configuration helpers
//! shared by the integration tests.

#![allow(dead_code)]

use knx_ha_translator::{NameTable, TranslatorConfig};
use rstest::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Header line as written by the ETS export
pub const ESF_HEADER: &str = "Musterhaus.esf\tExport\t";

/// A realistic export: two lights, one excluded status light, a tilt cover
/// with all six roles, a roller shutter without position feedback and some
/// lines that must be skipped
pub fn sample_esf_lines() -> Vec<&'static str> {
    vec![
        ESF_HEADER,
        "Beleuchtung.EG.Schalten.1/1/1\tKueche Licht\tEIS 1\tLow",
        "Beleuchtung.EG.Schalten.1/1/2\t_Flur Decke_\tEIS 1\tLow",
        "Beleuchtung.EG.Status.1/1/3\tst/Kueche Licht\tEIS 1\tLow",
        "Jalousien.OG.Auf/Ab.3/1/1\tWohnzimmer jal Auf/Ab\tEIS 1\tLow",
        "Jalousien.OG.Stopp.3/1/2\tWohnzimmer jal Stopp\tEIS 1\tLow",
        "Jalousien.OG.Position.3/1/3\tWohnzimmer jal Position\tEIS 6\tLow",
        "Jalousien.OG.Status Position.3/1/4\tWohnzimmer jal Status Position\tEIS 6\tLow",
        "Jalousien.OG.Lamelle.3/1/5\tWohnzimmer jal Lamelle\tEIS 6\tLow",
        "Jalousien.OG.Status Lamelle.3/1/6\tWohnzimmer jal Status Lamelle\tEIS 6\tLow",
        "Jalousien.DG.Auf/Ab.3/2/1\tBad rollo Auf/Ab\tEIS 1\tLow",
        "Jalousien.DG.Stopp.3/2/2\tBad rollo Stopp\tEIS 1\tLow",
        "Heizung.EG.Ventil.4/1/1\tKueche Heizung\tEIS 6\tLow",
        "only\ttwo fields",
        "NoDotsHere\tLabel\tEIS 1",
    ]
}

/// Default configuration
#[fixture]
pub fn default_config() -> TranslatorConfig {
    TranslatorConfig::default()
}

/// Configuration that does not skip any line
#[fixture]
pub fn no_junk_config() -> TranslatorConfig {
    TranslatorConfig {
        junk_lines: 0,
        ..TranslatorConfig::default()
    }
}

/// Name table from `(ID, Name)` pairs
pub fn name_table(rows: &[(&str, &str)]) -> NameTable {
    rows.iter().copied().collect()
}

/// Write a file into a fresh temporary directory
pub fn write_temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write temp file");
    (dir, path)
}
