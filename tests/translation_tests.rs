//! End-to-end translation tests
//!
//! Runs the full pipeline (parse, aggregate, render, write) over a small
//! ESF export and checks the artifacts users paste into Home Assistant.

mod common;

use common::*;
use knx_ha_translator::{
    aggregate_covers,
    io::{read_lines, resolve_output_path, write_artifact, UTF8_BOM},
    parse, parse_with_summary, render, Classification, ErrorCode, NameTable, OutputFormat,
    TranslatorConfig, TranslatorError, MISSING,
};
use pretty_assertions::assert_eq;
use rstest::*;
use std::path::Path;

#[rstest]
fn test_sample_export_records(default_config: TranslatorConfig) {
    let records = parse(sample_esf_lines(), None, &default_config);

    // Header and the two malformed lines are gone
    assert_eq!(records.len(), 12);
    assert_eq!(records[0].address, "1/1/1");
    assert_eq!(records[0].name, "Kueche Licht");
    assert_eq!(records[0].action, "Schalten");
    assert_eq!(records[1].name, "Flur Decke");
    assert_eq!(records[2].classification, Classification::Unknown);
    assert_eq!(records[3].name, "Wohnzimmer jal");
    assert_eq!(records[3].classification, Classification::CoverTilt);
    assert_eq!(records[9].classification, Classification::CoverRoll);
    assert_eq!(records[11].classification, Classification::Unknown);
}

#[rstest]
fn test_summary_of_sample_export(default_config: TranslatorConfig) {
    let (records, summary) = parse_with_summary(sample_esf_lines(), None, &default_config);
    let summary = summary.with_covers(&aggregate_covers(&records, &default_config));

    assert_eq!(summary.lines_read, 15);
    assert_eq!(summary.junk_lines, 1);
    assert_eq!(summary.malformed_lines, 2);
    assert_eq!(summary.records, 12);
    assert_eq!(summary.lights, 2);
    assert_eq!(summary.cover_tilt, 6);
    assert_eq!(summary.cover_roll, 2);
    assert_eq!(summary.unknown, 2);
    assert_eq!(summary.cover_groups, 2);
    assert_eq!(
        summary.unresolved_roles,
        vec!["Bad: position".to_string(), "Bad: position_state".to_string()]
    );
}

#[rstest]
fn test_single_light_line(no_junk_config: TranslatorConfig) {
    let records = parse(
        ["GA.beleuchtung.OG.01\tKueche Licht\t\t"],
        None,
        &no_junk_config,
    );
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].address, "01");
    assert_eq!(records[0].name, "Kueche Licht");
    assert_eq!(records[0].classification, Classification::Light);
    assert_eq!(records[0].action, "OG");
}

#[rstest]
fn test_status_light_never_reaches_light_section(no_junk_config: TranslatorConfig) {
    let records = parse(
        ["GA.beleuchtung.OG.02\tst/Kueche Licht\t\t"],
        None,
        &no_junk_config,
    );
    assert_eq!(records[0].classification, Classification::Unknown);

    let yaml = render(OutputFormat::Yaml, &records, &no_junk_config).unwrap();
    assert_eq!(yaml, "knx:\n\n");
}

#[rstest]
fn test_malformed_line_does_not_disturb_neighbours(no_junk_config: TranslatorConfig) {
    let records = parse(
        [
            "GA.beleuchtung.OG.01\tKueche Licht\t\t",
            "GA.beleuchtung.02\tBroken",
            "GA.beleuchtung.OG.03\tFlur Licht\t\t",
        ],
        None,
        &no_junk_config,
    );
    let names: Vec<&str> = records.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(names, vec!["Kueche Licht", "Flur Licht"]);
}

#[rstest]
fn test_cover_from_name_table(no_junk_config: TranslatorConfig) {
    let names = name_table(&[
        ("GA.jalousien.OG.Auf/Ab.3/1/1", "Wohnzimmer jal Auf/Ab"),
        ("GA.jalousien.OG.Stopp.3/1/2", "Wohnzimmer jal Stopp"),
    ]);
    let records = parse(
        [
            "GA.jalousien.OG.Auf/Ab.3/1/1\tirrelevant jal\t\t",
            "GA.jalousien.OG.Stopp.3/1/2\tirrelevant jal\t\t",
        ],
        Some(&names),
        &no_junk_config,
    );
    let groups = aggregate_covers(&records, &no_junk_config);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "Wohnzimmer jal");
    assert_eq!(groups[0].move_long_address, "3/1/1");
    assert_eq!(groups[0].stop_address, "3/1/2");
    assert_eq!(groups[0].position_address, MISSING);
    assert_eq!(groups[0].position_state_address, MISSING);
    assert_eq!(groups[0].angle_address.as_deref(), Some(MISSING));
}

#[rstest]
fn test_yaml_for_sample_export(default_config: TranslatorConfig) {
    let records = parse(sample_esf_lines(), None, &default_config);
    let yaml = render(OutputFormat::Yaml, &records, &default_config).unwrap();

    let expected = "\
knx:
  light:
    - name: \"Kueche Licht\"
      address: \"1/1/1\"
    - name: \"Flur Decke\"
      address: \"1/1/2\"

  cover:
    - name: \"Bad\"
      move_long_address: \"3/2/1\"
      move_short_address: \"3/2/2\"
      stop_address: \"3/2/2\"
      position_address: \"MISSING\"
      position_state_address: \"MISSING\"
      travelling_time_down: \"60\"
      travelling_time_up: \"60\"
    - name: \"Wohnzimmer\"
      move_long_address: \"3/1/1\"
      move_short_address: \"3/1/2\"
      stop_address: \"3/1/2\"
      position_address: \"3/1/3\"
      position_state_address: \"3/1/4\"
      angle_address: \"3/1/5\"
      angle_state_address: \"3/1/6\"
      travelling_time_down: \"60\"
      travelling_time_up: \"60\"
";
    assert_eq!(yaml, expected);
}

#[rstest]
fn test_buttons_for_sample_export(default_config: TranslatorConfig) {
    let records = parse(sample_esf_lines(), None, &default_config);
    let buttons = render(OutputFormat::Buttons, &records, &default_config).unwrap();

    let expected = "\
##### Buttons for KNX entities #####

# Buttons for lights
- type: button
  show_icon: true
  show_name: true
  entity: light.kueche_licht
- type: button
  show_icon: true
  show_name: true
  entity: light.flur_decke

# Buttons for covers
- type: entity
  entity: cover.bad
- type: tile
  entity: cover.wohnzimmer
  features_position: bottom
  vertical: false
";
    assert_eq!(buttons, expected);
}

#[rstest]
fn test_csv_keeps_unknown_records(default_config: TranslatorConfig) {
    let records = parse(sample_esf_lines(), None, &default_config);
    let csv = render(OutputFormat::Csv, &records, &default_config).unwrap();
    let lines: Vec<&str> = csv.split("\r\n").collect();

    assert_eq!(lines[0], "Address,Name,Classification,Action");
    assert_eq!(lines[1], "1/1/1,Kueche Licht,light,Schalten");
    assert_eq!(lines[3], "1/1/3,st/Kueche Licht,unknown,Status");
    assert_eq!(lines[12], "4/1/1,Kueche Heizung,unknown,Ventil");
    // 12 records, the header and the empty tail after the last terminator
    assert_eq!(lines.len(), 14);
}

#[rstest]
#[case(OutputFormat::Csv)]
#[case(OutputFormat::Ha)]
#[case(OutputFormat::Yaml)]
#[case(OutputFormat::Buttons)]
fn test_end_to_end_file_translation(#[case] format: OutputFormat) {
    let content = sample_esf_lines().join("\r\n");
    let (dir, input) = write_temp_file("Musterhaus.esf", &content);

    let config = TranslatorConfig::default();
    let lines = read_lines(&input).unwrap();
    let records = parse(&lines, None, &config);
    let artifact = render(format, &records, &config).unwrap();

    let output = resolve_output_path(&input, None, format).unwrap();
    assert_eq!(output.parent(), Some(dir.path()));
    write_artifact(&output, &artifact, format).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with(UTF8_BOM));
    let body = &written[UTF8_BOM.len()..];
    assert!(!body.replace("\r\n", "").contains('\n'));
    assert_eq!(body.replace("\r\n", "\n"), artifact.replace("\r\n", "\n"));
}

#[rstest]
fn test_windows_1252_export_keeps_umlauts(default_config: TranslatorConfig) {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("Altbau.esf");
    std::fs::write(
        &input,
        b"Altbau.esf\tExport\t\r\nBeleuchtung.EG.Schalten.1/1/1\tK\xfcche Licht\tEIS 1\tLow\r\n",
    )
    .unwrap();

    let lines = read_lines(&input).unwrap();
    let records = parse(&lines, None, &default_config);
    assert_eq!(records[0].name, "Küche Licht");

    let buttons = render(OutputFormat::Buttons, &records, &default_config).unwrap();
    assert!(buttons.contains("  entity: light.kuche_licht\n"));
    let yaml = render(OutputFormat::Ha, &records, &default_config).unwrap();
    assert!(yaml.contains("    - name: \"Küche Licht\"\n"));
}

#[rstest]
#[case(OutputFormat::Csv, "Musterhaus_translated.csv")]
#[case(OutputFormat::Ha, "Musterhaus_config.txt")]
#[case(OutputFormat::Yaml, "knx_config.yaml")]
#[case(OutputFormat::Buttons, "Musterhaus_buttons.txt")]
fn test_default_output_names(#[case] format: OutputFormat, #[case] file_name: &str) {
    let output = resolve_output_path(Path::new("daten/Musterhaus.esf"), None, format).unwrap();
    assert_eq!(output, Path::new("daten").join(file_name));
}

#[test]
fn test_output_extension_must_match_format() {
    let err = resolve_output_path(
        Path::new("Musterhaus.esf"),
        Some(Path::new("out.txt")),
        OutputFormat::Yaml,
    )
    .unwrap_err();
    assert!(matches!(err, TranslatorError::InvalidInput(_)));
}

#[test]
fn test_tables_loaded_from_files() {
    let (_config_dir, config_path) = write_temp_file(
        "config.csv",
        "Key,Value\n\
         DEFAULT_JUNK_FIRST_COL,0\n\
         KNX_CLASSIFIER_LIGHT,licht\n\
         STANDARD_TRAVELLING_TIME_LONG,90\n",
    );
    let (_names_dir, names_path) = write_temp_file(
        "names.csv",
        "ID,Name\nHaupt.Licht.EG.1/1/1,Kochinsel\n",
    );

    let config = TranslatorConfig::from_table_file(&config_path).unwrap();
    let names = NameTable::from_file(&names_path).unwrap();
    assert_eq!(config.junk_lines, 0);
    assert_eq!(config.travelling_time_long, "90");

    let records = parse(
        [
            "Haupt.Licht.EG.1/1/1\tKueche\t\t",
            "Haupt.Licht.EG.1/1/2\tFlur\t\t",
        ],
        Some(&names),
        &config,
    );
    assert_eq!(records[0].name, "Kochinsel");
    assert_eq!(records[0].classification, Classification::Light);
    assert_eq!(records[1].name, "Flur");
}

#[test]
fn test_invalid_config_table_is_rejected() {
    let (_dir, path) = write_temp_file("config.csv", "Key,Value\nDEFAULT_JUNK_FIRST_COL,many\n");
    let err = TranslatorConfig::from_table_file(&path).unwrap_err();
    assert!(matches!(err, TranslatorError::InvalidConfigTable(_)));
    assert_eq!(err.code(), ErrorCode::ConfigurationInvalid);
    assert_eq!(err.code().exit_status(), 2);
}

#[test]
fn test_fractional_travelling_time_from_file() {
    let (_dir, path) = write_temp_file(
        "config.csv",
        "Key,Value\nSTANDARD_TRAVELLING_TIME_LONG,45.5\n",
    );
    let config = TranslatorConfig::from_table_file(&path).unwrap();
    let records = parse(
        ["Jalousien.DG.Auf/Ab.3/2/1\tBad rollo Auf/Ab\t\t"],
        None,
        &TranslatorConfig {
            junk_lines: 0,
            ..config.clone()
        },
    );
    let yaml = render(OutputFormat::Yaml, &records, &config).unwrap();
    assert!(yaml.contains("      travelling_time_down: \"45.5\"\n"));
    assert!(yaml.contains("      travelling_time_up: \"45.5\"\n"));
}

#[test]
fn test_names_file_without_rows_is_rejected() {
    let (_dir, path) = write_temp_file("names.csv", "ID,Name\n");
    let err = NameTable::from_file(&path).unwrap_err();
    assert!(matches!(err, TranslatorError::InvalidNameTable(_)));
    assert_eq!(err.code().as_number(), 1202);
}
