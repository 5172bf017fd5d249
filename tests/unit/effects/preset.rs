use super::*;

#[test]
fn preset_aliases_parse() {
    assert_eq!(DissolvePreset::parse("Classic").unwrap(), DissolvePreset::Classic);
    assert_eq!(DissolvePreset::parse(" v1 ").unwrap(), DissolvePreset::Classic);
    assert_eq!(DissolvePreset::parse("fine").unwrap(), DissolvePreset::Layered);
    assert!(DissolvePreset::parse("").is_err());
    assert!(DissolvePreset::parse("wipe").is_err());
}

#[test]
fn presets_carry_both_engine_revisions() {
    let classic = DissolvePreset::Classic.config();
    assert_eq!(classic.octaves, 8);
    assert_eq!(classic.duration_ms, 900.0);

    let layered = DissolveConfig::default();
    assert_eq!(layered.octaves, 18);
    assert_eq!(layered.duration_ms, 1100.0);
    assert_eq!(layered.cell_factor, 10.0);
    assert_eq!(layered.high, 0.05);
    assert_eq!(layered.mask_rows_per_frame, DEFAULT_MASK_ROWS_PER_FRAME);
}

#[test]
fn json_fills_missing_fields_from_default() {
    let cfg = DissolveConfig::from_json_str(r#"{ "octaves": 8, "duration_ms": 900 }"#).unwrap();
    assert_eq!(cfg, DissolvePreset::Classic.config());
}

#[test]
fn json_rejects_unknown_and_invalid_fields() {
    assert!(matches!(
        DissolveConfig::from_json_str(r#"{ "octave": 8 }"#),
        Err(DissolveError::Serde(_))
    ));
    assert!(matches!(
        DissolveConfig::from_json_str(r#"{ "duration_ms": 0 }"#),
        Err(DissolveError::Validation(_))
    ));
    assert!(DissolveConfig::from_json_str(r#"{ "high": 1.5 }"#).is_err());
    assert!(DissolveConfig::from_json_str(r#"{ "octaves": 0 }"#).is_err());
    assert!(DissolveConfig::from_json_str(r#"{ "mask_rows_per_frame": 0 }"#).is_err());
}

#[test]
fn progress_is_clamped() {
    let cfg = DissolveConfig::default();
    assert_eq!(cfg.progress_at(-5.0), 0.0);
    assert_eq!(cfg.progress_at(550.0), 0.5);
    assert_eq!(cfg.progress_at(1100.0), 1.0);
    assert_eq!(cfg.progress_at(5000.0), 1.0);
}

#[test]
fn config_file_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dissolve.json");
    std::fs::write(&path, r#"{ "seed": 3 }"#).unwrap();
    assert_eq!(DissolveConfig::from_path(&path).unwrap().seed, 3);
    assert!(DissolveConfig::from_path(&dir.path().join("missing.json")).is_err());
}
