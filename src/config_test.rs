use super::*;

#[test]
fn defaults_match_constants() {
    let config = Config::default();
    assert_eq!(config.theme.storage_key, "pref-theme");
    assert_eq!(config.theme.attribute, "data-theme");
    assert_eq!(config.theme.settle_delay_ms, consts::SETTLE_DELAY_MS);
    assert_eq!(config.theme.watched_properties, vec!["background-color", "color"]);
    assert_eq!(config.navigation.exit_fallback_ms, 600);
    assert_eq!(config.navigation.enter_delay_ms, 50);
    assert_eq!(config.log_level, "warn");
}

#[test]
fn empty_object_yields_defaults() {
    assert_eq!(Config::from_json("{}").unwrap(), Config::default());
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let config = Config::from_json(r#"{"navigation": {"exit_fallback_ms": 250}, "log_level": "debug"}"#).unwrap();
    assert_eq!(config.navigation.exit_fallback_ms, 250);
    assert_eq!(config.navigation.overlay_class, consts::OVERLAY_CLASS);
    assert_eq!(config.theme, ThemeConfig::default());
    assert_eq!(config.level_filter(), log::LevelFilter::Debug);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = Config::from_json(r#"{"theme": {"storage": "x"}}"#).unwrap_err();
    assert_eq!(err.code(), "E_CONFIG");
}

#[test]
fn malformed_json_is_rejected() {
    assert!(Config::from_json("{\"theme\":").is_err());
}

#[test]
fn unknown_log_level_falls_back_to_warn() {
    let config = Config { log_level: "loud".into(), ..Config::default() };
    assert_eq!(config.level_filter(), log::LevelFilter::Warn);
}
