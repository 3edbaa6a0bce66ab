//! Config layering: defaults, TOML patch, environment overrides.

use std::collections::HashMap;

use techstack::MsError;
use techstack::config::{Config, SourceBackend};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_are_valid() {
    let config = Config::default();
    config.validate().unwrap();
    assert_eq!(config.source.backend, SourceBackend::Sqlite);
    assert!(config.translator.enabled);
}

#[test]
fn toml_patch_keeps_unset_values() {
    let mut config = Config::default();
    config
        .merge_toml("[search]\nfuzzy = 0.4\n\n[translator]\nmodel = \"mistral\"\n")
        .unwrap();
    assert!((config.search.fuzzy - 0.4).abs() < f32::EPSILON);
    assert!(config.search.prefix);
    assert_eq!(config.translator.model, "mistral");
    assert_eq!(config.translator.endpoint, Config::default().translator.endpoint);
}

#[test]
fn unknown_toml_section_is_rejected() {
    let mut config = Config::default();
    let err = config.merge_toml("[skills]\npath = \"x\"\n").unwrap_err();
    assert!(matches!(err, MsError::Config(_)));
}

#[test]
fn env_overrides_win() {
    let mut config = Config::default();
    config.merge_toml("[source]\nbackend = \"json\"\npath = \"a.json\"\n").unwrap();
    config
        .apply_overrides_from(&env(&[
            ("TSE_SOURCE_BACKEND", "builtin"),
            ("TSE_TRANSLATOR_ENABLED", "false"),
            ("TSE_SEARCH_DEFAULT_LIMIT", "25"),
        ]))
        .unwrap();
    assert_eq!(config.source.backend, SourceBackend::Builtin);
    assert!(!config.translator.enabled);
    assert_eq!(config.search.default_limit, 25);
}

#[test]
fn malformed_env_number_is_an_error() {
    let mut config = Config::default();
    let err = config
        .apply_overrides_from(&env(&[("TSE_SEARCH_FUZZY", "lots")]))
        .unwrap_err();
    assert!(matches!(err, MsError::Config(_)));
}

#[test]
fn out_of_range_values_fail_validation() {
    let mut config = Config::default();
    config.search.fuzzy = 1.5;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.source.seed_batch_size = 500;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.source.backend = SourceBackend::Json;
    assert!(matches!(config.validate(), Err(MsError::MissingConfig(_))));
}
