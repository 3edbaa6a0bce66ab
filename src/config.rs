use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MsError, Result};

/// Largest number of documents written per seeding transaction.
pub const MAX_SEED_BATCH: usize = 499;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub translator: TranslatorConfig,
}

impl Config {
    /// Load defaults, then the config file, then `TSE_*` environment overrides.
    ///
    /// The file is `explicit_path`, else `$TSE_CONFIG`, else
    /// `<config_dir>/techstack/config.toml` when it exists.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("TSE_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                MsError::Config(format!("config file {} not found", path.display()))
            })?;
            config.merge_patch(patch);
        } else if let Some(global) = Self::load_global()? {
            config.merge_patch(global);
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Default location of the user config file.
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("techstack").join("config.toml"))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        match Self::global_path() {
            Some(path) => Self::load_patch(&path),
            None => Ok(None),
        }
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| MsError::Config(format!("read config {}: {err}", path.display())))?;
        Self::parse_patch(&raw)
            .map(Some)
            .map_err(|err| MsError::Config(format!("parse config {}: {err}", path.display())))
    }

    fn parse_patch(raw: &str) -> std::result::Result<ConfigPatch, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply a TOML document on top of the current values.
    pub fn merge_toml(&mut self, raw: &str) -> Result<()> {
        let patch =
            Self::parse_patch(raw).map_err(|err| MsError::Config(format!("parse config: {err}")))?;
        self.merge_patch(patch);
        Ok(())
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.source {
            self.source.merge(patch);
        }
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.server {
            self.server.merge(patch);
        }
        if let Some(patch) = patch.translator {
            self.translator.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(&|key| std::env::var(key).ok())
    }

    /// Apply `TSE_*` overrides read through `lookup`.
    pub fn apply_overrides_from(&mut self, lookup: &dyn Fn(&str) -> Option<String>) -> Result<()> {
        let env = EnvReader { lookup };

        if let Some(value) = env.string("TSE_SOURCE_BACKEND") {
            self.source.backend = SourceBackend::parse(&value)?;
        }
        if let Some(value) = env.string("TSE_SOURCE_PATH") {
            self.source.path = Some(PathBuf::from(value));
        }
        if let Some(value) = env.parse::<usize>("TSE_SEED_BATCH_SIZE")? {
            self.source.seed_batch_size = value;
        }

        if let Some(value) = env.parse::<f32>("TSE_SEARCH_FUZZY")? {
            self.search.fuzzy = value;
        }
        if let Some(value) = env.bool("TSE_SEARCH_PREFIX") {
            self.search.prefix = value;
        }
        if let Some(value) = env.parse::<u8>("TSE_SEARCH_MAX_EDIT_DISTANCE")? {
            self.search.max_edit_distance = value;
        }
        if let Some(value) = env.parse::<usize>("TSE_SEARCH_DEFAULT_LIMIT")? {
            self.search.default_limit = value;
        }

        if let Some(value) = env.string("TSE_SERVER_ADDRESS") {
            self.server.address = value;
        }

        if let Some(value) = env.bool("TSE_TRANSLATOR_ENABLED") {
            self.translator.enabled = value;
        }
        if let Some(value) = env.string("TSE_TRANSLATOR_ENDPOINT") {
            self.translator.endpoint = value;
        }
        if let Some(value) = env.string("TSE_TRANSLATOR_MODEL") {
            self.translator.model = value;
        }
        if let Some(value) = env.parse::<u64>("TSE_TRANSLATOR_TIMEOUT_SECS")? {
            self.translator.timeout_secs = value;
        }

        Ok(())
    }

    /// Reject values the search and storage layers cannot honour.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.search.fuzzy) {
            return Err(MsError::Config(format!(
                "search.fuzzy must be within 0..=1, got {}",
                self.search.fuzzy
            )));
        }
        if self.source.seed_batch_size == 0 || self.source.seed_batch_size > MAX_SEED_BATCH {
            return Err(MsError::Config(format!(
                "source.seed_batch_size must be within 1..={MAX_SEED_BATCH}, got {}",
                self.source.seed_batch_size
            )));
        }
        if self.source.backend == SourceBackend::Json && self.source.path.is_none() {
            return Err(MsError::MissingConfig("source.path".to_string()));
        }
        if self.translator.timeout_secs == 0 {
            return Err(MsError::Config(
                "translator.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where companies are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceBackend {
    /// SQLite document store (written by `tse seed`)
    #[default]
    Sqlite,
    /// JSON file holding an array of companies
    Json,
    /// Compiled-in sample directory
    Builtin,
}

impl SourceBackend {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "sqlite" | "db" => Ok(Self::Sqlite),
            "json" => Ok(Self::Json),
            "builtin" | "sample" => Ok(Self::Builtin),
            other => Err(MsError::Config(format!(
                "invalid source backend {other} (expected sqlite|json|builtin)"
            ))),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Json => "json",
            Self::Builtin => "builtin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub backend: SourceBackend,
    /// Database or JSON path; sqlite falls back to the data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_seed_batch_size")]
    pub seed_batch_size: usize,
}

const fn default_seed_batch_size() -> usize {
    MAX_SEED_BATCH
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            backend: SourceBackend::Sqlite,
            path: None,
            seed_batch_size: MAX_SEED_BATCH,
        }
    }
}

impl SourceConfig {
    /// Database path for the sqlite backend.
    pub fn sqlite_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("techstack").join("companies.db"))
            .ok_or_else(|| MsError::MissingConfig("source.path".to_string()))
    }

    fn merge(&mut self, patch: SourcePatch) {
        if let Some(value) = patch.backend {
            self.backend = value;
        }
        if let Some(value) = patch.path {
            self.path = Some(value);
        }
        if let Some(value) = patch.seed_batch_size {
            self.seed_batch_size = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Fuzzy edit tolerance as a fraction of token length
    #[serde(default)]
    pub fuzzy: f32,
    /// Allow prefix matches
    #[serde(default)]
    pub prefix: bool,
    #[serde(default)]
    pub max_edit_distance: u8,
    #[serde(default)]
    pub prefix_boost: f32,
    #[serde(default)]
    pub fuzzy_boost: f32,
    /// Result page size when no --limit is given (0 = everything)
    #[serde(default)]
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fuzzy: 0.2,
            prefix: true,
            max_edit_distance: 2,
            prefix_boost: 0.375,
            fuzzy_boost: 0.45,
            default_limit: 0,
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.fuzzy {
            self.fuzzy = value;
        }
        if let Some(value) = patch.prefix {
            self.prefix = value;
        }
        if let Some(value) = patch.max_edit_distance {
            self.max_edit_distance = value;
        }
        if let Some(value) = patch.prefix_boost {
            self.prefix_boost = value;
        }
        if let Some(value) = patch.fuzzy_boost {
            self.fuzzy_boost = value;
        }
        if let Some(value) = patch.default_limit {
            self.default_limit = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8787".to_string(),
        }
    }
}

impl ServerConfig {
    fn merge(&mut self, patch: ServerPatch) {
        if let Some(value) = patch.address {
            self.address = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the model server
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub timeout_secs: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://127.0.0.1:11434".to_string(),
            model: "llama3.1".to_string(),
            timeout_secs: 30,
        }
    }
}

impl TranslatorConfig {
    fn merge(&mut self, patch: TranslatorPatch) {
        if let Some(value) = patch.enabled {
            self.enabled = value;
        }
        if let Some(value) = patch.endpoint {
            self.endpoint = value;
        }
        if let Some(value) = patch.model {
            self.model = value;
        }
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    pub source: Option<SourcePatch>,
    pub search: Option<SearchPatch>,
    pub server: Option<ServerPatch>,
    pub translator: Option<TranslatorPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SourcePatch {
    pub backend: Option<SourceBackend>,
    pub path: Option<PathBuf>,
    pub seed_batch_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchPatch {
    pub fuzzy: Option<f32>,
    pub prefix: Option<bool>,
    pub max_edit_distance: Option<u8>,
    pub prefix_boost: Option<f32>,
    pub fuzzy_boost: Option<f32>,
    pub default_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ServerPatch {
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TranslatorPatch {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

struct EnvReader<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl EnvReader<'_> {
    fn string(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    fn bool(&self, key: &str) -> Option<bool> {
        self.string(key).map(|value| {
            matches!(
                value.to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
    }

    fn parse<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.string(key) {
            Some(value) => value.trim().parse::<T>().map(Some).map_err(|err| {
                MsError::Config(format!("invalid {key} value {value}: {err}"))
            }),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use tempfile::TempDir;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn config_defaults() {
        let config = Config::default();
        assert_eq!(config.source.backend, SourceBackend::Sqlite);
        assert_eq!(config.source.seed_batch_size, 499);
        assert!((config.search.fuzzy - 0.2).abs() < f32::EPSILON);
        assert!(config.search.prefix);
        assert_eq!(config.search.max_edit_distance, 2);
        assert_eq!(config.server.address, "127.0.0.1:8787");
        assert!(config.translator.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_patch_merges_onto_defaults() {
        let mut config = Config::default();
        config
            .merge_toml(
                r#"
                [search]
                fuzzy = 0.3

                [source]
                backend = "builtin"
                "#,
            )
            .unwrap();
        assert!((config.search.fuzzy - 0.3).abs() < f32::EPSILON);
        assert!(config.search.prefix, "unset keys keep defaults");
        assert_eq!(config.source.backend, SourceBackend::Builtin);
    }

    #[test]
    fn unknown_section_is_rejected() {
        let mut config = Config::default();
        assert!(config.merge_toml("[cache]\nenabled = true\n").is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = Config::default();
        config
            .apply_overrides_from(&lookup(&[
                ("TSE_SOURCE_BACKEND", "json"),
                ("TSE_SOURCE_PATH", "/tmp/companies.json"),
                ("TSE_SEARCH_PREFIX", "off"),
                ("TSE_SEARCH_FUZZY", "0.1"),
                ("TSE_TRANSLATOR_MODEL", "mistral"),
            ]))
            .unwrap();
        assert_eq!(config.source.backend, SourceBackend::Json);
        assert_eq!(config.source.path, Some(PathBuf::from("/tmp/companies.json")));
        assert!(!config.search.prefix);
        assert!((config.search.fuzzy - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.translator.model, "mistral");
    }

    #[test]
    fn invalid_env_value_names_key() {
        let mut config = Config::default();
        let err = config
            .apply_overrides_from(&lookup(&[("TSE_SEED_BATCH_SIZE", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("TSE_SEED_BATCH_SIZE"));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
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

    #[test]
    fn load_from_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\naddress = \"0.0.0.0:9000\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.server.address, "0.0.0.0:9000");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn backend_parse_aliases() {
        assert_eq!(SourceBackend::parse("DB").unwrap(), SourceBackend::Sqlite);
        assert_eq!(SourceBackend::parse("sample").unwrap(), SourceBackend::Builtin);
        assert!(SourceBackend::parse("redis").is_err());
    }
}
