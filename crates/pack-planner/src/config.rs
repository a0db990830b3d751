use pack_core::profile::{DEFAULT_PROFILE, PlayerProfile, ProfileBook};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

pub const DEFAULT_CONFIG_PATH: &str = "packplan.yaml";
const DEFAULT_SITE_DIR: &str = "site_data";
const DEFAULT_LOG_DIR: &str = "logs";
const PRESET_KEY_ALLOWED: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root planner configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlannerConfig {
    #[serde(default = "default_site_dir")]
    pub site_dir: String,
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
    #[serde(default)]
    pub presets: Vec<PresetConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            site_dir: default_site_dir(),
            profiles: BTreeMap::new(),
            presets: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: PlannerConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Load an explicitly named file, or the default file when it exists.
    ///
    /// Only an explicit path that cannot be read is an error; a missing
    /// default file yields the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_path(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_path(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        if self.site_dir.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "site_dir".to_string(),
                message: "site directory must not be empty".to_string(),
            });
        }
        validate_profiles(&self.profiles)?;
        validate_presets(&mut self.presets, &self.profiles)?;
        self.logging.normalize();
        Ok(())
    }

    pub fn profile_book(&self) -> ProfileBook {
        ProfileBook::new(self.profiles.iter().map(|(name, profile)| PlayerProfile {
            name: name.clone(),
            description: profile.description.clone(),
            weights: profile.weights.clone(),
        }))
    }

    pub fn preset(&self, key: &str) -> Option<&PresetConfig> {
        self.presets.iter().find(|preset| preset.key == key)
    }
}

fn default_site_dir() -> String {
    DEFAULT_SITE_DIR.to_string()
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProfileConfig {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PresetKind {
    Budget,
    Goal,
}

impl PresetKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            PresetKind::Budget => "budget",
            PresetKind::Goal => "goal",
        }
    }
}

/// A saved planner invocation.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PresetConfig {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(alias = "type")]
    pub kind: PresetKind,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub include_reference: bool,
    #[serde(default)]
    pub max_count: Option<usize>,
    #[serde(default)]
    pub target_name: Option<String>,
    #[serde(default)]
    pub target_amount: Option<f64>,
}

impl PresetConfig {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }

    fn validate(&self, profiles: &BTreeMap<String, ProfileConfig>) -> Result<(), ValidationError> {
        let field = |name: &str| format!("presets[{}].{name}", self.key);

        match self.kind {
            PresetKind::Budget => {
                if !self.budget.is_some_and(|b| b.is_finite() && b > 0.0) {
                    return Err(ValidationError::InvalidField {
                        field: field("budget"),
                        message: "budget presets need a budget greater than zero".to_string(),
                    });
                }
            }
            PresetKind::Goal => {
                if self.target_name.as_deref().is_none_or(|t| t.trim().is_empty()) {
                    return Err(ValidationError::InvalidField {
                        field: field("target_name"),
                        message: "goal presets need a target item name".to_string(),
                    });
                }
                if !self.target_amount.is_some_and(|a| a.is_finite() && a > 0.0) {
                    return Err(ValidationError::InvalidField {
                        field: field("target_amount"),
                        message: "target amount must be greater than zero".to_string(),
                    });
                }
                if self.budget.is_some_and(|b| !b.is_finite() || b < 0.0) {
                    return Err(ValidationError::InvalidField {
                        field: field("budget"),
                        message: "budget must not be negative".to_string(),
                    });
                }
            }
        }

        if let Some(profile) = self.profile.as_deref() {
            if profile != DEFAULT_PROFILE && !profiles.contains_key(profile) {
                return Err(ValidationError::InvalidField {
                    field: field("profile"),
                    message: format!("profile '{profile}' is not defined in profiles"),
                });
            }
        }

        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            log_dir: default_log_dir(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
        if self.log_dir.trim().is_empty() {
            self.log_dir = default_log_dir();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    DEFAULT_LOG_DIR.to_string()
}

fn validate_profiles(profiles: &BTreeMap<String, ProfileConfig>) -> Result<(), ValidationError> {
    for (name, profile) in profiles {
        if name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "profiles".to_string(),
                message: "profile name must not be empty".to_string(),
            });
        }
        if let Some((category, _)) = profile.weights.iter().find(|(_, w)| !w.is_finite()) {
            return Err(ValidationError::InvalidField {
                field: format!("profiles.{name}.weights.{category}"),
                message: "weight must be a finite number".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_presets(
    presets: &mut [PresetConfig],
    profiles: &BTreeMap<String, ProfileConfig>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for preset in presets.iter_mut() {
        preset.key = preset.key.trim().to_string();
        if preset.key.is_empty() {
            return Err(ValidationError::InvalidField {
                field: "presets.key".to_string(),
                message: "preset key must not be empty".to_string(),
            });
        }

        if !preset.key.chars().all(|c| PRESET_KEY_ALLOWED.contains(c)) {
            return Err(ValidationError::InvalidField {
                field: format!("presets[{}].key", preset.key),
                message: "preset key may only contain alphanumeric characters, '.', '_' or '-'"
                    .to_string(),
            });
        }

        if !seen.insert(preset.key.clone()) {
            return Err(ValidationError::InvalidField {
                field: "presets".to_string(),
                message: format!("preset key '{}' defined more than once", preset.key),
            });
        }

        preset.validate(profiles)?;
    }
    Ok(())
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
site_dir: "data/site"
profiles:
  f2p:
    description: "Free to play"
    weights:
      shard: 1.0
      vip: 0.5
presets:
  - key: "starter"
    label: "Starter budget"
    kind: budget
    budget: 20
    currency: "USD"
    profile: "f2p"
  - key: "shards"
    type: goal
    target_name: "Shard"
    target_amount: 100
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    fn parse(yaml: &str) -> PlannerConfig {
        serde_yaml::from_str(yaml).expect("parse yaml")
    }

    fn invalid_field(yaml: &str) -> String {
        let mut cfg = parse(yaml);
        match cfg.validate().expect_err("should fail") {
            ValidationError::InvalidField { field, .. } => field,
        }
    }

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg = parse(BASIC_YAML);
        cfg.validate().expect("validate");

        assert_eq!(cfg.presets.len(), 2);
        assert_eq!(cfg.presets[1].kind, PresetKind::Goal);
        assert_eq!(cfg.preset("starter").map(PresetConfig::label), Some("Starter budget"));
        assert_eq!(cfg.preset("shards").map(PresetConfig::label), Some("shards"));
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));
        assert_eq!(cfg.logging.log_dir, DEFAULT_LOG_DIR);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let mut cfg = parse("{}");
        cfg.validate().expect("validate");
        assert_eq!(cfg, PlannerConfig::default());
        assert_eq!(cfg.site_dir, DEFAULT_SITE_DIR);
    }

    #[test]
    fn profile_book_includes_default() {
        let mut cfg = parse(BASIC_YAML);
        cfg.validate().expect("validate");
        let book = cfg.profile_book();
        assert_eq!(book.get(Some("f2p")).weights.get("vip"), Some(&0.5));
        assert_eq!(book.get(Some("nope")).name, DEFAULT_PROFILE);
    }

    #[test]
    fn rejects_duplicate_preset_keys() {
        let yaml = BASIC_YAML.replace("key: \"shards\"", "key: \"starter\"");
        assert_eq!(invalid_field(&yaml), "presets");
    }

    #[test]
    fn rejects_invalid_preset_key() {
        let yaml = BASIC_YAML.replace("key: \"shards\"", "key: \"shard goal\"");
        assert_eq!(invalid_field(&yaml), "presets[shard goal].key");
    }

    #[test]
    fn rejects_budget_preset_without_budget() {
        let yaml = BASIC_YAML.replace("    budget: 20\n", "");
        assert_eq!(invalid_field(&yaml), "presets[starter].budget");
    }

    #[test]
    fn rejects_goal_preset_without_amount() {
        let yaml = BASIC_YAML.replace("target_amount: 100", "target_amount: 0");
        assert_eq!(invalid_field(&yaml), "presets[shards].target_amount");
    }

    #[test]
    fn rejects_unknown_preset_profile() {
        let yaml = BASIC_YAML.replace("profile: \"f2p\"", "profile: \"whale\"");
        assert_eq!(invalid_field(&yaml), "presets[starter].profile");

        let default = BASIC_YAML.replace("profile: \"f2p\"", "profile: \"default\"");
        parse(&default).validate().expect("default profile is always known");
    }

    #[test]
    fn rejects_non_finite_weights() {
        let yaml = BASIC_YAML.replace("vip: 0.5", "vip: .nan");
        assert_eq!(invalid_field(&yaml), "profiles.f2p.weights.vip");
    }

    #[test]
    fn rejects_empty_site_dir() {
        let yaml = BASIC_YAML.replace("site_dir: \"data/site\"", "site_dir: \"  \"");
        assert_eq!(invalid_field(&yaml), "site_dir");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = PlannerConfig::load(Some(Path::new("definitely/not/here.yaml")))
            .expect_err("missing explicit config");
        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(err.path(), Path::new("definitely/not/here.yaml"));
    }
}
