use serde::Deserialize;
use skullking_core::model::bonus::{BonusKind, BonusRule, ScoringRules};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_BASE_URL: &str = "https://skullking.example/";

/// Root scorekeeper configuration loaded from YAML. Every block is optional.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScorekeeperConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ScorekeeperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            scoring: ScoringConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ScorekeeperConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: ScorekeeperConfig =
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

    /// Falls back to defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_base_url(&self.base_url)?;
        self.scoring.validate()?;
        self.logging.normalize();
        if self.logging.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown level '{}'", self.logging.tracing_level),
            });
        }
        Ok(())
    }

    pub fn rules(&self) -> ScoringRules {
        self.scoring.rules()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn validate_base_url(base_url: &str) -> Result<(), ValidationError> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "base_url".to_string(),
            message: "base_url must not be empty".to_string(),
        });
    }

    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ValidationError::InvalidField {
            field: "base_url".to_string(),
            message: format!("'{trimmed}' is not an http(s) URL"),
        });
    }

    if trimmed.contains('#') {
        return Err(ValidationError::InvalidField {
            field: "base_url".to_string(),
            message: "base_url must not carry a fragment".to_string(),
        });
    }

    Ok(())
}

/// Bonus card table; omitted kinds keep the standard values.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ScoringConfig {
    #[serde(default)]
    pub bonus: BonusConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BonusConfig {
    #[serde(default = "default_mermaid")]
    pub mermaid: BonusRule,
    #[serde(default = "default_pirate")]
    pub pirate: BonusRule,
    #[serde(default = "default_skull_king")]
    pub skull_king: BonusRule,
    #[serde(default = "default_plus_ten")]
    pub plus_ten: BonusRule,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            mermaid: default_mermaid(),
            pirate: default_pirate(),
            skull_king: default_skull_king(),
            plus_ten: default_plus_ten(),
        }
    }
}

impl ScoringConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        for kind in BonusKind::ALL {
            let rule = self.bonus.rule(kind);
            if rule.max == 0 {
                return Err(ValidationError::InvalidField {
                    field: format!("scoring.bonus.{}", field_name(kind)),
                    message: "max must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn rules(&self) -> ScoringRules {
        ScoringRules::new(BonusKind::ALL.map(|kind| self.bonus.rule(kind)))
    }
}

impl BonusConfig {
    fn rule(&self, kind: BonusKind) -> BonusRule {
        match kind {
            BonusKind::Mermaid => self.mermaid,
            BonusKind::Pirate => self.pirate,
            BonusKind::SkullKing => self.skull_king,
            BonusKind::PlusTen => self.plus_ten,
        }
    }
}

fn field_name(kind: BonusKind) -> &'static str {
    match kind {
        BonusKind::Mermaid => "mermaid",
        BonusKind::Pirate => "pirate",
        BonusKind::SkullKing => "skull_king",
        BonusKind::PlusTen => "plus_ten",
    }
}

fn default_mermaid() -> BonusRule {
    ScoringRules::REFERENCE.rule(BonusKind::Mermaid)
}

fn default_pirate() -> BonusRule {
    ScoringRules::REFERENCE.rule(BonusKind::Pirate)
}

fn default_skull_king() -> BonusRule {
    ScoringRules::REFERENCE.rule(BonusKind::SkullKing)
}

fn default_plus_ten() -> BonusRule {
    ScoringRules::REFERENCE.rule(BonusKind::PlusTen)
}

/// Logging configuration; plain text to stderr unless told otherwise.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.trim().to_ascii_lowercase().as_str() {
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
    "warn".to_string()
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
