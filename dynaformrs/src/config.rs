//! Configuration system for dynaform.
//!
//! Supports TOML-based configuration for target defaults and registrar behaviour.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dialect::DialectKind;
use crate::error::{DynaformError, Result};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DynaformConfig {
    /// Where registered entities live and how SQL is rendered.
    pub defaults: TargetDefaults,

    /// Values the registrar uses when a plan leaves them unset.
    pub registrar: RegistrarConfig,

    /// Directory holding plan files (default: `definitions`).
    pub definitions_dir: Option<PathBuf>,
}

/// Default location of every declared or published entity.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetDefaults {
    /// Project / database name; omitted from rendered paths when unset.
    pub database: Option<String>,
    /// Dataset / schema name; omitted from rendered paths when unset.
    pub schema: Option<String>,
    pub dialect: DialectKind,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistrarConfig {
    /// Entity every generated query selects from (default: `second_view`).
    pub reference_target: String,
    /// Assertion label prefix (default: `assertion1`).
    pub assertion_prefix: String,
    /// Assertion filter predicate (default: `test>1`).
    pub assertion_filter: String,
    /// Operation label prefix (default: `operation for`).
    pub operation_prefix: String,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            reference_target: "second_view".to_string(),
            assertion_prefix: "assertion1".to_string(),
            assertion_filter: "test>1".to_string(),
            operation_prefix: "operation for".to_string(),
        }
    }
}

impl DynaformConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DynaformError::Config(format!("failed to read config file: {e}")))?;
        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| DynaformError::Config(format!("failed to parse config: {e}")))
    }

    /// Load from default locations (env var, cwd, user config dir, or defaults).
    ///
    /// Search order:
    /// 1. `DYNAFORM_CONFIG` environment variable
    /// 2. `./dynaform.toml` (current directory)
    /// 3. `~/.config/dynaform/config.toml` (user config dir)
    /// 4. Built-in defaults
    pub fn load_default() -> Self {
        if let Ok(path) = std::env::var("DYNAFORM_CONFIG") {
            match Self::from_file(&path) {
                Ok(cfg) => {
                    tracing::info!(path = %path, "loaded config from DYNAFORM_CONFIG");
                    return cfg;
                }
                Err(e) => tracing::warn!(path = %path, error = %e, "ignoring DYNAFORM_CONFIG"),
            }
        }

        if let Ok(cfg) = Self::from_file("dynaform.toml") {
            tracing::info!("loaded config from ./dynaform.toml");
            return cfg;
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("dynaform").join("config.toml");
            if let Ok(cfg) = Self::from_file(&user_config) {
                tracing::info!(path = %user_config.display(), "loaded config from user config dir");
                return cfg;
            }
        }

        tracing::debug!("no config file found, using defaults");
        Self::default()
    }

    pub fn definitions_dir(&self) -> PathBuf {
        self.definitions_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("definitions"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = DynaformConfig::default();
        assert_eq!(cfg.defaults.dialect, DialectKind::Bigquery);
        assert!(cfg.defaults.database.is_none());
        assert_eq!(cfg.registrar.reference_target, "second_view");
        assert_eq!(cfg.registrar.assertion_filter, "test>1");
        assert_eq!(cfg.definitions_dir(), PathBuf::from("definitions"));
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
definitions_dir = "defs"

[defaults]
database = "analytics-prod"
schema = "reporting"
dialect = "duckdb"

[registrar]
reference_target = "events"
"#;
        let cfg = DynaformConfig::from_toml(toml).unwrap();
        assert_eq!(cfg.defaults.database.as_deref(), Some("analytics-prod"));
        assert_eq!(cfg.defaults.schema.as_deref(), Some("reporting"));
        assert_eq!(cfg.defaults.dialect, DialectKind::Duckdb);
        assert_eq!(cfg.registrar.reference_target, "events");
        // unset registrar keys keep their defaults
        assert_eq!(cfg.registrar.assertion_prefix, "assertion1");
        assert_eq!(cfg.definitions_dir(), PathBuf::from("defs"));
    }

    #[test]
    fn test_postgresql_dialect_alias() {
        let cfg = DynaformConfig::from_toml("[defaults]\ndialect = \"postgresql\"\n").unwrap();
        assert_eq!(cfg.defaults.dialect, DialectKind::Postgres);
        assert_eq!("postgresql".parse::<DialectKind>().unwrap(), DialectKind::Postgres);
    }

    #[test]
    fn test_unknown_dialect_is_config_error() {
        let err = DynaformConfig::from_toml("[defaults]\ndialect = \"oracle\"\n").unwrap_err();
        assert!(matches!(err, DynaformError::Config(_)));
    }
}
