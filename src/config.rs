//! Dialect configuration
//!
//! Loaded from `sqlcal.toml`, optionally merged with an environment-specific
//! `sqlcal.<env>.toml`, then overridden by environment variables:
//!
//! ```toml
//! backend = "redshift"
//!
//! [templates]
//! remove_functions = ["MEDIAN"]
//! remove_window_frames = ["groups"]
//!
//! [templates.functions]
//! DLOG10 = "LOG(10, {{ args_concat }})"
//!
//! [templates.types]
//! uuid = "VARCHAR(36)"
//! ```

use crate::dialects::{create_dialect, ConfiguredDialect, DatabaseBackend, SqlDialect};
use crate::error::{Error, ErrorContext, Result};
use crate::templates::TemplateOverrides;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable selecting the environment-specific config file
pub const ENV_VAR: &str = "SQLCAL_ENV";

/// Environment variable overriding the configured backend
pub const DIALECT_VAR: &str = "SQLCAL_DIALECT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialectConfig {
    #[serde(default = "default_backend")]
    pub backend: DatabaseBackend,

    #[serde(default)]
    pub templates: TemplateOverrides,
}

fn default_backend() -> DatabaseBackend {
    DatabaseBackend::Postgres
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            templates: TemplateOverrides::default(),
        }
    }
}

impl DialectConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let value: toml::Value = toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse configuration: {}", e)))?;
        Self::from_value(value)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let value = Self::load_toml_value(path_ref)?;
        let config = Self::from_value(value)
            .with_context(|| format!("Invalid configuration in '{}'", path_ref.display()))?;

        log::debug!("Loaded dialect configuration from: {}", path_ref.display());
        Ok(config)
    }

    /// Load `sqlcal.toml` and `sqlcal.<env>.toml` from `base_dir`, then apply env overrides
    ///
    /// Missing files fall back to defaults; the environment file wins on conflicts.
    pub fn load_with_base_dir<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let env_name = env::var(ENV_VAR).unwrap_or_else(|_| "dev".to_string());

        let base_path = base_dir.join("sqlcal.toml");
        let mut merged = if base_path.exists() {
            Self::load_toml_value(&base_path)?
        } else {
            toml::Value::Table(toml::map::Map::new())
        };

        let env_path = base_dir.join(format!("sqlcal.{}.toml", env_name));
        if env_path.exists() {
            log::debug!(
                "Loading environment-specific config from: {}",
                env_path.display()
            );
            let env_value = Self::load_toml_value(&env_path)?;
            merged = serde_toml_merge::merge(merged, env_value).map_err(|e| {
                Error::config(format!("Failed to merge configuration files: {}", e))
            })?;
        }

        let mut config = Self::from_value(merged)?;
        config.apply_env_overrides()?;

        log::info!(
            "Dialect configuration loaded (environment: {}, backend: {})",
            env_name,
            config.backend
        );
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(backend) = env::var(DIALECT_VAR) {
            self.backend = backend
                .parse::<DatabaseBackend>()
                .with_context(|| format!("Invalid {} value", DIALECT_VAR))?;
        }
        Ok(())
    }

    /// Build the configured dialect
    ///
    /// Without template overrides this is the plain backend dialect.
    pub fn build_dialect(&self) -> Box<dyn SqlDialect> {
        let dialect = create_dialect(self.backend);
        if self.templates.is_empty() {
            dialect
        } else {
            Box::new(ConfiguredDialect::new(dialect, &self.templates))
        }
    }

    fn from_value(value: toml::Value) -> Result<Self> {
        // Convert toml::Value to serde_json::Value for deserialization
        let json_value = serde_json::to_value(&value).map_err(|e| {
            Error::config(format!("Failed to convert merged configuration: {}", e))
        })?;

        serde_json::from_value(json_value).map_err(|e| {
            Error::config(format!("Failed to deserialize configuration: {}", e))
        })
    }

    fn load_toml_value(path: &Path) -> Result<toml::Value> {
        let content = fs::read_to_string(path)
            .map_err(Error::from)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

        toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}. Check TOML syntax.",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::WindowFrameKind;

    #[test]
    fn test_defaults_to_postgres() {
        let config = DialectConfig::from_toml("").unwrap();
        assert_eq!(config, DialectConfig::default());
        assert_eq!(config.build_dialect().backend(), DatabaseBackend::Postgres);
    }

    #[test]
    fn test_parses_overrides() {
        let config = DialectConfig::from_toml(
            r#"
            backend = "redshift"

            [templates]
            remove_functions = ["SUM"]
            remove_window_frames = ["rows"]

            [templates.types]
            uuid = "VARCHAR(36)"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend, DatabaseBackend::Redshift);
        assert_eq!(config.templates.remove_window_frames, vec![WindowFrameKind::Rows]);

        let dialect = config.build_dialect();
        let templates = dialect.templates();
        assert!(!templates.has_function("SUM"));
        assert!(!templates.supports_window_frame(WindowFrameKind::Rows));
        assert_eq!(templates.native_type("uuid").unwrap(), "VARCHAR(36)");
    }

    #[test]
    fn test_rejects_unknown_backend() {
        let err = DialectConfig::from_toml("backend = \"db2\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
