//! Registry configuration
//!
//! Configuration is layered: defaults, then an optional TOML file, then
//! `COFFER_*` environment overrides, then validation. Environment keys use a
//! double underscore between section and field, e.g.
//! `COFFER_LIMITS__MAX_VAULT_ID_LEN=48` sets `limits.max_vault_id_len`.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "COFFER_";

/// Note written on iteration 1 of every asset unless configured otherwise
pub const DEFAULT_INITIAL_NOTE: &str = "Initial enrollment";

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to load
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Unknown override key
    #[error("Unknown config key: {key}")]
    UnknownKey {
        /// Dotted key that matched no field
        key: String,
    },

    /// A field holds a value outside its accepted range
    #[error("Field '{field}': {message}")]
    Invalid {
        /// Dotted field name
        field: String,
        /// What is wrong with the value
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Parameter bounds applied when entities are created or revised
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum vault identifier length in characters
    pub max_vault_id_len: usize,
    /// Maximum asset identifier length in characters
    pub max_asset_id_len: usize,
    /// Maximum asset category length in characters
    pub max_category_len: usize,
    /// Maximum length of names, titles, info, notes and location references
    pub max_text_len: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_vault_id_len: 36,
            max_asset_id_len: 64,
            max_category_len: 32,
            max_text_len: 1024,
        }
    }
}

/// Revision history settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Note attached to iteration 1 at enrollment
    pub initial_note: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            initial_note: DEFAULT_INITIAL_NOTE.to_string(),
        }
    }
}

/// Audit journal settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JournalConfig {
    /// Append a fact for every committed mutating call
    pub enabled: bool,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Top-level registry configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Parameter bounds
    pub limits: LimitsConfig,
    /// Revision history settings
    pub history: HistoryConfig,
    /// Audit journal settings
    pub journal: JournalConfig,
}

impl RegistryConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "Loaded registry config");
        Ok(config)
    }

    /// Load from an optional file, apply process environment overrides, validate
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `COFFER_SECTION__FIELD=value` overrides from a set of variables
    ///
    /// Variables without the prefix are ignored.
    pub fn merge_with_env<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(rest) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = rest.to_lowercase().replace("__", ".");
            self.set_from_string(&key, &value)?;
            tracing::debug!(key = %key, "Applied config override from environment");
        }
        Ok(())
    }

    /// Set a single field from its dotted key
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "limits.max_vault_id_len" => self.limits.max_vault_id_len = parse_len(key, value)?,
            "limits.max_asset_id_len" => self.limits.max_asset_id_len = parse_len(key, value)?,
            "limits.max_category_len" => self.limits.max_category_len = parse_len(key, value)?,
            "limits.max_text_len" => self.limits.max_text_len = parse_len(key, value)?,
            "history.initial_note" => self.history.initial_note = value.to_string(),
            "journal.enabled" => {
                self.journal.enabled = value
                    .parse()
                    .map_err(|_| ConfigError::invalid(key, format!("expected bool, got '{value}'")))?;
            }
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Check that every bound is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("limits.max_vault_id_len", self.limits.max_vault_id_len),
            ("limits.max_asset_id_len", self.limits.max_asset_id_len),
            ("limits.max_category_len", self.limits.max_category_len),
            ("limits.max_text_len", self.limits.max_text_len),
        ];
        for (field, value) in limits {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be at least 1"));
            }
        }
        if self.history.initial_note.chars().count() > self.limits.max_text_len {
            return Err(ConfigError::invalid(
                "history.initial_note",
                "longer than limits.max_text_len",
            ));
        }
        Ok(())
    }
}

fn parse_len(key: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::invalid(key, format!("expected integer, got '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        let config = RegistryConfig::default();
        assert_eq!(config.limits.max_vault_id_len, 36);
        assert_eq!(config.history.initial_note, "Initial enrollment");
        assert!(config.journal.enabled);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RegistryConfig::from_toml_str(
            r#"
            [limits]
            max_category_len = 8

            [journal]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.limits.max_category_len, 8);
        assert_eq!(config.limits.max_vault_id_len, 36);
        assert!(!config.journal.enabled);
    }

    #[test]
    fn test_unknown_toml_field_rejected() {
        assert_matches!(
            RegistryConfig::from_toml_str("[limits]\nmax_widgets = 3\n"),
            Err(ConfigError::Parse(_))
        );
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RegistryConfig::default();
        config
            .merge_with_env(vec![
                ("COFFER_LIMITS__MAX_VAULT_ID_LEN".to_string(), "48".to_string()),
                ("COFFER_JOURNAL__ENABLED".to_string(), "false".to_string()),
                ("PATH".to_string(), "/usr/bin".to_string()),
            ])
            .unwrap();
        assert_eq!(config.limits.max_vault_id_len, 48);
        assert!(!config.journal.enabled);

        assert_matches!(
            config.merge_with_env(vec![("COFFER_NOPE".to_string(), "1".to_string())]),
            Err(ConfigError::UnknownKey { .. })
        );
    }

    #[test]
    fn test_zero_limit_fails_validation() {
        let mut config = RegistryConfig::default();
        config.limits.max_text_len = 0;
        assert_matches!(config.validate(), Err(ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[history]\ninitial_note = \"genesis\"").unwrap();
        let config = RegistryConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.history.initial_note, "genesis");
    }
}
