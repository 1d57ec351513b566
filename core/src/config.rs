//! Binder configuration.
//!
//! Two registration behaviors are configurable: whether falsy defaults are
//! attached to options, and how the environment variable of a field
//! without aliases is spelled.
//!
//! # Example YAML
//!
//! ```yaml
//! default_policy: present
//! plain_env: verbatim
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

/// Which field defaults are attached to their options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultPolicy {
    /// Only truthy defaults; `0`, `false`, `""`, `null` and empty
    /// collections are dropped (the option is then neither defaulted nor
    /// required).
    #[default]
    Truthy,
    /// Every present default.
    Present,
}

impl DefaultPolicy {
    /// Returns `true` if `default` should be attached under this policy.
    pub fn attaches(self, default: &Value) -> bool {
        match self {
            Self::Truthy => is_truthy(default),
            Self::Present => true,
        }
    }
}

/// Spelling of the environment variable for a field without aliases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvNaming {
    /// Upper-cased field name (`port` reads `PORT`).
    #[default]
    Upper,
    /// Field name as declared.
    Verbatim,
}

impl EnvNaming {
    /// Derives the environment variable name for `field`.
    pub fn apply(self, field: &str) -> String {
        match self {
            Self::Upper => field.to_uppercase(),
            Self::Verbatim => field.to_string(),
        }
    }
}

/// Registration settings for [`build_options`](crate::build_options).
///
/// # Examples
///
/// ```
/// use model_options_core::{BinderConfig, DefaultPolicy, EnvNaming};
///
/// let config = BinderConfig::default();
/// assert_eq!(config.default_policy, DefaultPolicy::Truthy);
/// assert_eq!(config.plain_env, EnvNaming::Upper);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Default attachment policy.
    pub default_policy: DefaultPolicy,
    /// Environment variable spelling for alias-free fields.
    pub plain_env: EnvNaming,
}

impl BinderConfig {
    /// Loads configuration from a YAML file. Missing keys keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be written, or
    /// [`ConfigError::Yaml`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}

/// Truthiness of a JSON value: `null`, `false`, zero, empty strings and
/// empty collections are falsy.
///
/// # Examples
///
/// ```
/// use model_options_core::is_truthy;
/// use serde_json::json;
///
/// assert!(is_truthy(&json!(8080)));
/// assert!(!is_truthy(&json!(0)));
/// assert!(!is_truthy(&json!("")));
/// assert!(!is_truthy(&json!(null)));
/// ```
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
