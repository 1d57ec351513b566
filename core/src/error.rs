//! Error types for model validation and binder configuration.

use thiserror::Error;

/// Rejection raised by [`Model::validate`](crate::Model::validate).
///
/// The binder never inspects or rewraps these; whatever the model returns
/// reaches the caller as-is.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The payload could not be deserialized into the model type.
    #[error("invalid {model}: {source}")]
    Deserialize {
        /// Model type name.
        model: String,
        /// Underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },

    /// A field value was rejected by a model-level check.
    #[error("invalid value for '{field}': {message}")]
    Field {
        /// Payload key of the rejected field.
        field: String,
        /// Explanation of the rejection.
        message: String,
    },
}

impl ValidationError {
    /// Creates a [`ValidationError::Field`].
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure loading or saving a [`BinderConfig`](crate::BinderConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
