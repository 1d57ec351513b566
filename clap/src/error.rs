//! Error type for the clap adapter.

use clap::parser::MatchesError;
use model_options_core::{BindingError, ValidationError};
use thiserror::Error;

/// Errors raised while registering options or building a model from matches.
#[derive(Debug, Error)]
pub enum BindError {
    /// The derived option specs failed structural validation.
    #[error("invalid option specs: {}", join(.0))]
    InvalidSpecs(Vec<BindingError>),

    /// A derived option collides with an argument the command already has.
    #[error("option {0} conflicts with an existing argument")]
    ArgumentConflict(String),

    /// An environment variable or prompt answer did not parse.
    #[error("invalid value for {flag} from {origin}: {message}")]
    InvalidValue {
        /// Option as written on the command line.
        flag: String,
        /// Where the raw value came from.
        origin: String,
        /// Parse failure.
        message: String,
    },

    /// A required option had no value from any source.
    #[error("missing option {flag}{}", env_hint(.envvar))]
    MissingOption {
        /// Option as written on the command line.
        flag: String,
        /// Environment variables that were consulted.
        envvar: Vec<String>,
    },

    /// The interactive prompt could not be shown or read.
    #[error("prompt for {flag} failed: {message}")]
    Prompt {
        /// Option as written on the command line.
        flag: String,
        /// Terminal failure.
        message: String,
    },

    /// A value could not be read back from the matches.
    #[error(transparent)]
    Matches(#[from] MatchesError),

    /// The model rejected the payload.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

fn join(errors: &[BindingError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn env_hint(envvar: &[String]) -> String {
    if envvar.is_empty() {
        String::new()
    } else {
        format!(" (or set {})", envvar.join(", "))
    }
}
