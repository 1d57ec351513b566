//! Structural checks over derived option specs.
//!
//! Catches spec sets the command-line layer would reject at registration
//! (duplicate flags, unusable names, empty choice lists, impossible ranges)
//! so they can be reported as errors instead of framework panics.
//!
//! # Examples
//!
//! ```
//! use model_options_core::*;
//!
//! let model = ModelDescriptor::new("M")
//!     .with_field(FieldDescriptor::new("host", FieldType::String))
//!     .with_field(FieldDescriptor::new("Host", FieldType::String));
//! let (specs, _) = build_options(&model, &BinderConfig::default());
//! let errors = validate_specs(&specs);
//! assert!(errors.contains(&BindingError::DuplicateFlag("host".into())));
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::option::{Bounds, OptionSpec, OptionType};

static FLAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").expect("static regex must compile")
});

/// Structural problem in a set of option specs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// Display name is empty.
    #[error("option for field '{0}' has an empty name")]
    EmptyFlag(String),
    /// Display name cannot be written as `--<name>`.
    #[error("invalid option name: {0}")]
    InvalidFlag(String),
    /// Two options share a display name.
    #[error("duplicate option: --{0}")]
    DuplicateFlag(String),
    /// Two options deliver to the same destination.
    #[error("duplicate destination: {0}")]
    DuplicateDest(String),
    /// Two options read the same environment variable.
    #[error("environment variable {0} is read by more than one option")]
    DuplicateEnvVar(String),
    /// Choice option without members.
    #[error("option --{0} has no choices")]
    EmptyChoices(String),
    /// Range option whose bounds admit no value.
    #[error("option --{flag} has an empty range {range}")]
    EmptyRange {
        /// Display name.
        flag: String,
        /// Rendered bounds.
        range: String,
    },
}

impl BindingError {
    /// Returns `true` for findings that still register cleanly.
    ///
    /// A shared environment variable is legal on the command line; each
    /// option reads it independently.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::DuplicateEnvVar(_))
    }
}

/// Validates a set of option specs.
///
/// Returns every problem found, in spec order. The specs can be registered
/// when every finding [is a warning](BindingError::is_warning).
pub fn validate_specs(specs: &[OptionSpec]) -> Vec<BindingError> {
    let mut errors = Vec::new();
    let mut flags = HashSet::new();
    let mut dests = HashSet::new();
    let mut envvars = HashSet::new();

    for spec in specs {
        if spec.flag.is_empty() {
            errors.push(BindingError::EmptyFlag(spec.dest.clone()));
        } else if !FLAG_RE.is_match(&spec.flag) {
            errors.push(BindingError::InvalidFlag(spec.flag.clone()));
        } else if !flags.insert(spec.flag.as_str()) {
            errors.push(BindingError::DuplicateFlag(spec.flag.clone()));
        }

        if !dests.insert(spec.dest.as_str()) {
            errors.push(BindingError::DuplicateDest(spec.dest.clone()));
        }

        for var in &spec.envvar {
            if !envvars.insert(var.as_str()) {
                errors.push(BindingError::DuplicateEnvVar(var.clone()));
            }
        }

        match &spec.option_type {
            OptionType::Choice(choices) if choices.is_empty() => {
                errors.push(BindingError::EmptyChoices(spec.flag.clone()));
            }
            OptionType::IntRange(bounds) | OptionType::FloatRange(bounds)
                if is_empty_range(bounds) =>
            {
                errors.push(BindingError::EmptyRange {
                    flag: spec.flag.clone(),
                    range: bounds.to_string(),
                });
            }
            _ => {}
        }
    }

    errors
}

fn is_empty_range(bounds: &Bounds) -> bool {
    let (Some(min), Some(max)) = (bounds.min, bounds.max) else {
        return false;
    };
    match min.partial_cmp_to(max) {
        Some(std::cmp::Ordering::Less) => false,
        Some(std::cmp::Ordering::Equal) => bounds.min_open || bounds.max_open,
        Some(std::cmp::Ordering::Greater) | None => true,
    }
}

#[cfg(test)]
mod tests {
    use crate::config::BinderConfig;
    use crate::types::{FieldDescriptor, FieldType, ModelDescriptor};
    use crate::build_options;

    use super::*;

    fn specs_for(model: ModelDescriptor) -> Vec<OptionSpec> {
        build_options(&model, &BinderConfig::default()).0
    }

    #[test]
    fn test_accepts_well_formed_model() {
        let specs = specs_for(
            ModelDescriptor::new("ServerSettings")
                .with_field(FieldDescriptor::new("host", FieldType::String))
                .with_field(FieldDescriptor::new("port", FieldType::Int).ge(1024).le(65535))
                .with_field(
                    FieldDescriptor::new("db", FieldType::String)
                        .with_alias_choices(["DB_URL", "DATABASE_URL"]),
                ),
        );
        assert!(validate_specs(&specs).is_empty());
    }

    #[test]
    fn test_rejects_alias_clash() {
        let specs = specs_for(
            ModelDescriptor::new("M")
                .with_field(FieldDescriptor::new("user", FieldType::String))
                .with_field(FieldDescriptor::new("login", FieldType::String).with_alias("user")),
        );
        assert_eq!(
            validate_specs(&specs),
            vec![BindingError::DuplicateFlag("user".to_string())]
        );
    }

    #[test]
    fn test_shared_env_var_is_a_warning() {
        let specs = specs_for(
            ModelDescriptor::new("M")
                .with_field(FieldDescriptor::new("a", FieldType::String).with_alias_choices(["TOKEN", "A"]))
                .with_field(FieldDescriptor::new("b", FieldType::String).with_alias_choices(["B", "TOKEN"])),
        );
        let errors = validate_specs(&specs);
        assert_eq!(errors, vec![BindingError::DuplicateEnvVar("TOKEN".to_string())]);
        assert!(errors.iter().all(BindingError::is_warning));
    }

    #[test]
    fn test_rejects_unwritable_names() {
        let specs = specs_for(
            ModelDescriptor::new("M")
                .with_field(FieldDescriptor::new("a", FieldType::String).with_alias("-a"))
                .with_field(FieldDescriptor::new("b", FieldType::String).with_alias("has space"))
                .with_field(FieldDescriptor::new("c", FieldType::String).with_alias("")),
        );
        assert_eq!(
            validate_specs(&specs),
            vec![
                BindingError::InvalidFlag("-a".to_string()),
                BindingError::InvalidFlag("has space".to_string()),
                BindingError::EmptyFlag("c".to_string()),
            ]
        );
        assert!(!validate_specs(&specs).iter().any(BindingError::is_warning));
    }

    #[test]
    fn test_rejects_empty_choices_and_ranges() {
        let specs = specs_for(
            ModelDescriptor::new("M")
                .with_field(FieldDescriptor::new("level", FieldType::enumeration("Level", Vec::<String>::new())))
                .with_field(FieldDescriptor::new("n", FieldType::Int).gt(5).lt(5))
                .with_field(FieldDescriptor::new("m", FieldType::Float).ge(1.0).le(1.0)),
        );
        assert_eq!(
            validate_specs(&specs),
            vec![
                BindingError::EmptyChoices("level".to_string()),
                BindingError::EmptyRange {
                    flag: "n".to_string(),
                    range: "5<x<5".to_string(),
                },
            ]
        );
    }
}
