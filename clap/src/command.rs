//! Binding a [`Model`] to a `clap` command.

use clap::{ArgMatches, Command};
use model_options_core::{
    BindingError, Invocation, Kwargs, Model, OptionBinder, OptionSpec, validate_specs,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::arg::to_arg;
use crate::error::BindError;
use crate::resolve::{Environment, ProcessEnv, Prompter, TerminalPrompter, resolve_value};

/// Registers the options of `M` on a command and rebuilds `M` from the
/// resulting matches.
///
/// # Examples
///
/// ```
/// use clap::Command;
/// use model_options_clap::{ModelArgs, NoPrompt};
/// use model_options_core::*;
/// use serde::Deserialize;
/// use std::collections::HashMap;
///
/// #[derive(Debug, Deserialize)]
/// struct Greeting {
///     name: String,
/// }
///
/// impl Model for Greeting {
///     fn descriptor() -> ModelDescriptor {
///         ModelDescriptor::new("Greeting")
///             .with_field(FieldDescriptor::new("name", FieldType::String))
///     }
///
///     fn validate(payload: Payload) -> Result<Self, ValidationError> {
///         from_payload("Greeting", payload)
///     }
/// }
///
/// let args = ModelArgs::<Greeting>::new();
/// let cmd = args.register(Command::new("greet")).unwrap();
/// let matches = cmd.try_get_matches_from(["greet", "--name", "alice"]).unwrap();
///
/// let env: HashMap<String, String> = HashMap::new();
/// let invocation = args.extract_with(&matches, &env, &NoPrompt).unwrap();
/// assert_eq!(invocation.variable, "greeting");
/// assert_eq!(invocation.model.name, "alice");
/// ```
#[derive(Debug, Clone)]
pub struct ModelArgs<M> {
    binder: OptionBinder<M>,
}

impl<M: Model> ModelArgs<M> {
    /// Binds `M` with the default binder configuration.
    pub fn new() -> Self {
        Self::from_binder(OptionBinder::new())
    }

    /// Uses an already configured binder.
    pub fn from_binder(binder: OptionBinder<M>) -> Self {
        Self { binder }
    }

    /// The underlying binder.
    pub fn binder(&self) -> &OptionBinder<M> {
        &self.binder
    }

    /// Option specs in registration order.
    pub fn specs(&self) -> &[OptionSpec] {
        self.binder.specs()
    }

    /// Adds one argument per model field to `cmd`, in field order.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::InvalidSpecs`] when [`validate_specs`] reports
    /// anything other than warnings (those are logged), and
    /// [`BindError::ArgumentConflict`] when an option's id or flag is
    /// already taken on `cmd`.
    pub fn register(&self, mut cmd: Command) -> Result<Command, BindError> {
        let (warnings, errors): (Vec<_>, Vec<_>) = validate_specs(self.specs())
            .into_iter()
            .partition(BindingError::is_warning);
        if !errors.is_empty() {
            return Err(BindError::InvalidSpecs(errors));
        }
        for warning in &warnings {
            warn!(command = %cmd.get_name(), %warning, "Option spec warning");
        }

        for spec in self.specs() {
            let taken = spec.flag == "help"
                || cmd.get_arguments().any(|arg| {
                    arg.get_id().as_str() == spec.dest.as_str()
                        || arg.get_long() == Some(spec.flag.as_str())
                });
            if taken {
                return Err(BindError::ArgumentConflict(spec.long()));
            }
            debug!(command = %cmd.get_name(), flag = %spec.flag, "Registering option");
            cmd = cmd.arg(to_arg(spec));
        }
        Ok(cmd)
    }

    /// Builds the kwargs the decoder consumes: one entry per option,
    /// followed by the command's other arguments that were supplied.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::MissingOption`] for required options without a
    /// value, [`BindError::InvalidValue`] for unparsable environment or
    /// prompt input, and [`BindError::Prompt`] when prompting fails.
    pub fn kwargs(
        &self,
        matches: &ArgMatches,
        env: &dyn Environment,
        prompter: &dyn Prompter,
    ) -> Result<Kwargs, BindError> {
        let mut kwargs = Kwargs::new();
        for spec in self.specs() {
            let value = resolve_value(spec, matches, env, prompter)?;
            kwargs.insert(spec.dest.clone(), value);
        }

        for id in matches.ids() {
            let id = id.as_str();
            if kwargs.contains_key(id) {
                continue;
            }
            if let Some(value) = passthrough_value(matches, id) {
                kwargs.insert(id.to_string(), value);
            }
        }
        Ok(kwargs)
    }

    /// Resolves, decodes and validates using the process environment and
    /// terminal prompts.
    ///
    /// # Errors
    ///
    /// See [`kwargs`](Self::kwargs); validation failures are returned as
    /// [`BindError::Validation`] holding the model's error.
    pub fn extract(&self, matches: &ArgMatches) -> Result<Invocation<M>, BindError> {
        self.extract_with(matches, &ProcessEnv, &TerminalPrompter)
    }

    /// Like [`extract`](Self::extract) with explicit value sources.
    ///
    /// # Errors
    ///
    /// See [`extract`](Self::extract).
    pub fn extract_with(
        &self,
        matches: &ArgMatches,
        env: &dyn Environment,
        prompter: &dyn Prompter,
    ) -> Result<Invocation<M>, BindError> {
        let kwargs = self.kwargs(matches, env, prompter)?;
        Ok(self.binder.invoke(kwargs)?)
    }

    /// Extracts and calls `handler` with the invocation.
    ///
    /// # Errors
    ///
    /// See [`extract`](Self::extract); `handler` is not called on error.
    pub fn run<R>(
        &self,
        matches: &ArgMatches,
        handler: impl FnOnce(Invocation<M>) -> R,
    ) -> Result<R, BindError> {
        self.extract(matches).map(handler)
    }
}

impl<M: Model> Default for ModelArgs<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads a non-model argument back as JSON.
fn passthrough_value(matches: &ArgMatches, id: &str) -> Option<Value> {
    if let Ok(Some(flag)) = matches.try_get_one::<bool>(id) {
        return Some(Value::Bool(*flag));
    }
    if let Ok(Some(text)) = matches.try_get_one::<String>(id) {
        return Some(Value::String(text.clone()));
    }

    let raw = matches.try_get_raw(id).ok().flatten()?;
    let mut values: Vec<Value> = raw
        .map(|value| Value::String(value.to_string_lossy().into_owned()))
        .collect();
    match values.len() {
        0 => None,
        1 => values.pop(),
        _ => Some(Value::Array(values)),
    }
}
