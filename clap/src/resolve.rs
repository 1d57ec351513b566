//! Per-option value resolution.
//!
//! Sources are consulted in order: the command line, each environment
//! variable of the option, an interactive prompt (when configured), the
//! attached default. A required option with no value from any of them is
//! an error; an optional one resolves to `null`.

use std::collections::HashMap;
use std::io::IsTerminal;

use clap::ArgMatches;
use dialoguer::{Input, Password};
use model_options_core::{OptionSpec, Prompt};
use serde_json::Value;
use tracing::{debug, warn};

use crate::arg::display_value;
use crate::error::BindError;

/// How many answers a prompt accepts before giving up on parse errors.
pub const MAX_PROMPT_ATTEMPTS: usize = 3;

/// Source of environment variables.
pub trait Environment {
    /// Returns the value of `name`, treating empty values as unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.is_empty())
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).filter(|value| !value.is_empty()).cloned()
    }
}

/// One question put to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    /// Text shown before the input.
    pub text: String,
    /// Default accepted by an empty answer, rendered for display.
    pub default: Option<String>,
    /// Hide typed characters.
    pub hide_input: bool,
}

/// Asks the user for option values.
pub trait Prompter {
    /// Shows `request` and returns the answer, or `None` when no
    /// interactive input is available.
    ///
    /// # Errors
    ///
    /// Returns a message when the terminal cannot be read.
    fn prompt(&self, request: &PromptRequest) -> Result<Option<String>, String>;

    /// Reports a rejected answer before asking again.
    fn reject(&self, _message: &str) {}
}

/// Prompts on the terminal with `dialoguer`; non-interactive when stdin is
/// not a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt(&self, request: &PromptRequest) -> Result<Option<String>, String> {
        if !std::io::stdin().is_terminal() {
            return Ok(None);
        }

        let text = match &request.default {
            Some(default) if !request.hide_input => format!("{} [{default}]", request.text),
            _ => request.text.clone(),
        };
        let answer = if request.hide_input {
            Password::new()
                .with_prompt(text)
                .allow_empty_password(request.default.is_some())
                .interact()
        } else {
            Input::<String>::new()
                .with_prompt(text)
                .allow_empty(true)
                .interact_text()
        };
        answer.map(Some).map_err(|err| err.to_string())
    }

    fn reject(&self, message: &str) {
        eprintln!("Error: {message}");
    }
}

/// Never prompts; every prompt behaves as if no terminal were attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl Prompter for NoPrompt {
    fn prompt(&self, _request: &PromptRequest) -> Result<Option<String>, String> {
        Ok(None)
    }
}

/// Resolves the value delivered for `spec`.
pub(crate) fn resolve_value(
    spec: &OptionSpec,
    matches: &ArgMatches,
    env: &dyn Environment,
    prompter: &dyn Prompter,
) -> Result<Value, BindError> {
    if let Some(value) = matches.try_get_one::<Value>(&spec.dest)? {
        debug!(flag = %spec.flag, source = "command_line", "Resolved option");
        return Ok(value.clone());
    }

    for var in &spec.envvar {
        if let Some(raw) = env.var(var) {
            debug!(flag = %spec.flag, source = "env", envvar = %var, "Resolved option");
            return spec
                .option_type
                .parse(&raw)
                .map_err(|message| BindError::InvalidValue {
                    flag: spec.long(),
                    origin: format!("environment variable {var}"),
                    message,
                });
        }
    }

    if let Some(prompt) = &spec.prompt {
        if let Some(value) = ask(spec, prompt, prompter)? {
            debug!(flag = %spec.flag, source = "prompt", "Resolved option");
            return Ok(value);
        }
    }

    if let Some(default) = &spec.default {
        debug!(flag = %spec.flag, source = "default", "Resolved option");
        return Ok(default.clone());
    }

    if spec.required {
        return Err(BindError::MissingOption {
            flag: spec.long(),
            envvar: spec.envvar.clone(),
        });
    }
    Ok(Value::Null)
}

fn ask(
    spec: &OptionSpec,
    prompt: &Prompt,
    prompter: &dyn Prompter,
) -> Result<Option<Value>, BindError> {
    let request = PromptRequest {
        text: prompt.text_for(&spec.flag),
        default: spec.default.as_ref().map(display_value),
        hide_input: spec.hide_input,
    };

    for attempt in 1..=MAX_PROMPT_ATTEMPTS {
        let answer = prompter
            .prompt(&request)
            .map_err(|message| BindError::Prompt {
                flag: spec.long(),
                message,
            })?;
        let Some(answer) = answer else {
            return Ok(None);
        };

        if answer.is_empty() {
            match &spec.default {
                Some(default) => return Ok(Some(default.clone())),
                None if attempt < MAX_PROMPT_ATTEMPTS => {
                    debug!(flag = %spec.flag, attempt, "Empty prompt answer without default");
                    prompter.reject("a value is required");
                    continue;
                }
                // Falls through to the missing-option check.
                None => return Ok(None),
            }
        }

        match spec.option_type.parse(&answer) {
            Ok(value) => return Ok(Some(value)),
            Err(message) if attempt < MAX_PROMPT_ATTEMPTS => {
                warn!(flag = %spec.flag, attempt, error = %message, "Rejected prompt answer");
                prompter.reject(&message);
            }
            Err(message) => {
                return Err(BindError::InvalidValue {
                    flag: spec.long(),
                    origin: "prompt".to_string(),
                    message,
                });
            }
        }
    }
    Ok(None)
}
