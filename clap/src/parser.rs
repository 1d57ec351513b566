//! `clap` value parser backed by an [`OptionType`].

use std::ffi::OsStr;

use clap::builder::{PossibleValue, TypedValueParser};
use clap::error::ErrorKind;
use clap::{Arg, Command};
use model_options_core::OptionType;
use serde_json::Value;

/// Parses raw argument text into a [`serde_json::Value`] using the option
/// type derived from a model field.
///
/// # Examples
///
/// ```
/// use clap::{Arg, Command};
/// use model_options_clap::OptionValueParser;
/// use model_options_core::OptionType;
/// use serde_json::{Value, json};
///
/// let cmd = Command::new("app").arg(
///     Arg::new("retries")
///         .long("retries")
///         .value_parser(OptionValueParser::new(OptionType::Int)),
/// );
/// let matches = cmd.try_get_matches_from(["app", "--retries", "3"]).unwrap();
/// assert_eq!(matches.get_one::<Value>("retries"), Some(&json!(3)));
/// ```
#[derive(Debug, Clone)]
pub struct OptionValueParser {
    option_type: OptionType,
}

impl OptionValueParser {
    /// Wraps `option_type`.
    pub fn new(option_type: OptionType) -> Self {
        Self { option_type }
    }

    /// The wrapped option type.
    pub fn option_type(&self) -> &OptionType {
        &self.option_type
    }
}

impl TypedValueParser for OptionValueParser {
    type Value = Value;

    fn parse_ref(
        &self,
        cmd: &Command,
        arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let raw = value.to_str().ok_or_else(|| {
            clap::Error::raw(ErrorKind::InvalidUtf8, "invalid UTF-8 in argument value\n")
                .with_cmd(cmd)
        })?;

        self.option_type.parse(raw).map_err(|message| {
            let name = arg
                .and_then(Arg::get_long)
                .map(|long| format!("'--{long}'"))
                .unwrap_or_else(|| "argument".to_string());
            clap::Error::raw(
                ErrorKind::ValueValidation,
                format!("invalid value '{raw}' for {name}: {message}\n"),
            )
            .with_cmd(cmd)
        })
    }

    fn possible_values(&self) -> Option<Box<dyn Iterator<Item = PossibleValue> + '_>> {
        match &self.option_type {
            OptionType::Choice(choices) => Some(Box::new(
                choices.iter().map(|choice| PossibleValue::new(choice.clone())),
            )),
            OptionType::Bool => Some(Box::new(
                ["true", "false"].into_iter().map(PossibleValue::new),
            )),
            _ => None,
        }
    }
}
