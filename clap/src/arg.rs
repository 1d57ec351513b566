//! Conversion of [`OptionSpec`]s into `clap` arguments.

use clap::{Arg, ArgAction};
use model_options_core::{OptionSpec, OptionType};
use serde_json::Value;

use crate::parser::OptionValueParser;

/// Builds the `clap` argument for one option spec.
///
/// The argument id is the option's destination and its long flag is the
/// display name. Environment variables, defaults and prompts are resolved
/// by [`ModelArgs`](crate::ModelArgs) after parsing, so they only appear
/// in the help text here.
///
/// # Examples
///
/// ```
/// use model_options_clap::to_arg;
/// use model_options_core::{BinderConfig, FieldDescriptor, FieldType, field_option};
///
/// let field = FieldDescriptor::new("user_name", FieldType::String).with_alias("user");
/// let arg = to_arg(&field_option(&field, &BinderConfig::default()));
/// assert_eq!(arg.get_id().as_str(), "user_name");
/// assert_eq!(arg.get_long(), Some("user"));
/// ```
pub fn to_arg(spec: &OptionSpec) -> Arg {
    let mut arg = Arg::new(spec.dest.clone())
        .long(spec.flag.clone())
        .value_name(spec.option_type.metavar())
        .value_parser(OptionValueParser::new(spec.option_type.clone()))
        .action(ArgAction::Set)
        .help(help_text(spec))
        .hide(spec.hidden);

    if spec.option_type == OptionType::Bool {
        // `--flag` alone means true.
        arg = arg.num_args(0..=1).default_missing_value("true");
    }
    arg
}

fn help_text(spec: &OptionSpec) -> String {
    let mut parts = Vec::new();
    if let Some(help) = &spec.help {
        parts.push(help.clone());
    }
    if !spec.envvar.is_empty() {
        parts.push(format!("[env: {}]", spec.envvar.join(", ")));
    }
    if let Some(default) = &spec.default {
        parts.push(format!("[default: {}]", display_value(default)));
    }
    if spec.required && spec.prompt.is_none() {
        parts.push("[required]".to_string());
    }
    parts.join(" ")
}

/// Renders a value the way a user would type it.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
