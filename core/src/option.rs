//! Command-line option descriptors.
//!
//! An [`OptionSpec`] is what a field turns into at registration time. Its
//! [`OptionType`] also converts raw command-line text into the JSON value
//! that ends up in the validation payload.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use uuid::Uuid;

use crate::types::Limit;

/// Formats tried, in order, by [`OptionType::DateTime`].
pub const DEFAULT_DATETIME_FORMATS: [&str; 3] =
    ["%Y-%m-%d", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Format date-time values are normalized to.
pub const DATETIME_OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Lower/upper bounds of a range-checked numeric option.
///
/// # Examples
///
/// ```
/// use model_options_core::{Bounds, Limit};
///
/// let port = Bounds {
///     min: Some(Limit::Int(1024)),
///     max: Some(Limit::Int(65535)),
///     ..Bounds::default()
/// };
/// assert!(port.contains(Limit::Int(8080)));
/// assert!(!port.contains(Limit::Int(80)));
/// assert_eq!(port.to_string(), "1024<=x<=65535");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound.
    pub min: Option<Limit>,
    /// Upper bound.
    pub max: Option<Limit>,
    /// Lower bound is exclusive.
    #[serde(default)]
    pub min_open: bool,
    /// Upper bound is exclusive.
    #[serde(default)]
    pub max_open: bool,
}

impl Bounds {
    /// Returns `true` when no bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Checks `value` against both bounds.
    pub fn contains(&self, value: Limit) -> bool {
        use std::cmp::Ordering::{Equal, Greater, Less};

        let above_min = match self.min {
            None => true,
            Some(min) => match value.partial_cmp_to(min) {
                Some(Greater) => true,
                Some(Equal) => !self.min_open,
                Some(Less) | None => false,
            },
        };
        let below_max = match self.max {
            None => true,
            Some(max) => match value.partial_cmp_to(max) {
                Some(Less) => true,
                Some(Equal) => !self.max_open,
                Some(Greater) | None => false,
            },
        };
        above_min && below_max
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(min) = self.min {
            write!(f, "{min}{}", if self.min_open { "<" } else { "<=" })?;
        }
        write!(f, "x")?;
        if let Some(max) = self.max {
            write!(f, "{}{max}", if self.max_open { "<" } else { "<=" })?;
        }
        Ok(())
    }
}

/// Value type of a command-line option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "params")]
pub enum OptionType {
    /// Free text.
    String,
    /// Boolean word (`true`, `no`, `1`, ...).
    Bool,
    /// UUID in any common textual form.
    Uuid,
    /// Signed integer.
    Int,
    /// Floating-point number.
    Float,
    /// Integer checked against bounds.
    IntRange(Bounds),
    /// Float checked against bounds.
    FloatRange(Bounds),
    /// One of a fixed set of names.
    Choice(Vec<String>),
    /// Date or date-time parsed with the listed `chrono` formats.
    DateTime(Vec<String>),
}

impl OptionType {
    /// Creates a date-time type with [`DEFAULT_DATETIME_FORMATS`].
    pub fn datetime() -> Self {
        Self::DateTime(
            DEFAULT_DATETIME_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        )
    }

    /// Short name used in help output (`INT`, `TEXT`, ...).
    pub fn metavar(&self) -> &'static str {
        match self {
            Self::String => "TEXT",
            Self::Bool => "BOOLEAN",
            Self::Uuid => "UUID",
            Self::Int | Self::IntRange(_) => "INTEGER",
            Self::Float | Self::FloatRange(_) => "FLOAT",
            Self::Choice(_) => "CHOICE",
            Self::DateTime(_) => "DATETIME",
        }
    }

    /// Converts raw command-line text into a payload value.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when `raw` is not acceptable for
    /// this type.
    ///
    /// # Examples
    ///
    /// ```
    /// use model_options_core::OptionType;
    /// use serde_json::json;
    ///
    /// assert_eq!(OptionType::Int.parse("42"), Ok(json!(42)));
    /// assert_eq!(OptionType::Bool.parse("yes"), Ok(json!(true)));
    /// assert_eq!(
    ///     OptionType::datetime().parse("2024-03-01"),
    ///     Ok(json!("2024-03-01T00:00:00")),
    /// );
    /// assert!(OptionType::Choice(vec!["LOW".into()]).parse("MID").is_err());
    /// ```
    pub fn parse(&self, raw: &str) -> Result<Value, String> {
        match self {
            Self::String => Ok(Value::String(raw.to_string())),
            Self::Bool => parse_bool(raw).map(Value::Bool),
            Self::Uuid => Uuid::parse_str(raw.trim())
                .map(|id| Value::String(id.hyphenated().to_string()))
                .map_err(|_| format!("'{raw}' is not a valid UUID")),
            Self::Int => parse_int(raw).map(Value::from),
            Self::Float => parse_float(raw).and_then(float_value),
            Self::IntRange(bounds) => {
                let value = parse_int(raw)?;
                if bounds.contains(Limit::Int(value)) {
                    Ok(Value::from(value))
                } else {
                    Err(format!("{value} is not in the range {bounds}"))
                }
            }
            Self::FloatRange(bounds) => {
                let value = parse_float(raw)?;
                if bounds.contains(Limit::Float(value)) {
                    float_value(value)
                } else {
                    Err(format!("{value} is not in the range {bounds}"))
                }
            }
            Self::Choice(choices) => {
                if choices.iter().any(|c| c == raw) {
                    Ok(Value::String(raw.to_string()))
                } else {
                    Err(format!(
                        "'{raw}' is not one of {}",
                        choices
                            .iter()
                            .map(|c| format!("'{c}'"))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))
                }
            }
            Self::DateTime(formats) => parse_datetime(raw, formats),
        }
    }
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        _ => Err(format!("'{raw}' is not a valid boolean")),
    }
}

fn parse_int(raw: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| format!("'{raw}' is not a valid integer"))
}

fn parse_float(raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| format!("'{raw}' is not a valid float"))
}

fn float_value(value: f64) -> Result<Value, String> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| format!("{value} is not a finite number"))
}

fn parse_datetime(raw: &str, formats: &[String]) -> Result<Value, String> {
    let raw = raw.trim();
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Value::String(dt.format(DATETIME_OUTPUT_FORMAT).to_string()));
        }
        // Date-only formats never satisfy NaiveDateTime.
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            let dt = date.and_time(NaiveTime::MIN);
            return Ok(Value::String(dt.format(DATETIME_OUTPUT_FORMAT).to_string()));
        }
    }
    Err(format!(
        "'{raw}' does not match the formats {}",
        formats.join(", ")
    ))
}

/// Prompt configuration copied from a field's extra metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    /// Prompt with text derived from the option name.
    Default,
    /// Prompt with custom text.
    Text(String),
}

impl Prompt {
    /// Returns the text shown to the user for an option named `flag`.
    ///
    /// # Examples
    ///
    /// ```
    /// use model_options_core::Prompt;
    ///
    /// assert_eq!(Prompt::Default.text_for("api_token"), "Api token");
    /// assert_eq!(Prompt::Text("Token".into()).text_for("api_token"), "Token");
    /// ```
    pub fn text_for(&self, flag: &str) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Default => {
                let spaced = flag.replace(['_', '-'], " ");
                let mut chars = spaced.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// Derived specification of one command-line option.
///
/// Built once per field by [`build_options`](crate::build_options) and
/// handed to the command-line framework for registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Kwarg key the framework delivers this option's value under.
    pub dest: String,
    /// Display name, registered as `--<flag>`.
    pub flag: String,
    /// Value type.
    pub option_type: OptionType,
    /// Help text.
    pub help: Option<String>,
    /// Default value, when one is attached.
    pub default: Option<Value>,
    /// Whether the option must be supplied.
    pub required: bool,
    /// Environment variables consulted in order.
    pub envvar: Vec<String>,
    /// Interactive prompt used when no value was supplied.
    pub prompt: Option<Prompt>,
    /// Hide typed input while prompting.
    pub hide_input: bool,
    /// Hide the option from help output.
    pub hidden: bool,
}

impl OptionSpec {
    /// Returns the option as written on the command line (`--<flag>`).
    pub fn long(&self) -> String {
        format!("--{}", self.flag)
    }
}
