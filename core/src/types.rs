//! Field and model descriptor definitions.
//!
//! These types carry everything the binder needs to know about a model:
//! the annotation of each field, its numeric constraint markers, default,
//! aliases and the free-form extra metadata that controls prompting. They
//! are plain values built once by the model author and read by both the
//! type mapper and the option binder.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keyword mapping delivered by the command-line layer.
///
/// Keys are option destinations (field names) plus any other arguments the
/// command declares. A [`Value::Null`] entry means "no value supplied".
pub type Kwargs = Map<String, Value>;

/// Mapping handed to [`Model::validate`](crate::Model::validate), keyed by
/// the identifiers the validation layer expects.
pub type Payload = Map<String, Value>;

/// Semantic type tag of a model field.
///
/// # Examples
///
/// ```
/// use model_options_core::FieldType;
///
/// let level = FieldType::enumeration("Level", ["LOW", "HIGH"]);
/// assert!(!level.is_numeric());
/// assert!(FieldType::Int.is_numeric());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Text.
    String,
    /// Boolean.
    Bool,
    /// UUID identifier.
    Uuid,
    /// Signed integer.
    Int,
    /// Floating-point number.
    Float,
    /// Enumeration with named members.
    Enum {
        /// Enumeration type name.
        name: String,
        /// Member names in declaration order.
        members: Vec<String>,
    },
    /// Calendar date.
    Date,
    /// Date and time of day.
    DateTime,
    /// Any annotation without a dedicated mapping.
    Other(String),
}

impl FieldType {
    /// Creates an enumeration type from its member names.
    pub fn enumeration<I, S>(name: &str, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            name: name.to_string(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` for [`Int`](FieldType::Int) and [`Float`](FieldType::Float).
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

/// Numeric bound value carried by a [`Constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Limit {
    /// Integer bound.
    Int(i64),
    /// Floating-point bound.
    Float(f64),
}

impl Limit {
    /// Returns the bound as `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    pub(crate) fn partial_cmp_to(self, other: Limit) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl From<i64> for Limit {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Limit {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Limit {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Numeric constraint marker attached to a field.
///
/// Only meaningful on numeric annotations; ignored everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Greater than or equal.
    Ge(Limit),
    /// Strictly greater than.
    Gt(Limit),
    /// Less than or equal.
    Le(Limit),
    /// Strictly less than.
    Lt(Limit),
}

/// Alternate identifier(s) a field accepts during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidationAlias {
    /// One alternate name.
    Single(String),
    /// Ordered alternate names; the first one is canonical.
    Choices(Vec<String>),
}

impl ValidationAlias {
    /// Returns the identifier payloads are keyed by.
    ///
    /// # Examples
    ///
    /// ```
    /// use model_options_core::ValidationAlias;
    ///
    /// let alias = ValidationAlias::Choices(vec!["DB_URL".into(), "DATABASE_URL".into()]);
    /// assert_eq!(alias.primary(), Some("DB_URL"));
    /// ```
    pub fn primary(&self) -> Option<&str> {
        match self {
            Self::Single(name) => Some(name.as_str()),
            Self::Choices(choices) => choices.first().map(String::as_str),
        }
    }

    /// Iterates over every identifier, canonical first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::Single(name) => std::slice::from_ref(name),
            Self::Choices(choices) => choices,
        };
        slice.iter().map(String::as_str)
    }
}

/// Descriptor for one model field.
///
/// Created with [`FieldDescriptor::new`] (required, no default) and refined
/// with the builder methods.
///
/// # Examples
///
/// ```
/// use model_options_core::{FieldDescriptor, FieldType};
///
/// let port = FieldDescriptor::new("port", FieldType::Int)
///     .with_description("Port to listen on")
///     .with_default(8080)
///     .ge(1024)
///     .le(65535);
/// assert!(!port.is_required);
/// assert_eq!(port.metadata.len(), 2);
/// assert_eq!(port.payload_key(), "port");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field identifier, unique within a model.
    pub name: String,
    /// Semantic type tag.
    pub annotation: FieldType,
    /// Numeric constraint markers in declaration order.
    #[serde(default)]
    pub metadata: Vec<Constraint>,
    /// Default value; `None` means the field has no default.
    #[serde(default)]
    pub default: Option<Value>,
    /// Whether the validator requires a value.
    pub is_required: bool,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Alternate identifier(s) used for validation and environment lookup.
    #[serde(default)]
    pub validation_alias: Option<ValidationAlias>,
    /// Plain alias, lower precedence than `validation_alias`.
    #[serde(default)]
    pub alias: Option<String>,
    /// Extra schema metadata (`prompt`, `hide_input`, `hidden`).
    #[serde(default)]
    pub extra: Option<Map<String, Value>>,
}

impl FieldDescriptor {
    /// Creates a required field without a default.
    pub fn new(name: &str, annotation: FieldType) -> Self {
        Self {
            name: name.to_string(),
            annotation,
            metadata: Vec::new(),
            default: None,
            is_required: true,
            description: None,
            validation_alias: None,
            alias: None,
            extra: None,
        }
    }

    /// Sets a default value and marks the field optional.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self.is_required = false;
        self
    }

    /// Marks the field optional with a `null` default.
    pub fn optional(self) -> Self {
        self.with_default(Value::Null)
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Sets a single validation alias.
    pub fn with_validation_alias(mut self, alias: &str) -> Self {
        self.validation_alias = Some(ValidationAlias::Single(alias.to_string()));
        self
    }

    /// Sets an ordered set of validation alias choices.
    pub fn with_alias_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validation_alias = Some(ValidationAlias::Choices(
            choices.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Sets the plain alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// Adds one extra metadata entry.
    pub fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    /// Adds a constraint marker.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.metadata.push(constraint);
        self
    }

    /// Adds a `>=` marker.
    pub fn ge(self, limit: impl Into<Limit>) -> Self {
        self.with_constraint(Constraint::Ge(limit.into()))
    }

    /// Adds a `>` marker.
    pub fn gt(self, limit: impl Into<Limit>) -> Self {
        self.with_constraint(Constraint::Gt(limit.into()))
    }

    /// Adds a `<=` marker.
    pub fn le(self, limit: impl Into<Limit>) -> Self {
        self.with_constraint(Constraint::Le(limit.into()))
    }

    /// Adds a `<` marker.
    pub fn lt(self, limit: impl Into<Limit>) -> Self {
        self.with_constraint(Constraint::Lt(limit.into()))
    }

    /// Returns the key the validation layer expects this field under.
    ///
    /// Precedence: first validation alias, then plain alias, then the field
    /// name. This is the inverse of the display-name resolution done at
    /// registration.
    pub fn payload_key(&self) -> &str {
        self.validation_alias
            .as_ref()
            .and_then(ValidationAlias::primary)
            .or(self.alias.as_deref())
            .unwrap_or(&self.name)
    }

    /// Looks up an extra metadata entry.
    pub fn extra_value(&self, key: &str) -> Option<&Value> {
        self.extra.as_ref().and_then(|extra| extra.get(key))
    }
}

/// Ordered field descriptors for one model type.
///
/// # Examples
///
/// ```
/// use model_options_core::{FieldDescriptor, FieldType, ModelDescriptor};
///
/// let model = ModelDescriptor::new("ServerSettings")
///     .with_field(FieldDescriptor::new("host", FieldType::String))
///     .with_field(FieldDescriptor::new("port", FieldType::Int));
/// assert_eq!(model.fields.len(), 2);
/// assert!(model.field("port").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model type name (CamelCase).
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl ModelDescriptor {
    /// Creates an empty model descriptor.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Finds a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}
