//! Two-way binding between model fields and command-line options.
//!
//! [`build_options`] turns a [`ModelDescriptor`] into one [`OptionSpec`] per
//! field plus a [`Decoder`]. The decoder undoes the naming done at
//! registration: it takes the kwargs the command-line layer delivers and
//! rebuilds a payload keyed the way the model's validator expects.
//! [`OptionBinder`] ties both halves to a concrete [`Model`] type.
//!
//! # Example
//!
//! ```
//! use model_options_core::*;
//! use serde_json::json;
//!
//! let model = ModelDescriptor::new("Settings")
//!     .with_field(FieldDescriptor::new("name", FieldType::String))
//!     .with_field(
//!         FieldDescriptor::new("db_url", FieldType::String)
//!             .with_validation_alias("DATABASE_URL"),
//!     );
//! let (specs, decoder) = build_options(&model, &BinderConfig::default());
//! assert_eq!(specs[0].long(), "--name");
//! assert_eq!(specs[0].envvar, vec!["NAME"]);
//! assert_eq!(specs[1].long(), "--DATABASE_URL");
//!
//! let mut kwargs = Kwargs::new();
//! kwargs.insert("name".into(), json!("alice"));
//! kwargs.insert("db_url".into(), json!("sqlite://app.db"));
//! kwargs.insert("verbose".into(), json!(true));
//!
//! let (rest, payload) = decoder.decode(kwargs);
//! assert_eq!(payload["DATABASE_URL"], json!("sqlite://app.db"));
//! assert_eq!(rest.keys().collect::<Vec<_>>(), vec!["verbose"]);
//! ```

use std::marker::PhantomData;

use serde_json::Value;
use tracing::debug;

use crate::config::BinderConfig;
use crate::error::ValidationError;
use crate::mapper::option_type;
use crate::model::{Invocation, Model};
use crate::option::{OptionSpec, Prompt};
use crate::types::{FieldDescriptor, Kwargs, ModelDescriptor, Payload, ValidationAlias};

/// Builds the option specs for `model` and the matching decoder.
///
/// Specs come out in field order. The decoder's variable name defaults to
/// the snake-cased model name.
pub fn build_options(model: &ModelDescriptor, config: &BinderConfig) -> (Vec<OptionSpec>, Decoder) {
    let specs = model
        .fields
        .iter()
        .map(|field| field_option(field, config))
        .collect();
    let decoder = Decoder {
        model: model.clone(),
        variable: variable_name_for(&model.name),
    };
    (specs, decoder)
}

/// Derives the option spec for a single field.
///
/// # Examples
///
/// ```
/// use model_options_core::*;
///
/// let field = FieldDescriptor::new("user_name", FieldType::String)
///     .with_alias("user")
///     .with_description("Account to act as");
/// let spec = field_option(&field, &BinderConfig::default());
/// assert_eq!(spec.flag, "user");
/// assert_eq!(spec.dest, "user_name");
/// assert_eq!(spec.envvar, vec!["user"]);
/// assert!(spec.required);
/// ```
pub fn field_option(field: &FieldDescriptor, config: &BinderConfig) -> OptionSpec {
    let mut flag = field.name.to_lowercase();

    let mut default = None;
    let mut required = false;
    match &field.default {
        Some(value) if config.default_policy.attaches(value) => default = Some(value.clone()),
        _ if field.is_required => required = true,
        _ => {}
    }

    let envvar = match (&field.validation_alias, &field.alias) {
        (Some(ValidationAlias::Choices(choices)), _) => {
            if let Some(first) = choices.first() {
                flag = first.clone();
            }
            choices.clone()
        }
        (Some(ValidationAlias::Single(alias)), _) | (None, Some(alias)) => {
            flag = alias.clone();
            vec![alias.clone()]
        }
        (None, None) => vec![config.plain_env.apply(&field.name)],
    };

    let prompt = match field.extra_value("prompt") {
        Some(Value::Bool(true)) => Some(Prompt::Default),
        Some(Value::String(text)) => Some(Prompt::Text(text.clone())),
        _ => None,
    };
    let flag_set = |key: &str| matches!(field.extra_value(key), Some(Value::Bool(true)));

    let spec = OptionSpec {
        dest: field.name.clone(),
        flag,
        option_type: option_type(field),
        help: field.description.clone(),
        default,
        required,
        envvar,
        prompt,
        hide_input: flag_set("hide_input"),
        hidden: flag_set("hidden"),
    };
    debug!(
        field = %field.name,
        flag = %spec.flag,
        option_type = ?spec.option_type,
        envvar = ?spec.envvar,
        required = spec.required,
        "Derived option"
    );
    spec
}

/// Snake-cased model name, the default injection name.
///
/// An underscore goes before every ASCII uppercase letter except a leading
/// one, then the whole name is lower-cased. Digits and runs of capitals are
/// not treated as word boundaries.
///
/// # Examples
///
/// ```
/// use model_options_core::variable_name_for;
///
/// assert_eq!(variable_name_for("ServerSettings"), "server_settings");
/// assert_eq!(variable_name_for("Options"), "options");
/// assert_eq!(variable_name_for("Model2Config"), "model2_config");
/// ```
pub fn variable_name_for(model_name: &str) -> String {
    let mut name = String::with_capacity(model_name.len() + 4);
    for (i, c) in model_name.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            name.push('_');
        }
        name.extend(c.to_lowercase());
    }
    name
}

/// Rebuilds validation payloads from delivered kwargs.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoder {
    model: ModelDescriptor,
    variable: String,
}

impl Decoder {
    /// Name the validated model is injected under.
    pub fn variable_name(&self) -> &str {
        &self.variable
    }

    /// Overrides the injection name.
    pub fn set_variable_name(&mut self, name: impl Into<String>) {
        self.variable = name.into();
    }

    /// The model this decoder reverses.
    pub fn model(&self) -> &ModelDescriptor {
        &self.model
    }

    /// Splits `kwargs` into the arguments the model does not consume and
    /// the payload for its validator.
    ///
    /// For each field, in order: a value under the field's destination is
    /// moved to the field's payload key unless it is `null`; otherwise a
    /// value already keyed by one of the field's validation aliases is moved
    /// under that same key. Everything else stays in the remaining kwargs,
    /// in its original order.
    pub fn decode(&self, mut kwargs: Kwargs) -> (Kwargs, Payload) {
        let mut payload = Payload::new();

        for field in &self.model.fields {
            if let Some(value) = kwargs.shift_remove(&field.name) {
                if !value.is_null() {
                    payload.insert(field.payload_key().to_string(), value);
                }
                continue;
            }

            let preserved = field
                .validation_alias
                .as_ref()
                .and_then(|alias| alias.names().find(|name| kwargs.contains_key(*name)))
                .map(str::to_string);
            if let Some(key) = preserved {
                if let Some(value) = kwargs.shift_remove(&key) {
                    payload.insert(key, value);
                }
            }
        }

        debug!(
            model = %self.model.name,
            payload_keys = ?payload.keys().collect::<Vec<_>>(),
            remaining = kwargs.len(),
            "Decoded kwargs"
        );
        (kwargs, payload)
    }
}

/// Option specs and decoder bound to a model type.
///
/// # Examples
///
/// ```
/// use model_options_core::*;
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Debug, Deserialize)]
/// struct ServerSettings {
///     port: i64,
/// }
///
/// impl Model for ServerSettings {
///     fn descriptor() -> ModelDescriptor {
///         ModelDescriptor::new("ServerSettings")
///             .with_field(FieldDescriptor::new("port", FieldType::Int).with_default(8080))
///     }
///
///     fn validate(payload: Payload) -> Result<Self, ValidationError> {
///         from_payload("ServerSettings", payload)
///     }
/// }
///
/// let binder = OptionBinder::<ServerSettings>::new();
/// let mut kwargs = Kwargs::new();
/// kwargs.insert("port".into(), json!(9000));
///
/// let invocation = binder.invoke(kwargs).unwrap();
/// assert_eq!(invocation.variable, "server_settings");
/// assert_eq!(invocation.model.port, 9000);
/// ```
#[derive(Debug)]
pub struct OptionBinder<M> {
    specs: Vec<OptionSpec>,
    decoder: Decoder,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> OptionBinder<M> {
    /// Binds `M` with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&BinderConfig::default())
    }

    /// Binds `M` with `config`.
    pub fn with_config(config: &BinderConfig) -> Self {
        let (specs, decoder) = build_options(&M::descriptor(), config);
        Self {
            specs,
            decoder,
            _model: PhantomData,
        }
    }

    /// Injects the model under `name` instead of the snake-cased model name.
    pub fn variable_name(mut self, name: impl Into<String>) -> Self {
        self.decoder.set_variable_name(name);
        self
    }

    /// Option specs, one per field, in field order.
    pub fn specs(&self) -> &[OptionSpec] {
        &self.specs
    }

    /// The payload decoder.
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Decodes `kwargs` and validates the payload.
    ///
    /// # Errors
    ///
    /// Returns the model's [`ValidationError`] unchanged.
    pub fn invoke(&self, kwargs: Kwargs) -> Result<Invocation<M>, ValidationError> {
        let (kwargs, payload) = self.decoder.decode(kwargs);
        let model = M::validate(payload)?;
        Ok(Invocation {
            kwargs,
            variable: self.decoder.variable_name().to_string(),
            model,
        })
    }

    /// Decodes, validates and calls `handler` with the result.
    ///
    /// # Errors
    ///
    /// Returns the model's [`ValidationError`] unchanged; `handler` is not
    /// called in that case.
    pub fn call<R>(
        &self,
        kwargs: Kwargs,
        handler: impl FnOnce(Invocation<M>) -> R,
    ) -> Result<R, ValidationError> {
        self.invoke(kwargs).map(handler)
    }
}

impl<M: Model> Default for OptionBinder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for OptionBinder<M> {
    fn clone(&self) -> Self {
        Self {
            specs: self.specs.clone(),
            decoder: self.decoder.clone(),
            _model: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::config::{DefaultPolicy, EnvNaming};
    use crate::model::from_payload;
    use crate::option::{Bounds, OptionType};
    use crate::types::{FieldType, Limit};

    fn kwargs(value: Value) -> Kwargs {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn single(field: FieldDescriptor) -> (OptionSpec, Decoder) {
        let model = ModelDescriptor::new("Single").with_field(field);
        let (mut specs, decoder) = build_options(&model, &BinderConfig::default());
        (specs.remove(0), decoder)
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        name: String,
    }

    impl Model for User {
        fn descriptor() -> ModelDescriptor {
            ModelDescriptor::new("User").with_field(FieldDescriptor::new("name", FieldType::String))
        }

        fn validate(payload: Payload) -> Result<Self, ValidationError> {
            from_payload("User", payload)
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Listener {
        port: i64,
    }

    impl Model for Listener {
        fn descriptor() -> ModelDescriptor {
            ModelDescriptor::new("Listener")
                .with_field(FieldDescriptor::new("port", FieldType::Int).ge(1024).le(65535))
        }

        fn validate(payload: Payload) -> Result<Self, ValidationError> {
            let listener: Listener = from_payload("Listener", payload)?;
            if !(1024..=65535).contains(&listener.port) {
                return Err(ValidationError::field("port", "must be between 1024 and 65535"));
            }
            Ok(listener)
        }
    }

    #[test]
    fn test_required_string_field() {
        let binder = OptionBinder::<User>::new();
        let spec = &binder.specs()[0];
        assert_eq!(spec.long(), "--name");
        assert!(spec.required);
        assert_eq!(spec.default, None);
        assert_eq!(spec.envvar, vec!["NAME".to_string()]);
        assert_eq!(spec.option_type, OptionType::String);

        let (_, payload) = binder.decoder().decode(kwargs(json!({"name": "alice"})));
        assert_eq!(Value::Object(payload), json!({"name": "alice"}));

        let invocation = binder.invoke(kwargs(json!({"name": "alice"}))).unwrap();
        assert_eq!(invocation.model, User { name: "alice".into() });
        assert_eq!(invocation.variable, "user");
        assert!(invocation.kwargs.is_empty());
    }

    #[test]
    fn test_display_name_is_lowercased_field_name() {
        let (spec, _) = single(FieldDescriptor::new("LogLevel", FieldType::String));
        assert_eq!(spec.flag, "loglevel");
        assert_eq!(spec.dest, "LogLevel");
        assert_eq!(spec.envvar, vec!["LOGLEVEL".to_string()]);
    }

    #[test]
    fn test_verbatim_env_naming() {
        let model = ModelDescriptor::new("M").with_field(FieldDescriptor::new("port", FieldType::Int));
        let config = BinderConfig {
            plain_env: EnvNaming::Verbatim,
            ..BinderConfig::default()
        };
        let (specs, _) = build_options(&model, &config);
        assert_eq!(specs[0].envvar, vec!["port".to_string()]);
    }

    #[test]
    fn test_single_validation_alias_round_trips() {
        let (spec, decoder) =
            single(FieldDescriptor::new("db_url", FieldType::String).with_validation_alias("V"));
        assert_eq!(spec.flag, "V");
        // The alias is the whole env var name, not appended to the field name.
        assert_eq!(spec.envvar, vec!["V".to_string()]);

        let (_, payload) = decoder.decode(kwargs(json!({"db_url": "x"})));
        assert_eq!(Value::Object(payload), json!({"V": "x"}));

        let (rest, payload) = decoder.decode(kwargs(json!({"V": "x"})));
        assert_eq!(Value::Object(payload), json!({"V": "x"}));
        assert!(rest.is_empty());
    }

    #[test]
    fn test_validation_alias_beats_alias() {
        let (spec, decoder) = single(
            FieldDescriptor::new("token", FieldType::String)
                .with_alias("api_token")
                .with_validation_alias("API_TOKEN"),
        );
        assert_eq!(spec.flag, "API_TOKEN");
        assert_eq!(spec.envvar, vec!["API_TOKEN".to_string()]);

        let (_, payload) = decoder.decode(kwargs(json!({"token": "s3cret"})));
        assert_eq!(Value::Object(payload), json!({"API_TOKEN": "s3cret"}));
    }

    #[test]
    fn test_plain_alias() {
        let (spec, decoder) =
            single(FieldDescriptor::new("user_name", FieldType::String).with_alias("user"));
        assert_eq!(spec.flag, "user");
        assert_eq!(spec.envvar, vec!["user".to_string()]);

        let (_, payload) = decoder.decode(kwargs(json!({"user_name": "bob"})));
        assert_eq!(Value::Object(payload), json!({"user": "bob"}));
    }

    #[test]
    fn test_alias_choices_use_first_choice_as_name() {
        let (spec, decoder) = single(
            FieldDescriptor::new("database", FieldType::String)
                .with_alias_choices(["DB_URL", "DATABASE_URL"]),
        );
        // A choice set is never used as a display name; its first entry is.
        assert_eq!(spec.flag, "DB_URL");
        assert_eq!(spec.envvar, vec!["DB_URL".to_string(), "DATABASE_URL".to_string()]);

        let (_, payload) = decoder.decode(kwargs(json!({"database": "pg://"})));
        assert_eq!(Value::Object(payload), json!({"DB_URL": "pg://"}));
    }

    #[test]
    fn test_preserved_choice_key_is_kept() {
        let (_, decoder) = single(
            FieldDescriptor::new("database", FieldType::String)
                .with_alias_choices(["DB_URL", "DATABASE_URL"]),
        );
        let (rest, payload) = decoder.decode(kwargs(json!({"DATABASE_URL": "pg://", "x": 1})));
        assert_eq!(Value::Object(payload), json!({"DATABASE_URL": "pg://"}));
        assert_eq!(Value::Object(rest), json!({"x": 1}));
    }

    #[test]
    fn test_falsy_defaults_are_neither_attached_nor_required() {
        for default in [json!(0), json!(false), json!("")] {
            let (spec, _) = single(FieldDescriptor::new("value", FieldType::String).with_default(default.clone()));
            assert_eq!(spec.default, None, "{default}");
            assert!(!spec.required, "{default}");
        }
    }

    #[test]
    fn test_present_policy_attaches_falsy_defaults() {
        let model = ModelDescriptor::new("M")
            .with_field(FieldDescriptor::new("retries", FieldType::Int).with_default(0));
        let config = BinderConfig {
            default_policy: DefaultPolicy::Present,
            ..BinderConfig::default()
        };
        let (specs, _) = build_options(&model, &config);
        assert_eq!(specs[0].default, Some(json!(0)));
        assert!(!specs[0].required);
    }

    #[test]
    fn test_truthy_default_is_attached() {
        let (spec, _) = single(FieldDescriptor::new("host", FieldType::String).with_default("127.0.0.1"));
        assert_eq!(spec.default, Some(json!("127.0.0.1")));
        assert!(!spec.required);
    }

    #[test]
    fn test_extra_metadata_controls_prompting() {
        let (spec, _) = single(
            FieldDescriptor::new("password", FieldType::String)
                .with_extra("prompt", true)
                .with_extra("hide_input", true)
                .with_extra("hidden", true),
        );
        assert_eq!(spec.prompt, Some(Prompt::Default));
        assert!(spec.hide_input);
        assert!(spec.hidden);

        let (spec, _) = single(FieldDescriptor::new("name", FieldType::String).with_extra("prompt", "Your name"));
        assert_eq!(spec.prompt, Some(Prompt::Text("Your name".into())));
        assert!(!spec.hide_input);
        assert!(!spec.hidden);

        let (spec, _) = single(FieldDescriptor::new("name", FieldType::String).with_extra("prompt", false));
        assert_eq!(spec.prompt, None);
    }

    #[test]
    fn test_help_comes_from_description() {
        let (spec, _) = single(FieldDescriptor::new("host", FieldType::String).with_description("Bind address"));
        assert_eq!(spec.help.as_deref(), Some("Bind address"));
    }

    #[test]
    fn test_null_values_are_consumed_but_not_forwarded() {
        let (_, decoder) = single(FieldDescriptor::new("host", FieldType::String).optional());
        let (rest, payload) = decoder.decode(kwargs(json!({"host": null, "verbose": false})));
        assert!(payload.is_empty());
        assert_eq!(Value::Object(rest), json!({"verbose": false}));
    }

    #[test]
    fn test_remaining_kwargs_keep_order() {
        let model = ModelDescriptor::new("M")
            .with_field(FieldDescriptor::new("a", FieldType::String))
            .with_field(FieldDescriptor::new("b", FieldType::String));
        let (_, decoder) = build_options(&model, &BinderConfig::default());
        let (rest, _) = decoder.decode(kwargs(json!({"z": 1, "a": "x", "y": 2, "b": "y", "x": 3})));
        assert_eq!(rest.keys().collect::<Vec<_>>(), vec!["z", "y", "x"]);
    }

    #[test]
    fn test_enum_selection_reconstructs_member_name() {
        let (spec, decoder) = single(FieldDescriptor::new(
            "level",
            FieldType::enumeration("Level", ["LOW", "HIGH"]),
        ));
        assert_eq!(spec.option_type, OptionType::Choice(vec!["LOW".into(), "HIGH".into()]));
        let value = spec.option_type.parse("HIGH").unwrap();
        let (_, payload) = decoder.decode(kwargs(json!({"level": value})));
        assert_eq!(Value::Object(payload), json!({"level": "HIGH"}));
    }

    #[test]
    fn test_specs_follow_field_order() {
        let binder = OptionBinder::<Listener>::new();
        assert_eq!(binder.specs().len(), 1);
        assert_eq!(
            binder.specs()[0].option_type,
            OptionType::IntRange(Bounds {
                min: Some(Limit::Int(1024)),
                max: Some(Limit::Int(65535)),
                ..Bounds::default()
            })
        );
    }

    #[test]
    fn test_validation_error_propagates_unchanged() {
        let binder = OptionBinder::<Listener>::new();
        let err = binder.invoke(kwargs(json!({"port": 80}))).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Field { ref field, .. } if field == "port"
        ));

        let err = binder.invoke(Kwargs::new()).unwrap_err();
        assert!(matches!(err, ValidationError::Deserialize { ref model, .. } if model == "Listener"));
    }

    #[test]
    fn test_call_injects_under_override_name() {
        let binder = OptionBinder::<User>::new().variable_name("account");
        let (variable, name, rest) = binder
            .call(kwargs(json!({"name": "carol", "dry_run": true})), |inv| {
                (inv.variable, inv.model.name, inv.kwargs)
            })
            .unwrap();
        assert_eq!(variable, "account");
        assert_eq!(name, "carol");
        assert_eq!(Value::Object(rest), json!({"dry_run": true}));
    }

    #[test]
    fn test_handler_not_called_on_validation_failure() {
        let binder = OptionBinder::<User>::new();
        let mut called = false;
        let result = binder.call(Kwargs::new(), |_| called = true);
        assert!(result.is_err());
        assert!(!called);
    }

    #[test]
    fn test_variable_name_snake_cases_model_name() {
        assert_eq!(variable_name_for("ServerSettings"), "server_settings");
        assert_eq!(variable_name_for("DbConfig"), "db_config");
    }

    #[test]
    fn test_variable_name_splits_only_before_capitals() {
        assert_eq!(variable_name_for("Model2Config"), "model2_config");
        assert_eq!(variable_name_for("OAuth2Settings"), "o_auth2_settings");
        assert_eq!(variable_name_for("HTTPServer"), "h_t_t_p_server");
        assert_eq!(variable_name_for("already_snake"), "already_snake");
    }
}
