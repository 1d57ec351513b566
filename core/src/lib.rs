//! Derive command-line options from declarative model descriptors and
//! rebuild validated models from parsed option values.
//!
//! The crate is framework-agnostic. It provides:
//!
//! - [`FieldDescriptor`] / [`ModelDescriptor`] — explicit descriptions of a
//!   model's fields (annotation, numeric markers, default, aliases, extra
//!   metadata).
//! - [`option_type`] — the type mapper from field annotation to
//!   [`OptionType`].
//! - [`build_options`] — one [`OptionSpec`] per field plus a [`Decoder`]
//!   that reverses the naming applied at registration.
//! - [`OptionBinder`] — both halves bound to a [`Model`] type, producing an
//!   [`Invocation`] for the command handler.
//! - [`validate_specs`] — structural checks run before registration.
//!
//! # Example
//!
//! ```
//! use model_options_core::*;
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Debug, Deserialize)]
//! struct Alerting {
//!     level: String,
//!     #[serde(rename = "WEBHOOK_URL")]
//!     webhook: String,
//! }
//!
//! impl Model for Alerting {
//!     fn descriptor() -> ModelDescriptor {
//!         ModelDescriptor::new("Alerting")
//!             .with_field(FieldDescriptor::new(
//!                 "level",
//!                 FieldType::enumeration("Level", ["LOW", "HIGH"]),
//!             ))
//!             .with_field(
//!                 FieldDescriptor::new("webhook", FieldType::String)
//!                     .with_validation_alias("WEBHOOK_URL"),
//!             )
//!     }
//!
//!     fn validate(payload: Payload) -> Result<Self, ValidationError> {
//!         from_payload("Alerting", payload)
//!     }
//! }
//!
//! let binder = OptionBinder::<Alerting>::new();
//! assert_eq!(binder.specs()[1].long(), "--WEBHOOK_URL");
//!
//! let mut kwargs = Kwargs::new();
//! kwargs.insert("level".into(), json!("HIGH"));
//! kwargs.insert("webhook".into(), json!("https://hooks.example/1"));
//! let invocation = binder.invoke(kwargs).unwrap();
//! assert_eq!(invocation.variable, "alerting");
//! assert_eq!(invocation.model.webhook, "https://hooks.example/1");
//! ```

mod binder;
mod config;
mod error;
mod mapper;
mod model;
mod option;
mod types;
mod validate;

pub use binder::{Decoder, OptionBinder, build_options, field_option, variable_name_for};
pub use config::{BinderConfig, DefaultPolicy, EnvNaming, is_truthy};
pub use error::{ConfigError, ValidationError};
pub use mapper::option_type;
pub use model::{Invocation, Model, from_payload};
pub use option::{
    Bounds, DATETIME_OUTPUT_FORMAT, DEFAULT_DATETIME_FORMATS, OptionSpec, OptionType, Prompt,
};
pub use types::*;
pub use validate::{BindingError, validate_specs};
