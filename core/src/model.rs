//! The schema side of the bridge.
//!
//! A [`Model`] describes its fields and knows how to build itself from a
//! payload. Validation is entirely the model's business; [`from_payload`]
//! covers the common case of a `serde`-deserializable struct.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ValidationError;
use crate::types::{Kwargs, ModelDescriptor, Payload};

/// A validated model type that can be bound to command-line options.
///
/// # Examples
///
/// ```
/// use model_options_core::*;
/// use serde::Deserialize;
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
/// let mut payload = Payload::new();
/// payload.insert("name".into(), "alice".into());
/// assert_eq!(Greeting::validate(payload).unwrap().name, "alice");
/// ```
pub trait Model: Sized {
    /// Returns the descriptor of every field, in declaration order.
    fn descriptor() -> ModelDescriptor;

    /// Builds an instance from a payload keyed by payload keys.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the payload is rejected.
    fn validate(payload: Payload) -> Result<Self, ValidationError>;
}

/// Deserializes `payload` into `T` through `serde_json`.
///
/// # Errors
///
/// Returns [`ValidationError::Deserialize`] (tagged with `model`) when
/// deserialization fails.
pub fn from_payload<T: DeserializeOwned>(
    model: &str,
    payload: Payload,
) -> Result<T, ValidationError> {
    serde_json::from_value(Value::Object(payload)).map_err(|source| {
        ValidationError::Deserialize {
            model: model.to_string(),
            source,
        }
    })
}

/// What a bound command handler receives.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation<M> {
    /// Arguments that were not consumed by the model.
    pub kwargs: Kwargs,
    /// Name the model is injected under.
    pub variable: String,
    /// The validated model.
    pub model: M,
}

impl<M> Invocation<M> {
    /// Splits the invocation into remaining kwargs and the model.
    pub fn into_parts(self) -> (Kwargs, M) {
        (self.kwargs, self.model)
    }
}
