//! Settings model behind the `serve` command.

use model_options_core::{
    FieldDescriptor, FieldType, Model, ModelDescriptor, Payload, ValidationError, from_payload,
};
use serde::{Deserialize, Serialize};

/// Log verbosity of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "HIGH")]
    High,
}

/// Listener settings; every field becomes a `serve` option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: u32,
    #[serde(default)]
    pub retries: u32,
    pub level: Level,
    #[serde(rename = "DB_URL")]
    pub database: Option<String>,
    #[serde(rename = "API_TOKEN")]
    pub api_token: Option<String>,
    pub instance_id: Option<String>,
}

impl Model for ServerSettings {
    fn descriptor() -> ModelDescriptor {
        ModelDescriptor::new("ServerSettings")
            .with_field(
                FieldDescriptor::new("host", FieldType::String)
                    .with_description("Address to bind")
                    .with_default("127.0.0.1"),
            )
            .with_field(
                FieldDescriptor::new("port", FieldType::Int)
                    .with_description("Port to listen on")
                    .with_default(8080)
                    .ge(1024)
                    .le(65535),
            )
            .with_field(
                FieldDescriptor::new("workers", FieldType::Int)
                    .with_description("Worker threads")
                    .with_default(4)
                    .gt(0)
                    .le(256),
            )
            .with_field(
                FieldDescriptor::new("retries", FieldType::Int)
                    .with_description("Connection retries")
                    .with_default(0)
                    .ge(0),
            )
            .with_field(
                FieldDescriptor::new("level", FieldType::enumeration("Level", ["LOW", "HIGH"]))
                    .with_description("Log level")
                    .with_default("LOW"),
            )
            .with_field(
                FieldDescriptor::new("database", FieldType::String)
                    .with_description("Database connection URL")
                    .with_alias_choices(["DB_URL", "DATABASE_URL"])
                    .optional(),
            )
            .with_field(
                FieldDescriptor::new("api_token", FieldType::String)
                    .with_description("Token for the admin API")
                    .with_alias("token")
                    .with_validation_alias("API_TOKEN")
                    .with_extra("prompt", "API token")
                    .with_extra("hide_input", true)
                    .optional(),
            )
            .with_field(
                FieldDescriptor::new("instance_id", FieldType::Uuid)
                    .with_extra("hidden", true)
                    .optional(),
            )
    }

    fn validate(payload: Payload) -> Result<Self, ValidationError> {
        let settings: ServerSettings = from_payload("ServerSettings", payload)?;
        if settings.host.trim().is_empty() {
            return Err(ValidationError::field("host", "must not be empty"));
        }
        Ok(settings)
    }
}
