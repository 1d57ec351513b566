//! `clap` adapter for model-derived command-line options.
//!
//! [`ModelArgs`] registers one argument per model field on a
//! [`clap::Command`] and, after parsing, resolves each option's value from
//! the command line, its environment variables, an interactive prompt or
//! its default. The resulting kwargs are decoded and validated into the
//! model by [`OptionBinder`](model_options_core::OptionBinder).
//!
//! Arguments the command declares itself are passed through to the
//! handler's kwargs untouched.
//!
//! # Example
//!
//! ```
//! use clap::{Arg, ArgAction, Command};
//! use model_options_clap::{ModelArgs, NoPrompt};
//! use model_options_core::*;
//! use serde::Deserialize;
//! use serde_json::json;
//! use std::collections::HashMap;
//!
//! #[derive(Debug, Deserialize)]
//! struct Listener {
//!     host: String,
//!     port: i64,
//! }
//!
//! impl Model for Listener {
//!     fn descriptor() -> ModelDescriptor {
//!         ModelDescriptor::new("Listener")
//!             .with_field(FieldDescriptor::new("host", FieldType::String).with_default("127.0.0.1"))
//!             .with_field(FieldDescriptor::new("port", FieldType::Int).ge(1024).le(65535))
//!     }
//!
//!     fn validate(payload: Payload) -> Result<Self, ValidationError> {
//!         from_payload("Listener", payload)
//!     }
//! }
//!
//! let args = ModelArgs::<Listener>::new();
//! let cmd = Command::new("serve").arg(Arg::new("dry_run").long("dry-run").action(ArgAction::SetTrue));
//! let cmd = args.register(cmd).unwrap();
//! let matches = cmd.try_get_matches_from(["serve", "--dry-run"]).unwrap();
//!
//! let env = HashMap::from([("PORT".to_string(), "9000".to_string())]);
//! let invocation = args.extract_with(&matches, &env, &NoPrompt).unwrap();
//! assert_eq!(invocation.model.host, "127.0.0.1");
//! assert_eq!(invocation.model.port, 9000);
//! assert_eq!(invocation.kwargs["dry_run"], json!(true));
//! ```

mod arg;
mod command;
mod error;
mod parser;
mod resolve;

pub use arg::to_arg;
pub use command::ModelArgs;
pub use error::BindError;
pub use parser::OptionValueParser;
pub use resolve::{
    Environment, MAX_PROMPT_ATTEMPTS, NoPrompt, ProcessEnv, PromptRequest, Prompter,
    TerminalPrompter,
};
