mod settings;

use std::env;

use clap::{ArgMatches, Args, Command, FromArgMatches};
use model_options_clap::ModelArgs;
use model_options_core::{BinderConfig, OptionBinder};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::settings::ServerSettings;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Path of an optional YAML [`BinderConfig`].
const BINDER_CONFIG_ENV: &str = "MODEL_OPTIONS_BINDER_CONFIG";

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Print the resolved settings instead of starting.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Args)]
struct OptionsArgs {
    /// Output format for the option table.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let settings = settings_args()?;
    let cli = build_cli(&settings)?;
    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("serve", sub)) => run_serve(&settings, sub),
        Some(("options", sub)) => run_options(&settings, sub),
        _ => Err("no command given".to_string()),
    }
}

fn settings_args() -> Result<ModelArgs<ServerSettings>, String> {
    let config = match env::var(BINDER_CONFIG_ENV) {
        Ok(path) if !path.is_empty() => BinderConfig::load(&path)
            .map_err(|err| format!("Failed to load binder config '{path}': {err}"))?,
        _ => BinderConfig::default(),
    };
    debug!(?config, "Binder configuration");
    Ok(ModelArgs::from_binder(OptionBinder::with_config(&config)))
}

fn build_cli(settings: &ModelArgs<ServerSettings>) -> Result<Command, String> {
    let serve = ServeArgs::augment_args(
        Command::new("serve").about("Resolve server settings from options and environment"),
    );
    let serve = settings.register(serve).map_err(|err| err.to_string())?;
    let options = OptionsArgs::augment_args(
        Command::new("options").about("Print the options generated from the settings model"),
    );

    Ok(Command::new("model-options")
        .about("Command-line options generated from a settings model")
        .version(PACKAGE_VERSION)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(serve)
        .subcommand(options))
}

fn run_serve(settings: &ModelArgs<ServerSettings>, matches: &ArgMatches) -> Result<(), String> {
    let args = ServeArgs::from_arg_matches(matches).map_err(|err| err.to_string())?;
    let invocation = settings.extract(matches).map_err(|err| err.to_string())?;

    if !args.dry_run {
        let model = &invocation.model;
        println!(
            "Listening on {}:{} with {} workers (level {:?})",
            model.host, model.port, model.workers, model.level
        );
        return Ok(());
    }

    let mut output = invocation.kwargs;
    let model = serde_json::to_value(&invocation.model)
        .map_err(|err| format!("Failed to serialize settings: {err}"))?;
    output.insert(invocation.variable, model);
    let json = serde_json::to_string_pretty(&Value::Object(output))
        .map_err(|err| format!("Failed to serialize output: {err}"))?;
    println!("{json}");
    Ok(())
}

fn run_options(settings: &ModelArgs<ServerSettings>, matches: &ArgMatches) -> Result<(), String> {
    let args = OptionsArgs::from_arg_matches(matches).map_err(|err| err.to_string())?;
    let rendered = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(settings.specs())
            .map_err(|err| format!("Failed to serialize options: {err}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(settings.specs())
            .map_err(|err| format!("Failed to serialize options: {err}"))?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
