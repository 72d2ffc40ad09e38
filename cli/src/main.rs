#![deny(missing_docs)]

//! # OAS Docs CLI
//!
//! Command Line Interface for the OpenAPI schema engine.
//!
//! Supported Commands:
//! - `model`: Prints the compiled property model of a schema.
//! - `example`: Prints a synthesized example (JSON, XML or form-urlencoded).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use oas_docs_core::{AppResult, EngineConfig};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

mod example;
mod input;
mod model;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI schema model and example generator")]
struct Cli {
    /// Engine configuration file (YAML).
    #[clap(long, global = true, env = "OAS_DOCS_CONFIG")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the compiled property model of the schema at a JSON Pointer.
    Model(model::ModelArgs),
    /// Print an example payload for the schema or media entry at a JSON Pointer.
    Example(example::ExampleArgs),
}

fn main() -> AppResult<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::from_yaml_file(path)?,
        None => EngineConfig::default(),
    };

    match &cli.command {
        Commands::Model(args) => model::execute(args, config)?,
        Commands::Example(args) => example::execute(args, config)?,
    }

    Ok(())
}
