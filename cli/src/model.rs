#![deny(missing_docs)]

//! # Model Command
//!
//! Prints the compiled property model of a schema as pretty JSON.

use std::path::PathBuf;

use oas_docs_core::{AppError, AppResult, EngineConfig};

use crate::input::{load_document, pointer_not_found, write_output};

/// Arguments for the model command.
#[derive(clap::Args, Debug, Clone)]
pub struct ModelArgs {
    /// Path to the OpenAPI document (`.json` or YAML).
    #[clap(long)]
    pub input: PathBuf,

    /// JSON Pointer to the schema, e.g. `/components/schemas/Pet`.
    #[clap(long, default_value = "")]
    pub pointer: String,

    /// Print only the children list (properties, variants or tuple items).
    #[clap(long)]
    pub list: bool,

    /// Output file; stdout when omitted.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

/// Executes the model command.
pub fn execute(args: &ModelArgs, config: EngineConfig) -> AppResult<()> {
    let text = render(args, config)?;
    write_output(args.output.as_deref(), &text)
}

fn render(args: &ModelArgs, config: EngineConfig) -> AppResult<String> {
    let mut doc = load_document(&args.input, config)?;
    let json = if args.list {
        let children = doc
            .properties_at(&args.pointer)
            .ok_or_else(|| pointer_not_found(&args.pointer))?;
        serde_json::to_string_pretty(&children)
    } else {
        let prop = doc
            .property_at(&args.pointer)
            .ok_or_else(|| pointer_not_found(&args.pointer))?;
        serde_json::to_string_pretty(&prop)
    };
    json.map_err(|e| AppError::General(format!("Failed to serialize model: {}", e)))
}
