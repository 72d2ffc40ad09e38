#![deny(missing_docs)]

//! # Example Command
//!
//! Prints an example payload for a schema or a media-type entry.

use std::path::PathBuf;

use oas_docs_core::{AppResult, EngineConfig, ExampleFormat};

use crate::input::{load_document, pointer_not_found, write_output};

/// Output format of the example command.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatArg {
    /// Pretty JSON.
    #[default]
    Json,
    /// XML.
    Xml,
    /// `application/x-www-form-urlencoded`.
    Form,
}

impl From<FormatArg> for ExampleFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExampleFormat::Json,
            FormatArg::Xml => ExampleFormat::Xml,
            FormatArg::Form => ExampleFormat::Form,
        }
    }
}

/// Arguments for the example command.
#[derive(clap::Args, Debug, Clone)]
pub struct ExampleArgs {
    /// Path to the OpenAPI document (`.json` or YAML).
    #[clap(long)]
    pub input: PathBuf,

    /// JSON Pointer to a schema or to a media-type entry (an object with `schema`).
    #[clap(long, default_value = "")]
    pub pointer: String,

    /// Output format.
    #[clap(long, value_enum, default_value_t = FormatArg::Json)]
    pub format: FormatArg,

    /// Ignore declared examples and synthesize from the schema only.
    #[clap(long)]
    pub no_examples: bool,

    /// Output file; stdout when omitted.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

/// Executes the example command.
pub fn execute(args: &ExampleArgs, config: EngineConfig) -> AppResult<()> {
    let text = render(args, config)?;
    write_output(args.output.as_deref(), &text)
}

fn render(args: &ExampleArgs, config: EngineConfig) -> AppResult<String> {
    let mut doc = load_document(&args.input, config)?;
    let value = doc
        .media_example_at(&args.pointer, !args.no_examples)
        .ok_or_else(|| pointer_not_found(&args.pointer))?;
    Ok(ExampleFormat::from(args.format).render(&value, doc.config()))
}
