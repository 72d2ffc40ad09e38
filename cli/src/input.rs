//! Document loading and output helpers shared by the commands.

use std::fs;
use std::path::Path;

use oas_docs_core::{AppError, AppResult, EngineConfig, OpenApiDocument};
use tracing::info;

/// Loads the document at `path`; `.json` files are read as JSON, others as YAML.
pub fn load_document(path: &Path, config: EngineConfig) -> AppResult<OpenApiDocument> {
    if !path.exists() {
        return Err(AppError::General(format!(
            "OpenAPI file not found: {:?}",
            path
        )));
    }
    OpenApiDocument::from_path(path, config)
}

/// Writes `text` to `output`, or to stdout when no output file is given.
pub fn write_output(output: Option<&Path>, text: &str) -> AppResult<()> {
    let Some(path) = output else {
        println!("{}", text);
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::General(format!("Failed to create output dir: {}", e)))?;
    }
    fs::write(path, text)
        .map_err(|e| AppError::General(format!("Failed to write output: {}", e)))?;
    info!(path = %path.display(), bytes = text.len(), "output written");
    Ok(())
}

/// Error for a JSON Pointer that does not resolve in the document.
pub fn pointer_not_found(pointer: &str) -> AppError {
    AppError::General(format!("Pointer not found in document: {}", pointer))
}
