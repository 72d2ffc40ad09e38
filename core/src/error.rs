//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! The engine itself is total: compilation and synthesis never fail. Errors only
//! surface at the I/O boundary, i.e. when reading documents or configuration.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A document or configuration file could not be parsed.
    /// Created explicitly so that `From<String>` stays with `General`.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
