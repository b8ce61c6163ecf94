//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Document text could not be parsed into an OpenAPI mapping.
    #[from(ignore)]
    #[display("Import Error: {_0}")]
    Import(String),

    /// The current document shell could not be parsed during a sync pass.
    #[from(ignore)]
    #[display("Shell Error: {_0}")]
    Shell(String),

    /// An entity-level rule was violated (empty or duplicate names, unknown ids).
    #[from(ignore)]
    #[display("Validation Error: {_0}")]
    Validation(String),

    /// A persisted snapshot could not be encoded or decoded.
    #[from(ignore)]
    #[display("Persistence Error: {_0}")]
    Persistence(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
