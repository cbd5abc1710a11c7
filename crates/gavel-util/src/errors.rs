use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all Gavel operations.
#[derive(Debug, Error, Diagnostic)]
pub enum GavelError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed configuration (e.g. gavel.toml).
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check your gavel.toml for syntax errors"))]
    Config { message: String },

    /// Network request failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Malformed input that could not be parsed (POM XML, rules JSON, ...).
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type GavelResult<T> = miette::Result<T>;
