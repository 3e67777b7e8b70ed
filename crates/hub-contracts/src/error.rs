//! Error types for the clinical hub generator.
//!
//! Every fallible operation in the workspace returns `HubResult<T>`. A failed
//! run is never salvaged: errors propagate to the CLI, which reports them and
//! exits.

use thiserror::Error;

/// The unified error type for hub initialization, generation and verification.
#[derive(Debug, Error)]
pub enum HubError {
    /// A file could not be read or written.
    #[error("i/o error on '{path}': {reason}")]
    Io { path: String, reason: String },

    /// The spreadsheet library failed to encode or decode a workbook.
    #[error("workbook error: {reason}")]
    Workbook { reason: String },

    /// A loaded workbook lacks a sheet the generator needs.
    #[error("workbook is missing required sheet '{sheet}'")]
    MissingSheet { sheet: String },

    /// A sheet exists but its header row does not match the hub schema.
    #[error("schema mismatch in sheet '{sheet}': {reason}")]
    SchemaMismatch { sheet: String, reason: String },

    /// The generator configuration is unreadable or out of range.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A sampling routine received parameters it cannot draw from.
    #[error("invalid sampling parameter: {reason}")]
    InvalidParameter { reason: String },

    /// A patient record failed construction-time validation.
    #[error("invalid patient record: {reason}")]
    InvalidPatient { reason: String },
}

/// Convenience alias used throughout the hub crates.
pub type HubResult<T> = Result<T, HubError>;
