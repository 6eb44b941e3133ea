//! Error types for Gantry
//!
//! Uses `thiserror` for library errors. Process exit decisions belong to the
//! binary driver; the library only ever returns these values.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Gantry operations
pub type GantryResult<T> = Result<T, GantryError>;

/// Main error type for Gantry operations
#[derive(Error, Debug)]
pub enum GantryError {
    /// A static import could not be resolved to a compiled output and was
    /// not declared external. The manifest must not be emitted.
    #[error("unable to find '{import}' imported by '{importer}'")]
    UnresolvedImport { import: String, importer: String },

    /// A declared entry has no compiled output in the ingested passes
    #[error("unable to map entry '{entry}' ({input}) to a compiled output")]
    MissingEntryOutput { entry: String, input: String },

    /// Entries were supplied as a positional list instead of a name-keyed table
    #[error("entries must be a name-keyed table like {{ app = \"./assets/app.js\" }}, not a list")]
    PositionalEntries,

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Unknown integrity digest algorithm name
    #[error("unknown integrity algorithm '{name}' (expected sha256, sha384 or sha512)")]
    UnknownAlgorithm { name: String },

    /// Manifest assembly was requested before every output pass completed
    #[error("manifest withheld: saw {seen} output passes, expected {expected}")]
    IncompletePasses { seen: usize, expected: usize },

    /// Output root escapes the project root (refuses to write elsewhere)
    #[error("output root '{out_dir}' is not inside project root '{root}'")]
    OutsideProjectRoot { out_dir: PathBuf, root: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
