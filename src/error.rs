//! Error types for fixture loading.
//!
//! Most public operations swallow these into log events and absent results;
//! they surface directly only from the lower-level helpers.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading or decoding a fixture document or fragment.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The file provider could not produce the bytes.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes were not valid JSON.
    #[error("invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON, but the top level was not an object.
    #[error("{origin} is not a JSON object")]
    NotAnObject { origin: String },

    /// A file reference was found but no root directory was configured.
    #[error("no external file root for reference {0}")]
    NoExternalRoot(String),
}

pub type Result<T> = std::result::Result<T, FixtureError>;
