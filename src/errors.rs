//! Shared error types for the generator.

use thiserror::Error;

/// Main error type for cl3w-gen operations.
///
/// Every variant is fatal to the run; the generator either produces both
/// output files or leaves the output tree untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// The registry document does not have the shape the parser requires.
    #[error("malformed registry: {0}")]
    MalformedRegistry(String),

    /// The requested version ceiling is not in the known ordered list.
    #[error("unknown OpenCL standard `{requested}`; known versions: {}", .known.join(", "))]
    UnknownVersion {
        requested: String,
        known: Vec<String>,
    },

    /// An extension pattern line failed to compile as a glob.
    #[error("invalid extension pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A template is missing an insertion marker.
    #[error("template marker `{key}` not found")]
    MarkerMissing { key: String },

    /// A template contains an insertion marker more than once.
    #[error("template marker `{key}` appears {count} times, expected exactly one")]
    MarkerDuplicated { key: String, count: usize },

    /// The probe anchor command was not selected.
    #[error("probe command `{0}` is not in the selected command set")]
    MissingProbe(String),

    /// Wrapped filesystem errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
