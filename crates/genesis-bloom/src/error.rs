//! Error types for the genesis key filter

use thiserror::Error;

/// Errors that abort a filter build before any bit is set
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Unsupported hash algorithm: {name:?} (supported: {supported})")]
    Config { name: String, supported: String },

    #[error("Invalid parameter {parameter}: {value} (must be {expected})")]
    InvalidParameter {
        parameter: &'static str,
        value: usize,
        expected: String,
    },

    #[error("Cannot allocate a filter of bit_size {bit_size} ({bytes} bytes)")]
    Allocation { bit_size: usize, bytes: usize },
}

/// Errors from key sources
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read genesis input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed genesis document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors reading or writing the raw filter artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Filter artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Artifact length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Artifact has bits set past bit_size {bit_size}")]
    PaddingBitsSet { bit_size: usize },

    #[error("Invalid filter configuration: {0}")]
    InvalidConfig(#[from] BuildError),
}

/// Errors surfaced by the build service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}
