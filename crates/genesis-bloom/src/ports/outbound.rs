//! Outbound Ports (Driven Ports)
//!
//! The builder never touches files. Keys arrive through a `KeySource` that
//! has already extracted and deduplicated them; the finished bytes leave
//! through an `ArtifactSink`.

use crate::domain::KeySet;
use crate::error::{ArtifactError, LoadError};

/// Supplier of the complete key set (Driven Port)
pub trait KeySource {
    /// Produce every key to insert
    fn load_keys(&mut self) -> Result<KeySet, LoadError>;
}

/// Destination for the raw filter bytes (Driven Port)
///
/// Only called after a successful build, so a failed build never leaves a
/// partial artifact behind.
pub trait ArtifactSink {
    fn write_artifact(&mut self, bytes: &[u8]) -> Result<(), ArtifactError>;
}

impl KeySource for KeySet {
    fn load_keys(&mut self) -> Result<KeySet, LoadError> {
        Ok(self.clone())
    }
}

impl ArtifactSink for Vec<u8> {
    fn write_artifact(&mut self, bytes: &[u8]) -> Result<(), ArtifactError> {
        self.clear();
        self.extend_from_slice(bytes);
        Ok(())
    }
}
