//! Artifact sinks
//!
//! The artifact is the raw buffer bytes with nothing around them.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ArtifactError;
use crate::ports::ArtifactSink;

/// Writes the artifact to a file path
///
/// The file is only created when the artifact is written, so a build that
/// fails never truncates an existing file.
#[derive(Clone, Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArtifactSink for FileSink {
    fn write_artifact(&mut self, bytes: &[u8]) -> Result<(), ArtifactError> {
        std::fs::write(&self.path, bytes)?;
        info!(path = %self.path.display(), bytes = bytes.len(), "Wrote filter artifact");
        Ok(())
    }
}

/// Writes the artifact to any writer, e.g. standard output
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ArtifactSink for WriterSink<W> {
    fn write_artifact(&mut self, bytes: &[u8]) -> Result<(), ArtifactError> {
        self.writer.write_all(bytes)?;
        self.writer.flush()?;
        Ok(())
    }
}
