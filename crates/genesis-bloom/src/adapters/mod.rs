//! Adapters Layer (Driven Adapters)
//!
//! Implementations of the driven ports that touch the outside world.
//!
//! ## Adapters
//!
//! - `GenesisKeySource` - Extracts keys from a genesis JSON document
//! - `FileSink` / `WriterSink` - Persist the raw filter bytes

pub mod artifact_sink;
pub mod genesis_source;

pub use artifact_sink::{FileSink, WriterSink};
pub use genesis_source::{GenesisDocument, GenesisKeySource};
