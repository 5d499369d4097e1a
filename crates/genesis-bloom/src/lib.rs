//! # Genesis Bloom
//!
//! Deterministic Bloom filter over the public keys of a genesis file.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure business logic, no I/O
//!   - `KeySet`: Deduplicated keys in canonical order
//!   - `FilterConfig` / `FilterConfigBuilder`: Parameters with validation
//!   - `DigestAlgorithm`: Supported digests, dispatched at compile time
//!   - `build` / `build_parallel`: Filter construction
//!   - `BitBuffer`, `BuildReport`, `KeyFilter`
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `FilterBuildApi`: Driving port
//!   - `KeySource`, `ArtifactSink`: Driven ports
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `FilterBuildService`: Implements `FilterBuildApi`
//!
//! - **Adapters Layer** (`adapters/`): External connections
//!   - `GenesisKeySource`: Reads keys from genesis JSON
//!   - `FileSink`, `WriterSink`: Persist the artifact
//!
//! ## Artifact
//!
//! Exactly `ceil(bit_size / 8)` bytes, no header. Bit `i` is stored in byte
//! `i >> 3` under mask `1 << (i & 7)`. Probe `i` of key `k` sets bit
//! `digest("<i>:<k>") mod bit_size`, the digest read as a big-endian integer.
//!
//! ## Invariants
//!
//! - **No false negatives**: every probe address of every built key is set
//! - **Determinism**: same keys and config give byte-identical artifacts
//! - **Report consistency**: weight equals the set bits of the final buffer
//!
//! ## Usage Example
//!
//! ```
//! use genesis_bloom::{build, DigestAlgorithm, FilterConfig, KeyFilter, KeySet};
//!
//! let keys: KeySet = ["alice"].into_iter().collect();
//! let config = FilterConfig::new(1, 64, DigestAlgorithm::Sha256)?;
//!
//! let filter = build(&keys, &config)?;
//! assert_eq!(filter.report().weight, 1);
//!
//! let filter = KeyFilter::from(filter);
//! assert!(filter.contains("alice"));
//! # Ok::<(), genesis_bloom::BuildError>(())
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{FileSink, GenesisDocument, GenesisKeySource, WriterSink};
pub use domain::{
    build, build_parallel, BitBuffer, BuildNotice, BuildReport, DigestAlgorithm, FilterBuild,
    FilterConfig, FilterConfigBuilder, KeyFilter, KeySet,
};
pub use error::{ArtifactError, BuildError, LoadError, ServiceError};
pub use ports::{ArtifactSink, FilterBuildApi, KeySource};
pub use service::FilterBuildService;
