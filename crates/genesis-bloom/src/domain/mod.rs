//! Domain Layer - Pure filter construction
//!
//! This layer contains:
//! - Key set with canonical ordering
//! - Digest selection and probe address derivation
//! - Bit buffer (the artifact)
//! - Configuration and validation
//! - Builder, report and membership queries
//! - Theoretical sizing formulas
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod bit_buffer;
pub mod config;
pub mod filter_builder;
pub mod hash_functions;
pub mod key_filter;
pub mod key_set;
pub mod parameters;
pub mod report;

pub use bit_buffer::BitBuffer;
pub use config::{
    FilterConfig, FilterConfigBuilder, DEFAULT_BIT_SIZE, DEFAULT_HASH_COUNT, MAX_BIT_SIZE,
};
pub use filter_builder::{build, build_parallel, BuildNotice, FilterBuild};
pub use hash_functions::{compute_probe_addresses, probe_string, DigestAlgorithm};
pub use key_filter::KeyFilter;
pub use key_set::KeySet;
pub use parameters::{optimal_hash_count, theoretical_fpr};
pub use report::BuildReport;
