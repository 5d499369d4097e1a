//! Filter configuration and validation
//!
//! # Example
//!
//! ```
//! use genesis_bloom::domain::{DigestAlgorithm, FilterConfigBuilder};
//!
//! let config = FilterConfigBuilder::new()
//!     .hash_count(4)
//!     .bit_size(1 << 20)
//!     .hash_algorithm_name("sha3_256")
//!     .build()
//!     .expect("Valid config");
//!
//! assert_eq!(config.hash_algorithm, DigestAlgorithm::Sha3_256);
//! ```

use bitvec::{order::Lsb0, slice::BitSlice};
use serde::{Deserialize, Serialize};

use super::bit_buffer::byte_len;
use super::hash_functions::DigestAlgorithm;
use crate::error::BuildError;

/// Default number of probes per key
pub const DEFAULT_HASH_COUNT: usize = 3;

/// Default filter size: one MiB of bits
pub const DEFAULT_BIT_SIZE: usize = 8 * 1_048_576;

/// Largest filter a `BitBuffer` can address (`usize::MAX >> 3` bits)
pub const MAX_BIT_SIZE: usize = BitSlice::<u8, Lsb0>::MAX_BITS;

/// Build parameters
///
/// Not stored in the artifact; whoever reads the artifact must be given the
/// same values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Probes per key (k)
    pub hash_count: usize,
    /// Filter size in bits (m)
    pub bit_size: usize,
    /// Digest used to derive probe addresses
    pub hash_algorithm: DigestAlgorithm,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            hash_count: DEFAULT_HASH_COUNT,
            bit_size: DEFAULT_BIT_SIZE,
            hash_algorithm: DigestAlgorithm::default(),
        }
    }
}

impl FilterConfig {
    /// Create a new configuration with validation
    pub fn new(
        hash_count: usize,
        bit_size: usize,
        hash_algorithm: DigestAlgorithm,
    ) -> Result<Self, BuildError> {
        let config = Self {
            hash_count,
            bit_size,
            hash_algorithm,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject zero counts and sizes the bit buffer cannot address
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.hash_count == 0 {
            return Err(BuildError::InvalidParameter {
                parameter: "hash_count",
                value: self.hash_count,
                expected: "at least 1".to_string(),
            });
        }

        if self.bit_size == 0 {
            return Err(BuildError::InvalidParameter {
                parameter: "bit_size",
                value: self.bit_size,
                expected: "at least 1".to_string(),
            });
        }

        if self.bit_size > MAX_BIT_SIZE {
            return Err(BuildError::InvalidParameter {
                parameter: "bit_size",
                value: self.bit_size,
                expected: format!("at most {MAX_BIT_SIZE}"),
            });
        }

        Ok(())
    }

    /// Length of the artifact in bytes
    pub fn artifact_len(&self) -> usize {
        byte_len(self.bit_size)
    }
}

/// Builder for FilterConfig with validation
///
/// The algorithm may be given by name; an unknown name surfaces as
/// `BuildError::Config` from `build`.
#[derive(Default)]
pub struct FilterConfigBuilder {
    hash_count: Option<usize>,
    bit_size: Option<usize>,
    hash_algorithm: Option<DigestAlgorithm>,
    hash_algorithm_name: Option<String>,
}

impl FilterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set probes per key
    pub fn hash_count(mut self, count: usize) -> Self {
        self.hash_count = Some(count);
        self
    }

    /// Set filter size in bits
    pub fn bit_size(mut self, bits: usize) -> Self {
        self.bit_size = Some(bits);
        self
    }

    pub fn hash_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.hash_algorithm = Some(algorithm);
        self.hash_algorithm_name = None;
        self
    }

    /// Set the digest by name, resolved in `build`
    pub fn hash_algorithm_name(mut self, name: impl Into<String>) -> Self {
        self.hash_algorithm_name = Some(name.into());
        self.hash_algorithm = None;
        self
    }

    /// Build the FilterConfig, validating all parameters
    pub fn build(self) -> Result<FilterConfig, BuildError> {
        let config = self.build_unchecked()?;
        config.validate()?;
        Ok(config)
    }

    /// Build without range checks on `hash_count` and `bit_size`
    ///
    /// An algorithm name still has to resolve. The sizes are checked again
    /// by `build`, `build_parallel` and `KeyFilter::from_bytes`.
    pub fn build_unchecked(self) -> Result<FilterConfig, BuildError> {
        let hash_algorithm = match &self.hash_algorithm_name {
            Some(name) => name.parse()?,
            None => self.hash_algorithm.unwrap_or_default(),
        };

        Ok(FilterConfig {
            hash_count: self.hash_count.unwrap_or(DEFAULT_HASH_COUNT),
            bit_size: self.bit_size.unwrap_or(DEFAULT_BIT_SIZE),
            hash_algorithm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = FilterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hash_count, 3);
        assert_eq!(config.bit_size, 8_388_608);
        assert_eq!(config.hash_algorithm, DigestAlgorithm::Sha256);
        assert_eq!(config.artifact_len(), 1_048_576);
    }

    #[test]
    fn test_validation_rejects_zero_hash_count() {
        let result = FilterConfig::new(0, 64, DigestAlgorithm::Sha256);
        assert_eq!(
            result,
            Err(BuildError::InvalidParameter {
                parameter: "hash_count",
                value: 0,
                expected: "at least 1".to_string(),
            })
        );
    }

    #[test]
    fn test_validation_rejects_zero_bit_size() {
        let result = FilterConfig::new(3, 0, DigestAlgorithm::Sha256);
        assert_eq!(
            result,
            Err(BuildError::InvalidParameter {
                parameter: "bit_size",
                value: 0,
                expected: "at least 1".to_string(),
            })
        );
    }

    #[test]
    fn test_validation_rejects_unaddressable_bit_size() {
        let err = FilterConfig::new(3, usize::MAX, DigestAlgorithm::Sha256).unwrap_err();
        assert_eq!(
            err,
            BuildError::InvalidParameter {
                parameter: "bit_size",
                value: usize::MAX,
                expected: format!("at most {MAX_BIT_SIZE}"),
            }
        );
        assert!(err.to_string().contains("bit_size"));

        let too_big = FilterConfig::new(3, MAX_BIT_SIZE + 1, DigestAlgorithm::Sha256);
        assert!(too_big.is_err());
    }

    #[test]
    fn test_validation_accepts_largest_addressable_bit_size() {
        // validation only; nothing is allocated
        let config = FilterConfig::new(1, MAX_BIT_SIZE, DigestAlgorithm::Sha256).unwrap();
        assert_eq!(config.bit_size, usize::MAX >> 3);
    }

    #[test]
    fn test_build_unchecked_skips_range_checks() {
        let config = FilterConfigBuilder::new()
            .hash_count(0)
            .bit_size(0)
            .hash_algorithm(DigestAlgorithm::Keccak256)
            .build_unchecked()
            .unwrap();

        assert_eq!(config.hash_count, 0);
        assert_eq!(config.bit_size, 0);
        assert_eq!(config.hash_algorithm, DigestAlgorithm::Keccak256);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_build_unchecked_still_resolves_algorithm_name() {
        let result = FilterConfigBuilder::new()
            .hash_algorithm_name("md5")
            .build_unchecked();
        assert!(matches!(result, Err(BuildError::Config { .. })));
    }

    #[test]
    fn test_artifact_len_rounds_up() {
        let config = FilterConfig::new(1, 65, DigestAlgorithm::Sha256).unwrap();
        assert_eq!(config.artifact_len(), 9);
    }

    #[test]
    fn test_builder_uses_defaults() {
        let config = FilterConfigBuilder::new().build().unwrap();
        assert_eq!(config, FilterConfig::default());
    }

    #[test]
    fn test_builder_resolves_algorithm_name() {
        let config = FilterConfigBuilder::new()
            .hash_count(5)
            .bit_size(1024)
            .hash_algorithm_name("SHA512")
            .build()
            .unwrap();

        assert_eq!(config.hash_count, 5);
        assert_eq!(config.bit_size, 1024);
        assert_eq!(config.hash_algorithm, DigestAlgorithm::Sha512);
    }

    #[test]
    fn test_builder_rejects_unknown_algorithm() {
        let result = FilterConfigBuilder::new().hash_algorithm_name("md4").build();
        assert!(matches!(result, Err(BuildError::Config { .. })));
    }

    #[test]
    fn test_builder_last_algorithm_setter_wins() {
        let config = FilterConfigBuilder::new()
            .hash_algorithm_name("nonsense")
            .hash_algorithm(DigestAlgorithm::Blake3)
            .build()
            .unwrap();
        assert_eq!(config.hash_algorithm, DigestAlgorithm::Blake3);
    }

    #[test]
    fn test_builder_rejects_zero_sizes() {
        let result = FilterConfigBuilder::new().hash_count(0).build();
        assert!(matches!(
            result,
            Err(BuildError::InvalidParameter {
                parameter: "hash_count",
                ..
            })
        ));
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = FilterConfig::new(7, 4096, DigestAlgorithm::Sha3_256).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"hash_count":7,"bit_size":4096,"hash_algorithm":"sha3_256"}"#
        );
        let back: FilterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
