//! Membership queries against a built or distributed filter

use super::bit_buffer::BitBuffer;
use super::config::FilterConfig;
use super::filter_builder::FilterBuild;
use super::hash_functions::compute_probe_addresses;
use crate::error::ArtifactError;

/// A filter buffer together with the parameters that produced it
#[derive(Clone, Debug)]
pub struct KeyFilter {
    buffer: BitBuffer,
    config: FilterConfig,
}

impl KeyFilter {
    /// Load a filter from raw artifact bytes
    ///
    /// The artifact is not self-describing, so `config` must match the one
    /// used to build it.
    pub fn from_bytes(bytes: Vec<u8>, config: FilterConfig) -> Result<Self, ArtifactError> {
        config.validate()?;
        let buffer = BitBuffer::from_bytes(bytes, config.bit_size)?;
        Ok(Self { buffer, config })
    }

    pub fn buffer(&self) -> &BitBuffer {
        &self.buffer
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Test if a key might be in the filter
    ///
    /// Returns:
    /// - `true` if the key might be in the original set (could be false positive)
    /// - `false` if the key is definitely NOT in the set
    pub fn contains(&self, key: &str) -> bool {
        compute_probe_addresses(
            key,
            self.config.hash_count,
            self.config.bit_size,
            self.config.hash_algorithm,
        )
        .into_iter()
        .all(|address| self.buffer.get(address))
    }
}

impl From<FilterBuild> for KeyFilter {
    fn from(build: FilterBuild) -> Self {
        let config = build.config().clone();
        let (buffer, _) = build.into_parts();
        Self { buffer, config }
    }
}
