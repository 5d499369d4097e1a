//! Filter construction
//!
//! A build is a pure function of `(KeySet, FilterConfig)`:
//!
//! 1. Validate the configuration; nothing is allocated on failure
//! 2. For every key in canonical order and every probe index, set the bit
//!    addressed by `digest("<i>:<key>") mod bit_size`
//! 3. Derive the report from the finished buffer
//!
//! INVARIANTS:
//! - No false negatives: every probe address of every key is set
//! - Bits are only OR-ed in, so the result does not depend on key order
//! - The parallel build produces the same bytes as the sequential one

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::bit_buffer::BitBuffer;
use super::config::FilterConfig;
use super::hash_functions::{probe_string, DigestAlgorithm};
use super::key_set::KeySet;
use super::report::BuildReport;
use crate::error::BuildError;

/// Below this many keys the parallel build runs sequentially
pub const PARALLEL_THRESHOLD: usize = 1024;

/// Keys hashed per rayon task
const PARALLEL_CHUNK: usize = 4096;

/// Non-fatal conditions observed during a build
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildNotice {
    /// No keys were supplied; the filter is all zeros. Usually an upstream
    /// extraction problem rather than a builder defect.
    EmptyKeySet,
}

/// Result of a successful build
#[derive(Clone, Debug)]
pub struct FilterBuild {
    buffer: BitBuffer,
    report: BuildReport,
    config: FilterConfig,
    key_count: usize,
    notices: Vec<BuildNotice>,
}

impl FilterBuild {
    pub fn buffer(&self) -> &BitBuffer {
        &self.buffer
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Configuration the filter was built with
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Distinct keys inserted
    pub fn key_count(&self) -> usize {
        self.key_count
    }

    pub fn notices(&self) -> &[BuildNotice] {
        &self.notices
    }

    /// Hand the buffer and report to the caller
    pub fn into_parts(self) -> (BitBuffer, BuildReport) {
        (self.buffer, self.report)
    }
}

/// Build a filter sequentially
pub fn build(keys: &KeySet, config: &FilterConfig) -> Result<FilterBuild, BuildError> {
    config.validate()?;
    info!(
        keys = keys.len(),
        hash_count = config.hash_count,
        bit_size = config.bit_size,
        algorithm = %config.hash_algorithm,
        "got {} distinct keys",
        keys.len()
    );

    let mut buffer = BitBuffer::try_new(config.bit_size)?;
    insert_keys(&mut buffer, keys.iter(), config);

    Ok(finish(buffer, keys.len(), config))
}

/// Build a filter on the rayon pool
///
/// Keys are split into chunks in canonical order; each chunk fills a private
/// buffer and the partial buffers are OR-merged. Since OR is commutative and
/// idempotent the bytes equal those of [`build`].
pub fn build_parallel(keys: &KeySet, config: &FilterConfig) -> Result<FilterBuild, BuildError> {
    if keys.len() < PARALLEL_THRESHOLD {
        return build(keys, config);
    }

    config.validate()?;
    info!(
        keys = keys.len(),
        hash_count = config.hash_count,
        bit_size = config.bit_size,
        algorithm = %config.hash_algorithm,
        threads = rayon::current_num_threads(),
        "got {} distinct keys",
        keys.len()
    );

    let mut buffer = BitBuffer::try_new(config.bit_size)?;
    let ordered: Vec<&str> = keys.iter().collect();
    let merged = ordered
        .par_chunks(PARALLEL_CHUNK)
        .map(|chunk| {
            let mut partial = BitBuffer::new(config.bit_size);
            insert_keys(&mut partial, chunk.iter().copied(), config);
            partial
        })
        .reduce_with(|mut acc, partial| {
            acc.merge(&partial);
            acc
        });
    if let Some(partial) = merged {
        buffer.merge(&partial);
    }

    Ok(finish(buffer, keys.len(), config))
}

/// OR every probe address of `keys` into `buffer`
fn insert_keys<'a>(
    buffer: &mut BitBuffer,
    keys: impl Iterator<Item = &'a str>,
    config: &FilterConfig,
) {
    for key in keys {
        insert_key(buffer, key, config.hash_count, config.hash_algorithm);
    }
}

fn insert_key(buffer: &mut BitBuffer, key: &str, hash_count: usize, algorithm: DigestAlgorithm) {
    let bit_size = buffer.bit_size();
    for i in 0..hash_count {
        let address = algorithm.address(probe_string(i, key).as_bytes(), bit_size);
        buffer.set(address);
    }
}

fn finish(buffer: BitBuffer, key_count: usize, config: &FilterConfig) -> FilterBuild {
    let mut notices = Vec::new();
    if key_count == 0 {
        warn!("Building filter from an empty key set; every bit will be zero");
        notices.push(BuildNotice::EmptyKeySet);
    }

    let report = BuildReport::from_buffer(&buffer, config.hash_count);
    debug!(
        weight = report.weight,
        occupancy = report.occupancy,
        false_positive_estimate = report.false_positive_estimate,
        "Filter built"
    );

    FilterBuild {
        buffer,
        report,
        config: config.clone(),
        key_count,
        notices,
    }
}
