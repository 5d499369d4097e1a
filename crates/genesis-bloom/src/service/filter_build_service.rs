//! Filter Build Service
//!
//! Orchestrates key source -> builder -> artifact sink.

use tracing::{debug, info};

use crate::domain::{
    build, build_parallel, optimal_hash_count, theoretical_fpr, FilterBuild, FilterConfig, KeySet,
};
use crate::error::{BuildError, ServiceError};
use crate::ports::{ArtifactSink, FilterBuildApi, KeySource};

/// Filter build service implementation
///
/// Implements the `FilterBuildApi` port using injected source and sink.
pub struct FilterBuildService<S: KeySource, W: ArtifactSink> {
    /// Where keys come from (driven port)
    source: S,
    /// Where the artifact goes (driven port)
    sink: W,
    config: FilterConfig,
    /// Hash keys on the rayon pool
    parallel: bool,
}

impl<S: KeySource, W: ArtifactSink> FilterBuildService<S, W> {
    pub fn new(source: S, sink: W, config: FilterConfig) -> Self {
        Self {
            source,
            sink,
            config,
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Release the source and sink
    pub fn into_parts(self) -> (S, W) {
        (self.source, self.sink)
    }

    fn log_expectations(&self, key_count: usize) {
        let expected = theoretical_fpr(self.config.bit_size, key_count, self.config.hash_count);
        let optimal = optimal_hash_count(self.config.bit_size, key_count);
        debug!(
            expected_fpr = expected,
            optimal_hash_count = optimal,
            "Theoretical false positive rate"
        );
        if key_count > 0 && optimal != self.config.hash_count {
            debug!(
                configured = self.config.hash_count,
                optimal, "Configured hash count differs from optimal for this key count"
            );
        }
    }
}

impl<S: KeySource, W: ArtifactSink> FilterBuildApi for FilterBuildService<S, W> {
    fn build_filter(&self, keys: &KeySet) -> Result<FilterBuild, BuildError> {
        self.log_expectations(keys.len());
        if self.parallel {
            build_parallel(keys, &self.config)
        } else {
            build(keys, &self.config)
        }
    }

    fn run(&mut self) -> Result<FilterBuild, ServiceError> {
        // Reject bad parameters before reading any input
        self.config.validate()?;

        let keys = self.source.load_keys()?;
        let filter = self.build_filter(&keys)?;

        self.sink.write_artifact(filter.buffer().as_bytes())?;

        let report = filter.report();
        info!(
            weight = report.weight,
            occupancy = report.occupancy,
            false_positive_estimate = report.false_positive_estimate,
            bytes = self.config.artifact_len(),
            "Filter artifact written"
        );

        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BuildNotice, DigestAlgorithm};
    use crate::error::{ArtifactError, LoadError};

    struct FailingSource;

    impl KeySource for FailingSource {
        fn load_keys(&mut self) -> Result<KeySet, LoadError> {
            Err(LoadError::Io(std::io::Error::other("boom")))
        }
    }

    /// Sink that records whether it was ever called
    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<Vec<u8>>,
    }

    impl ArtifactSink for RecordingSink {
        fn write_artifact(&mut self, bytes: &[u8]) -> Result<(), ArtifactError> {
            self.writes.push(bytes.to_vec());
            Ok(())
        }
    }

    fn keys() -> KeySet {
        ["a", "b"].into_iter().collect()
    }

    #[test]
    fn test_run_writes_artifact() {
        let config = FilterConfig::new(3, 8, DigestAlgorithm::Sha256).unwrap();
        let mut service = FilterBuildService::new(keys(), RecordingSink::default(), config);

        let filter = service.run().unwrap();
        assert_eq!(filter.report().weight, 5);

        let (_, sink) = service.into_parts();
        assert_eq!(sink.writes, vec![vec![0x5e]]);
    }

    #[test]
    fn test_invalid_config_writes_nothing() {
        let config = FilterConfig {
            bit_size: 0,
            ..FilterConfig::default()
        };
        let mut service = FilterBuildService::new(keys(), RecordingSink::default(), config);

        let err = service.run().unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Build(BuildError::InvalidParameter {
                parameter: "bit_size",
                ..
            })
        ));

        let (_, sink) = service.into_parts();
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn test_source_failure_writes_nothing() {
        let mut service = FilterBuildService::new(
            FailingSource,
            RecordingSink::default(),
            FilterConfig::default(),
        );

        assert!(matches!(service.run(), Err(ServiceError::Load(_))));
        let (_, sink) = service.into_parts();
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn test_empty_source_still_writes_zero_artifact() {
        let config = FilterConfig::new(3, 20, DigestAlgorithm::Sha256).unwrap();
        let mut service = FilterBuildService::new(KeySet::new(), Vec::new(), config);

        let filter = service.run().unwrap();
        assert_eq!(filter.notices(), &[BuildNotice::EmptyKeySet]);

        let (_, bytes) = service.into_parts();
        assert_eq!(bytes, vec![0u8; 3]);
    }

    #[test]
    fn test_parallel_service_matches_sequential() {
        let config = FilterConfig::new(3, 1 << 14, DigestAlgorithm::Sha3_256).unwrap();
        let set: KeySet = (0..5000).map(|i| format!("GPH{i}")).collect();

        let mut sequential = FilterBuildService::new(set.clone(), Vec::new(), config.clone());
        let mut parallel = FilterBuildService::new(set, Vec::new(), config).with_parallel(true);
        sequential.run().unwrap();
        parallel.run().unwrap();

        assert_eq!(sequential.into_parts().1, parallel.into_parts().1);
    }
}
