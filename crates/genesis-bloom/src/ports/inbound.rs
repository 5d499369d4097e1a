//! Inbound Ports (Driving Ports)

use crate::domain::{FilterBuild, KeySet};
use crate::error::{BuildError, ServiceError};

/// Filter build API (Driving Port)
pub trait FilterBuildApi {
    /// Build a filter from an explicit key set with the service configuration
    fn build_filter(&self, keys: &KeySet) -> Result<FilterBuild, BuildError>;

    /// Load keys from the source, build, and write the artifact to the sink
    ///
    /// Nothing is written unless the build succeeds.
    fn run(&mut self) -> Result<FilterBuild, ServiceError>;
}
