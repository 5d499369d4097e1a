//! Service Layer
//!
//! Application services that orchestrate domain logic and coordinate with
//! key sources and artifact sinks via ports.

pub mod filter_build_service;

pub use filter_build_service::FilterBuildService;
