//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for the command-line tool
//! - Driven Ports (outbound) - Where keys come from and where the artifact goes

pub mod inbound;
pub mod outbound;

pub use inbound::FilterBuildApi;
pub use outbound::{ArtifactSink, KeySource};
