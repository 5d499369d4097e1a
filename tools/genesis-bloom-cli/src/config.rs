//! Filter parameter resolution
//!
//! Precedence, lowest first: built-in defaults, environment, command line.

use anyhow::{Context, Result};
use clap::Args;
use genesis_bloom::{FilterConfig, FilterConfigBuilder};
use tracing::{info, warn};

pub const ENV_HASH_COUNT: &str = "GENESIS_BLOOM_HASH_COUNT";
pub const ENV_BIT_SIZE: &str = "GENESIS_BLOOM_BIT_SIZE";
pub const ENV_ALGORITHM: &str = "GENESIS_BLOOM_ALGORITHM";

/// Filter parameters shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Number of hashes per key [default: 3]
    #[arg(short = 'n', long = "num", value_name = "N")]
    pub hash_count: Option<usize>,

    /// Number of bits in filter [default: 8388608]
    #[arg(short = 's', long = "size", value_name = "BITS")]
    pub bit_size: Option<usize>,

    /// Hash algorithm, e.g. sha256, sha3_256, blake3 [default: sha256]
    #[arg(short = 'a', long = "algorithm", value_name = "NAME")]
    pub algorithm: Option<String>,
}

/// Resolve the filter configuration from the process environment and flags
pub fn load_config(args: &FilterArgs) -> Result<FilterConfig> {
    resolve_config(args, |key| std::env::var(key).ok())
}

/// Resolve the filter configuration with an injectable environment
pub fn resolve_config(
    args: &FilterArgs,
    env: impl Fn(&str) -> Option<String>,
) -> Result<FilterConfig> {
    let mut builder = FilterConfigBuilder::new();

    if let Some(raw) = env(ENV_HASH_COUNT) {
        match raw.trim().parse() {
            Ok(count) => {
                builder = builder.hash_count(count);
                info!(hash_count = count, "Loaded hash count from environment");
            }
            Err(_) => warn!("{ENV_HASH_COUNT} must be a non-negative integer, ignoring {raw:?}"),
        }
    }
    if let Some(raw) = env(ENV_BIT_SIZE) {
        match raw.trim().parse() {
            Ok(bits) => {
                builder = builder.bit_size(bits);
                info!(bit_size = bits, "Loaded bit size from environment");
            }
            Err(_) => warn!("{ENV_BIT_SIZE} must be a non-negative integer, ignoring {raw:?}"),
        }
    }
    if let Some(name) = env(ENV_ALGORITHM) {
        builder = builder.hash_algorithm_name(name);
    }

    if let Some(count) = args.hash_count {
        builder = builder.hash_count(count);
    }
    if let Some(bits) = args.bit_size {
        builder = builder.bit_size(bits);
    }
    if let Some(name) = &args.algorithm {
        builder = builder.hash_algorithm_name(name.as_str());
    }

    builder.build().context("invalid filter configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use genesis_bloom::{BuildError, DigestAlgorithm};
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env_or_flags() {
        let config = resolve_config(&FilterArgs::default(), env_from(&[])).unwrap();
        assert_eq!(config, FilterConfig::default());
    }

    #[test]
    fn test_env_overrides_defaults() {
        let env = env_from(&[
            (ENV_HASH_COUNT, "5"),
            (ENV_BIT_SIZE, "1024"),
            (ENV_ALGORITHM, "sha3_256"),
        ]);
        let config = resolve_config(&FilterArgs::default(), env).unwrap();

        assert_eq!(config.hash_count, 5);
        assert_eq!(config.bit_size, 1024);
        assert_eq!(config.hash_algorithm, DigestAlgorithm::Sha3_256);
    }

    #[test]
    fn test_flags_override_env() {
        let env = env_from(&[(ENV_HASH_COUNT, "5"), (ENV_ALGORITHM, "sha3_256")]);
        let args = FilterArgs {
            hash_count: Some(2),
            bit_size: Some(64),
            algorithm: Some("blake3".into()),
        };
        let config = resolve_config(&args, env).unwrap();

        assert_eq!(config.hash_count, 2);
        assert_eq!(config.bit_size, 64);
        assert_eq!(config.hash_algorithm, DigestAlgorithm::Blake3);
    }

    #[test]
    fn test_unparseable_env_is_ignored() {
        let env = env_from(&[(ENV_BIT_SIZE, "lots")]);
        let config = resolve_config(&FilterArgs::default(), env).unwrap();
        assert_eq!(config.bit_size, FilterConfig::default().bit_size);
    }

    #[test]
    fn test_unknown_algorithm_is_reported() {
        let args = FilterArgs {
            algorithm: Some("crc32".into()),
            ..FilterArgs::default()
        };
        let err = resolve_config(&args, env_from(&[])).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::Config { .. })
        ));
        assert!(format!("{err:#}").contains("crc32"));
    }

    #[test]
    fn test_zero_size_names_parameter() {
        let args = FilterArgs {
            bit_size: Some(0),
            ..FilterArgs::default()
        };
        let err = resolve_config(&args, env_from(&[])).unwrap_err();
        assert!(format!("{err:#}").contains("bit_size"));
    }
}
