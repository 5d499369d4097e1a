//! Digest selection and probe address derivation
//!
//! Every key is probed `hash_count` times. Probe `i` of key `k` digests the
//! byte string `"<i>:<k>"`, reads the digest as a big-endian unsigned integer
//! and reduces it modulo the filter size. The framing is part of the artifact
//! format: changing it changes every filter ever built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use sha3::{Keccak256, Sha3_224, Sha3_256, Sha3_384, Sha3_512};

use crate::error::BuildError;

/// Separator between the probe index and the key
pub const PROBE_SEPARATOR: char = ':';

/// Supported digest functions
///
/// Names follow the usual lowercase digest spelling (`sha256`, `sha3_256`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    #[serde(rename = "sha224")]
    Sha224,
    #[default]
    #[serde(rename = "sha256")]
    Sha256,
    #[serde(rename = "sha384")]
    Sha384,
    #[serde(rename = "sha512")]
    Sha512,
    #[serde(rename = "sha512_224")]
    Sha512_224,
    #[serde(rename = "sha512_256")]
    Sha512_256,
    #[serde(rename = "sha3_224")]
    Sha3_224,
    #[serde(rename = "sha3_256")]
    Sha3_256,
    #[serde(rename = "sha3_384")]
    Sha3_384,
    #[serde(rename = "sha3_512")]
    Sha3_512,
    #[serde(rename = "keccak256")]
    Keccak256,
    #[serde(rename = "blake3")]
    Blake3,
}

impl DigestAlgorithm {
    /// All supported algorithms, in display order
    pub const ALL: [DigestAlgorithm; 12] = [
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha512_224,
        Self::Sha512_256,
        Self::Sha3_224,
        Self::Sha3_256,
        Self::Sha3_384,
        Self::Sha3_512,
        Self::Keccak256,
        Self::Blake3,
    ];

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha512_224 => "sha512_224",
            Self::Sha512_256 => "sha512_256",
            Self::Sha3_224 => "sha3_224",
            Self::Sha3_256 => "sha3_256",
            Self::Sha3_384 => "sha3_384",
            Self::Sha3_512 => "sha3_512",
            Self::Keccak256 => "keccak256",
            Self::Blake3 => "blake3",
        }
    }

    /// Digest length in bytes
    pub fn output_len(self) -> usize {
        match self {
            Self::Sha224 | Self::Sha512_224 | Self::Sha3_224 => 28,
            Self::Sha256 | Self::Sha512_256 | Self::Sha3_256 | Self::Keccak256 | Self::Blake3 => {
                32
            }
            Self::Sha384 | Self::Sha3_384 => 48,
            Self::Sha512 | Self::Sha3_512 => 64,
        }
    }

    /// Comma separated list of supported names, for error messages
    pub fn supported_names() -> String {
        Self::ALL
            .iter()
            .map(|a| a.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Compute the full digest of `data`
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha224 => Sha224::digest(data).to_vec(),
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
            Self::Sha512_224 => Sha512_224::digest(data).to_vec(),
            Self::Sha512_256 => Sha512_256::digest(data).to_vec(),
            Self::Sha3_224 => Sha3_224::digest(data).to_vec(),
            Self::Sha3_256 => Sha3_256::digest(data).to_vec(),
            Self::Sha3_384 => Sha3_384::digest(data).to_vec(),
            Self::Sha3_512 => Sha3_512::digest(data).to_vec(),
            Self::Keccak256 => Keccak256::digest(data).to_vec(),
            Self::Blake3 => blake3::hash(data).as_bytes().to_vec(),
        }
    }

    /// Digest `data` and reduce it modulo `bit_size` without allocating
    ///
    /// `bit_size` must be non-zero.
    pub fn address(self, data: &[u8], bit_size: usize) -> usize {
        match self {
            Self::Sha224 => reduce_be(&Sha224::digest(data), bit_size),
            Self::Sha256 => reduce_be(&Sha256::digest(data), bit_size),
            Self::Sha384 => reduce_be(&Sha384::digest(data), bit_size),
            Self::Sha512 => reduce_be(&Sha512::digest(data), bit_size),
            Self::Sha512_224 => reduce_be(&Sha512_224::digest(data), bit_size),
            Self::Sha512_256 => reduce_be(&Sha512_256::digest(data), bit_size),
            Self::Sha3_224 => reduce_be(&Sha3_224::digest(data), bit_size),
            Self::Sha3_256 => reduce_be(&Sha3_256::digest(data), bit_size),
            Self::Sha3_384 => reduce_be(&Sha3_384::digest(data), bit_size),
            Self::Sha3_512 => reduce_be(&Sha3_512::digest(data), bit_size),
            Self::Keccak256 => reduce_be(&Keccak256::digest(data), bit_size),
            Self::Blake3 => reduce_be(blake3::hash(data).as_bytes(), bit_size),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = BuildError;

    /// Case-insensitive; `-` and `_` are interchangeable
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name() == normalized)
            .ok_or_else(|| BuildError::Config {
                name: s.to_string(),
                supported: Self::supported_names(),
            })
    }
}

/// Interpret `bytes` as a big-endian unsigned integer and reduce it mod `modulus`
///
/// Horner's rule over bytes; the accumulator stays below `modulus << 8`,
/// which fits in a u128 for any usize modulus.
pub fn reduce_be(bytes: &[u8], modulus: usize) -> usize {
    let m = modulus as u128;
    bytes
        .iter()
        .fold(0u128, |acc, &b| ((acc << 8) | b as u128) % m) as usize
}

/// Probe string for probe `index` of `key`
pub fn probe_string(index: usize, key: &str) -> String {
    format!("{index}{PROBE_SEPARATOR}{key}")
}

/// Compute the `hash_count` bit addresses of a key
///
/// Addresses may repeat; callers OR them into the buffer.
pub fn compute_probe_addresses(
    key: &str,
    hash_count: usize,
    bit_size: usize,
    algorithm: DigestAlgorithm,
) -> Vec<usize> {
    (0..hash_count)
        .map(|i| algorithm.address(probe_string(i, key).as_bytes(), bit_size))
        .collect()
}
